// scout_sim/src/simulation/transport.rs

//! An in-process command link. The controller side encodes every output to its
//! wire text; the vehicle side parses it back, exactly as a socket link would.

use std::sync::mpsc::{self, Receiver, Sender};

use scout_core::autonomy::wire::WireError;
use scout_core::prelude::{AutonomyError, CommandSink, ControlOutput, WireCommand};
use tracing::warn;

/// Creates a connected sender/receiver pair.
pub fn link() -> (LinkSender, LinkReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        LinkSender { tx },
        LinkReceiver {
            rx,
            transcript: Vec::new(),
            signaled: false,
        },
    )
}

/// Controller end of the link.
pub struct LinkSender {
    tx: Sender<String>,
}

impl CommandSink for LinkSender {
    fn send(&mut self, output: ControlOutput) -> Result<(), AutonomyError> {
        self.tx
            .send(WireCommand(output).encode())
            .map_err(|_| AutonomyError::Transport("vehicle end of the link is closed".to_string()))
    }
}

/// Vehicle end of the link. Keeps every line it receives.
pub struct LinkReceiver {
    rx: Receiver<String>,
    transcript: Vec<String>,
    signaled: bool,
}

impl LinkReceiver {
    /// Reads everything sent so far and returns the newest valid command.
    pub fn latest(&mut self) -> Option<ControlOutput> {
        let mut latest = None;
        while let Ok(line) = self.rx.try_recv() {
            match self.decode(&line) {
                Ok(output) => latest = Some(output),
                Err(e) => warn!("Ignoring malformed command '{}': {}", line, e),
            }
            self.transcript.push(line);
        }
        latest
    }

    fn decode(&mut self, line: &str) -> Result<ControlOutput, WireError> {
        let output = WireCommand::parse(line)?.output();
        if output == ControlOutput::Signal {
            self.signaled = true;
        }
        Ok(output)
    }

    /// True once a signal has been received.
    pub fn signaled(&self) -> bool {
        self.signaled
    }

    /// Every line received, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}
