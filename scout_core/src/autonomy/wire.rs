// scout_core/src/autonomy/wire.rs

//! Text encoding of controller outputs for the command link.
//!
//! - Drive: `"<linear>,<angular>"`, e.g. `"100,-50"`.
//! - Signal: `"signal"`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{ControlOutput, VelocityCommand};

pub const SIGNAL_TOKEN: &str = "signal";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Empty command.")]
    Empty,

    #[error("Expected '<linear>,<angular>' or 'signal', got '{0}'.")]
    Malformed(String),

    #[error("Invalid velocity component '{0}'.")]
    InvalidNumber(String),
}

/// One command as it travels over the link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WireCommand(pub ControlOutput);

impl WireCommand {
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses a command. Fractional components are truncated toward zero and
    /// then clamped to `[-100, 100]`.
    pub fn parse(text: &str) -> Result<Self, WireError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WireError::Empty);
        }
        if text == SIGNAL_TOKEN {
            return Ok(Self(ControlOutput::Signal));
        }

        let mut parts = text.split(',');
        let (Some(linear), Some(angular), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(WireError::Malformed(text.to_string()));
        };
        Ok(Self(ControlOutput::Drive(VelocityCommand::new(
            component(linear)?,
            component(angular)?,
        ))))
    }

    pub fn output(&self) -> ControlOutput {
        self.0
    }
}

fn component(text: &str) -> Result<i32, WireError> {
    let text = text.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| WireError::InvalidNumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(WireError::InvalidNumber(text.to_string()));
    }
    Ok(value.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

impl fmt::Display for WireCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ControlOutput::Drive(cmd) => write!(f, "{},{}", cmd.linear, cmd.angular),
            ControlOutput::Signal => f.write_str(SIGNAL_TOKEN),
        }
    }
}

impl FromStr for WireCommand {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ControlOutput> for WireCommand {
    fn from(output: ControlOutput) -> Self {
        Self(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_drive_and_signal() {
        let drive = WireCommand(ControlOutput::Drive(VelocityCommand::new(100, -50)));
        assert_eq!(drive.encode(), "100,-50");
        assert_eq!(WireCommand(ControlOutput::Signal).encode(), "signal");
    }

    #[test]
    fn parses_what_it_encodes() {
        for text in ["0,0", "100,-50", "-100,100", "signal"] {
            assert_eq!(WireCommand::parse(text).unwrap().encode(), text);
        }
    }

    #[test]
    fn fractional_and_out_of_range_values_are_normalised() {
        let cmd: WireCommand = " 99.9 , -250 ".parse().unwrap();
        assert_eq!(
            cmd.output(),
            ControlOutput::Drive(VelocityCommand::new(99, -100))
        );
        let cmd = WireCommand::parse("-0.7,0.7").unwrap();
        assert_eq!(cmd.output(), ControlOutput::Drive(VelocityCommand::STOP));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(WireCommand::parse("  "), Err(WireError::Empty));
        assert!(matches!(WireCommand::parse("1,2,3"), Err(WireError::Malformed(_))));
        assert!(matches!(WireCommand::parse("stop"), Err(WireError::Malformed(_))));
        assert!(matches!(WireCommand::parse("a,1"), Err(WireError::InvalidNumber(_))));
        assert!(matches!(WireCommand::parse("NaN,1"), Err(WireError::InvalidNumber(_))));
    }
}
