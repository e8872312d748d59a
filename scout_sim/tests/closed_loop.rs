// scout_sim/tests/closed_loop.rs

//! End-to-end runs of the simulator: world, sensors, controller, link, vehicle.

use std::fs;

use scout_sim::prelude::*;

fn scenario(extra: &str) -> ScenarioConfig {
    let text = format!(
        r#"
        [simulation]
        seed = 11
        frames = 200

        [world]
        obstacle_count = 0
        start_pose = [1.0, 5.0, 0.0]
        target = [4.0, 5.0]
        {extra}
        "#
    );
    parse_scenario(&text).unwrap()
}

#[test]
fn open_field_run_reaches_the_target_and_signals() {
    let mut sim = Simulation::new(scenario(""), None).unwrap();
    let summary = sim.run().unwrap();

    assert!(summary.signaled);
    assert!(summary.final_distance < 0.6, "stopped {} m away", summary.final_distance);
    assert!(summary.frames_processed < 200);
    assert_eq!(summary.frames_dropped, 0);
    assert_eq!(summary.contact_frames, 0);

    assert_eq!(summary.transcript.first().map(String::as_str), Some("100,0"));
    assert_eq!(summary.transcript.last().map(String::as_str), Some("signal"));
    assert_eq!(summary.transcript.len() as u64, summary.frames_processed);
}

#[test]
fn frame_budget_bounds_the_run() {
    let mut config = scenario("");
    config.simulation.frames = 5;
    let mut sim = Simulation::new(config, None).unwrap();
    let summary = sim.run().unwrap();

    assert!(!summary.signaled);
    assert_eq!(summary.frames_processed, 5);
    // Five frames at full speed.
    assert!((summary.distance_travelled - 0.25).abs() < 1e-9);
}

#[test]
fn runs_are_deterministic_for_a_seed() {
    let run = || {
        let mut config = scenario("");
        config.world.obstacle_count = 6;
        config.world.target = None;
        config.simulation.frames = 60;
        let mut sim = Simulation::new(config, None).unwrap();
        let world = sim.world().clone();
        (world, sim.run().unwrap())
    };
    let (world_a, a) = run();
    let (world_b, b) = run();

    assert_eq!(world_a, world_b);
    assert_eq!(a.transcript, b.transcript);
    assert_eq!(a.final_pose, b.final_pose);
}

#[test]
fn debug_dir_receives_overlays_and_a_snapshot() {
    let dir = std::env::temp_dir().join(format!("scout_sim_debug_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let mut config = scenario("");
    config.world.target = Some([2.5, 5.0]);
    config.simulation.frames = 3;
    let mut sim = Simulation::new(config, Some(dir.clone())).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.frames_processed, 3);

    for sequence in 0..3 {
        assert!(dir.join(format!("frame_{sequence:05}.png")).is_file());
    }
    let snapshot = image::open(dir.join("snapshot.png")).unwrap();
    // Two tiles across, three down, one grid each.
    assert_eq!((snapshot.width(), snapshot.height()), (120, 180));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_controller_section_is_rejected() {
    let mut config = scenario("");
    config.controller.probes.block_size = 0;
    assert!(matches!(
        Simulation::new(config, None),
        Err(SimError::Control(ControlError::InvalidConfig(_)))
    ));
}
