// scout_core/tests/scenarios.rs

//! Whole-controller scenarios driven through the public API with
//! camera-sized masks.

use scout_core::prelude::*;

use nalgebra::DMatrix;

const CAMERA: GridShape = GridShape::new(480, 640);

fn controller(config: ControllerConfig) -> SteeringController {
    SteeringController::new(config).expect("valid config")
}

/// A camera-sized mask with the given pixel ranges marked as obstacle.
fn camera_mask(blocked: &[(std::ops::Range<usize>, std::ops::Range<usize>)]) -> DMatrix<u8> {
    let mut mask = empty_map(CAMERA);
    for (rows, cols) in blocked {
        for r in rows.clone() {
            for c in cols.clone() {
                mask[(r, c)] = 255;
            }
        }
    }
    mask
}

fn target_at(c: &SteeringController, center_row: isize, center_col: isize) -> ObjectPosition {
    let detection = BoundingBox::new(center_col - 20, center_row - 20, 40, 40);
    c.detection_to_grid(&detection).unwrap()
}

#[test]
fn open_field_without_target_drives_straight() {
    let mut c = controller(ControllerConfig::default());
    c.set_map(Some(&camera_mask(&[])), None).unwrap();

    let decision = c.decide(None).unwrap();
    assert_eq!(decision.command, VelocityCommand::new(100, 0));
    assert!(!decision.signal);
    assert_eq!(WireCommand(decision.output()).encode(), "100,0");
}

#[test]
fn obstacle_on_the_left_veers_right() {
    let mut c = controller(ControllerConfig::default());
    c.set_map(Some(&camera_mask(&[(0..480, 0..300)])), None).unwrap();

    let collisions = c.check_collisions().unwrap();
    assert_eq!(collisions, vec![true, true, true, false, false, false]);
    assert_eq!(c.decide(None).unwrap().command, VelocityCommand::new(100, -50));
}

#[test]
fn target_right_under_the_camera_signals() {
    let mut config = ControllerConfig::default();
    config.min_signal_distance = 10;
    let mut c = controller(config);
    c.set_map(Some(&camera_mask(&[])), None).unwrap();

    // Centre (460, 320) px is row 57 of the grid.
    let target = target_at(&c, 460, 320);
    assert_eq!(target.center(), Cell::new(57, 30));

    let decision = c.decide(Some(target)).unwrap();
    assert!(decision.signal);
    assert_eq!(decision.command, VelocityCommand::STOP);
    assert_eq!(WireCommand(decision.output()).encode(), "signal");
}

#[test]
fn targets_to_either_side_steer_towards_them() {
    let mut c = controller(ControllerConfig::default());
    c.set_map(Some(&camera_mask(&[])), None).unwrap();

    // Up and to the right of the vehicle.
    let right = target_at(&c, 240, 533);
    assert_eq!(right.center(), Cell::new(30, 49));
    let command = c.decide(Some(right)).unwrap().command;
    assert!(command.linear > 0);
    assert!(command.angular < 0);
    assert!(c.is_seeking_target(Some(right)));

    c.set_map(Some(&camera_mask(&[])), None).unwrap();
    let left = target_at(&c, 240, 107);
    let command = c.decide(Some(left)).unwrap().command;
    assert!(command.linear > 0);
    assert!(command.angular > 0);
}

#[test]
fn unreachable_target_falls_back_to_straight_ahead() {
    let mut c = controller(ControllerConfig::default());
    // A band across the full width, well above the probe blocks.
    c.set_map(Some(&camera_mask(&[(160..200, 0..640)])), None).unwrap();

    let target = target_at(&c, 40, 320);
    let decision = c.decide(Some(target)).unwrap();
    assert_eq!(decision.command, VelocityCommand::new(100, 0));
    assert!(!decision.signal);
    assert!(!c.is_seeking_target(Some(target)));
}

#[test]
fn boxed_in_vehicle_keeps_spinning_the_same_way() {
    let mut c = controller(ControllerConfig::default());

    c.set_map(Some(&camera_mask(&[(0..480, 0..300)])), None).unwrap();
    assert_eq!(c.decide(None).unwrap().command.angular, -50);

    c.set_map(Some(&camera_mask(&[(0..480, 0..640)])), None).unwrap();
    assert_eq!(c.decide(None).unwrap().command, VelocityCommand::new(0, -100));
    c.set_map(Some(&camera_mask(&[(0..480, 0..640)])), None).unwrap();
    assert_eq!(c.decide(None).unwrap().command, VelocityCommand::new(0, -100));
}

#[test]
fn pid_smoothing_ramps_towards_the_raw_command() {
    let mut config = ControllerConfig::default();
    config.linear_pid = Some(PidGains::new(0.6, 1.0, 0.003));
    let mut c = controller(config);

    let mut speeds = Vec::new();
    for _ in 0..20 {
        c.set_map(Some(&camera_mask(&[])), None).unwrap();
        speeds.push(c.decide(None).unwrap().command.linear);
    }
    assert!(speeds[0] < 100);
    assert!(speeds.iter().all(|&s| (0..=100).contains(&s)));
    assert!(*speeds.last().unwrap() > speeds[0]);
}
