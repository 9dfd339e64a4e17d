//! Multi-tick convergence behavior of the CCD driver.

use std::time::Duration;

use approx::assert_relative_eq;
use nalgebra::Vector3;

use armature_core::{SessionConfig, TickClock, TickContext};
use armature_ik::{IkDriver, Rig};
use armature_test_utils::{bent_planar_chain, planar_chain};

/// Per-tick slack allowed on the non-increase check, covers f32 rounding.
const MONOTONE_SLACK: f32 = 1e-5;

fn run_until_settled(
    driver: &mut IkDriver,
    rig: &mut Rig,
    tolerance: f32,
    max_ticks: u64,
) -> (f32, u64) {
    for index in 0..max_ticks {
        let ctx = TickContext {
            time: armature_core::SimTime::from_secs(index as f64 / 60.0),
            dt: 1.0 / 60.0,
            index,
        };
        let report = driver.tick(rig, &ctx);
        assert!(
            report.distance_after <= report.distance_before + MONOTONE_SLACK,
            "distance increased at tick {index}: {} -> {}",
            report.distance_before,
            report.distance_after
        );
        if report.distance_after <= tolerance {
            return (report.distance_after, index + 1);
        }
    }
    (driver.distance(rig), max_ticks)
}

#[test]
fn reachable_target_converges() {
    let (mut rig, tooltip) = planar_chain(&[1.0, 1.0, 1.0]);
    let target = rig.add_marker(
        "goal",
        None,
        nalgebra::Isometry3::translation(2.0, 0.0, 0.0),
    );
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, Some(target), config.solver);

    let (distance, ticks) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 2000);
    assert!(
        distance <= config.settle_tolerance,
        "did not settle: distance {distance} after {ticks} ticks"
    );
}

#[test]
fn bent_chain_converges_too() {
    let (mut rig, tooltip) = bent_planar_chain(&[1.0, 1.0, 1.0], 0.6);
    let target = rig.add_marker(
        "goal",
        None,
        nalgebra::Isometry3::translation(1.5, 0.5, 0.5),
    );
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, Some(target), config.solver);

    let (distance, _) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 2000);
    assert!(distance <= config.settle_tolerance);
}

#[test]
fn unreachable_target_plateaus_at_reach_deficit() {
    let (mut rig, tooltip) = planar_chain(&[1.0, 1.0, 1.0]);
    let target = rig.add_marker(
        "goal",
        None,
        nalgebra::Isometry3::translation(10.0, 0.0, 0.0),
    );
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, Some(target), config.solver);

    let (distance, _) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 2000);

    // The chain straightens toward the target; the residual is the gap
    // between target distance (10) and total reach (3).
    assert_relative_eq!(distance, 7.0, epsilon = 0.05);

    // Fully stretched: further ticks barely move it.
    let late_ctx = TickContext {
        time: armature_core::SimTime::from_secs(100.0),
        dt: 1.0 / 60.0,
        index: 5000,
    };
    let report = driver.tick(&mut rig, &late_ctx);
    assert!((report.distance_before - report.distance_after).abs() < 1e-3);
}

#[test]
fn synthesized_target_holds_pose_until_moved() {
    let (mut rig, tooltip) = planar_chain(&[1.0, 1.0]);
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, None, config.solver);

    for index in 0..10 {
        let ctx = TickContext {
            time: armature_core::SimTime::from_secs(index as f64 / 60.0),
            dt: 1.0 / 60.0,
            index,
        };
        assert_eq!(driver.tick(&mut rig, &ctx).rotated_joints, 0);
    }

    // Relocate the target; the chain follows.
    rig.set_local_translation(driver.target(), Vector3::new(1.0, 0.0, 1.0));
    let (distance, _) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 2000);
    assert!(distance <= config.settle_tolerance);

    let tip = rig.world_position(tooltip);
    assert_relative_eq!(tip.x, 1.0, epsilon = 2e-3);
    assert_relative_eq!(tip.z, 1.0, epsilon = 2e-3);
}

#[test]
fn relocated_target_is_tracked_after_settling() {
    let (mut rig, tooltip) = planar_chain(&[1.0, 1.0, 1.0]);
    let target = rig.add_marker(
        "goal",
        None,
        nalgebra::Isometry3::translation(1.5, 0.0, 1.0),
    );
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, Some(target), config.solver);

    let (first, _) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 2000);
    assert!(first <= config.settle_tolerance);

    rig.set_local_translation(target, Vector3::new(-1.0, 1.0, 1.0));
    let (second, _) = run_until_settled(&mut driver, &mut rig, config.settle_tolerance, 4000);
    assert!(second <= config.settle_tolerance);
}

#[test]
fn tick_clock_drives_the_session() {
    let (mut rig, tooltip) = planar_chain(&[1.0, 1.0, 1.0]);
    let target = rig.add_marker(
        "goal",
        None,
        nalgebra::Isometry3::translation(2.0, 0.0, 0.5),
    );
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, Some(target), config.solver);

    let mut clock = TickClock::new(config.tick_dt).with_max_ticks(config.max_ticks_per_frame);
    let mut last_index = None;
    // 20 seconds of wall time, fed frame by frame.
    for _ in 0..1200 {
        clock.accumulate(Duration::from_secs_f64(1.0 / 60.0));
        while let Some(ctx) = clock.next_tick() {
            let report = driver.tick(&mut rig, &ctx);
            last_index = Some(report.index);
        }
    }

    assert!(driver.distance(&rig) <= config.settle_tolerance);
    // Every accumulated step was drained exactly once.
    assert_eq!(last_index, Some(1199));
}
