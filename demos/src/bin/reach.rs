//! Three-joint arm chasing a sequence of targets.
//!
//! Builds an arm from a TOML rig description, attaches an IK driver, and
//! drives it through a fixed-timestep tick loop toward a set of Cartesian
//! targets, printing the tooltip error as it settles.
//!
//! Run: `cargo run -p armature-demos --bin reach`

use std::time::Duration;

use armature_core::{SessionConfig, TickClock};
use armature_demos::THREE_JOINT_ARM_TOML;
use armature_ik::{IkDriver, RigDescriptor};
use nalgebra::Vector3;

fn main() {
    println!("=== Three-joint arm reach demo ===\n");

    // 1. Build the rig from its TOML description
    let mut rig = RigDescriptor::parse_str(THREE_JOINT_ARM_TOML)
        .expect("failed to parse arm description")
        .build()
        .expect("failed to build arm rig");
    let tooltip = rig.find("tooltip").expect("arm has no tooltip node");

    // 2. Attach the IK driver; the target node is synthesized at the tip
    let config = SessionConfig::default();
    let mut driver = IkDriver::attach(&mut rig, tooltip, None, config.solver);
    let target = driver.target();

    println!(
        "chain: {} joints, reach {:.2} m",
        driver.chain().len(),
        driver.chain().reach(&rig)
    );

    // 3. Targets to visit (all within reach except the last)
    let targets = [
        Vector3::new(1.5, 0.0, 1.0),
        Vector3::new(0.0, 1.5, 1.0),
        Vector3::new(-1.0, -1.0, 0.5),
        Vector3::new(0.0, 0.0, 2.5),
        Vector3::new(5.0, 0.0, 0.0), // out of reach, plateaus
    ];
    println!("targets: {} positions, 3 s each\n", targets.len());

    // 4. Fixed-timestep loop: one solver pass per tick
    let mut clock = TickClock::new(config.tick_dt).with_max_ticks(config.max_ticks_per_frame);
    let ticks_per_target = (3.0 / config.tick_dt) as u64;
    let frame = Duration::from_secs_f64(config.tick_dt);

    for (i, goal) in targets.iter().enumerate() {
        rig.set_local_translation(target, *goal);
        let mut last_distance = driver.distance(&rig);

        for step in 0..ticks_per_target {
            clock.accumulate(frame);
            while let Some(ctx) = clock.next_tick() {
                let report = driver.tick(&mut rig, &ctx);
                last_distance = report.distance_after;
            }
            if step % 60 == 0 {
                let tip = rig.world_position(tooltip);
                println!(
                    "  target {i} [{:.2}, {:.2}, {:.2}]  tip [{:.3}, {:.3}, {:.3}]  err={:.4}m",
                    goal.x, goal.y, goal.z, tip.x, tip.y, tip.z, last_distance,
                );
            }
        }

        let settled = last_distance <= config.settle_tolerance;
        println!(
            "  target {i} final err={:.4}m  {}\n",
            last_distance,
            if settled { "SETTLED" } else { "UNREACHED" },
        );
    }

    // 5. Verification sweep: reachable targets must settle
    println!("--- Verification ---");
    let mut all_ok = true;
    for (i, goal) in targets.iter().enumerate() {
        let reachable = goal.norm() <= driver.chain().reach(&rig);
        rig.set_local_translation(target, *goal);
        for _ in 0..2000 {
            clock.accumulate(frame);
            while let Some(ctx) = clock.next_tick() {
                driver.tick(&mut rig, &ctx);
            }
        }
        let err = driver.distance(&rig);
        let ok = !reachable || err <= config.settle_tolerance;
        all_ok &= ok;
        println!(
            "  target {i}: err={:.5}m  reachable={reachable}  {}",
            err,
            if ok { "OK" } else { "FAILED" },
        );
    }

    println!(
        "\nReach demo {}",
        if all_ok { "PASSED" } else { "FAILED" }
    );
}
