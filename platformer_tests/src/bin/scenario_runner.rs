//! Behavioral scenario runner.
//!
//! Runs the canonical movement and replication scenarios headless and prints
//! a summary. Exits non-zero if any scenario fails.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::ensure;
use platformer_shared::{
    collision::{self, Contact},
    input::HeldKeys,
    math::Vec2,
    net::PeerId,
    physics::{self, Character},
    replication::ReplicationChannel,
    scene::{Obstacle, Playfield, Scene},
};

const EPS: f64 = 1e-9;

struct Scenario {
    name: &'static str,
    run: fn() -> anyhow::Result<()>,
}

fn grounded_on_floor(scene: &Scene) -> Character {
    let size = Vec2::new(20.0, 50.0);
    let mut c = Character::new(Vec2::new(120.0, scene.playfield.height - size.y), size);
    c.grounded = true;
    c.can_double_jump = false;
    c
}

fn platform_scene() -> Scene {
    Scene::new(Playfield::default(), vec![Obstacle::new(600.0, 400.0, 100.0, 50.0)])
}

fn rest_on_floor() -> anyhow::Result<()> {
    let scene = Scene::default();
    let mut c = grounded_on_floor(&scene);
    let before = c.position;
    physics::tick(&mut c, HeldKeys::empty(), &scene);
    ensure!(c.grounded, "not grounded");
    ensure!(c.velocity == Vec2::ZERO, "velocity {}", c.velocity);
    ensure!(c.position.x == before.x, "drifted to {}", c.position);
    ensure!((c.position.y - before.y).abs() < EPS, "settled at {}", c.position);
    Ok(())
}

fn single_jump() -> anyhow::Result<()> {
    let scene = Scene::default();
    let mut c = grounded_on_floor(&scene);
    physics::tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);
    ensure!((c.velocity.y + 7.8).abs() < EPS, "velocity.y = {}", c.velocity.y);
    ensure!(!c.grounded, "still grounded");
    ensure!(c.can_double_jump, "double jump unavailable");
    Ok(())
}

fn land_on_platform_from_left() -> anyhow::Result<()> {
    let scene = platform_scene();
    let mut c = Character::new(Vec2::new(570.0, 340.0), Vec2::new(20.0, 50.0));
    c.velocity = Vec2::new(4.0, 2.0);
    c.acceleration.x = 2.0;

    for _ in 0..10 {
        physics::step(&mut c, HeldKeys::RIGHT);
        let touched = collision::resolve_obstacle(&mut c, &scene.obstacles()[0]);
        collision::resolve_floor(&mut c, scene.playfield.height);
        if let Some(contact) = touched {
            ensure!(contact == Contact::Top, "resolved as {contact:?}");
            ensure!(c.grounded, "not grounded after landing");
            return Ok(());
        }
    }
    anyhow::bail!("never reached the platform: {}", c.position)
}

fn pushed_out_sideways() -> anyhow::Result<()> {
    let scene = platform_scene();
    let mut c = Character::new(Vec2::new(570.0, 420.0), Vec2::new(20.0, 50.0));
    c.acceleration.x = 2.0;

    for _ in 0..10 {
        physics::step(&mut c, HeldKeys::RIGHT);
        if let Some(contact) = collision::resolve_obstacle(&mut c, &scene.obstacles()[0]) {
            ensure!(contact == Contact::Left, "resolved as {contact:?}");
            ensure!(!c.grounded, "side push grounded the character");
            ensure!((c.position.x + c.size.x - 600.0).abs() < EPS, "x = {}", c.position.x);
            return Ok(());
        }
    }
    anyhow::bail!("never reached the platform: {}", c.position)
}

fn peer_upsert() -> anyhow::Result<()> {
    let mut ch = ReplicationChannel::new(PeerId::new("me"));
    ch.on_data(
        "link",
        br#"{"senderId":"p1","character":{"position":{"x":10,"y":20},"size":{"x":20,"y":50}}}"#,
    );
    ensure!(ch.peers().len() == 1, "{} peers", ch.peers().len());
    let p1 = ch.peers().get(&PeerId::new("p1")).copied();
    ensure!(
        p1.map(|s| (s.position, s.size)) == Some((Vec2::new(10.0, 20.0), Vec2::new(20.0, 50.0))),
        "stored {p1:?}"
    );

    ch.on_data(
        "link",
        br#"{"senderId":"p1","character":{"position":{"x":99,"y":1},"size":{"x":20,"y":50}}}"#,
    );
    ensure!(ch.peers().len() == 1, "{} peers", ch.peers().len());
    let p1 = ch.peers().get(&PeerId::new("p1")).copied();
    ensure!(
        p1.map(|s| s.position) == Some(Vec2::new(99.0, 1.0)),
        "stored {p1:?}"
    );
    Ok(())
}

fn main() -> ExitCode {
    let scenarios = [
        Scenario {
            name: "A: at rest on the floor",
            run: rest_on_floor,
        },
        Scenario {
            name: "B: grounded jump",
            run: single_jump,
        },
        Scenario {
            name: "C: land on platform from the left",
            run: land_on_platform_from_left,
        },
        Scenario {
            name: "D: pushed out sideways",
            run: pushed_out_sideways,
        },
        Scenario {
            name: "E: peer state upsert",
            run: peer_upsert,
        },
    ];

    println!("Platformer Scenario Runner");
    println!("==========================\n");

    let started = Instant::now();
    let mut failed = 0;
    for scenario in &scenarios {
        match (scenario.run)() {
            Ok(()) => println!("  ✓ {}", scenario.name),
            Err(e) => {
                failed += 1;
                println!("  ✗ {}: {e:#}", scenario.name);
            }
        }
    }

    println!("\n==========================");
    println!("Total:   {}", scenarios.len());
    println!("Passed:  {}", scenarios.len() - failed);
    println!("Failed:  {}", failed);
    println!("Duration: {:.3}s", started.elapsed().as_secs_f64());

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
