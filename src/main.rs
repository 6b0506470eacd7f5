use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};

use arcade_battle::engine::game_loop::{FixedTimestep, GameLoop};
use arcade_battle::engine::physics::{BodyGroup, Faces, PhysicsEvent, World, WorldConfig};
use arcade_battle::engine::tilemap::{TileLayer, EMPTY_TILE};

/// How long the headless demo runs
const DEMO_DURATION: Duration = Duration::from_secs(3);

const MAP_WIDTH: usize = 25;
const MAP_HEIGHT: usize = 10;
const TILE_SIZE: f32 = 32.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Arcade Battle physics demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read world config {}", path))?;
            WorldConfig::from_json(&json).with_context(|| format!("Invalid world config {}", path))?
        }
        None => WorldConfig {
            gravity: glam::Vec2::new(0.0, 600.0),
            bounds: arcade_battle::Rect::new(0.0, 0.0, MAP_WIDTH as f32 * TILE_SIZE, MAP_HEIGHT as f32 * TILE_SIZE),
            ..WorldConfig::default()
        },
    };

    let mut world = World::new(config)?;
    let layer = world.add_layer(build_level()?);

    let player = world.create_body(64.0, 160.0, 24.0, 30.0);
    world
        .body_mut(player)
        .context("player body missing")?
        .set_velocity(160.0, -200.0)
        .set_bounce(0.2, 0.0)
        .set_collide_world_bounds(true)
        .set_on_world_bounds(true);

    let mut crates = BodyGroup::new();
    for i in 0..4 {
        let handle = world.create_body(200.0 + i as f32 * 90.0, 20.0 + i as f32 * 15.0, 28.0, 28.0);
        world
            .body_mut(handle)
            .context("crate body missing")?
            .set_bounce(0.0, 0.3)
            .set_mass(2.0)
            .set_collide_world_bounds(true);
        crates.add(handle);
    }

    let pillar = world.create_static_body(640.0, 160.0, 32.0, 96.0);
    world
        .static_body_mut(pillar)
        .context("pillar missing")?
        .set_check_collision(Faces::horizontal());

    world.add_collider(player, layer).set_name("player-vs-level");
    world.add_collider(&crates, layer).set_name("crates-vs-level");
    world.add_collider(&crates, &crates).set_name("crate-stack");
    world.add_collider(player, &crates).set_name("player-vs-crates");
    world.add_collider(player, pillar).set_name("player-vs-pillar");
    world.add_overlap(&crates, pillar).set_name("crates-near-pillar");

    let settings = world.config();
    let mut game_loop = GameLoop::with_timestep(FixedTimestep::new(
        settings.fps,
        settings.time_scale,
        settings.max_steps_per_frame,
    ));
    let mut collisions = 0usize;
    let mut tile_hits = 0usize;

    while game_loop.elapsed() < DEMO_DURATION {
        let steps = game_loop.begin_frame();
        for _ in 0..steps {
            world.step(game_loop.fixed_timestep());
        }

        for event in world.drain_events() {
            match event {
                PhysicsEvent::Collide { .. } => collisions += 1,
                PhysicsEvent::TileCollide { .. } => tile_hits += 1,
                PhysicsEvent::WorldBounds { faces, .. } => info!("Player hit the world bounds: {:?}", faces),
                other => debug!("{:?}", other),
            }
        }

        thread::sleep(Duration::from_millis(16));
    }

    info!(
        "Ran {} steps over {} frames ({:.1} fps): {} body collisions, {} tile collisions",
        game_loop.update_count(),
        game_loop.frame_count(),
        game_loop.fps(),
        collisions,
        tile_hits
    );

    if let Some(body) = world.body(player) {
        info!(
            "Player at ({:.1}, {:.1}), on floor: {}, touching: {:?}",
            body.x(),
            body.y(),
            body.on_floor(),
            body.touching()
        );
    }
    for (handle, body) in world.bodies().filter(|(h, _)| *h != player) {
        info!("Crate {:?} resting at ({:.1}, {:.1})", handle, body.x(), body.y());
    }

    Ok(())
}

/// Ground along the bottom, a floating ledge and a low step
fn build_level() -> Result<TileLayer> {
    let mut data = vec![EMPTY_TILE; MAP_WIDTH * MAP_HEIGHT];
    for x in 0..MAP_WIDTH {
        data[(MAP_HEIGHT - 1) * MAP_WIDTH + x] = 1;
    }
    for x in 7..12 {
        data[6 * MAP_WIDTH + x] = 2;
    }
    data[8 * MAP_WIDTH + 15] = 1;

    let mut layer = TileLayer::from_indices("level", MAP_WIDTH, MAP_HEIGHT, TILE_SIZE, TILE_SIZE, &data)?;
    layer.set_collision_between(1, 2, true);
    // The ledge can be jumped through from below
    for x in 7..12 {
        layer.set_tile_collision(x, 6, Faces::new(true, false, false, false), true)?;
    }
    Ok(layer)
}
