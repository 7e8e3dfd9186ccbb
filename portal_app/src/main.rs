//! Portal walk demo
//!
//! Headless run of the probe engine: a player walks down a corridor, its probe
//! collider keeps it off the walls, and stepping into the portal volume
//! triggers navigation. Pass a `.toml` or `.ron` scene file as the first
//! argument, or run without one for the built-in corridor.

mod walk_config;

use probe_engine::foundation::logging;
use probe_engine::physics::ColliderError;
use probe_engine::portal::TeleporterError;
use probe_engine::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::rc::Rc;
use walk_config::{vec3, ScatterConfig, WalkConfig, WallConfig};

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("scene: {0}")]
    Scene(#[from] SceneError),
    #[error("collider: {0}")]
    Collider(#[from] ColliderError),
    #[error("portal: {0}")]
    Portal(#[from] TeleporterError),
}

/// Box the overlap test runs against
///
/// Stands in for the bounding-box system that reports collision starts to the
/// scene.
struct PortalVolume {
    center: Vec3,
    half_extents: Vec3,
}

impl PortalVolume {
    fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extents.x + radius
            && offset.y <= self.half_extents.y + radius
            && offset.z <= self.half_extents.z + radius
    }
}

#[derive(Debug)]
struct WalkSummary {
    ticks: u32,
    corrections: usize,
    final_position: Vec3,
    destinations: Vec<String>,
}

fn spawn_walls(scene: &mut Scene, walls: &[WallConfig]) -> Result<(), DemoError> {
    for (index, wall) in walls.iter().enumerate() {
        let transform = Transform::from_position(vec3(wall.position))
            .with_rotation_euler(0.0, wall.yaw_degrees.to_radians(), 0.0);
        let entity = scene.spawn_at(transform);
        scene.set_name(entity, format!("wall-{}", index))?;
        scene.add_tag(entity, tags::COLLIDABLE)?;
        scene.set_shape(entity, CollisionShape::plane(wall.width, wall.height))?;
    }
    Ok(())
}

fn scatter_crates(scene: &mut Scene, scatter: &ScatterConfig) -> Result<(), DemoError> {
    let mut rng = match scatter.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for index in 0..scatter.count {
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let position = Vec3::new(
            side * rng.gen_range(scatter.inner_radius..=scatter.outer_radius),
            scatter.size,
            rng.gen_range(scatter.depth[0]..=scatter.depth[1]),
        );
        let transform = Transform::from_position(position)
            .with_rotation_euler(0.0, rng.gen_range(0.0..std::f32::consts::TAU), 0.0);

        let entity = scene.spawn_at(transform);
        scene.set_name(entity, format!("crate-{}", index))?;
        scene.add_tag(entity, tags::COLLIDABLE)?;
        scene.set_shape(entity, CollisionShape::cuboid(Vec3::repeat(scatter.size)))?;
    }
    log::info!("Scattered {} crates", scatter.count);
    Ok(())
}

fn walk(config: &WalkConfig) -> Result<WalkSummary, DemoError> {
    config.validate()?;
    let mut scene = Scene::new();

    spawn_walls(&mut scene, &config.walls)?;
    scatter_crates(&mut scene, &config.scatter)?;

    // The portal is a trigger, not an obstacle: no collidable tag
    let portal = scene.spawn_at(Transform::from_position(vec3(config.portal.position)));
    scene.set_name(portal, "portal")?;
    scene.set_shape(portal, CollisionShape::cuboid(vec3(config.portal.half_extents)))?;
    let volume = PortalVolume {
        center: vec3(config.portal.position),
        half_extents: vec3(config.portal.half_extents),
    };

    let navigator = Rc::new(LogNavigator::new());
    let portal_navigator: Rc<dyn Navigator> = navigator.clone();
    let teleporter = PortalTeleporter::attach(&scene, portal, config.portal.teleporter.clone(), portal_navigator)?;

    let player = scene.spawn_at(
        Transform::from_position(vec3(config.player.start))
            .with_rotation_euler(0.0, config.player.yaw_degrees.to_radians(), 0.0),
    );
    scene.set_name(player, "player")?;
    scene.add_tag(player, tags::PLAYER_COLLIDER)?;
    let mut collider = ProbeCollider::attach(&mut scene, player, config.player.collider.clone())?;
    let radius = config.player.collider.distance;

    let mut summary = WalkSummary {
        ticks: 0,
        corrections: 0,
        final_position: vec3(config.player.start),
        destinations: Vec::new(),
    };
    let mut inside = false;
    for tick in 0..config.ticks {
        summary.ticks = tick + 1;

        let transform = scene.transform_mut(player).ok_or(SceneError::MissingEntity(player))?;
        let heading = transform.rotation * Vec3::new(0.0, 0.0, -1.0);
        transform.position += heading * config.player.speed * config.dt;

        let report = collider.tick(&mut scene);
        if let Some(correction) = report.correction {
            summary.corrections += 1;
            log::trace!(
                "tick {}: {:?} correction of {:.3}",
                tick,
                correction.direction,
                correction.overlap
            );
        }
        scene.debug_draw_mut().update(config.dt);

        let position = scene.world_position(player).ok_or(SceneError::MissingEntity(player))?;
        let now_inside = volume.overlaps(position, radius);
        if now_inside && !inside {
            scene.emit_collision_started(portal, player);
        }
        inside = now_inside;

        if !navigator.history().is_empty() {
            log::info!("Player reached the portal after {} ticks", summary.ticks);
            break;
        }
    }

    summary.final_position = scene.world_position(player).ok_or(SceneError::MissingEntity(player))?;
    summary.destinations = navigator.history();
    collider.detach(&mut scene);
    teleporter.detach();
    Ok(summary)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting portal walk");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {}", path);
            WalkConfig::load_from_file(&path)?
        }
        None => WalkConfig::default(),
    };

    match walk(&config) {
        Ok(summary) => {
            log::info!(
                "Walk finished: {} ticks, {} corrections, final position ({:.2}, {:.2}, {:.2})",
                summary.ticks,
                summary.corrections,
                summary.final_position.x,
                summary.final_position.y,
                summary.final_position.z
            );
            match summary.destinations.first() {
                Some(url) => log::info!("Navigated to {}", url),
                None => log::warn!("Player never reached the portal"),
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Portal walk failed: {}", e);
            Err(e.into())
        }
    }
}
