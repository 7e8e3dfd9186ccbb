//! # Probe Engine
//!
//! Lightweight collision avoidance and portal triggers for entities moving
//! through a 3D scene graph.
//!
//! ## Features
//!
//! - **Ray-probe collider**: eight horizontal rays per tick push an entity
//!   back out of walls, one correction at a time
//! - **Obstacle cache**: rebuilt lazily when the scene structure changes
//! - **Portals**: collision-start notifications turned into navigation
//! - **Debug drawing**: probe rays published as persistent lines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use probe_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     let player = scene.spawn_at(Transform::from_position(Vec3::new(0.0, 0.0, 2.0)));
//!
//!     let wall = scene.spawn();
//!     scene.add_tag(wall, tags::COLLIDABLE)?;
//!     scene.set_shape(wall, CollisionShape::plane(4.0, 3.0))?;
//!
//!     let mut collider = ProbeCollider::attach(&mut scene, player, ColliderConfig::default())?;
//!     for _ in 0..60 {
//!         scene.transform_mut(player).ok_or("player despawned")?.position.z -= 0.05;
//!         collider.tick(&mut scene);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod portal;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ColliderConfig, Config, ConfigError, TeleporterConfig},
        debug::{DebugDrawSystem, DebugShape},
        events::{Event, EventSystem, EventType, Subscription},
        foundation::math::{Quat, Transform, Vec3},
        physics::{
            CollisionShape, ProbeCollider, ProbeDirection, ProbeReport, Ray, RayHit, Raycaster,
        },
        portal::{LogNavigator, NavigationError, Navigator, PortalTeleporter},
        scene::{tags, Entity, Scene, SceneError},
    };
}
