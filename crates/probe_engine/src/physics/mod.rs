//! Physics module: ray casting and probe-based collision avoidance
//!
//! Nothing here simulates rigid bodies. Obstacles are static-or-animated
//! scene geometry, and entities with a [`ProbeCollider`] are nudged out of
//! them one ray at a time.

pub mod collision;
pub mod obstacle_cache;
pub mod probe_collider;
pub mod raycaster;

pub use collision::{BoundingSphere, CollisionShape, Ray, RayHit, Triangle};
pub use obstacle_cache::ObstacleCache;
pub use probe_collider::{
    ColliderError, Correction, DirectionBundle, ProbeCollider, ProbeDirection, ProbeReport,
};
pub use raycaster::Raycaster;

#[cfg(test)]
mod tests;
