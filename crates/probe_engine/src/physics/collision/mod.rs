//! Collision geometry
//!
//! # Architecture
//!
//! - **Model Space Storage**: Collision shapes stored in local coordinates
//! - **On-Demand Transformation**: Shapes transformed to world space only during tests
//! - **Coordinate Decoupling**: Shape geometry separate from the entity transform
//!
//! # Module Organization
//!
//! - [`primitives`] - Basic geometric primitives (rays, spheres, triangles)
//! - [`mesh`] - Triangle mesh collision geometry
//! - [`shape`] - Shapes attached to scene entities

pub mod primitives;
pub mod mesh;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Ray, RayHit, BoundingSphere, Triangle};
pub use mesh::{CollisionMeshTemplate, WorldSpaceCollisionMesh};
pub use shape::{CollisionShape, WorldSpaceShape};
