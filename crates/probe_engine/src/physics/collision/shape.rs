//! High-level collision shape abstractions
//!
//! Shapes are stored in model space on scene entities and transformed to
//! world space on demand during ray tests, so moving an obstacle never
//! invalidates anything cached.

use crate::foundation::math::{Transform, Vec3};
use super::primitives::{BoundingSphere, Ray};
use super::mesh::{CollisionMeshTemplate, WorldSpaceCollisionMesh};

/// Collision shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// A spherical collision shape (radius only, position from the entity transform)
    Sphere(f32),
    /// A triangle mesh collision shape template (model space, transformed on-demand)
    Mesh(CollisionMeshTemplate),
}

impl CollisionShape {
    /// Creates a spherical collision shape with given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(radius)
    }

    /// Creates a mesh collision shape from MODEL SPACE vertices and indices
    pub fn mesh_from_model(vertices: &[Vec3], indices: &[u32]) -> Self {
        Self::Mesh(CollisionMeshTemplate::from_vertices(vertices, indices))
    }

    /// Flat rectangle facing +Z (a wall or a portal surface)
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Mesh(CollisionMeshTemplate::plane(width, height))
    }

    /// Box with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Mesh(CollisionMeshTemplate::cuboid(half_extents))
    }

    /// Get the bounding radius in model space
    pub fn local_bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere(radius) => *radius,
            Self::Mesh(template) => template.local_bounding_radius,
        }
    }

    /// Transform this shape to world space
    /// Returns a temporary WorldSpaceShape for collision testing
    pub fn to_world_space(&self, transform: &Transform) -> WorldSpaceShape {
        match self {
            Self::Sphere(radius) => {
                // Sphere radius is already in world-space units (not scaled by transform)
                WorldSpaceShape::Sphere(BoundingSphere::new(transform.position, *radius))
            }
            Self::Mesh(template) => WorldSpaceShape::Mesh(template.to_world_space(transform)),
        }
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug)]
pub enum WorldSpaceShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space mesh
    Mesh(WorldSpaceCollisionMesh),
}

impl WorldSpaceShape {
    /// Get bounding sphere
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Self::Sphere(sphere) => *sphere,
            Self::Mesh(mesh) => BoundingSphere::new(mesh.center, mesh.bounding_radius),
        }
    }

    /// Test ray intersection with this collision shape
    /// Returns distance to hit if intersected, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.intersect_ray_detailed(ray).map(|(distance, _, _)| distance)
    }

    /// Test ray intersection with this collision shape (detailed)
    /// Returns (distance, hit_point, normal) if hit, None otherwise
    pub fn intersect_ray_detailed(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        match self {
            Self::Sphere(sphere) => sphere.intersect_ray(ray),
            Self::Mesh(mesh) => mesh.intersect_ray(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_ignores_scale() {
        let shape = CollisionShape::sphere(0.5);
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, -2.0)).with_scale(Vec3::new(3.0, 3.0, 3.0));
        let world = shape.to_world_space(&transform);

        assert_relative_eq!(world.bounding_sphere().radius, 0.5);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(world.intersect_ray(&ray).unwrap(), 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_bounding_sphere_scales() {
        let shape = CollisionShape::cuboid(Vec3::new(1.0, 1.0, 1.0));
        let transform = Transform::identity().with_scale(Vec3::new(1.0, 2.0, 1.0));
        let world = shape.to_world_space(&transform);

        assert_relative_eq!(world.bounding_sphere().radius, 2.0 * 3.0f32.sqrt(), epsilon = 1e-5);
    }
}
