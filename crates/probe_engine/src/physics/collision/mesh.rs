//! Collision mesh representations
//!
//! Provides mesh-based collision shapes with model-space templates
//! and world-space transformations for testing.

use crate::foundation::math::{Point3, Transform, Vec3};
use super::primitives::{BoundingSphere, Ray, Triangle};

/// A collision mesh template stored in MODEL SPACE (local coordinates)
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMeshTemplate {
    /// Triangles in MODEL SPACE (local coordinates, never modified)
    pub local_triangles: Vec<Triangle>,
    /// Local bounding sphere radius (model space, around the local origin)
    pub local_bounding_radius: f32,
}

impl CollisionMeshTemplate {
    /// Creates a new collision mesh template from MODEL SPACE vertices and indices
    ///
    /// Trailing indices that do not form a full triangle, and triangles that
    /// reference a vertex out of range, are skipped.
    pub fn from_vertices(vertices: &[Vec3], indices: &[u32]) -> Self {
        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .filter_map(|chunk| {
                let v0 = vertices.get(chunk[0] as usize)?;
                let v1 = vertices.get(chunk[1] as usize)?;
                let v2 = vertices.get(chunk[2] as usize)?;
                Some(Triangle::new(*v0, *v1, *v2))
            })
            .collect();

        Self::from_triangles(triangles)
    }

    /// Creates a template from model-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        // Local bounding sphere radius from the furthest vertex
        let max_distance_sq = triangles
            .iter()
            .flat_map(|tri| [tri.v0, tri.v1, tri.v2])
            .map(|vertex| vertex.magnitude_squared())
            .fold(0.0f32, f32::max);

        Self {
            local_triangles: triangles,
            local_bounding_radius: max_distance_sq.sqrt(),
        }
    }

    /// Flat rectangle in the local XY plane, centered on the origin, facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let vertices = [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ];
        Self::from_vertices(&vertices, &[0, 1, 2, 0, 2, 3])
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = [
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let indices = [
            4, 5, 6, 4, 6, 7, // +Z
            1, 0, 3, 1, 3, 2, // -Z
            5, 1, 2, 5, 2, 6, // +X
            0, 4, 7, 0, 7, 3, // -X
            7, 6, 2, 7, 2, 3, // +Y
            0, 1, 5, 0, 5, 4, // -Y
        ];
        Self::from_vertices(&vertices, &indices)
    }

    /// Transform this template to world space
    pub fn to_world_space(&self, transform: &Transform) -> WorldSpaceCollisionMesh {
        let matrix = transform.to_matrix();
        let to_world = |v: Vec3| matrix.transform_point(&Point3::from(v)).coords;

        let triangles = self.local_triangles
            .iter()
            .map(|tri| Triangle::new(to_world(tri.v0), to_world(tri.v1), to_world(tri.v2)))
            .collect();

        WorldSpaceCollisionMesh {
            triangles,
            center: transform.position,
            bounding_radius: self.local_bounding_radius * transform.max_scale(),
        }
    }
}

/// World-space collision mesh (temporary, created on-demand for collision tests)
#[derive(Debug)]
pub struct WorldSpaceCollisionMesh {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// Center position in world space
    pub center: Vec3,
    /// Bounding sphere radius in world space
    pub bounding_radius: f32,
}

impl WorldSpaceCollisionMesh {
    /// Test ray intersection against all triangles in the mesh
    /// Returns closest hit (t, hit_point, normal) if any triangle is hit
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Cheap rejection first
        let bounding_sphere = BoundingSphere::new(self.center, self.bounding_radius);
        bounding_sphere.intersect_ray(ray)?;

        let mut closest_hit: Option<(f32, Vec3, Vec3)> = None;
        for triangle in &self.triangles {
            if let Some((t, _u, _v)) = triangle.intersect_ray(ray) {
                if closest_hit.map_or(true, |(closest_t, _, _)| t < closest_t) {
                    closest_hit = Some((t, ray.point_at(t), triangle.normal()));
                }
            }
        }

        closest_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_from_vertices_skips_bad_indices() {
        let vertices = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let template = CollisionMeshTemplate::from_vertices(&vertices, &[0, 1, 2, 0, 1, 9, 2]);
        assert_eq!(template.local_triangles.len(), 1);
        assert_relative_eq!(template.local_bounding_radius, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_plane_bounds() {
        let plane = CollisionMeshTemplate::plane(2.0, 2.0);
        assert_eq!(plane.local_triangles.len(), 2);
        assert_relative_eq!(plane.local_bounding_radius, 2.0f32.sqrt(), epsilon = EPSILON);
    }

    #[test]
    fn test_world_space_plane_hit() {
        let plane = CollisionMeshTemplate::plane(4.0, 4.0);
        let transform = Transform::from_position(Vec3::new(0.3, 0.2, -2.0));
        let world = plane.to_world_space(&transform);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (t, point, normal) = world.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = EPSILON);
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, -2.0), epsilon = EPSILON);
        assert_relative_eq!(normal, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_cuboid_reports_nearest_face() {
        let cuboid = CollisionMeshTemplate::cuboid(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(cuboid.local_triangles.len(), 12);

        let world = cuboid.to_world_space(&Transform::from_position(Vec3::new(0.1, 0.15, -3.0)));
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (t, _, _) = world.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 2.5, epsilon = EPSILON);
    }

    #[test]
    fn test_scaled_rotated_plane() {
        // Unit plane scaled x4 and turned to face +X, one unit to the right
        let plane = CollisionMeshTemplate::plane(1.0, 1.0);
        let transform = Transform::from_position(Vec3::new(1.0, 0.1, 0.2))
            .with_rotation_euler(0.0, std::f32::consts::FRAC_PI_2, 0.0)
            .with_scale(Vec3::new(4.0, 4.0, 4.0));
        let world = plane.to_world_space(&transform);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let (t, _, _) = world.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = EPSILON);
    }
}
