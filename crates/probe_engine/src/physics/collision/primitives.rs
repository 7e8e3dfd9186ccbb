//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (rays, spheres, triangles) with
//! efficient intersection testing algorithms.

use crate::foundation::math::Vec3;
use crate::scene::Entity;

/// A ray for ray casting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The entity whose shape was hit (may be a descendant of the queried entity)
    pub entity: Entity,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test ray intersection with this sphere
    /// Returns (distance, hit_point, normal) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Vector from ray origin to sphere center
        let oc = ray.origin - self.center;

        // Solve: |origin + t*direction - center|^2 = radius^2
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        // Closest non-negative root; t2 is the exit point when starting inside
        let t = if t1 >= 0.0 {
            t1
        } else if t2 >= 0.0 {
            t2
        } else {
            return None; // Sphere is behind the ray
        };

        let hit_point = ray.point_at(t);
        let normal = (hit_point - self.center).normalize();

        Some((t, hit_point, normal))
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    /// Returns (t, u, v) barycentric coordinates if hit, None otherwise
    ///
    /// Both faces are hit: the probe rays must see walls from either side.
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        const EPSILON: f32 = 0.000001;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);

        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None // Behind ray origin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn facing_z_triangle(z: f32) -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(2.0, -1.0, z),
            Vec3::new(-1.0, 2.0, z),
        )
    }

    #[test]
    fn test_ray_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -4.0));
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(ray.point_at(2.0), Vec3::new(0.0, 0.0, -2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_triangle_hit_distance() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (t, _, _) = facing_z_triangle(-0.3).intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 0.3, epsilon = EPSILON);
    }

    #[test]
    fn test_triangle_is_double_sided() {
        let triangle = facing_z_triangle(-0.3);
        let from_front = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let from_back = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));

        assert!(triangle.intersect_ray(&from_front).is_some());
        let (t, _, _) = triangle.intersect_ray(&from_back).unwrap();
        assert_relative_eq!(t, 0.7, epsilon = EPSILON);
    }

    #[test]
    fn test_triangle_miss_and_behind() {
        let triangle = facing_z_triangle(-0.3);
        let parallel = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let away = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let beside = Ray::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(triangle.intersect_ray(&parallel).is_none());
        assert!(triangle.intersect_ray(&away).is_none());
        assert!(triangle.intersect_ray(&beside).is_none());
    }

    #[test]
    fn test_sphere_hit_from_outside_and_inside() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5);
        let outside = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (t, point, normal) = sphere.intersect_ray(&outside).unwrap();
        assert_relative_eq!(t, 1.5, epsilon = EPSILON);
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, -1.5), epsilon = EPSILON);
        assert_relative_eq!(normal, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);

        let inside = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 0.0, 0.0));
        let (t, _, _) = sphere.intersect_ray(&inside).unwrap();
        assert_relative_eq!(t, 0.5, epsilon = EPSILON);
    }
}
