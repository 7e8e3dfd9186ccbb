//! Ray casting against scene entities
//!
//! World-space shapes are built on the fly from each entity's current world
//! transform, so moving obstacles are always tested where they are now.

use crate::physics::collision::{Ray, RayHit};
use crate::scene::{Entity, Scene};

/// Ray query with a distance window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    /// Hits closer than this are ignored
    pub near: f32,
    /// Hits further than this are ignored
    pub far: f32,
    /// Entity whose subtree is never tested (the caster itself)
    pub excluded: Option<Entity>,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
            excluded: None,
        }
    }
}

impl Raycaster {
    /// Create a raycaster accepting hits in `[near, far]`
    pub fn new(near: f32, far: f32) -> Self {
        Self {
            near,
            far,
            excluded: None,
        }
    }

    /// Create a raycaster accepting hits in `[0, far]`
    pub fn with_far(far: f32) -> Self {
        Self { far, ..Self::default() }
    }

    /// Builder pattern: never test `entity` or anything below it
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.excluded = Some(entity);
        self
    }

    /// Intersect `ray` with the shapes of `entities`, nearest hit first
    ///
    /// With `recursive`, the shapes of every descendant of each entity are
    /// tested too. Dead handles, entities without a shape and the excluded
    /// subtree contribute nothing.
    pub fn intersect_entities(
        &self,
        scene: &Scene,
        ray: &Ray,
        entities: &[Entity],
        recursive: bool,
    ) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for entity in entities {
            self.intersect_entity(scene, ray, *entity, recursive, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit among `entities`, if any
    pub fn nearest(
        &self,
        scene: &Scene,
        ray: &Ray,
        entities: &[Entity],
        recursive: bool,
    ) -> Option<RayHit> {
        self.intersect_entities(scene, ray, entities, recursive)
            .into_iter()
            .next()
    }

    /// Append the hits for one entity (and optionally its descendants) to `hits`
    pub fn intersect_entity(
        &self,
        scene: &Scene,
        ray: &Ray,
        entity: Entity,
        recursive: bool,
        hits: &mut Vec<RayHit>,
    ) {
        if !scene.contains(entity) || self.excluded == Some(entity) {
            return;
        }

        self.intersect_shape(scene, ray, entity, hits);
        if recursive {
            for child in scene.children(entity) {
                self.intersect_entity(scene, ray, *child, true, hits);
            }
        }
    }

    fn intersect_shape(&self, scene: &Scene, ray: &Ray, entity: Entity, hits: &mut Vec<RayHit>) {
        let (Some(shape), Some(transform)) = (scene.shape(entity), scene.world_transform(entity)) else {
            return;
        };

        let world_shape = shape.to_world_space(&transform);
        if let Some((distance, point, normal)) = world_shape.intersect_ray_detailed(ray) {
            if distance >= self.near && distance <= self.far {
                hits.push(RayHit {
                    entity,
                    distance,
                    point,
                    normal,
                });
            }
        }
    }
}
