//! Cached list of obstacle geometry
//!
//! Invalidation-on-write, rebuild-on-read: scene attach/detach notifications
//! only flip a flag, and the (linear) rebuild runs on the next read.

use crate::events::{Event, EventType, Subscription};
use crate::scene::{tags, Entity, Scene};
use std::cell::Cell;
use std::rc::Rc;

/// Obstacle list for one probing entity
///
/// Holds every entity tagged [`tags::COLLIDABLE`] that has a collision shape
/// of its own, in scene traversal order, excluding the probing entity itself.
#[derive(Debug)]
pub struct ObstacleCache {
    /// Shared with the scene event handlers installed by [`ObstacleCache::watch`]
    stale: Rc<Cell<bool>>,
    obstacles: Vec<Entity>,
    rebuilds: u64,
}

impl ObstacleCache {
    /// Create an empty cache; the first read rebuilds it
    pub fn new() -> Self {
        Self {
            stale: Rc::new(Cell::new(true)),
            obstacles: Vec::new(),
            rebuilds: 0,
        }
    }

    /// Mark the list stale; nothing is recomputed until the next read
    pub fn invalidate(&self) {
        self.stale.set(true);
    }

    /// Will the next read rebuild?
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Invalidate this cache whenever an entity is attached to or detached from `scene`
    ///
    /// The handlers stay installed for as long as the returned guards live.
    pub fn watch(&self, scene: &Scene) -> [Subscription; 2] {
        [EventType::ChildAttached, EventType::ChildDetached].map(|event_type| {
            let stale = Rc::clone(&self.stale);
            scene.events().subscribe(event_type, move |_: &Event, _: &Scene| {
                stale.set(true);
                false
            })
        })
    }

    /// Recompute the obstacle list from the current scene and clear the stale flag
    pub fn rebuild(&mut self, scene: &Scene, self_entity: Entity) -> &[Entity] {
        self.obstacles.clear();
        for entity in scene.query_tagged(tags::COLLIDABLE) {
            if entity == self_entity {
                continue;
            }
            if scene.shape(entity).is_none() {
                log::trace!("Collidable {} has no shape, skipping", scene.label(entity));
                continue;
            }
            self.obstacles.push(entity);
        }

        self.rebuilds += 1;
        self.stale.set(false);
        log::debug!(
            "Obstacle list for {} rebuilt: {} obstacle(s)",
            scene.label(self_entity),
            self.obstacles.len()
        );
        &self.obstacles
    }

    /// The obstacle list, rebuilt first if stale
    pub fn get_or_rebuild(&mut self, scene: &Scene, self_entity: Entity) -> &[Entity] {
        if self.is_stale() {
            return self.rebuild(scene, self_entity);
        }
        &self.obstacles
    }

    /// The list from the last rebuild, without checking staleness
    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    /// How many times the list has been rebuilt
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

impl Default for ObstacleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::physics::CollisionShape;

    fn collidable(scene: &mut Scene, with_shape: bool) -> Entity {
        let entity = scene.spawn();
        scene.add_tag(entity, tags::COLLIDABLE).unwrap();
        if with_shape {
            scene.set_shape(entity, CollisionShape::sphere(0.5)).unwrap();
        }
        entity
    }

    #[test]
    fn test_new_cache_is_stale() {
        let mut scene = Scene::new();
        let probe = scene.spawn();
        let wall = collidable(&mut scene, true);

        let mut cache = ObstacleCache::new();
        assert!(cache.is_stale());
        assert_eq!(cache.get_or_rebuild(&scene, probe), &[wall]);
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_rebuild_skips_shapeless_and_self() {
        let mut scene = Scene::new();
        let probe = collidable(&mut scene, true);
        let _marker = collidable(&mut scene, false);
        let wall = collidable(&mut scene, true);
        let _untagged = scene.spawn();

        let mut cache = ObstacleCache::new();
        assert_eq!(cache.rebuild(&scene, probe), &[wall]);
    }

    #[test]
    fn test_rebuild_requires_a_shape_of_its_own() {
        let mut scene = Scene::new();
        let probe = scene.spawn();
        let hollow = collidable(&mut scene, false);
        let panel = scene.spawn_child(hollow, Transform::identity()).unwrap();
        scene.set_shape(panel, CollisionShape::plane(1.0, 1.0)).unwrap();
        let room = collidable(&mut scene, true);
        let trim = scene.spawn_child(room, Transform::identity()).unwrap();
        scene.set_shape(trim, CollisionShape::plane(1.0, 1.0)).unwrap();

        let mut cache = ObstacleCache::new();
        assert_eq!(cache.rebuild(&scene, probe), &[room]);
    }

    #[test]
    fn test_no_rebuild_while_fresh() {
        let mut scene = Scene::new();
        let probe = scene.spawn();
        collidable(&mut scene, true);

        let mut cache = ObstacleCache::new();
        cache.get_or_rebuild(&scene, probe);
        cache.get_or_rebuild(&scene, probe);
        assert_eq!(cache.rebuild_count(), 1);

        cache.invalidate();
        cache.get_or_rebuild(&scene, probe);
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn test_watch_invalidates_on_attach_and_detach() {
        let mut scene = Scene::new();
        let probe = scene.spawn();

        let mut cache = ObstacleCache::new();
        let _guards = cache.watch(&scene);
        assert!(cache.get_or_rebuild(&scene, probe).is_empty());

        let wall = collidable(&mut scene, true);
        assert!(cache.is_stale());
        assert_eq!(cache.get_or_rebuild(&scene, probe), &[wall]);

        scene.despawn(wall).unwrap();
        assert!(cache.is_stale());
        assert!(cache.get_or_rebuild(&scene, probe).is_empty());
    }

    #[test]
    fn test_watch_ends_with_guards() {
        let mut scene = Scene::new();
        let probe = scene.spawn();
        let mut cache = ObstacleCache::new();

        let guards = cache.watch(&scene);
        cache.get_or_rebuild(&scene, probe);
        drop(guards);

        scene.spawn_child(probe, Transform::identity()).unwrap();
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_tag_changes_do_not_invalidate() {
        let mut scene = Scene::new();
        let probe = scene.spawn();
        let wall = scene.spawn();
        scene.set_shape(wall, CollisionShape::sphere(0.5)).unwrap();

        let mut cache = ObstacleCache::new();
        let _guards = cache.watch(&scene);
        cache.get_or_rebuild(&scene, probe);

        scene.add_tag(wall, tags::COLLIDABLE).unwrap();
        assert!(!cache.is_stale());
        assert!(cache.get_or_rebuild(&scene, probe).is_empty());

        cache.invalidate();
        assert_eq!(cache.get_or_rebuild(&scene, probe), &[wall]);
    }
}
