//! Hierarchical scene storage
//!
//! Entities are slotmap keys, so a handle to a despawned entity is detected
//! instead of silently aliasing a newer one.

use crate::debug::DebugDrawSystem;
use crate::events::{Event, EventSystem};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::CollisionShape;
use slotmap::{Key, SlotMap};
use std::collections::HashSet;

slotmap::new_key_type! {
    /// Entity identifier
    pub struct Entity;
}

impl Entity {
    /// Stable numeric form of the handle, used for debug shape keys and logs
    pub fn id(&self) -> u64 {
        self.data().as_ffi()
    }
}

/// Errors from structural scene edits
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not (or no longer) refer to a live entity
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),

    /// Reparenting would make an entity its own ancestor
    #[error("cannot attach {child:?} under its own descendant {parent:?}")]
    Cycle {
        /// Entity being moved
        child: Entity,
        /// Requested new parent
        parent: Entity,
    },
}

#[derive(Debug, Default)]
struct Node {
    name: Option<String>,
    transform: Transform,
    parent: Option<Entity>,
    children: Vec<Entity>,
    tags: HashSet<String>,
    shape: Option<CollisionShape>,
}

/// Scene graph owning every entity, the scene event system and the debug draw list
pub struct Scene {
    nodes: SlotMap<Entity, Node>,
    roots: Vec<Entity>,
    events: EventSystem,
    debug_draw: DebugDrawSystem,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            events: EventSystem::new(),
            debug_draw: DebugDrawSystem::new(),
        }
    }

    /// Spawn an entity at the scene root with an identity transform
    pub fn spawn(&mut self) -> Entity {
        self.spawn_at(Transform::identity())
    }

    /// Spawn an entity at the scene root
    pub fn spawn_at(&mut self, transform: Transform) -> Entity {
        let entity = self.nodes.insert(Node {
            transform,
            ..Node::default()
        });
        self.roots.push(entity);
        self.notify(&Event::child_attached(None, entity));
        entity
    }

    /// Spawn an entity under `parent`; `transform` is relative to the parent
    pub fn spawn_child(&mut self, parent: Entity, transform: Transform) -> Result<Entity, SceneError> {
        self.require(parent)?;
        let entity = self.nodes.insert(Node {
            transform,
            parent: Some(parent),
            ..Node::default()
        });
        self.nodes[parent].children.push(entity);
        self.notify(&Event::child_attached(Some(parent), entity));
        Ok(entity)
    }

    /// Move `child` (with its subtree) under `parent`, or to the root when `parent` is `None`
    ///
    /// The local transform is kept as-is.
    pub fn attach_child(&mut self, parent: Option<Entity>, child: Entity) -> Result<(), SceneError> {
        self.require(child)?;
        if let Some(parent) = parent {
            self.require(parent)?;
            if parent == child || self.is_ancestor(child, parent) {
                return Err(SceneError::Cycle { child, parent });
            }
        }

        let old_parent = self.unlink(child);
        self.notify(&Event::child_detached(old_parent, child));

        self.nodes[child].parent = parent;
        match parent {
            Some(parent) => self.nodes[parent].children.push(child),
            None => self.roots.push(child),
        }
        self.notify(&Event::child_attached(parent, child));
        Ok(())
    }

    /// Remove an entity and all of its descendants
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SceneError> {
        self.require(entity)?;
        let subtree = self.subtree(entity);
        let parent = self.unlink(entity);
        for removed in &subtree {
            self.nodes.remove(*removed);
        }
        self.notify(&Event::child_detached(parent, entity));
        Ok(())
    }

    /// Does the handle refer to a live entity?
    pub fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene holds no entities
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Give an entity a human-readable name (used in logs)
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(entity)?.name = Some(name.into());
        Ok(())
    }

    /// Name of the entity, if one was set
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.nodes.get(entity).and_then(|node| node.name.as_deref())
    }

    /// Name for log output, falling back to the numeric id
    pub fn label(&self, entity: Entity) -> String {
        self.name(entity)
            .map_or_else(|| format!("#{}", entity.id()), str::to_string)
    }

    /// Add a capability tag. Tag changes are not announced as scene events.
    pub fn add_tag(&mut self, entity: Entity, tag: &str) -> Result<(), SceneError> {
        self.node_mut(entity)?.tags.insert(tag.to_string());
        Ok(())
    }

    /// Remove a capability tag; returns whether it was present
    pub fn remove_tag(&mut self, entity: Entity, tag: &str) -> Result<bool, SceneError> {
        Ok(self.node_mut(entity)?.tags.remove(tag))
    }

    /// Membership test for a capability tag (false for dead entities)
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.nodes
            .get(entity)
            .is_some_and(|node| node.tags.contains(tag))
    }

    /// Attach a collision shape
    pub fn set_shape(&mut self, entity: Entity, shape: CollisionShape) -> Result<(), SceneError> {
        self.node_mut(entity)?.shape = Some(shape);
        Ok(())
    }

    /// Remove the collision shape, returning it
    pub fn clear_shape(&mut self, entity: Entity) -> Result<Option<CollisionShape>, SceneError> {
        Ok(self.node_mut(entity)?.shape.take())
    }

    /// The entity's collision shape, if it has one
    pub fn shape(&self, entity: Entity) -> Option<&CollisionShape> {
        self.nodes.get(entity).and_then(|node| node.shape.as_ref())
    }

    /// Local transform (relative to the parent)
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.nodes.get(entity).map(|node| &node.transform)
    }

    /// Mutable local transform
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.nodes.get_mut(entity).map(|node| &mut node.transform)
    }

    /// World transform: local transforms composed from the root down
    pub fn world_transform(&self, entity: Entity) -> Option<Transform> {
        let mut chain = vec![&self.nodes.get(entity)?.transform];
        let mut current = self.nodes[entity].parent;
        while let Some(ancestor) = current {
            let node = self.nodes.get(ancestor)?;
            chain.push(&node.transform);
            current = node.parent;
        }

        let mut world = Transform::identity();
        for local in chain.iter().rev() {
            world = world.combine(local);
        }
        Some(world)
    }

    /// World-space position
    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        self.world_transform(entity).map(|transform| transform.position)
    }

    /// Parent of the entity (`None` for root-level or dead entities)
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(entity).and_then(|node| node.parent)
    }

    /// Direct children in attach order
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes
            .get(entity)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// All descendants of `entity` in depth-first pre-order, excluding `entity` itself
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = self.subtree(entity);
        if !out.is_empty() {
            out.remove(0);
        }
        out
    }

    /// Every entity in depth-first pre-order, roots in spawn order
    pub fn traverse(&self) -> Vec<Entity> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    /// Every entity carrying `tag`, in traversal order
    pub fn query_tagged(&self, tag: &str) -> Vec<Entity> {
        self.traverse()
            .into_iter()
            .filter(|entity| self.has_tag(*entity, tag))
            .collect()
    }

    /// Scene event system (subscribe here for attach/detach/collision notifications)
    pub fn events(&self) -> &EventSystem {
        &self.events
    }

    /// Deliver a collision-start notification from the bounding-box system to `target`
    pub fn emit_collision_started(&self, target: Entity, with: Entity) {
        self.notify(&Event::collision_started(target, with));
    }

    /// Debug shapes owned by the scene
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }

    /// Mutable access to the debug shapes owned by the scene
    pub fn debug_draw_mut(&mut self) -> &mut DebugDrawSystem {
        &mut self.debug_draw
    }

    fn notify(&self, event: &Event) {
        log::trace!("Scene event {:?} target={:?}", event.event_type, event.target);
        self.events.emit(event, self);
    }

    fn require(&self, entity: Entity) -> Result<(), SceneError> {
        if self.nodes.contains_key(entity) {
            Ok(())
        } else {
            Err(SceneError::MissingEntity(entity))
        }
    }

    fn node_mut(&mut self, entity: Entity) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(entity).ok_or(SceneError::MissingEntity(entity))
    }

    /// Is `ancestor` somewhere above `entity`?
    fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent(entity);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Detach from parent/roots bookkeeping, returning the old parent
    fn unlink(&mut self, entity: Entity) -> Option<Entity> {
        let parent = self.nodes[entity].parent.take();
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|child| *child != entity);
                }
            }
            None => self.roots.retain(|root| *root != entity),
        }
        parent
    }

    fn subtree(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        self.collect_subtree(entity, &mut out);
        out
    }

    fn collect_subtree(&self, entity: Entity, out: &mut Vec<Entity>) {
        if let Some(node) = self.nodes.get(entity) {
            out.push(entity);
            for child in &node.children {
                self.collect_subtree(*child, out);
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
