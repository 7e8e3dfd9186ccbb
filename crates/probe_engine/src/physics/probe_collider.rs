//! Ray-probe collider
//!
//! Keeps an entity out of obstacle geometry by casting a fixed bundle of eight
//! horizontal rays from its world position every tick. The first ray (in the
//! fixed order below) that finds a surface closer than the probe distance
//! pushes the entity straight back along that ray by the overlap, and the
//! tick ends there: at most one correction per tick, so opposing contacts
//! never fight each other within a frame.
//!
//! ```text
//!            FL   F   FR
//!              \  |  /
//!           L --  o  -- R        F = local -Z
//!              /  |  \
//!            BL   B   BR
//! ```

use crate::config::{ColliderConfig, ConfigError};
use crate::debug::DebugShape;
use crate::events::Subscription;
use crate::foundation::math::{Vec3, Vec4};
use crate::physics::collision::{Ray, RayHit};
use crate::physics::obstacle_cache::ObstacleCache;
use crate::physics::raycaster::Raycaster;
use crate::scene::{Entity, Scene, SceneError};

/// Color of the per-direction debug rays
const RAY_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Color and lifetime of the marker left at a correcting hit
const HIT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
const HIT_MARKER_SIZE: f32 = 0.05;
const HIT_MARKER_SECONDS: f32 = 0.25;

/// Probe directions, in the order they are tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeDirection {
    /// Local -Z
    Forward,
    /// Local +Z
    Backward,
    /// Local -X
    Left,
    /// Local +X
    Right,
    /// Between forward and left
    ForwardLeft,
    /// Between forward and right
    ForwardRight,
    /// Between backward and left
    BackwardLeft,
    /// Between backward and right
    BackwardRight,
}

impl ProbeDirection {
    /// Every direction in test order
    pub const ALL: [ProbeDirection; 8] = [
        ProbeDirection::Forward,
        ProbeDirection::Backward,
        ProbeDirection::Left,
        ProbeDirection::Right,
        ProbeDirection::ForwardLeft,
        ProbeDirection::ForwardRight,
        ProbeDirection::BackwardLeft,
        ProbeDirection::BackwardRight,
    ];

    /// Position in [`ProbeDirection::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector in the entity's local frame
    pub fn local_vector(self) -> Vec3 {
        match self {
            ProbeDirection::Forward => Vec3::new(0.0, 0.0, -1.0),
            ProbeDirection::Backward => Vec3::new(0.0, 0.0, 1.0),
            ProbeDirection::Left => Vec3::new(-1.0, 0.0, 0.0),
            ProbeDirection::Right => Vec3::new(1.0, 0.0, 0.0),
            ProbeDirection::ForwardLeft => Vec3::new(-0.7, 0.0, -0.7).normalize(),
            ProbeDirection::ForwardRight => Vec3::new(0.7, 0.0, -0.7).normalize(),
            ProbeDirection::BackwardLeft => Vec3::new(-0.7, 0.0, 0.7).normalize(),
            ProbeDirection::BackwardRight => Vec3::new(0.7, 0.0, 0.7).normalize(),
        }
    }
}

/// The eight local-frame probe vectors, computed once per collider
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionBundle {
    vectors: [Vec3; 8],
}

impl DirectionBundle {
    /// Build the bundle
    pub fn new() -> Self {
        Self {
            vectors: ProbeDirection::ALL.map(ProbeDirection::local_vector),
        }
    }

    /// Local vector for one direction
    pub fn get(&self, direction: ProbeDirection) -> Vec3 {
        self.vectors[direction.index()]
    }

    /// Directions with their local vectors, in test order
    pub fn iter(&self) -> impl Iterator<Item = (ProbeDirection, Vec3)> + '_ {
        ProbeDirection::ALL.iter().map(|direction| (*direction, self.get(*direction)))
    }
}

impl Default for DirectionBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// A correction applied during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Direction whose ray found the obstacle
    pub direction: ProbeDirection,
    /// That direction rotated into world space
    pub world_direction: Vec3,
    /// The nearest hit along the ray
    pub hit: RayHit,
    /// `probe distance - hit distance`
    pub overlap: f32,
    /// Offset added to the entity position (`-world_direction * overlap`)
    pub displacement: Vec3,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeReport {
    /// Obstacles considered this tick
    pub obstacle_count: usize,
    /// Rays cast before finishing (0 when there was nothing to test against)
    pub rays_cast: usize,
    /// The single correction applied, if any
    pub correction: Option<Correction>,
}

impl ProbeReport {
    /// True when the tick cast no rays at all
    pub fn is_idle(&self) -> bool {
        self.rays_cast == 0
    }
}

/// Errors when attaching a collider
#[derive(thiserror::Error, Debug)]
pub enum ColliderError {
    /// Rejected configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The entity is not in the scene
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Per-entity ray-probe collider
///
/// Owns its obstacle cache; nothing is shared between colliders.
pub struct ProbeCollider {
    entity: Entity,
    config: ColliderConfig,
    directions: DirectionBundle,
    cache: ObstacleCache,
    raycaster: Raycaster,
    _subscriptions: [Subscription; 2],
}

impl ProbeCollider {
    /// Attach a collider to `entity`
    ///
    /// Installs the cache invalidation handlers on the scene and, with
    /// `debug`, one persistent debug line per direction.
    pub fn attach(scene: &mut Scene, entity: Entity, config: ColliderConfig) -> Result<Self, ColliderError> {
        config.validate()?;
        let center = scene
            .world_position(entity)
            .ok_or(SceneError::MissingEntity(entity))?;

        let cache = ObstacleCache::new();
        let subscriptions = cache.watch(scene);

        if config.debug {
            for direction in ProbeDirection::ALL {
                scene.debug_draw_mut().draw_persistent(
                    Self::debug_line_id(entity, direction),
                    DebugShape::Line {
                        start: center,
                        end: center,
                        color: RAY_COLOR,
                        duration: f32::INFINITY,
                    },
                );
            }
        }

        log::info!(
            "Probe collider attached to {} (distance {}, debug {})",
            scene.label(entity),
            config.distance,
            config.debug
        );

        Ok(Self {
            entity,
            raycaster: Raycaster::with_far(config.distance).excluding(entity),
            config,
            directions: DirectionBundle::new(),
            cache,
            _subscriptions: subscriptions,
        })
    }

    /// Tear the collider down, removing its debug lines
    ///
    /// The scene handlers are unregistered when the collider is dropped here.
    pub fn detach(self, scene: &mut Scene) {
        if self.config.debug {
            for direction in ProbeDirection::ALL {
                scene
                    .debug_draw_mut()
                    .clear_persistent(&Self::debug_line_id(self.entity, direction));
            }
        }
        log::info!("Probe collider detached from {}", scene.label(self.entity));
    }

    /// Key of the persistent debug line for one direction
    pub fn debug_line_id(entity: Entity, direction: ProbeDirection) -> String {
        format!("probe_ray_{}_{}", entity.id(), direction.index())
    }

    /// The entity being kept clear of obstacles
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Settings this collider was attached with
    pub fn config(&self) -> &ColliderConfig {
        &self.config
    }

    /// The local probe vectors
    pub fn directions(&self) -> &DirectionBundle {
        &self.directions
    }

    /// The obstacle cache (for inspection)
    pub fn cache(&self) -> &ObstacleCache {
        &self.cache
    }

    /// Force an obstacle rebuild on the next tick
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Run one simulation tick
    pub fn tick(&mut self, scene: &mut Scene) -> ProbeReport {
        let mut report = ProbeReport::default();

        let (Some(center), Some(rotation)) = (
            scene.world_position(self.entity),
            scene.transform(self.entity).map(|transform| transform.rotation),
        ) else {
            log::trace!("Probe collider entity {} is gone, skipping tick", self.entity.id());
            return report;
        };

        let obstacles = self.cache.get_or_rebuild(scene, self.entity);
        report.obstacle_count = obstacles.len();
        if obstacles.is_empty() {
            return report;
        }

        let distance = self.config.distance;
        for (direction, local) in self.directions.iter() {
            let ray = Ray::new(center, rotation * local);
            report.rays_cast += 1;
            let nearest = self.raycaster.nearest(scene, &ray, obstacles, true);

            if self.config.debug {
                Self::update_debug_line(scene, self.entity, direction, center, ray.point_at(distance));
            }

            let Some(hit) = nearest.filter(|hit| hit.distance < distance) else {
                continue;
            };

            let overlap = distance - hit.distance;
            let displacement = -ray.direction * overlap;
            if let Some(transform) = scene.transform_mut(self.entity) {
                transform.position += displacement;
            }

            if self.config.debug {
                log::debug!(
                    "{} pushed back {:.3} along {:?} (hit {} at {:.3})",
                    scene.label(self.entity),
                    overlap,
                    direction,
                    scene.label(hit.entity),
                    hit.distance
                );
                scene
                    .debug_draw_mut()
                    .draw_point(hit.point, HIT_COLOR, HIT_MARKER_SIZE, HIT_MARKER_SECONDS);
            }

            report.correction = Some(Correction {
                direction,
                world_direction: ray.direction,
                hit,
                overlap,
                displacement,
            });
            // One correction per tick
            break;
        }

        report
    }

    fn update_debug_line(scene: &mut Scene, entity: Entity, direction: ProbeDirection, start: Vec3, end: Vec3) {
        let id = Self::debug_line_id(entity, direction);
        if let Some(DebugShape::Line { start: line_start, end: line_end, .. }) =
            scene.debug_draw_mut().get_persistent_mut(&id)
        {
            *line_start = start;
            *line_end = end;
        }
    }
}
