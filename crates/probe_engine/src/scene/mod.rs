//! Scene management
//!
//! A small hierarchical scene: entities with local transforms, string
//! capability tags and an optional collision shape. Attaching or detaching an
//! entity anywhere in the hierarchy is announced through the scene's
//! [`EventSystem`](crate::events::EventSystem), which is how cached views over
//! the scene (such as obstacle lists) learn that they are stale.
//!
//! ```text
//! Scene (root)
//!  ├── wall        [collidable]  shape
//!  │    └── trim                 shape   <- hit by recursive ray casts
//!  ├── portal                   shape   <- trigger only, not an obstacle
//!  └── player      [player-collider]
//! ```

mod scene_graph;

pub use scene_graph::{Entity, Scene, SceneError};

/// Well-known capability tags
pub mod tags {
    /// Marks obstacle geometry for the probe colliders
    pub const COLLIDABLE: &str = "collidable";

    /// Marks the entity a portal is allowed to teleport
    pub const PLAYER_COLLIDER: &str = "player-collider";
}
