//! Debug drawing primitives and system
//!
//! Shapes are plain data for whatever renderer the host uses. Nothing in the
//! collision code ever reads them back to make a decision.

use crate::foundation::math::{Vec3, Vec4};
use std::collections::HashMap;

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds (infinite for persistent shapes)
        duration: f32,
    },

    /// Point at position
    Point {
        /// Point location
        position: Vec3,
        /// RGBA color
        color: Vec4,
        /// Marker size in world units
        size: f32,
        /// Remaining lifetime in seconds (infinite for persistent shapes)
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Line { duration, .. } | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            DebugShape::Line { duration, .. } | DebugShape::Point { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Debug drawing system for rendering debug shapes
///
/// Supports both temporary shapes (which expire after their duration) and
/// persistent shapes (which remain until explicitly removed).
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Draw or replace a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Look up a persistent shape
    pub fn get_persistent(&self, id: &str) -> Option<&DebugShape> {
        self.persistent_shapes.get(id)
    }

    /// Mutable access to a persistent shape, for in-place updates
    pub fn get_persistent_mut(&mut self, id: &str) -> Option<&mut DebugShape> {
        self.persistent_shapes.get_mut(id)
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) -> Option<DebugShape> {
        self.persistent_shapes.remove(id)
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Number of persistent shapes
    pub fn persistent_count(&self) -> usize {
        self.persistent_shapes.len()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Vec4 {
        Vec4::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();

        // Add a point with 1 second duration
        system.draw_point(Vec3::zeros(), red(), 0.05, 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        // Total 1.1 seconds
        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_persistent_shapes() {
        let mut system = DebugDrawSystem::new();

        system.draw_persistent(
            "test_line",
            DebugShape::Line {
                start: Vec3::zeros(),
                end: Vec3::new(0.0, 0.0, -1.0),
                color: red(),
                duration: f32::INFINITY,
            },
        );
        assert_eq!(system.persistent_count(), 1);

        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.shape_count(), 1);

        assert!(system.clear_persistent("test_line").is_some());
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_ignores_draws() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;

        system.draw_point(Vec3::zeros(), red(), 0.05, 1.0);
        system.draw_persistent(
            "ignored",
            DebugShape::Point { position: Vec3::zeros(), color: red(), size: 0.1, duration: f32::INFINITY },
        );
        assert_eq!(system.shape_count(), 0);
        assert!(system.get_shapes().is_empty());
    }
}
