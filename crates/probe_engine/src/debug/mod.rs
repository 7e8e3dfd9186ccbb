//! Debug module for visualization and debugging tools
//!
//! Debug drawing facilities: lines and points that a renderer may display.
//! The probe collider publishes its rays here when its `debug` flag is set.

pub mod draw;

pub use draw::{DebugShape, DebugDrawSystem, DebugShapeId};
