//! Scenario tests for probe collision avoidance
//!
//! Each test builds a small scene with walls tagged collidable, attaches a
//! collider and checks what one or more ticks do to the entity.
