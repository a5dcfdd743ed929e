/*
 * Components Module
 *
 * This module defines the typed components an agent can carry. Every agent
 * that participates in rendering holds the full set:
 * Position, Velocity, Orientation, Rotation, VisualState and Drawable.
 */

use nannou::prelude::*;
use slotmap::new_key_type;

new_key_type! {
    /// Handle into the display shape arena, owned 1:1 by an agent.
    pub struct ShapeId;
}

// World-space location, bounded to the arena interior after the boundary stage
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub vec: Vec2,
}

// Per-frame displacement; unit-scaled from Orientation by the kinematics stage
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub vec: Vec2,
}

// Heading angle in degrees. 0-360 wrap is not enforced; consumers normalize
// for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub degrees: f32,
}

// Angular velocity in degrees per frame, used by the alignment behavior
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub degrees_per_frame: f32,
}

/// Display hint derived from the distance to the nearest other agent.
/// Recomputed every frame, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualState {
    #[default]
    Far,
    Close,
    Contact,
}

// Link to the external display resource mirrored from this agent's state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drawable {
    pub shape: ShapeId,
}
