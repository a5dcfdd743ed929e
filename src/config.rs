/*
 * Simulation Configuration Module
 *
 * This module defines the SimConfig struct holding the adjustable parameters
 * for the simulation, the arena bounds, and validation. Configuration is an
 * explicit value passed into each stage call; stages never consult a global.
 */

use nannou::prelude::*;
use thiserror::Error;

/// Factor applied to object size when deriving the contact threshold.
pub const CONTACT_SCALE: f32 = 1.3;
/// Factor applied to object size when deriving the close threshold.
pub const CLOSE_SCALE: f32 = 3.9;

/// Errors from configuration validation. A rejected configuration leaves the
/// previously accepted one in effect.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("object_count must be at least 1 (got {0})")]
    ObjectCount(usize),
    #[error("object_size must be greater than zero (got {0})")]
    ObjectSize(f32),
    #[error("contact_distance {contact} exceeds close_distance {close}")]
    DistanceOrder { contact: f32, close: f32 },
}

/// How agents are kept inside the arena. Exactly one policy is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Teleport to the opposite edge once an agent is a full slack margin
    /// past the containment box, so the jump happens off screen.
    Wrap,
    /// Clamp to the containment box edge and re-aim the agent at the arena
    /// center.
    ClampRedirect,
}

/// Arena dimensions, supplied once at initialization and immutable after.
/// Coordinates run from (0, 0) at the top-left to (width, height).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }
}

// Parameters for the simulation that can be adjusted via UI
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub object_count: usize,
    pub object_size: f32,
    pub velocity_scalar: f32,
    pub close_distance: f32,
    pub contact_distance: f32,
    pub boundary_policy: BoundaryPolicy,
    pub alignment_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut config = Self {
            object_count: 10,
            object_size: 50.0,
            velocity_scalar: 1.0,
            close_distance: 0.0,
            contact_distance: 0.0,
            boundary_policy: BoundaryPolicy::Wrap,
            alignment_enabled: false,
        };
        config.derive_distances();
        config
    }
}

impl SimConfig {
    /// Checks the invariants rejected at configure time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.object_count < 1 {
            return Err(ConfigError::ObjectCount(self.object_count));
        }
        if self.object_size <= 0.0 {
            return Err(ConfigError::ObjectSize(self.object_size));
        }
        if self.contact_distance > self.close_distance {
            return Err(ConfigError::DistanceOrder {
                contact: self.contact_distance,
                close: self.close_distance,
            });
        }
        Ok(())
    }

    /// Recomputes both proximity thresholds from the object size. Called on
    /// every scene rebuild, overriding any explicitly configured values.
    pub fn derive_distances(&mut self) {
        self.contact_distance = self.object_size * CONTACT_SCALE;
        self.close_distance = self.object_size * CLOSE_SCALE;
    }

    /// True when switching to `next` must repopulate the scene. Only agent
    /// count and size trigger a rebuild; other knobs apply live.
    pub fn requires_rebuild(&self, next: &SimConfig) -> bool {
        self.object_count != next.object_count || self.object_size != next.object_size
    }

    // Parameter ranges for the UI sliders
    pub fn object_count_range() -> std::ops::RangeInclusive<usize> {
        1..=300
    }

    pub fn object_size_range() -> std::ops::RangeInclusive<f32> {
        1.0..=300.0
    }

    pub fn velocity_scalar_range() -> std::ops::RangeInclusive<f32> {
        0.1..=10.0
    }

    pub fn close_distance_range(&self) -> std::ops::RangeInclusive<f32> {
        self.contact_distance..=1000.0
    }

    pub fn contact_distance_range(&self) -> std::ops::RangeInclusive<f32> {
        0.0..=self.close_distance
    }
}
