/*
 * Boid Arena Simulation - Module Definitions
 *
 * This file defines the module structure for the boid arena simulation.
 * The core frame pipeline (scene building, kinematics, boundary handling,
 * proximity classification, flocking) lives in its own modules; the
 * nannou/egui shell only consumes the simulation's output.
 */

// Re-export key components for easier access
pub use components::{Drawable, Orientation, Position, Rotation, ShapeId, Velocity, VisualState};
pub use config::{ArenaBounds, BoundaryPolicy, ConfigError, SimConfig};
pub use renderer::{Shape, ShapeArena};
pub use sim::Simulation;
pub use store::{AgentId, ComponentKind, EntityStore, StoreError, StoreEvent, StoreObserver};

// Define modules
pub mod app;
pub mod boundary;
pub mod components;
pub mod config;
pub mod flocking;
pub mod kinematics;
pub mod proximity;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod store;
pub mod ui;

// Constants
pub const ARENA_WIDTH: f32 = 640.0;
pub const ARENA_HEIGHT: f32 = 480.0;
