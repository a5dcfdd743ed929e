/*
 * Scene Builder Module
 *
 * This module (re)populates the entity store with freshly randomized agents.
 * It runs at startup and whenever the configuration changes agent count or
 * agent size; destroyed agents release their display shapes through the
 * store's Destroyed events.
 */

use nannou::prelude::*;
use rand::Rng;
use std::sync::Mutex;

use crate::components::{Drawable, Orientation, Position, Rotation, Velocity, VisualState};
use crate::config::{ArenaBounds, SimConfig};
use crate::renderer::ShapeArena;
use crate::store::EntityStore;

/// Rebuilds the scene with the process RNG.
pub fn rebuild(
    store: &mut EntityStore,
    shapes: &Mutex<ShapeArena>,
    config: &mut SimConfig,
    arena: &ArenaBounds,
) {
    rebuild_with_rng(store, shapes, config, arena, &mut rand::thread_rng());
}

/// Rebuilds the scene from a caller-supplied RNG so tests stay
/// deterministic. Every existing agent is destroyed, `object_count` new
/// agents are placed uniformly inside the containment box with a random
/// heading, zero velocity and zero rotation, and both proximity thresholds
/// are re-derived from the object size.
pub fn rebuild_with_rng<R: Rng>(
    store: &mut EntityStore,
    shapes: &Mutex<ShapeArena>,
    config: &mut SimConfig,
    arena: &ArenaBounds,
    rng: &mut R,
) {
    store.clear();

    let radius = config.object_size;
    // Containment box is [radius, dimension - radius] per axis; degenerate
    // arenas (radius past the midpoint) collapse to a single column or row.
    let max_x = (arena.width - radius).max(radius);
    let max_y = (arena.height - radius).max(radius);

    for _ in 0..config.object_count {
        let id = store.create();
        let shape = shapes.lock().unwrap().alloc(radius);
        store.attach(id, Drawable { shape });
        store.attach(
            id,
            Position {
                vec: vec2(rng.gen_range(radius..=max_x), rng.gen_range(radius..=max_y)),
            },
        );
        store.attach(id, Velocity::default());
        store.attach(
            id,
            Orientation {
                degrees: rng.gen_range(0.0..360.0),
            },
        );
        store.attach(id, Rotation::default());
        store.attach(id, VisualState::Far);
    }

    config.derive_distances();
    log::debug!(
        "scene rebuilt: {} agents, size {}",
        config.object_count,
        config.object_size
    );
}
