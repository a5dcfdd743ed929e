/*
 * Boundary Stage
 *
 * Enforces arena containment under one of two policies. Wrap teleports an
 * agent to the opposite edge once it is a full slack margin past the
 * containment box, so the jump happens out of view. ClampRedirect pins the
 * position to the box edge and re-aims the agent at the arena center.
 */

use nannou::prelude::*;

use crate::components::{Orientation, Position};
use crate::config::{ArenaBounds, BoundaryPolicy, SimConfig};
use crate::store::EntityStore;

/// Per-axis containment limits for a given agent radius.
struct Limits {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Limits {
    fn new(arena: &ArenaBounds, radius: f32) -> Self {
        Self {
            left: radius,
            right: (arena.width - radius).max(radius),
            top: radius,
            bottom: (arena.height - radius).max(radius),
        }
    }
}

pub fn contain(store: &mut EntityStore, config: &SimConfig, arena: &ArenaBounds) {
    match config.boundary_policy {
        BoundaryPolicy::Wrap => wrap(store, config, arena),
        BoundaryPolicy::ClampRedirect => clamp_redirect(store, config, arena),
    }
}

// Teleport to the opposite edge, offset by the same slack margin that
// triggered the jump.
fn wrap(store: &mut EntityStore, config: &SimConfig, arena: &ArenaBounds) {
    let limits = Limits::new(arena, config.object_size);
    let slack = config.object_size * 2.0;

    for id in store.each::<Position>() {
        let Some(pos) = store.get::<Position>(id).copied() else {
            continue;
        };
        let mut next = pos.vec;
        if pos.vec.x < limits.left - slack {
            next.x = limits.right + slack;
        }
        if pos.vec.x > limits.right + slack {
            next.x = limits.left - slack;
        }
        if pos.vec.y < limits.top - slack {
            next.y = limits.bottom + slack;
        }
        if pos.vec.y > limits.bottom + slack {
            next.y = limits.top - slack;
        }
        if next != pos.vec {
            store.patch::<Position>(id, |p| p.vec = next).ok();
        }
    }
}

// Pin to the containment box and re-aim at the arena center. The redirect
// ignores the angle of incidence and always points at the center, which
// looks wrong for shallow impacts; preserved as observed.
fn clamp_redirect(store: &mut EntityStore, config: &SimConfig, arena: &ArenaBounds) {
    let limits = Limits::new(arena, config.object_size);
    let center = arena.center();

    for id in store.each::<Position>() {
        let Some(pos) = store.get::<Position>(id).copied() else {
            continue;
        };
        let at_or_beyond = pos.vec.x <= limits.left
            || pos.vec.x >= limits.right
            || pos.vec.y <= limits.top
            || pos.vec.y >= limits.bottom;
        if !at_or_beyond {
            continue;
        }

        // Angle toward center is undefined from the center itself
        if pos.vec != center && store.has::<Orientation>(id) {
            let to_center = center - pos.vec;
            let degrees = to_center.y.atan2(to_center.x).to_degrees();
            store
                .patch::<Orientation>(id, |ori| ori.degrees = degrees)
                .ok();
        }

        let clamped = vec2(
            pos.vec.x.clamp(limits.left, limits.right),
            pos.vec.y.clamp(limits.top, limits.bottom),
        );
        if clamped != pos.vec {
            store.patch::<Position>(id, |p| p.vec = clamped).ok();
        }
    }
}
