/*
 * Proximity Classifier
 *
 * Computes each agent's nearest-neighbor distance and derives the
 * three-level visual state from it. This is an explicit O(n^2) all-pairs
 * scan; the intended scale is tens to low hundreds of agents. Positions are
 * snapshotted before any state is written, so classification never observes
 * this stage's own writes.
 */

use nannou::prelude::*;

use crate::components::{Position, VisualState};
use crate::config::SimConfig;
use crate::store::{AgentId, EntityStore};

pub fn classify(store: &mut EntityStore, config: &SimConfig) {
    let agents: Vec<(AgentId, Vec2)> = store
        .each::<Position>()
        .into_iter()
        .filter(|&id| store.has::<VisualState>(id))
        .filter_map(|id| store.get::<Position>(id).map(|pos| (id, pos.vec)))
        .collect();

    for (i, &(id, pos)) in agents.iter().enumerate() {
        // Empty neighbor set leaves the minimum at infinity, classifying Far
        let mut min_distance = f32::INFINITY;
        for (j, &(_, other)) in agents.iter().enumerate() {
            if i == j {
                continue;
            }
            min_distance = min_distance.min(pos.distance(other));
        }

        let state = if min_distance <= config.contact_distance {
            VisualState::Contact
        } else if min_distance <= config.close_distance {
            VisualState::Close
        } else {
            VisualState::Far
        };
        store.patch::<VisualState>(id, |s| *s = state).ok();
    }
}
