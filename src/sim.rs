/*
 * Simulation Module
 *
 * The facade the application shell talks to. Owns the entity store, the
 * active configuration, the arena bounds and the display shape arena, and
 * runs the frame pipeline:
 *
 *   Kinematics -> Boundary -> Proximity -> Flocking
 *
 * Single-threaded and frame-stepped; each stage runs to completion before
 * the next starts.
 */

use nannou::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::components::{Orientation, Position, VisualState};
use crate::config::{ArenaBounds, ConfigError, SimConfig};
use crate::renderer::{ShapeArena, ShapeSync};
use crate::store::EntityStore;
use crate::{boundary, flocking, kinematics, proximity, scene};

pub struct Simulation {
    store: EntityStore,
    config: SimConfig,
    arena: ArenaBounds,
    shapes: Arc<Mutex<ShapeArena>>,
}

impl Simulation {
    /// Builds a simulation over a fixed arena and populates the initial
    /// scene. The arena dimensions are immutable for the simulation's
    /// lifetime.
    pub fn new(arena: ArenaBounds, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shapes = Arc::new(Mutex::new(ShapeArena::new()));
        let mut store = EntityStore::new();
        store.observe(Box::new(ShapeSync::new(Arc::clone(&shapes))));

        let mut sim = Self {
            store,
            config,
            arena,
            shapes,
        };
        sim.rebuild();
        log::info!(
            "simulation started: {} agents in a {}x{} arena",
            sim.config.object_count,
            arena.width,
            arena.height
        );
        Ok(sim)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &ArenaBounds {
        &self.arena
    }

    pub fn agent_count(&self) -> usize {
        self.store.len()
    }

    /// Shared handle to the display shapes the renderer draws from.
    pub fn shapes(&self) -> Arc<Mutex<ShapeArena>> {
        Arc::clone(&self.shapes)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Applies a new configuration. Invalid values are rejected and the
    /// prior configuration stays in effect; a change to agent count or size
    /// rebuilds the scene (which re-derives both proximity thresholds).
    pub fn configure(&mut self, next: SimConfig) -> Result<(), ConfigError> {
        next.validate()?;
        let needs_rebuild = self.config.requires_rebuild(&next);
        self.config = next;
        if needs_rebuild {
            self.rebuild();
        }
        Ok(())
    }

    /// Repopulates the scene from the current configuration.
    pub fn rebuild(&mut self) {
        scene::rebuild(&mut self.store, &self.shapes, &mut self.config, &self.arena);
    }

    /// Runs one frame of the pipeline. The frame delta is accepted from the
    /// driver but integration uses fixed per-frame scalars.
    pub fn step(&mut self, _frame_delta: Duration) {
        kinematics::integrate(&mut self.store, &self.config);
        boundary::contain(&mut self.store, &self.config, &self.arena);
        proximity::classify(&mut self.store, &self.config);
        flocking::steer(&mut self.store, &self.config);
    }

    /// Read-only iteration over every renderable agent.
    pub fn for_each_visible(&self, mut f: impl FnMut(Vec2, f32, VisualState)) {
        for id in self.store.each::<Position>() {
            let (Some(pos), Some(ori), Some(state)) = (
                self.store.get::<Position>(id),
                self.store.get::<Orientation>(id),
                self.store.get::<VisualState>(id),
            ) else {
                continue;
            };
            f(pos.vec, ori.degrees, *state);
        }
    }

    /// Destroys all agents and releases their display resources.
    pub fn shutdown(&mut self) {
        self.store.clear();
        log::debug!("simulation shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> ArenaBounds {
        ArenaBounds::new(crate::ARENA_WIDTH, crate::ARENA_HEIGHT)
    }

    fn positions(sim: &Simulation) -> Vec<Vec2> {
        let mut out = Vec::new();
        sim.for_each_visible(|pos, _, _| out.push(pos));
        out
    }

    #[test]
    fn new_populates_the_configured_count() {
        let config = SimConfig {
            object_count: 40,
            object_size: 8.0,
            ..SimConfig::default()
        };
        let sim = Simulation::new(arena(), config).unwrap();
        assert_eq!(sim.agent_count(), 40);
        assert_eq!(sim.shapes().lock().unwrap().len(), 40);
        assert_eq!(positions(&sim).len(), 40);
    }

    #[test]
    fn invalid_construction_is_rejected() {
        let config = SimConfig {
            object_count: 0,
            ..SimConfig::default()
        };
        assert!(Simulation::new(arena(), config).is_err());
    }

    #[test]
    fn rejected_configure_retains_the_prior_configuration() {
        let mut sim = Simulation::new(arena(), SimConfig::default()).unwrap();
        let before = sim.config().clone();

        let bad = SimConfig {
            object_size: -1.0,
            ..before.clone()
        };
        assert!(sim.configure(bad).is_err());
        assert_eq!(*sim.config(), before);
        assert_eq!(sim.agent_count(), before.object_count);
    }

    #[test]
    fn count_change_rebuilds_the_scene() {
        let mut sim = Simulation::new(arena(), SimConfig::default()).unwrap();
        let mut next = sim.config().clone();
        next.object_count = 3;
        sim.configure(next).unwrap();
        assert_eq!(sim.agent_count(), 3);
        assert_eq!(sim.shapes().lock().unwrap().len(), 3);
    }

    #[test]
    fn live_knobs_do_not_rebuild() {
        let mut sim = Simulation::new(arena(), SimConfig::default()).unwrap();
        let before = positions(&sim);

        let mut next = sim.config().clone();
        next.velocity_scalar = 3.0;
        next.alignment_enabled = true;
        sim.configure(next).unwrap();
        assert_eq!(positions(&sim), before);
    }

    #[test]
    fn zero_velocity_scalar_keeps_positions_across_steps() {
        let mut config = SimConfig::default();
        config.velocity_scalar = 0.0;
        let mut sim = Simulation::new(arena(), config).unwrap();
        let before = positions(&sim);

        for _ in 0..20 {
            sim.step(Duration::from_millis(16));
        }
        assert_eq!(positions(&sim), before);
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut sim = Simulation::new(arena(), SimConfig::default()).unwrap();
        sim.shutdown();
        assert_eq!(sim.agent_count(), 0);
        assert!(sim.shapes().lock().unwrap().is_empty());
        let mut seen = 0;
        sim.for_each_visible(|_, _, _| seen += 1);
        assert_eq!(seen, 0);
    }
}
