/*
 * Kinematics Stage
 *
 * Integrates velocity into position, angular velocity into heading, and
 * derives the velocity direction from the heading. Ordering matters: the
 * projection reads the heading after this frame's rotation integration, and
 * the projected velocity is consumed by the next frame's position step.
 */

use nannou::prelude::*;

use crate::components::{Orientation, Position, Rotation, Velocity};
use crate::config::SimConfig;
use crate::store::EntityStore;

pub fn integrate(store: &mut EntityStore, config: &SimConfig) {
    // apply the velocity to the position
    for id in store.each::<Velocity>() {
        let Some(vel) = store.get::<Velocity>(id).copied() else {
            continue;
        };
        if !store.has::<Position>(id) {
            continue;
        }
        let step = vel.vec * config.velocity_scalar;
        store.patch::<Position>(id, |pos| pos.vec += step).ok();
    }

    // integrate angular velocity into the heading (alignment variant only)
    if config.alignment_enabled {
        for id in store.each::<Rotation>() {
            let Some(rot) = store.get::<Rotation>(id).copied() else {
                continue;
            };
            if !store.has::<Orientation>(id) {
                continue;
            }
            store
                .patch::<Orientation>(id, |ori| ori.degrees += rot.degrees_per_frame)
                .ok();
        }
    }

    // project the heading onto the velocity; unit length, scaled externally
    for id in store.each::<Orientation>() {
        let Some(ori) = store.get::<Orientation>(id).copied() else {
            continue;
        };
        if !store.has::<Velocity>(id) {
            continue;
        }
        let radians = ori.degrees.to_radians();
        let heading = vec2(radians.cos(), radians.sin());
        store.patch::<Velocity>(id, |vel| vel.vec = heading).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::spawn_agent;

    #[test]
    fn zero_velocity_scalar_leaves_positions_fixed() {
        let mut store = EntityStore::new();
        let a = spawn_agent(&mut store, 100.0, 120.0, 45.0);
        let b = spawn_agent(&mut store, 300.0, 200.0, 200.0);
        let config = SimConfig {
            velocity_scalar: 0.0,
            ..SimConfig::default()
        };

        for _ in 0..10 {
            integrate(&mut store, &config);
        }
        assert_eq!(store.get::<Position>(a).unwrap().vec, vec2(100.0, 120.0));
        assert_eq!(store.get::<Position>(b).unwrap().vec, vec2(300.0, 200.0));
    }

    #[test]
    fn heading_projects_onto_unit_velocity() {
        let mut store = EntityStore::new();
        let id = spawn_agent(&mut store, 0.0, 0.0, 90.0);
        let config = SimConfig::default();

        integrate(&mut store, &config);
        let vel = store.get::<Velocity>(id).unwrap().vec;
        assert!((vel - vec2(0.0, 1.0)).length() < 1e-6);
        assert!((vel.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn position_moves_by_scaled_previous_velocity() {
        let mut store = EntityStore::new();
        let id = spawn_agent(&mut store, 10.0, 10.0, 0.0);
        let config = SimConfig {
            velocity_scalar: 2.0,
            ..SimConfig::default()
        };

        // First frame: velocity starts at zero, only the projection runs
        integrate(&mut store, &config);
        assert_eq!(store.get::<Position>(id).unwrap().vec, vec2(10.0, 10.0));

        // Second frame: the projected heading (east) moves the position
        integrate(&mut store, &config);
        let pos = store.get::<Position>(id).unwrap().vec;
        assert!((pos - vec2(12.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_integrates_only_when_alignment_is_enabled() {
        let mut store = EntityStore::new();
        let id = spawn_agent(&mut store, 0.0, 0.0, 10.0);
        store
            .patch::<Rotation>(id, |rot| rot.degrees_per_frame = 5.0)
            .unwrap();

        let mut config = SimConfig::default();
        config.alignment_enabled = false;
        integrate(&mut store, &config);
        assert_eq!(store.get::<Orientation>(id).unwrap().degrees, 10.0);

        config.alignment_enabled = true;
        integrate(&mut store, &config);
        assert_eq!(store.get::<Orientation>(id).unwrap().degrees, 15.0);
    }
}
