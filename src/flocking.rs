/*
 * Flocking Stage
 *
 * Two independent steering behaviors, both O(n^2):
 *
 * - Separation: every agent pushes each neighbor within close distance away
 *   from its forward cone by nudging the neighbor's heading. The nudge lands
 *   on the neighbor, not on the agent doing the scan, and pair updates are
 *   interleaved as observed in the source behavior.
 * - Alignment: each agent's angular velocity becomes the mean of its own and
 *   its close neighbors' values, computed from start-of-stage snapshots and
 *   applied in one batch.
 */

use nannou::prelude::*;

use crate::components::{Orientation, Position, Rotation, Velocity};
use crate::config::SimConfig;
use crate::store::{AgentId, EntityStore};

pub fn steer(store: &mut EntityStore, config: &SimConfig) {
    separation(store, config);
    if config.alignment_enabled {
        align(store, config);
    }
}

/// Zero-length input maps to the zero vector rather than NaN.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let length = v.length();
    if length > 0.0 {
        v / length
    } else {
        Vec2::ZERO
    }
}

/// Unsigned angle in degrees between two direction vectors measured from a
/// shared origin. Degenerate vectors floor to 0 so a single agent's edge
/// case never poisons a frame.
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let da = normalize_or_zero(a);
    let db = normalize_or_zero(b);
    if da == Vec2::ZERO || db == Vec2::ZERO {
        return 0.0;
    }
    da.dot(db).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Whether `target` lies to the right of `heading` as seen from `origin`,
/// in the arena's y-down coordinate system.
pub fn is_on_right(origin: Vec2, target: Vec2, heading: Vec2) -> bool {
    let dir = normalize_or_zero(heading);
    let offset = target - origin;
    dir.x * offset.y - dir.y * offset.x > 0.0
}

fn separation(store: &mut EntityStore, config: &SimConfig) {
    let ids: Vec<AgentId> = store
        .each::<Position>()
        .into_iter()
        .filter(|&id| store.has::<Velocity>(id) && store.has::<Orientation>(id))
        .collect();

    for &a in &ids {
        let (Some(pos_a), Some(vel_a)) = (
            store.get::<Position>(a).copied(),
            store.get::<Velocity>(a).copied(),
        ) else {
            continue;
        };

        for &b in &ids {
            if a == b {
                continue;
            }
            let Some(pos_b) = store.get::<Position>(b).copied() else {
                continue;
            };
            if pos_a.vec.distance(pos_b.vec) > config.close_distance {
                continue;
            }

            let forward = pos_a.vec + normalize_or_zero(vel_a.vec);
            let angle = angle_between_degrees(forward - pos_a.vec, pos_b.vec - pos_a.vec);
            let sign = if is_on_right(pos_a.vec, pos_b.vec, vel_a.vec) {
                1.0
            } else {
                -1.0
            };
            let nudge = angle / 100.0 * sign;
            store.patch::<Orientation>(b, |ori| ori.degrees += nudge).ok();
        }
    }
}

// Whole-frame read-then-write pass: every mean comes from the stage's
// starting values, so the result is independent of iteration order.
fn align(store: &mut EntityStore, config: &SimConfig) {
    let snapshot: Vec<(AgentId, Vec2, f32)> = store
        .each::<Rotation>()
        .into_iter()
        .filter(|&id| store.has::<Position>(id))
        .filter_map(|id| {
            let pos = store.get::<Position>(id)?.vec;
            let rot = store.get::<Rotation>(id)?.degrees_per_frame;
            Some((id, pos, rot))
        })
        .collect();

    let mut means = Vec::with_capacity(snapshot.len());
    for (i, &(id, pos, rot)) in snapshot.iter().enumerate() {
        let mut count = 1.0_f32;
        let mut sum = rot;
        for (j, &(_, other_pos, other_rot)) in snapshot.iter().enumerate() {
            if i == j || pos.distance(other_pos) >= config.close_distance {
                continue;
            }
            count += 1.0;
            sum += other_rot;
        }
        means.push((id, sum / count));
    }

    for (id, mean) in means {
        store
            .patch::<Rotation>(id, |rot| rot.degrees_per_frame = mean)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::VisualState;
    use crate::proximity;
    use crate::store::test_support::spawn_agent;

    fn scenario_config() -> SimConfig {
        SimConfig {
            object_size: 50.0,
            contact_distance: 65.0,
            close_distance: 195.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn normalize_or_zero_floors_the_zero_vector() {
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
        let unit = normalize_or_zero(vec2(3.0, 4.0));
        assert!((unit - vec2(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn angle_against_a_zero_vector_is_zero() {
        assert_eq!(angle_between_degrees(Vec2::ZERO, vec2(1.0, 0.0)), 0.0);
        assert!((angle_between_degrees(vec2(0.0, 1.0), vec2(1.0, 0.0)) - 90.0).abs() < 1e-4);
        // Opposite vectors: dot clamps keep acos in range
        assert!((angle_between_degrees(vec2(1.0, 0.0), vec2(-1.0, 0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn side_test_follows_the_heading() {
        let origin = Vec2::ZERO;
        // Heading "down" in y-down screen space: east is on the left
        assert!(!is_on_right(origin, vec2(60.0, 0.0), vec2(0.0, 1.0)));
        assert!(is_on_right(origin, vec2(-60.0, 0.0), vec2(0.0, 1.0)));
    }

    #[test]
    fn two_contact_agents_nudge_each_other_apart() {
        let config = scenario_config();
        let mut store = EntityStore::new();
        // Both heading "down" (90 degrees), 60 units apart on the x axis
        let a = spawn_agent(&mut store, 100.0, 100.0, 90.0);
        let b = spawn_agent(&mut store, 160.0, 100.0, 90.0);
        for id in [a, b] {
            store
                .patch::<Velocity>(id, |vel| vel.vec = vec2(0.0, 1.0))
                .unwrap();
        }

        proximity::classify(&mut store, &config);
        assert_eq!(*store.get::<VisualState>(a).unwrap(), VisualState::Contact);
        assert_eq!(*store.get::<VisualState>(b).unwrap(), VisualState::Contact);

        steer(&mut store, &config);
        let heading_a = store.get::<Orientation>(a).unwrap().degrees;
        let heading_b = store.get::<Orientation>(b).unwrap().degrees;
        // b sits on a's left, a sits on b's right: opposite-signed nudges
        // of 90/100 degrees each
        assert!((heading_a - 90.9).abs() < 1e-3);
        assert!((heading_b - 89.1).abs() < 1e-3);
    }

    #[test]
    fn distant_agents_do_not_steer_each_other() {
        let config = scenario_config();
        let mut store = EntityStore::new();
        let a = spawn_agent(&mut store, 100.0, 100.0, 90.0);
        let b = spawn_agent(&mut store, 500.0, 100.0, 90.0);
        for id in [a, b] {
            store
                .patch::<Velocity>(id, |vel| vel.vec = vec2(0.0, 1.0))
                .unwrap();
        }

        steer(&mut store, &config);
        assert_eq!(store.get::<Orientation>(a).unwrap().degrees, 90.0);
        assert_eq!(store.get::<Orientation>(b).unwrap().degrees, 90.0);
    }

    #[test]
    fn coincident_agents_do_not_panic_or_steer() {
        let config = scenario_config();
        let mut store = EntityStore::new();
        let a = spawn_agent(&mut store, 100.0, 100.0, 0.0);
        let b = spawn_agent(&mut store, 100.0, 100.0, 0.0);

        steer(&mut store, &config);
        assert_eq!(store.get::<Orientation>(a).unwrap().degrees, 0.0);
        assert_eq!(store.get::<Orientation>(b).unwrap().degrees, 0.0);
    }

    #[test]
    fn alignment_converges_to_the_neighborhood_mean() {
        let config = SimConfig {
            alignment_enabled: true,
            ..scenario_config()
        };
        let mut store = EntityStore::new();
        let ids = [
            spawn_agent(&mut store, 100.0, 100.0, 0.0),
            spawn_agent(&mut store, 120.0, 100.0, 0.0),
            spawn_agent(&mut store, 110.0, 120.0, 0.0),
        ];
        for (id, rot) in ids.iter().zip([0.0, 10.0, 20.0]) {
            store
                .patch::<Rotation>(*id, |r| r.degrees_per_frame = rot)
                .unwrap();
        }

        steer(&mut store, &config);
        for id in ids {
            assert_eq!(store.get::<Rotation>(id).unwrap().degrees_per_frame, 10.0);
        }
    }

    #[test]
    fn alignment_ignores_agents_outside_close_distance() {
        let config = SimConfig {
            alignment_enabled: true,
            ..scenario_config()
        };
        let mut store = EntityStore::new();
        let near_a = spawn_agent(&mut store, 100.0, 100.0, 0.0);
        let near_b = spawn_agent(&mut store, 150.0, 100.0, 0.0);
        let lone = spawn_agent(&mut store, 900.0, 900.0, 0.0);
        store
            .patch::<Rotation>(near_a, |r| r.degrees_per_frame = 4.0)
            .unwrap();
        store
            .patch::<Rotation>(near_b, |r| r.degrees_per_frame = 8.0)
            .unwrap();
        store
            .patch::<Rotation>(lone, |r| r.degrees_per_frame = 100.0)
            .unwrap();

        steer(&mut store, &config);
        assert_eq!(store.get::<Rotation>(near_a).unwrap().degrees_per_frame, 6.0);
        assert_eq!(store.get::<Rotation>(near_b).unwrap().degrees_per_frame, 6.0);
        assert_eq!(store.get::<Rotation>(lone).unwrap().degrees_per_frame, 100.0);
    }
}
