/*
 * Boid Arena Simulation
 *
 * A small flock of autonomous agents in a bounded 2D arena. Agents steer
 * away from and align with nearby neighbors, and their color reflects how
 * close the nearest neighbor is (green / yellow / red). The control panel
 * adjusts agent count and size, steering parameters and the boundary policy
 * at runtime.
 */

use boid_arena::app;

fn main() {
    env_logger::init();

    nannou::app(app::model).update(app::update).run();
}
