/*
 * Application Module
 *
 * This module wires the simulation into the nannou shell: window creation,
 * the per-frame update (UI -> configure -> step), and rendering from the
 * mirrored shape arena. The simulation itself never sees any of this.
 */

use nannou::prelude::*;
use nannou_egui::Egui;

use crate::config::{ArenaBounds, SimConfig};
use crate::renderer;
use crate::sim::Simulation;
use crate::ui;
use crate::{ARENA_HEIGHT, ARENA_WIDTH};

// Main model for the application
pub struct Model {
    pub sim: Simulation,
    pub egui: Egui,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Boid Arena")
        .size(ARENA_WIDTH as u32, ARENA_HEIGHT as u32)
        .view(view)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let arena = ArenaBounds::new(ARENA_WIDTH, ARENA_HEIGHT);
    let sim = Simulation::new(arena, SimConfig::default())
        .expect("default configuration is valid");

    Model { sim, egui }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    let mut draft = model.sim.config().clone();
    let reset_clicked =
        ui::update_ui(&mut model.egui, &mut draft, model.sim.agent_count(), app.fps());

    // Rejected drafts leave the active configuration untouched
    if let Err(err) = model.sim.configure(draft) {
        log::warn!("configuration rejected: {err}");
    }
    if reset_clicked {
        model.sim.rebuild();
    }

    model.sim.step(update.since_last);
}

// Render the mirrored shapes
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let shapes = model.sim.shapes();
    let shapes = shapes.lock().unwrap();
    for shape in shapes.iter() {
        renderer::draw_shape(&draw, shape, model.sim.arena());
    }
    drop(shapes);

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

pub fn key_pressed(app: &App, _model: &mut Model, key: Key) {
    if key == Key::Escape {
        app.quit();
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
