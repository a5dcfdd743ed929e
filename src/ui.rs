/*
 * UI Module
 *
 * Control panel for the simulation built with nannou_egui. The panel edits
 * a draft configuration; the app submits the draft through
 * Simulation::configure, which decides whether a scene rebuild is needed.
 */

use nannou_egui::{egui, Egui};

use crate::config::{BoundaryPolicy, SimConfig};

// Update the UI. Returns whether the reset button was clicked.
pub fn update_ui(egui: &mut Egui, config: &mut SimConfig, agent_count: usize, fps: f32) -> bool {
    let mut reset_clicked = false;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Scene", |ui| {
                ui.add(
                    egui::Slider::new(&mut config.object_count, SimConfig::object_count_range())
                        .text("Object Count"),
                );
                ui.add(
                    egui::Slider::new(&mut config.object_size, SimConfig::object_size_range())
                        .text("Object Size"),
                );
                if ui.button("Reset Agents").clicked() {
                    reset_clicked = true;
                }
            });

            ui.collapsing("Steering", |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut config.velocity_scalar,
                        SimConfig::velocity_scalar_range(),
                    )
                    .logarithmic(true)
                    .text("Velocity Scalar"),
                );
                // Slider bounds keep contact <= close while dragging
                let close_range = config.close_distance_range();
                ui.add(
                    egui::Slider::new(&mut config.close_distance, close_range)
                        .text("Close Distance"),
                );
                let contact_range = config.contact_distance_range();
                ui.add(
                    egui::Slider::new(&mut config.contact_distance, contact_range)
                        .text("Contact Distance"),
                );
                ui.checkbox(&mut config.alignment_enabled, "Alignment Steering");
            });

            ui.collapsing("Boundary", |ui| {
                ui.radio_value(&mut config.boundary_policy, BoundaryPolicy::Wrap, "Wrap Around");
                ui.radio_value(
                    &mut config.boundary_policy,
                    BoundaryPolicy::ClampRedirect,
                    "Clamp And Redirect",
                );
            });

            ui.separator();
            ui.label(format!("FPS: {:.1}", fps));
            ui.label(format!("Agents: {}", agent_count));
        });

    reset_clicked
}
