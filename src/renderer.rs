/*
 * Renderer Module
 *
 * This module owns the display side of an agent: an arena of shapes indexed
 * by generational handles, a store observer that mirrors simulation patches
 * onto those shapes, and the triangle drawing used by the view.
 *
 * The simulation stages never touch this module; they patch components and
 * the ShapeSync observer picks the changes up through store events.
 */

use nannou::prelude::*;
use slotmap::SlotMap;
use std::sync::{Arc, Mutex};

use crate::components::{Drawable, Orientation, Position, ShapeId, VisualState};
use crate::config::ArenaBounds;
use crate::store::{AgentId, ComponentKind, EntityStore, StoreEvent, StoreObserver};

/// One display shape, mirrored from an agent's components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub position: Vec2,
    pub orientation: f32,
    pub radius: f32,
    pub state: VisualState,
}

impl Shape {
    pub fn new(radius: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            orientation: 0.0,
            radius,
            state: VisualState::Far,
        }
    }
}

/// Arena-indexed storage for display shapes. The entity store owns the
/// handles; entries are released when the owning agent is destroyed.
#[derive(Default)]
pub struct ShapeArena {
    shapes: SlotMap<ShapeId, Shape>,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, radius: f32) -> ShapeId {
        self.shapes.insert(Shape::new(radius))
    }

    pub fn release(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }
}

/// Store observer keeping the shape arena in sync with agent state.
pub struct ShapeSync {
    shapes: Arc<Mutex<ShapeArena>>,
}

impl ShapeSync {
    pub fn new(shapes: Arc<Mutex<ShapeArena>>) -> Self {
        Self { shapes }
    }

    fn with_shape(&self, store: &EntityStore, id: AgentId, f: impl FnOnce(&mut Shape)) {
        if let Some(drawable) = store.get::<Drawable>(id) {
            let mut shapes = self.shapes.lock().unwrap();
            if let Some(shape) = shapes.get_mut(drawable.shape) {
                f(shape);
            }
        }
    }
}

impl StoreObserver for ShapeSync {
    fn on_event(&mut self, store: &EntityStore, event: StoreEvent) {
        match event {
            StoreEvent::Patched(id, ComponentKind::Position) => {
                if let Some(pos) = store.get::<Position>(id).copied() {
                    self.with_shape(store, id, |shape| shape.position = pos.vec);
                }
            }
            StoreEvent::Patched(id, ComponentKind::Orientation) => {
                if let Some(ori) = store.get::<Orientation>(id).copied() {
                    self.with_shape(store, id, |shape| shape.orientation = ori.degrees);
                }
            }
            StoreEvent::Patched(id, ComponentKind::VisualState) => {
                if let Some(state) = store.get::<VisualState>(id).copied() {
                    self.with_shape(store, id, |shape| shape.state = state);
                }
            }
            StoreEvent::Destroyed(_, Some(shape)) => {
                self.shapes.lock().unwrap().release(shape);
            }
            _ => {}
        }
    }
}

// Color per proximity state, matching the classic green/yellow/red scheme
pub fn state_color(state: VisualState) -> Rgb<u8> {
    match state {
        VisualState::Far => rgb(40, 200, 70),
        VisualState::Close => rgb(235, 205, 50),
        VisualState::Contact => rgb(220, 50, 40),
    }
}

// Draw a shape as a heading-aligned triangle
pub fn draw_shape(draw: &Draw, shape: &Shape, arena: &ArenaBounds) {
    // Arena coordinates run y-down from the top-left; nannou draws centered
    // with y up, so both the position and the rotation flip.
    let screen = pt2(
        shape.position.x - arena.width / 2.0,
        arena.height / 2.0 - shape.position.y,
    );
    let angle = -shape.orientation.to_radians();
    let size = shape.radius;

    let points = [
        pt2(size, 0.0),
        pt2(-size, size / 2.0),
        pt2(-size, -size / 2.0),
    ];

    draw.polygon()
        .color(state_color(shape.state))
        .points(points)
        .xy(screen)
        .rotate(angle);
}
