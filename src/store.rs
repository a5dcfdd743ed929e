/*
 * Entity Store Module
 *
 * This module defines the sparse agent store: stable generational handles
 * with one component table per component type. Mutations go through patch
 * operations that emit change events, so dependent parties (the shape sync
 * in the renderer, tests) can mirror state without the simulation stages
 * knowing about them.
 */

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use thiserror::Error;

use crate::components::{
    Drawable, Orientation, Position, Rotation, ShapeId, Velocity, VisualState,
};

new_key_type! {
    /// Stable handle for agents backed by a generational slot map.
    pub struct AgentId;
}

/// Identifies which component table an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Position,
    Velocity,
    Orientation,
    Rotation,
    VisualState,
    Drawable,
}

/// Errors from store lookups. Missing components are a programming-error
/// class; stages guard with `has` and skip rather than fail a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("agent {0:?} is not alive")]
    UnknownAgent(AgentId),
    #[error("agent {0:?} lacks component {1:?}")]
    MissingComponent(AgentId, ComponentKind),
}

/// Change notification emitted by the store. `Destroyed` carries the shape
/// handle the destroyed agent owned, so the display arena can release it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Created(AgentId),
    Patched(AgentId, ComponentKind),
    Destroyed(AgentId, Option<ShapeId>),
}

/// Observer interface for store change events. Observers receive a shared
/// reference to the store so they can read the freshly written values.
pub trait StoreObserver {
    fn on_event(&mut self, store: &EntityStore, event: StoreEvent);
}

/// Maps a component type to its table inside the store.
pub trait Component: Sized {
    const KIND: ComponentKind;
    fn table(store: &EntityStore) -> &SecondaryMap<AgentId, Self>;
    fn table_mut(store: &mut EntityStore) -> &mut SecondaryMap<AgentId, Self>;
}

macro_rules! component_table {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn table(store: &EntityStore) -> &SecondaryMap<AgentId, Self> {
                &store.$field
            }

            fn table_mut(store: &mut EntityStore) -> &mut SecondaryMap<AgentId, Self> {
                &mut store.$field
            }
        }
    };
}

component_table!(Position, Position, positions);
component_table!(Velocity, Velocity, velocities);
component_table!(Orientation, Orientation, orientations);
component_table!(Rotation, Rotation, rotations);
component_table!(VisualState, VisualState, visual_states);
component_table!(Drawable, Drawable, drawables);

/// Sparse collection of agents and their components.
#[derive(Default)]
pub struct EntityStore {
    agents: SlotMap<AgentId, ()>,
    positions: SecondaryMap<AgentId, Position>,
    velocities: SecondaryMap<AgentId, Velocity>,
    orientations: SecondaryMap<AgentId, Orientation>,
    rotations: SecondaryMap<AgentId, Rotation>,
    visual_states: SecondaryMap<AgentId, VisualState>,
    drawables: SecondaryMap<AgentId, Drawable>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(id)
    }

    /// Snapshot of all live agent handles.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().collect()
    }

    /// Snapshot of the live agents possessing component T. Agents missing T
    /// are skipped, never an error.
    pub fn each<T: Component>(&self) -> Vec<AgentId> {
        self.agents
            .keys()
            .filter(|&id| T::table(self).contains_key(id))
            .collect()
    }

    /// Register an observer for subsequent change events.
    pub fn observe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    pub fn create(&mut self) -> AgentId {
        let id = self.agents.insert(());
        self.notify(StoreEvent::Created(id));
        id
    }

    /// Destroys an agent, dropping all its components. Returns the shape
    /// handle the agent owned, which is also carried on the emitted
    /// `Destroyed` event so the display arena can free the resource.
    pub fn destroy(&mut self, id: AgentId) -> Option<ShapeId> {
        if self.agents.remove(id).is_none() {
            return None;
        }
        self.positions.remove(id);
        self.velocities.remove(id);
        self.orientations.remove(id);
        self.rotations.remove(id);
        self.visual_states.remove(id);
        let shape = self.drawables.remove(id).map(|d| d.shape);
        self.notify(StoreEvent::Destroyed(id, shape));
        shape
    }

    /// Destroys every agent, emitting a `Destroyed` event per agent.
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.destroy(id);
        }
    }

    /// Attaches (or replaces) a component. Emits the same patch event a
    /// mutation would, so mirrors pick up the initial value too.
    pub fn attach<T: Component>(&mut self, id: AgentId, value: T) {
        debug_assert!(self.contains(id), "attach on a dead agent");
        if !self.contains(id) {
            return;
        }
        T::table_mut(self).insert(id, value);
        self.notify(StoreEvent::Patched(id, T::KIND));
    }

    pub fn get<T: Component>(&self, id: AgentId) -> Option<&T> {
        T::table(self).get(id)
    }

    pub fn has<T: Component>(&self, id: AgentId) -> bool {
        T::table(self).contains_key(id)
    }

    /// Mutates a component in place and emits a patch event.
    pub fn patch<T: Component>(
        &mut self,
        id: AgentId,
        f: impl FnOnce(&mut T),
    ) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownAgent(id));
        }
        let value = T::table_mut(self)
            .get_mut(id)
            .ok_or(StoreError::MissingComponent(id, T::KIND))?;
        f(value);
        self.notify(StoreEvent::Patched(id, T::KIND));
        Ok(())
    }

    // Observers are taken out for the duration of the callbacks so they can
    // read the store through a shared reference.
    fn notify(&mut self, event: StoreEvent) {
        if self.observers.is_empty() {
            return;
        }
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer.on_event(self, event);
        }
        self.observers = observers;
    }
}
