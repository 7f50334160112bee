use std::collections::{BTreeMap, BTreeSet};

use crashnet_core::{Direction, ObjectId};

/// Tracks which room edge each object currently stands on.
///
/// An object is registered under at most one direction at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaveTracker {
    edges: BTreeMap<Direction, BTreeSet<ObjectId>>,
}

impl LeaveTracker {
    /// Creates a tracker with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `object` at the `direction` edge, dropping any other registration.
    pub fn set(&mut self, object: ObjectId, direction: Direction) {
        for (edge, objects) in &mut self.edges {
            if *edge != direction {
                let _ = objects.remove(&object);
            }
        }
        let _ = self.edges.entry(direction).or_default().insert(object);
    }

    /// Removes every registration of `object`.
    pub fn clear(&mut self, object: ObjectId) {
        for objects in self.edges.values_mut() {
            let _ = objects.remove(&object);
        }
    }

    /// Drops every registration.
    pub fn reset(&mut self) {
        self.edges.clear();
    }

    /// Edge the object is registered at, if any.
    #[must_use]
    pub fn direction_of(&self, object: ObjectId) -> Option<Direction> {
        self.edges
            .iter()
            .find(|(_, objects)| objects.contains(&object))
            .map(|(direction, _)| *direction)
    }

    /// First of `candidates` whose registrations include every member of `players`.
    ///
    /// An empty player set never forms a quorum.
    #[must_use]
    pub fn quorum(
        &self,
        players: &BTreeSet<ObjectId>,
        candidates: &BTreeSet<Direction>,
    ) -> Option<Direction> {
        if players.is_empty() {
            return None;
        }
        candidates.iter().copied().find(|direction| {
            self.edges
                .get(direction)
                .is_some_and(|objects| objects.is_superset(players))
        })
    }
}
