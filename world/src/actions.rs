//! Callback registries keyed by logical key or turn phase.

use std::{collections::BTreeMap, fmt};

use rol_core::Command;

use crate::World;

/// Callback that inspects the world and answers with commands.
///
/// Closures of the shape `FnMut(&World, &mut Vec<Command>)` implement the
/// trait, so bound parameters are captured rather than passed.
pub trait Action {
    /// Reads the world and pushes the commands it wants applied.
    fn run(&mut self, world: &World, out: &mut Vec<Command>);
}

impl<F> Action for F
where
    F: FnMut(&World, &mut Vec<Command>),
{
    fn run(&mut self, world: &World, out: &mut Vec<Command>) {
        self(world, out);
    }
}

/// Ordered lists of actions grouped by key.
pub(crate) struct ActionRegistry<K> {
    actions: BTreeMap<K, Vec<Box<dyn Action>>>,
}

impl<K: Ord + Copy> ActionRegistry<K> {
    pub(crate) fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    pub(crate) fn register(&mut self, key: K, action: Box<dyn Action>) {
        self.actions.entry(key).or_default().push(action);
    }

    pub(crate) fn has_actions(&self, key: K) -> bool {
        self.actions.get(&key).is_some_and(|list| !list.is_empty())
    }

    /// Detaches the actions of `key` so they can run against the world.
    pub(crate) fn take(&mut self, key: K) -> Vec<Box<dyn Action>> {
        self.actions.remove(&key).unwrap_or_default()
    }

    /// Reattaches actions detached by [`ActionRegistry::take`], ahead of
    /// anything registered meanwhile.
    pub(crate) fn restore(&mut self, key: K, mut actions: Vec<Box<dyn Action>>) {
        if actions.is_empty() {
            return;
        }
        let slot = self.actions.entry(key).or_default();
        actions.append(slot);
        *slot = actions;
    }
}

impl<K: fmt::Debug> fmt::Debug for ActionRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.actions.iter().map(|(key, list)| (key, list.len())))
            .finish()
    }
}
