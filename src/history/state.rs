//! Arena of file instances with a filename index.
//!
//! Instances are never moved or freed while reconstruction runs; removal
//! only clears the live flag. Slot order is creation order, so the most
//! recent instance of a name is the live slot with the highest index.

use std::collections::HashMap;

use super::instance::FileInstance;

#[derive(Debug, Clone)]
struct Slot {
    instance: FileInstance,
    live: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReconstructionState {
    slots: Vec<Slot>,
    /// filename -> slot indices, ascending.
    by_name: HashMap<String, Vec<usize>>,
}

impl ReconstructionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instance: FileInstance) -> usize {
        let idx = self.slots.len();
        self.index(&instance.filename, idx);
        self.slots.push(Slot {
            instance,
            live: true,
        });
        idx
    }

    fn index(&mut self, name: &str, idx: usize) {
        let list = self.by_name.entry(name.to_string()).or_default();
        let pos = list.partition_point(|&i| i < idx);
        list.insert(pos, idx);
    }

    fn unindex(&mut self, name: &str, idx: usize) {
        if let Some(list) = self.by_name.get_mut(name) {
            list.retain(|&i| i != idx);
            if list.is_empty() {
                self.by_name.remove(name);
            }
        }
    }

    pub fn get(&self, idx: usize) -> &FileInstance {
        &self.slots[idx].instance
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut FileInstance {
        &mut self.slots[idx].instance
    }

    /// Live slots currently named `name`, oldest first.
    pub fn live_named<'s>(&'s self, name: &str) -> impl DoubleEndedIterator<Item = usize> + 's {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&i| self.slots[i].live)
    }

    /// Most recently created live instance named `name`.
    pub fn latest(&self, name: &str) -> Option<usize> {
        self.live_named(name).next_back()
    }

    /// Most recently created live instance named `name` in `release`.
    pub fn latest_in(&self, name: &str, release: &str) -> Option<usize> {
        self.live_named(name)
            .rev()
            .find(|&i| self.slots[i].instance.release == release)
    }

    /// Live instances of `release` currently named `name`.
    pub fn live_named_in(&self, name: &str, release: &str) -> Vec<usize> {
        self.live_named(name)
            .filter(|&i| self.slots[i].instance.release == release)
            .collect()
    }

    pub fn live_in_release(&self, release: &str) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live && s.instance.release == release)
            .map(|(i, _)| i)
            .collect()
    }

    /// Rename the instance in slot `idx`, keeping the index consistent.
    pub fn rename(&mut self, idx: usize, name: &str) {
        let old = self.slots[idx].instance.filename.clone();
        if old == name {
            return;
        }
        self.unindex(&old, idx);
        self.slots[idx].instance.rename(name);
        self.index(name, idx);
    }

    pub fn remove(&mut self, idx: usize) {
        self.slots[idx].live = false;
    }

    /// Deep copy of every live instance, in creation order.
    pub fn snapshot(&self) -> Vec<FileInstance> {
        self.slots
            .iter()
            .filter(|s| s.live)
            .map(|s| s.instance.clone())
            .collect()
    }

    pub fn into_live(self) -> Vec<FileInstance> {
        self.slots
            .into_iter()
            .filter(|s| s.live)
            .map(|s| s.instance)
            .collect()
    }
}
