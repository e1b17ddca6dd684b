//! Arena of window records plus their stacking order.
//!
//! Records live in generation-checked slots so a [`WindowKey`] held across a
//! teardown can never reach a different window that reused the slot.

use std::collections::HashMap;

use crate::{foundation::core::WindowId, window::record::Window};

/// Stable handle to a record in a [`WindowStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowKey {
    index: u32,
    generation: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    window: Option<Window>,
}

#[derive(Debug, Default)]
pub struct WindowStack {
    slots: Vec<Slot>,
    free: Vec<u32>,
    // top of the stack first
    order: Vec<WindowKey>,
    by_id: HashMap<WindowId, WindowKey>,
}

impl WindowStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Store `window` on top of the stack. An existing record with the same id
    /// is kept and its key returned instead.
    pub fn push_top(&mut self, window: Window) -> WindowKey {
        if let Some(&key) = self.by_id.get(&window.id) {
            return key;
        }
        let id = window.id;
        let key = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.window = Some(window);
                WindowKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot {
                    generation: 0,
                    window: Some(window),
                });
                WindowKey {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.insert(0, key);
        self.by_id.insert(id, key);
        key
    }

    pub fn remove(&mut self, key: WindowKey) -> Option<Window> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let window = slot.window.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.order.retain(|k| *k != key);
        self.by_id.remove(&window.id);
        Some(window)
    }

    pub fn get(&self, key: WindowKey) -> Option<&Window> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.window.as_ref()
    }

    pub fn get_mut(&mut self, key: WindowKey) -> Option<&mut Window> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.window.as_mut()
    }

    pub fn find(&self, id: WindowId) -> Option<WindowKey> {
        self.by_id.get(&id).copied()
    }

    pub fn top(&self) -> Option<WindowKey> {
        self.order.first().copied()
    }

    /// Keys from the top of the stack down.
    pub fn keys_top_down(&self) -> Vec<WindowKey> {
        self.order.clone()
    }

    pub fn ids_top_down(&self) -> Vec<WindowId> {
        self.order
            .iter()
            .filter_map(|k| self.get(*k).map(|w| w.id))
            .collect()
    }

    /// The window directly below `key`, if any.
    pub fn below(&self, key: WindowKey) -> Option<WindowKey> {
        let pos = self.order.iter().position(|k| *k == key)?;
        self.order.get(pos + 1).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.order.iter().filter_map(|k| self.get(*k))
    }

    /// Move `key` so it sits directly above `new_above` (bottom of the stack for
    /// `None` or an unknown sibling). Returns `false` without touching the order
    /// when the window already sits there or would sit above itself.
    pub fn restack(&mut self, key: WindowKey, new_above: Option<WindowId>) -> bool {
        let Some(pos) = self.order.iter().position(|k| *k == key) else {
            return false;
        };
        if new_above.is_some() && new_above == self.get(key).map(|w| w.id) {
            return false;
        }
        let old_above = self
            .order
            .get(pos + 1)
            .and_then(|k| self.get(*k))
            .map(|w| w.id);
        if old_above == new_above {
            return false;
        }

        self.order.remove(pos);
        let target = new_above
            .and_then(|id| self.by_id.get(&id))
            .and_then(|sibling| self.order.iter().position(|k| k == sibling));
        match target {
            Some(idx) => self.order.insert(idx, key),
            None => self.order.push(key),
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/window/stack.rs"]
mod tests;
