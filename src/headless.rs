//! In-memory display server for tests and trace replay.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    display::{DamageId, DisplayServer, WindowAttributes},
    foundation::{
        core::{Geometry, IRect, WindowId, span},
        region::Region,
    },
    window::record::WindowType,
};

#[derive(Clone, Debug)]
struct ServerWindow {
    attrs: WindowAttributes,
    opacity: Option<u32>,
    window_type: Option<WindowType>,
    transient_for: bool,
    /// Window-local bounding shape; `None` means the bordered rectangle.
    shape: Option<Region>,
    pending_damage: Region,
}

/// Display model holding window attributes, properties and damage, with no
/// connection behind it. Mutators change server-side state only; the caller
/// delivers the matching [`WindowEvent`](crate::display::WindowEvent).
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    windows: BTreeMap<WindowId, ServerWindow>,
    damages: BTreeMap<DamageId, WindowId>,
    next_damage: u32,
    listening: BTreeSet<WindowId>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&mut self, id: WindowId, attrs: WindowAttributes) {
        self.windows.insert(
            id,
            ServerWindow {
                attrs,
                opacity: None,
                window_type: None,
                transient_for: false,
                shape: None,
                pending_damage: Region::new(),
            },
        );
    }

    /// Destroy `id` server-side; its damage objects go with it.
    pub fn remove_window(&mut self, id: WindowId) {
        self.windows.remove(&id);
        self.damages.retain(|_, w| *w != id);
        self.listening.remove(&id);
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn attributes(&self, id: WindowId) -> Option<WindowAttributes> {
        self.windows.get(&id).map(|w| w.attrs)
    }

    pub fn set_geometry(&mut self, id: WindowId, geometry: Geometry) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.attrs.geometry = geometry;
        }
    }

    pub fn set_viewable(&mut self, id: WindowId, viewable: bool) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.attrs.viewable = viewable;
        }
    }

    pub fn set_opacity(&mut self, id: WindowId, raw: Option<u32>) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.opacity = raw;
        }
    }

    pub fn set_window_type(&mut self, id: WindowId, window_type: Option<WindowType>) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.window_type = window_type;
        }
    }

    pub fn set_transient_for(&mut self, id: WindowId, transient: bool) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.transient_for = transient;
        }
    }

    /// Set the window-local bounding shape; `None` restores the plain rectangle.
    pub fn set_shape(&mut self, id: WindowId, shape: Option<Region>) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.shape = shape;
        }
    }

    /// Record window-local damage, as the server does when a client draws.
    pub fn report_damage(&mut self, id: WindowId, damage: &Region) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.pending_damage.union(damage);
        }
    }

    /// Damage the whole of `id`.
    pub fn report_full_damage(&mut self, id: WindowId) {
        let Some(g) = self.windows.get(&id).map(|w| w.attrs.geometry) else {
            return;
        };
        self.report_damage(id, &Region::from_rect(IRect::new(0, 0, g.width, g.height)));
    }

    pub fn live_damage_objects(&self) -> usize {
        self.damages.len()
    }

    pub fn is_listening(&self, id: WindowId) -> bool {
        self.listening.contains(&id)
    }
}

impl DisplayServer for MemoryDisplay {
    fn window_attributes(&mut self, window: WindowId) -> Option<WindowAttributes> {
        self.attributes(window)
    }

    fn opacity_property(&mut self, window: WindowId) -> Option<u32> {
        self.windows.get(&window).and_then(|w| w.opacity)
    }

    fn window_type_property(&mut self, window: WindowId) -> Option<WindowType> {
        self.windows.get(&window).and_then(|w| w.window_type)
    }

    fn has_transient_for(&mut self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.transient_for)
    }

    fn select_property_input(&mut self, window: WindowId, enabled: bool) {
        if enabled && self.windows.contains_key(&window) {
            self.listening.insert(window);
        } else {
            self.listening.remove(&window);
        }
    }

    fn create_damage(&mut self, window: WindowId) -> Option<DamageId> {
        if !self.windows.contains_key(&window) {
            return None;
        }
        self.next_damage += 1;
        let id = DamageId(self.next_damage);
        self.damages.insert(id, window);
        Some(id)
    }

    fn destroy_damage(&mut self, damage: DamageId) {
        self.damages.remove(&damage);
    }

    fn subtract_damage(&mut self, damage: DamageId) -> Region {
        let Some(window) = self.damages.get(&damage) else {
            return Region::new();
        };
        self.windows
            .get_mut(window)
            .map(|w| std::mem::take(&mut w.pending_damage))
            .unwrap_or_default()
    }

    fn bounding_region(&mut self, window: WindowId) -> Region {
        let Some(w) = self.windows.get(&window) else {
            return Region::new();
        };
        if let Some(shape) = &w.shape {
            return shape.clone();
        }
        // relative to the content origin, so the border sits at negative offsets
        let g = w.attrs.geometry;
        let border = span(g.border_width);
        Region::from_rect(IRect::new(-border, -border, g.bordered().width, g.bordered().height))
    }
}

#[cfg(test)]
#[path = "../tests/unit/headless.rs"]
mod tests;
