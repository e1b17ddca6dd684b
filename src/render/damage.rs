//! Global damage accumulation between frames.

use crate::foundation::region::Region;

/// Screen-space damage collected since the last paint.
#[derive(Clone, Debug, Default)]
pub struct DamageAccumulator {
    pending: Option<Region>,
}

impl DamageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, damage: Region) {
        if damage.is_empty() {
            return;
        }
        match &mut self.pending {
            Some(all) => all.union(&damage),
            None => self.pending = Some(damage),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&Region> {
        self.pending.as_ref()
    }

    /// Hand the accumulated damage to the frame being painted and start over.
    pub fn take(&mut self) -> Option<Region> {
        self.pending.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/damage.rs"]
mod tests;
