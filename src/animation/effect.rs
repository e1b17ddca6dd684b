//! Effect library: progress-to-transform functions and the per-(window type,
//! lifecycle event) dispatch table.

use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Geometry, Size, span},
        error::{CompositorError, CompositorResult},
    },
    window::record::{Transform, WindowType},
};

/// Per-tick progress increment used when an effect does not set one.
pub const DEFAULT_STEP: f64 = 0.03;

const POP_MIN_SCALE: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Fade,
    Pop,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    SmartSlide,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        Self::Fade,
        Self::Pop,
        Self::SlideUp,
        Self::SlideDown,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SmartSlide,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Pop => "pop",
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::SmartSlide => "smart-slide",
        }
    }

    pub fn parse(name: &str) -> CompositorResult<Self> {
        let name = name.trim().to_ascii_lowercase().replace('_', "-");
        if name.is_empty() {
            return Err(CompositorError::config("effect function must be non-empty"));
        }
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| CompositorError::config(format!("unknown effect function '{name}'")))
    }

    /// Write the transform for `progress` in `[0, 1]` (0 = hidden, 1 = at rest).
    pub fn apply(self, transform: &mut Transform, geometry: &Geometry, screen: Size, progress: f64) {
        let width = f64::from(geometry.width);
        let height = f64::from(geometry.height);
        match self {
            Self::Fade => transform.opacity = progress,
            Self::Pop => {
                transform.opacity = progress;
                transform.scale = progress * (1.0 - POP_MIN_SCALE) + POP_MIN_SCALE;
            }
            Self::SlideUp => transform.offset_y = -(height * progress - height) as i32,
            Self::SlideDown => transform.offset_y = (height * progress - height) as i32,
            Self::SlideLeft => transform.offset_x = -(width * progress - width) as i32,
            Self::SlideRight => transform.offset_x = (width * progress - width) as i32,
            Self::SmartSlide => {
                smart_direction(geometry, screen).apply(transform, geometry, screen, progress)
            }
        }
    }
}

/// Default direction guess for docks and panels: tall windows slide in from the
/// nearer vertical screen edge, wide ones from the nearer horizontal edge.
///
/// Explicit per-window-type rules should replace this once they exist.
fn smart_direction(geometry: &Geometry, screen: Size) -> EffectKind {
    if geometry.width < geometry.height {
        let center_x = geometry.x.saturating_add(span(geometry.width) / 2);
        if center_x < span(screen.width) / 2 {
            EffectKind::SlideRight
        } else {
            EffectKind::SlideLeft
        }
    } else {
        let center_y = geometry.y.saturating_add(span(geometry.height) / 2);
        if center_y < span(screen.height) / 2 {
            EffectKind::SlideDown
        } else {
            EffectKind::SlideUp
        }
    }
}

/// Interpolation half of an effect: what an action carries while it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    pub kind: EffectKind,
    pub ease: Ease,
}

impl Curve {
    pub fn apply(self, transform: &mut Transform, geometry: &Geometry, screen: Size, progress: f64) {
        self.kind
            .apply(transform, geometry, screen, self.ease.apply(progress));
    }
}

/// Named effect: an interpolation function plus its per-tick step.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub name: String,
    pub kind: EffectKind,
    pub ease: Ease,
    pub step: f64,
}

impl Effect {
    pub fn new(name: impl Into<String>, kind: EffectKind, step: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            ease: Ease::Linear,
            step,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn curve(&self) -> Curve {
        Curve {
            kind: self.kind,
            ease: self.ease,
        }
    }
}

/// Effects keyed by name.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    effects: BTreeMap<String, Effect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One effect per function, named after it, at the default step.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in EffectKind::ALL {
            registry.insert(Effect::new(kind.name(), kind, DEFAULT_STEP));
        }
        registry
    }

    /// Register `effect`, replacing any earlier effect of the same name.
    pub fn insert(&mut self, effect: Effect) {
        self.effects.insert(effect.name.clone(), effect);
    }

    pub fn get(&self, name: &str) -> Option<&Effect> {
        self.effects.get(name)
    }

    pub fn resolve(&self, name: &str) -> CompositorResult<&Effect> {
        self.get(name)
            .ok_or_else(|| CompositorError::config(format!("unknown effect '{name}'")))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.values()
    }
}

/// Window lifecycle transitions an effect can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    Map,
    Unmap,
    Destroy,
    Resize,
}

impl LifecycleEvent {
    pub const COUNT: usize = 4;

    pub const ALL: [LifecycleEvent; Self::COUNT] =
        [Self::Map, Self::Unmap, Self::Destroy, Self::Resize];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Unmap => "unmap",
            Self::Destroy => "destroy",
            Self::Resize => "resize",
        }
    }
}

/// Fixed-size `(window type, event) -> effect` table; empty slots mean "no animation".
#[derive(Clone, Debug)]
pub struct EffectTable {
    slots: Vec<Option<Effect>>,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl EffectTable {
    pub fn empty() -> Self {
        Self {
            slots: vec![None; WindowType::COUNT * LifecycleEvent::COUNT],
        }
    }

    /// Built-in bindings: docks slide, popup menus and tooltips fade, normal
    /// windows pop, on map, unmap and destroy.
    pub fn builtin(registry: &EffectRegistry) -> Self {
        let mut table = Self::empty();
        let bindings = [
            (WindowType::Dock, EffectKind::SmartSlide),
            (WindowType::PopupMenu, EffectKind::Fade),
            (WindowType::Tooltip, EffectKind::Fade),
            (WindowType::Normal, EffectKind::Pop),
        ];
        for (window_type, kind) in bindings {
            let Some(effect) = registry.get(kind.name()) else {
                continue;
            };
            for event in [
                LifecycleEvent::Map,
                LifecycleEvent::Unmap,
                LifecycleEvent::Destroy,
            ] {
                table.set(window_type, event, Some(effect.clone()));
            }
        }
        table
    }

    fn slot(window_type: WindowType, event: LifecycleEvent) -> usize {
        window_type.index() * LifecycleEvent::COUNT + event.index()
    }

    pub fn set(&mut self, window_type: WindowType, event: LifecycleEvent, effect: Option<Effect>) {
        self.slots[Self::slot(window_type, event)] = effect;
    }

    pub fn select(&self, window_type: WindowType, event: LifecycleEvent) -> Option<&Effect> {
        self.slots[Self::slot(window_type, event)].as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/effect.rs"]
mod tests;
