//! Effect configuration: named effects and the per-window-type bindings, loaded
//! from JSON and resolved into a dispatch table before the compositor starts.

use std::{collections::BTreeMap, io::Read};

use crate::{
    animation::{
        action::DEFAULT_TICK_INTERVAL_MS,
        ease::Ease,
        effect::{DEFAULT_STEP, Effect, EffectKind, EffectRegistry, EffectTable, LifecycleEvent},
    },
    foundation::error::{CompositorError, CompositorResult},
    window::record::WindowType,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositorConfig {
    /// Signed so that negative values surface as a config error rather than a parse error.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: i64,
    #[serde(default = "default_effects")]
    pub effects: BTreeMap<String, EffectConfig>,
    /// Keyed by window-type name.
    #[serde(default = "default_rules")]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectConfig {
    pub function: String,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub ease: Ease,
}

/// Effect names bound to each lifecycle event of one window type.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub unmap: Option<String>,
    #[serde(default)]
    pub destroy: Option<String>,
    #[serde(default)]
    pub resize: Option<String>,
}

impl RuleConfig {
    fn uniform(effect: &str) -> Self {
        Self {
            map: Some(effect.to_owned()),
            unmap: Some(effect.to_owned()),
            destroy: Some(effect.to_owned()),
            resize: None,
        }
    }

    fn get(&self, event: LifecycleEvent) -> Option<&str> {
        match event {
            LifecycleEvent::Map => self.map.as_deref(),
            LifecycleEvent::Unmap => self.unmap.as_deref(),
            LifecycleEvent::Destroy => self.destroy.as_deref(),
            LifecycleEvent::Resize => self.resize.as_deref(),
        }
    }
}

fn default_tick_interval_ms() -> i64 {
    DEFAULT_TICK_INTERVAL_MS as i64
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

fn default_effects() -> BTreeMap<String, EffectConfig> {
    EffectKind::ALL
        .into_iter()
        .map(|kind| {
            (
                kind.name().to_owned(),
                EffectConfig {
                    function: kind.name().to_owned(),
                    step: DEFAULT_STEP,
                    ease: Ease::Linear,
                },
            )
        })
        .collect()
}

fn default_rules() -> BTreeMap<String, RuleConfig> {
    [
        (WindowType::Dock, EffectKind::SmartSlide),
        (WindowType::PopupMenu, EffectKind::Fade),
        (WindowType::Tooltip, EffectKind::Fade),
        (WindowType::Normal, EffectKind::Pop),
    ]
    .into_iter()
    .map(|(t, kind)| (t.name().to_owned(), RuleConfig::uniform(kind.name())))
    .collect()
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            effects: default_effects(),
            rules: default_rules(),
        }
    }
}

/// Resolved effect configuration, ready to hand to the compositor.
#[derive(Clone, Debug)]
pub struct EffectSetup {
    pub registry: EffectRegistry,
    pub table: EffectTable,
    pub tick_interval_ms: u64,
}

impl Default for EffectSetup {
    fn default() -> Self {
        let registry = EffectRegistry::builtin();
        let table = EffectTable::builtin(&registry);
        Self {
            registry,
            table,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl EffectSetup {
    /// Every bound `(window type, event, effect)` triple, in table order.
    pub fn bindings(&self) -> Vec<(WindowType, LifecycleEvent, &Effect)> {
        let mut out = Vec::new();
        for window_type in WindowType::ALL {
            for event in LifecycleEvent::ALL {
                if let Some(effect) = self.table.select(window_type, event) {
                    out.push((window_type, event, effect));
                }
            }
        }
        out
    }
}

impl CompositorConfig {
    pub fn from_json_str(s: &str) -> CompositorResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader(r: impl Read) -> CompositorResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Check every option and resolve effect names into a dispatch table.
    pub fn resolve(&self) -> CompositorResult<EffectSetup> {
        if self.tick_interval_ms <= 0 {
            return Err(CompositorError::config(format!(
                "tick_interval_ms must be > 0 (got {})",
                self.tick_interval_ms
            )));
        }
        let tick_interval_ms = u64::try_from(self.tick_interval_ms)
            .map_err(|_| CompositorError::config("tick_interval_ms out of range"))?;

        let mut registry = EffectRegistry::new();
        for (name, cfg) in &self.effects {
            if name.trim().is_empty() {
                return Err(CompositorError::config("effect names must be non-empty"));
            }
            let kind = EffectKind::parse(&cfg.function).map_err(|_| {
                CompositorError::config(format!(
                    "effect '{name}': unknown function '{}'",
                    cfg.function
                ))
            })?;
            if !cfg.step.is_finite() || cfg.step <= 0.0 {
                return Err(CompositorError::config(format!(
                    "effect '{name}': step must be finite and > 0 (got {})",
                    cfg.step
                )));
            }
            registry.insert(Effect::new(name.clone(), kind, cfg.step).with_ease(cfg.ease));
        }

        let mut table = EffectTable::empty();
        for (type_name, rule) in &self.rules {
            let window_type = WindowType::from_name(type_name).ok_or_else(|| {
                CompositorError::config(format!("unknown window type '{type_name}'"))
            })?;
            for event in LifecycleEvent::ALL {
                let Some(effect_name) = rule.get(event) else {
                    continue;
                };
                let effect = registry.get(effect_name).ok_or_else(|| {
                    CompositorError::config(format!(
                        "rule '{type_name}.{}' references unknown effect '{effect_name}'",
                        event.name()
                    ))
                })?;
                table.set(window_type, event, Some(effect.clone()));
            }
        }

        tracing::debug!(
            effects = registry.len(),
            tick_interval_ms,
            "effect configuration resolved"
        );
        Ok(EffectSetup {
            registry,
            table,
            tick_interval_ms,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
