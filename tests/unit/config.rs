use super::*;

#[test]
fn default_config_reproduces_builtin_bindings() {
    let setup = CompositorConfig::default().resolve().unwrap();
    let builtin = EffectSetup::default();

    assert_eq!(setup.tick_interval_ms, 3);
    for window_type in WindowType::ALL {
        for event in LifecycleEvent::ALL {
            assert_eq!(
                setup.table.select(window_type, event),
                builtin.table.select(window_type, event),
                "{} {}",
                window_type.name(),
                event.name()
            );
        }
    }
    assert_eq!(setup.bindings().len(), 12);
}

#[test]
fn empty_document_uses_defaults() {
    let cfg = CompositorConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, CompositorConfig::default());
}

#[test]
fn custom_effects_and_rules_resolve() {
    let cfg = CompositorConfig::from_json_str(
        r#"{
            "tick_interval_ms": 10,
            "effects": {
                "quick-fade": { "function": "fade", "step": 0.25, "ease": "out-quad" },
                "grow": { "function": "POP" }
            },
            "rules": {
                "dialog": { "map": "grow", "resize": "quick-fade" },
                "Tooltip": { "unmap": "quick-fade" }
            }
        }"#,
    )
    .unwrap();
    let setup = cfg.resolve().unwrap();
    assert_eq!(setup.tick_interval_ms, 10);

    let grow = setup
        .table
        .select(WindowType::Dialog, LifecycleEvent::Map)
        .unwrap();
    assert_eq!(grow.kind, EffectKind::Pop);
    assert_eq!(grow.step, DEFAULT_STEP);

    let fade = setup
        .table
        .select(WindowType::Dialog, LifecycleEvent::Resize)
        .unwrap();
    assert_eq!((fade.kind, fade.ease, fade.step), (EffectKind::Fade, Ease::OutQuad, 0.25));
    assert!(setup.table.select(WindowType::Tooltip, LifecycleEvent::Unmap).is_some());
    assert!(setup.table.select(WindowType::Normal, LifecycleEvent::Map).is_none());
}

#[test]
fn invalid_options_fail_with_the_offending_name() {
    let cases = [
        (r#"{ "tick_interval_ms": 0 }"#, "tick_interval_ms"),
        (r#"{ "tick_interval_ms": -4 }"#, "tick_interval_ms"),
        (r#"{ "effects": { "x": { "function": "wobble" } }, "rules": {} }"#, "wobble"),
        (r#"{ "effects": { "x": { "function": "fade", "step": -0.1 } }, "rules": {} }"#, "'x'"),
        (r#"{ "rules": { "taskbar": { "map": "fade" } } }"#, "taskbar"),
        (r#"{ "rules": { "normal": { "map": "sparkle" } } }"#, "sparkle"),
    ];
    for (json, needle) in cases {
        let err = CompositorConfig::from_json_str(json)
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CompositorError::Config(_)), "{json}");
        assert!(err.to_string().contains(needle), "{err} should mention {needle}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = CompositorConfig::from_json_str("{ \"effects\": 3 }").unwrap_err();
    assert!(matches!(err, CompositorError::Serde(_)));
    assert!(CompositorConfig::from_json_str(r#"{ "bogus": 1 }"#).is_err());
}
