use super::*;

fn geometry(x: i32, y: i32, width: u32, height: u32) -> Geometry {
    Geometry {
        x,
        y,
        width,
        height,
        border_width: 0,
    }
}

const SCREEN: Size = Size {
    width: 1000,
    height: 800,
};

#[test]
fn pop_endpoints() {
    let g = geometry(0, 0, 100, 100);
    let mut t = Transform::default();

    EffectKind::Pop.apply(&mut t, &g, SCREEN, 0.0);
    assert_eq!(t.opacity, 0.0);
    assert_eq!(t.scale, 0.75);

    EffectKind::Pop.apply(&mut t, &g, SCREEN, 1.0);
    assert_eq!(t.opacity, 1.0);
    assert_eq!(t.scale, 1.0);
}

#[test]
fn fade_only_touches_opacity() {
    let g = geometry(0, 0, 100, 100);
    let mut t = Transform {
        scale: 0.9,
        offset_x: 4,
        ..Transform::default()
    };
    EffectKind::Fade.apply(&mut t, &g, SCREEN, 0.4);
    assert_eq!(t.opacity, 0.4);
    assert_eq!(t.scale, 0.9);
    assert_eq!(t.offset_x, 4);
}

#[test]
fn slides_start_fully_offset_and_end_at_rest() {
    let g = geometry(0, 0, 200, 100);
    let mut t = Transform::default();

    EffectKind::SlideUp.apply(&mut t, &g, SCREEN, 0.0);
    assert_eq!(t.offset_y, 100);
    EffectKind::SlideDown.apply(&mut t, &g, SCREEN, 0.0);
    assert_eq!(t.offset_y, -100);
    EffectKind::SlideLeft.apply(&mut t, &g, SCREEN, 0.0);
    assert_eq!(t.offset_x, 200);
    EffectKind::SlideRight.apply(&mut t, &g, SCREEN, 0.0);
    assert_eq!(t.offset_x, -200);

    for kind in [
        EffectKind::SlideUp,
        EffectKind::SlideDown,
        EffectKind::SlideLeft,
        EffectKind::SlideRight,
    ] {
        kind.apply(&mut t, &g, SCREEN, 1.0);
    }
    assert_eq!((t.offset_x, t.offset_y), (0, 0));
}

#[test]
fn smart_slide_picks_the_nearest_edge() {
    let mut t = Transform::default();

    // tall panel on the left slides in from the left
    let left_panel = geometry(0, 0, 40, 800);
    EffectKind::SmartSlide.apply(&mut t, &left_panel, SCREEN, 0.0);
    assert_eq!(t.offset_x, -40);

    let right_panel = geometry(960, 0, 40, 800);
    EffectKind::SmartSlide.apply(&mut t, &right_panel, SCREEN, 0.0);
    assert_eq!(t.offset_x, 40);

    // wide bar at the top slides down, at the bottom slides up
    let top_bar = geometry(0, 0, 1000, 30);
    EffectKind::SmartSlide.apply(&mut t, &top_bar, SCREEN, 0.0);
    assert_eq!(t.offset_y, -30);

    let bottom_bar = geometry(0, 770, 1000, 30);
    EffectKind::SmartSlide.apply(&mut t, &bottom_bar, SCREEN, 0.0);
    assert_eq!(t.offset_y, 30);
}

#[test]
fn parse_accepts_names_and_rejects_unknown() {
    assert_eq!(EffectKind::parse(" Slide_Up ").unwrap(), EffectKind::SlideUp);
    assert_eq!(EffectKind::parse("smart-slide").unwrap(), EffectKind::SmartSlide);
    let err = EffectKind::parse("wobble").unwrap_err();
    assert!(err.to_string().contains("wobble"));
    assert!(EffectKind::parse("  ").is_err());
}

#[test]
fn builtin_table_matches_default_bindings() {
    let registry = EffectRegistry::builtin();
    let table = EffectTable::builtin(&registry);

    let normal = table
        .select(WindowType::Normal, LifecycleEvent::Map)
        .unwrap();
    assert_eq!(normal.kind, EffectKind::Pop);
    assert_eq!(normal.step, DEFAULT_STEP);

    assert_eq!(
        table
            .select(WindowType::Dock, LifecycleEvent::Unmap)
            .map(|e| e.kind),
        Some(EffectKind::SmartSlide)
    );
    assert_eq!(
        table
            .select(WindowType::Tooltip, LifecycleEvent::Destroy)
            .map(|e| e.kind),
        Some(EffectKind::Fade)
    );
    assert!(table.select(WindowType::Desktop, LifecycleEvent::Map).is_none());
    assert!(table.select(WindowType::Normal, LifecycleEvent::Resize).is_none());
}

#[test]
fn curve_applies_ease_before_effect() {
    let g = geometry(0, 0, 10, 10);
    let mut t = Transform::default();
    let curve = Effect::new("fade-in", EffectKind::Fade, 0.1)
        .with_ease(Ease::InQuad)
        .curve();
    curve.apply(&mut t, &g, SCREEN, 0.5);
    assert_eq!(t.opacity, 0.25);
}
