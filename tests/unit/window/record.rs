use super::*;

fn attrs(argb: bool) -> WindowAttributes {
    WindowAttributes {
        geometry: Geometry {
            x: 5,
            y: 6,
            width: 30,
            height: 20,
            border_width: 2,
        },
        viewable: true,
        override_redirect: false,
        input_only: false,
        argb_visual: argb,
    }
}

#[test]
fn classify_prefers_hint_then_falls_back() {
    assert_eq!(
        WindowType::classify(Some(WindowType::Dock), true, true),
        WindowType::Dock
    );
    assert_eq!(WindowType::classify(None, true, false), WindowType::Dialog);
    assert_eq!(WindowType::classify(None, false, true), WindowType::Dialog);
    assert_eq!(WindowType::classify(None, false, false), WindowType::Normal);
}

#[test]
fn window_type_names_round_trip() {
    for t in WindowType::ALL {
        assert_eq!(WindowType::from_name(t.name()), Some(t));
    }
    assert_eq!(WindowType::from_name(" Popup-Menu "), Some(WindowType::PopupMenu));
    assert_eq!(WindowType::from_name("taskbar"), None);
}

#[test]
fn new_record_starts_unmapped_and_unpainted() {
    let w = Window::new(WindowId(7), &attrs(false), WindowType::Normal);
    assert!(!w.viewable);
    assert!(!w.damaged);
    assert!(w.pixmap.is_none() && w.picture.is_none() && w.alpha_mask.is_none());
    assert_eq!(w.transform, Transform::default());
    assert_eq!(w.shape_bounds, IRect::new(5, 6, 30, 20));
}

#[test]
fn extents_include_the_border() {
    let w = Window::new(WindowId(1), &attrs(false), WindowType::Normal);
    assert_eq!(w.extents_region().extents(), Some(IRect::new(5, 6, 34, 24)));
}

#[test]
fn mode_follows_visual_then_opacity() {
    let mut w = Window::new(WindowId(1), &attrs(false), WindowType::Normal);
    w.determine_mode();
    assert_eq!(w.mode, PaintMode::Solid);

    w.transform.opacity = 0.5;
    w.determine_mode();
    assert_eq!(w.mode, PaintMode::Translucent);

    let mut argb = Window::new(WindowId(2), &attrs(true), WindowType::Normal);
    argb.determine_mode();
    assert_eq!(argb.mode, PaintMode::AlphaChannel);
}

#[test]
fn mode_change_returns_extents_and_marks_mask_stale() {
    let mut w = Window::new(WindowId(1), &attrs(false), WindowType::Normal);
    assert!(w.determine_mode().is_none());
    assert!(!w.alpha_mask_stale);

    w.extents = Some(w.extents_region());
    w.alpha_mask = Some(PictureId(9));
    let damaged = w.determine_mode().unwrap();
    assert!(damaged.contains(5, 6));
    assert!(w.alpha_mask_stale);
}

#[test]
fn only_solid_windows_are_promoted_while_animating() {
    let mut w = Window::new(WindowId(1), &attrs(false), WindowType::Normal);
    w.promote_while_animating();
    assert_eq!(w.mode, PaintMode::AlphaChannel);

    w.mode = PaintMode::Translucent;
    w.promote_while_animating();
    assert_eq!(w.mode, PaintMode::Translucent);
}
