use super::*;

#[test]
fn irect_intersection_and_empty_edges() {
    let a = IRect::new(0, 0, 10, 10);
    let b = IRect::new(5, 5, 10, 10);
    assert_eq!(a.intersect(&b), Some(IRect::new(5, 5, 5, 5)));

    let touching = IRect::new(10, 0, 4, 4);
    assert_eq!(a.intersect(&touching), None);
    assert!(IRect::from_edges(3, 3, 3, 9).is_none());
}

#[test]
fn bordered_geometry_adds_border_on_both_sides() {
    let g = Geometry {
        x: 4,
        y: 6,
        width: 10,
        height: 20,
        border_width: 2,
    };
    assert_eq!(g.bordered(), IRect::new(4, 6, 14, 24));
    assert_eq!(g.content_origin(), (6, 8));
}

#[test]
fn offscreen_detection_matches_screen_edges() {
    let screen = Size::new(100, 100);
    let mut g = Geometry {
        x: -10,
        y: 0,
        width: 10,
        height: 10,
        border_width: 0,
    };
    assert!(g.is_offscreen(screen));
    g.x = -9;
    assert!(!g.is_offscreen(screen));
    g.x = 100;
    assert!(g.is_offscreen(screen));
}

#[test]
fn kurbo_round_trip_truncates() {
    let r = IRect::new(-3, 2, 7, 5);
    assert_eq!(IRect::from_kurbo_trunc(r.to_kurbo()), r);
    let scaled = Rect::new(1.9, 2.2, 10.8, 9.9);
    assert_eq!(IRect::from_kurbo_trunc(scaled), IRect::new(1, 2, 8, 7));
}

#[test]
fn millis_since_saturates() {
    assert_eq!(Millis(10).since(Millis(4)), 6);
    assert_eq!(Millis(4).since(Millis(10)), 0);
}
