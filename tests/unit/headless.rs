use super::*;

fn attrs() -> WindowAttributes {
    WindowAttributes {
        geometry: Geometry {
            x: 10,
            y: 10,
            width: 20,
            height: 10,
            border_width: 1,
        },
        viewable: false,
        override_redirect: false,
        input_only: false,
        argb_visual: false,
    }
}

#[test]
fn damage_is_taken_once() {
    let mut d = MemoryDisplay::new();
    d.add_window(WindowId(1), attrs());
    let damage = d.create_damage(WindowId(1)).unwrap();

    d.report_damage(WindowId(1), &Region::from_rect(IRect::new(0, 0, 4, 4)));
    assert_eq!(d.subtract_damage(damage).area(), 16);
    assert!(d.subtract_damage(damage).is_empty());
}

#[test]
fn vanished_windows_answer_with_defaults() {
    let mut d = MemoryDisplay::new();
    assert!(d.window_attributes(WindowId(5)).is_none());
    assert!(d.create_damage(WindowId(5)).is_none());
    assert!(d.bounding_region(WindowId(5)).is_empty());
    d.destroy_damage(DamageId(42));
    d.select_property_input(WindowId(5), true);
    assert!(!d.is_listening(WindowId(5)));
}

#[test]
fn unshaped_bounding_region_covers_the_border() {
    let mut d = MemoryDisplay::new();
    d.add_window(WindowId(1), attrs());
    let extents = d.bounding_region(WindowId(1)).extents().unwrap();
    assert_eq!(extents, IRect::new(-1, -1, 22, 12));
}

#[test]
fn removing_a_window_drops_its_damage_objects() {
    let mut d = MemoryDisplay::new();
    d.add_window(WindowId(1), attrs());
    d.create_damage(WindowId(1)).unwrap();
    assert_eq!(d.live_damage_objects(), 1);
    d.remove_window(WindowId(1));
    assert_eq!(d.live_damage_objects(), 0);
}
