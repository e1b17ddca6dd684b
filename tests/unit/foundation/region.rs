use super::*;

fn r(x: i32, y: i32, w: u32, h: u32) -> IRect {
    IRect::new(x, y, w, h)
}

#[test]
fn union_of_overlapping_rects_counts_shared_area_once() {
    let mut region = Region::from_rect(r(0, 0, 10, 10));
    region.union_rect(r(5, 5, 10, 10));
    assert_eq!(region.area(), 100 + 100 - 25);
    assert_eq!(region.extents(), Some(r(0, 0, 15, 15)));
}

#[test]
fn union_of_contained_rect_is_noop() {
    let mut region = Region::from_rect(r(0, 0, 10, 10));
    region.union_rect(r(2, 2, 3, 3));
    assert_eq!(region.rects().len(), 1);
    assert_eq!(region.area(), 100);
}

#[test]
fn subtract_punches_a_hole() {
    let mut region = Region::from_rect(r(0, 0, 10, 10));
    region.subtract(&Region::from_rect(r(3, 3, 4, 4)));
    assert_eq!(region.area(), 100 - 16);
    assert!(!region.contains(4, 4));
    assert!(region.contains(0, 0));
    assert!(region.contains(9, 9));
    assert!(region.contains(2, 5));
    assert!(region.contains(7, 5));
}

#[test]
fn subtract_everything_leaves_empty_region() {
    let mut region = Region::from_rects([r(0, 0, 4, 4), r(10, 10, 2, 2)]);
    region.subtract(&Region::from_rect(r(-5, -5, 100, 100)));
    assert!(region.is_empty());
    assert_eq!(region.extents(), None);
}

#[test]
fn intersect_keeps_only_shared_pixels() {
    let mut a = Region::from_rects([r(0, 0, 10, 10), r(20, 0, 10, 10)]);
    let b = Region::from_rect(r(5, 0, 20, 5));
    a.intersect(&b);
    assert_eq!(a.area(), 25 + 25);
    assert!(a.contains(5, 0));
    assert!(!a.contains(12, 2));
}

#[test]
fn translate_moves_every_rect() {
    let mut region = Region::from_rects([r(0, 0, 2, 2), r(4, 4, 2, 2)]);
    region.translate(10, -1);
    assert!(region.contains(10, -1));
    assert!(region.contains(15, 4));
    assert!(!region.contains(0, 0));
}

#[test]
fn empty_rects_are_ignored() {
    let mut region = Region::new();
    region.union_rect(r(3, 3, 0, 9));
    assert!(region.is_empty());
}
