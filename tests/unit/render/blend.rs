use super::*;

#[test]
fn over_zero_coverage_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0), dst);
}

#[test]
fn over_transparent_src_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0], 255), dst);
}

#[test]
fn over_opaque_src_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over([0, 0, 0, 255], src, 255), src);
}

#[test]
fn half_coverage_blends_evenly() {
    let out = over([0, 0, 255, 255], [255, 0, 0, 255], coverage(0.5));
    assert_eq!(out[3], 255);
    assert!((126..=129).contains(&out[0]), "{out:?}");
    assert!((126..=129).contains(&out[2]), "{out:?}");
}

#[test]
fn copy_ignores_destination_when_fully_covered() {
    assert_eq!(copy([9, 9, 9, 9], [0, 0, 0, 0], 255), [0, 0, 0, 0]);
    assert_eq!(copy([9, 9, 9, 9], [50, 50, 50, 50], 0), [9, 9, 9, 9]);
}

#[test]
fn coverage_and_premultiply_endpoints() {
    assert_eq!(coverage(0.0), 0);
    assert_eq!(coverage(1.0), 255);
    assert_eq!(coverage(7.0), 255);
    assert_eq!(coverage(f64::NAN), 0);
    assert_eq!(premultiply([200, 100, 50, 255]), [200, 100, 50, 255]);
    assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
}
