use super::*;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn surface() -> SoftwareSurface {
    SoftwareSurface::new(Size::new(8, 8), [0, 0, 0, 255])
}

fn window_picture(s: &mut SoftwareSurface, id: u32, size: Size, rgba: [u8; 4]) -> PictureId {
    s.set_window_content(WindowId(id), size, rgba);
    let pixmap = s.name_window_pixmap(WindowId(id)).unwrap();
    s.create_window_picture(Drawable::Pixmap(pixmap), false)
        .unwrap()
}

#[test]
fn source_copy_lands_at_the_destination_origin() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(8, 8)).unwrap();
    let pic = window_picture(&mut s, 1, Size::new(2, 2), RED);

    s.composite(BlendOp::Src, pic, None, buffer, IRect::new(3, 3, 2, 2));
    let frame = s.readback(buffer).unwrap();
    assert_eq!(frame.pixel(3, 3), Some(RED));
    assert_eq!(frame.pixel(4, 4), Some(RED));
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 0]));
}

#[test]
fn clip_limits_the_written_pixels() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(8, 8)).unwrap();
    let pic = window_picture(&mut s, 1, Size::new(8, 8), RED);

    s.set_clip(buffer, Some(&Region::from_rect(IRect::new(0, 0, 4, 8))));
    s.composite(BlendOp::Src, pic, None, buffer, IRect::new(0, 0, 8, 8));
    let frame = s.readback(buffer).unwrap();
    assert_eq!(frame.pixel(3, 0), Some(RED));
    assert_eq!(frame.pixel(4, 0), Some([0, 0, 0, 0]));
}

#[test]
fn alpha_mask_blends_over_destination() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(8, 8)).unwrap();
    let bottom = window_picture(&mut s, 1, Size::new(8, 8), BLUE);
    let top = window_picture(&mut s, 2, Size::new(8, 8), RED);
    let mask = s.create_alpha_mask(0.5).unwrap();

    let rect = IRect::new(0, 0, 8, 8);
    s.composite(BlendOp::Src, bottom, None, buffer, rect);
    s.composite(BlendOp::Over, top, Some(mask), buffer, rect);

    let [r, g, b, a] = s.readback(buffer).unwrap().pixel(0, 0).unwrap();
    assert_eq!((g, a), (0, 255));
    assert!(r.abs_diff(128) <= 1 && b.abs_diff(127) <= 1, "{r} {b}");
}

#[test]
fn downscaled_source_samples_nearest_pixel() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(8, 8)).unwrap();
    let pic = window_picture(&mut s, 1, Size::new(4, 4), RED);
    s.set_scale(pic, 0.5);

    s.composite(BlendOp::Over, pic, None, buffer, IRect::new(0, 0, 4, 4));
    let frame = s.readback(buffer).unwrap();
    assert_eq!(frame.pixel(1, 1), Some(RED));
    // a 4x4 source at half scale covers only 2x2
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn opaque_visual_ignores_content_alpha() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(2, 2)).unwrap();
    s.set_window_content(WindowId(1), Size::new(2, 2), [255, 255, 255, 0]);
    let pic = s
        .create_window_picture(Drawable::Window(WindowId(1)), false)
        .unwrap();
    s.composite(BlendOp::Src, pic, None, buffer, IRect::new(0, 0, 2, 2));
    assert_eq!(s.readback(buffer).unwrap().pixel(0, 0).map(|p| p[3]), Some(255));
}

#[test]
fn pixmaps_snapshot_contents() {
    let mut s = surface();
    let buffer = s.create_buffer(Size::new(2, 2)).unwrap();
    let pic = window_picture(&mut s, 1, Size::new(2, 2), RED);
    s.set_window_content(WindowId(1), Size::new(2, 2), BLUE);

    s.composite(BlendOp::Src, pic, None, buffer, IRect::new(0, 0, 2, 2));
    assert_eq!(s.readback(buffer).unwrap().pixel(0, 0), Some(RED));
}

#[test]
fn failed_allocations_are_counted_and_recoverable() {
    let mut s = surface();
    s.set_fail_allocations(true);
    assert!(s.create_buffer(Size::new(4, 4)).is_none());
    assert!(s.name_window_pixmap(WindowId(1)).is_none());
    assert_eq!(s.stats().failed_allocations, 2);

    s.set_fail_allocations(false);
    assert!(s.create_alpha_mask(0.3).is_some());
    assert_eq!(s.stats().live_pictures(), 1);
}

#[test]
fn unknown_and_repeated_frees_are_rejected() {
    let mut s = surface();
    let tile = s.create_root_tile().unwrap();
    s.free_picture(tile);
    s.free_picture(tile);
    s.free_picture(s.root_picture());
    s.free_pixmap(PixmapId(77));

    let stats = s.stats();
    assert_eq!(stats.pictures_freed, 1);
    assert_eq!(stats.rejected_frees, 3);
    assert_eq!(s.root_frame().width, 8);
}
