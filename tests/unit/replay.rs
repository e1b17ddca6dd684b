use super::*;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn trace(json: &str) -> Trace {
    Trace::from_json_str(json).unwrap()
}

#[test]
fn every_step_kind_parses() {
    let t = trace(
        r#"{
            "screen": { "width": 64, "height": 48 },
            "background": [10, 20, 30, 255],
            "steps": [
                { "op": "create", "window": 1, "geometry": { "x": 0, "y": 0, "width": 8, "height": 8 },
                  "window_type": "dock", "opacity": 0.5, "argb": true },
                { "op": "map", "window": 1 },
                { "op": "damage", "window": 1, "color": [0, 255, 0, 255], "rect": { "x": 0, "y": 0, "width": 2, "height": 2 } },
                { "op": "configure", "window": 1, "geometry": { "x": 4, "y": 4, "width": 8, "height": 8, "border_width": 1 }, "above": 2 },
                { "op": "circulate", "window": 1, "place": "on_bottom" },
                { "op": "shape", "window": 1, "rects": [{ "x": 0, "y": 0, "width": 4, "height": 4 }] },
                { "op": "opacity", "window": 1, "opacity": null },
                { "op": "reparent", "window": 1, "to_root": false },
                { "op": "force_release", "window": 1 },
                { "op": "destroy", "window": 1 },
                { "op": "advance", "ms": 16 },
                { "op": "paint" }
            ]
        }"#,
    );
    assert_eq!(t.steps.len(), 12);
    assert!(t.validate().is_ok());
}

#[test]
fn validation_rejects_bad_traces() {
    let empty_screen = trace(r#"{ "screen": { "width": 0, "height": 10 }, "steps": [] }"#);
    assert!(matches!(
        empty_screen.validate(),
        Err(CompositorError::Validation(_))
    ));

    let root = trace(
        r#"{ "screen": { "width": 10, "height": 10 }, "steps": [
            { "op": "create", "window": 0, "geometry": { "x": 0, "y": 0, "width": 1, "height": 1 } }
        ] }"#,
    );
    assert!(root.validate().is_err());

    let opacity = trace(
        r#"{ "screen": { "width": 10, "height": 10 }, "steps": [
            { "op": "create", "window": 3, "geometry": { "x": 0, "y": 0, "width": 1, "height": 1 }, "opacity": 2.0 }
        ] }"#,
    );
    assert!(opacity.validate().is_err());
}

#[test]
fn mapped_window_settles_into_the_final_frame() {
    let t = trace(
        r#"{
            "screen": { "width": 40, "height": 40 },
            "steps": [
                { "op": "create", "window": 1, "geometry": { "x": 10, "y": 10, "width": 20, "height": 20 },
                  "color": [255, 0, 0, 255] },
                { "op": "map", "window": 1 },
                { "op": "advance", "ms": 300 }
            ]
        }"#,
    );
    let out = run(&t, EffectSetup::default()).unwrap();
    assert_eq!(out.elapsed_ms, 300);
    assert_eq!(out.windows, 1);
    assert!(out.frames_painted > 1);
    assert_eq!(out.frame.pixel(15, 15), Some(RED));
    assert_eq!(out.frame.pixel(5, 5), Some(BLACK));
}

#[test]
fn destroyed_window_leaves_only_frame_resources() {
    let t = trace(
        r#"{
            "screen": { "width": 40, "height": 40 },
            "steps": [
                { "op": "create", "window": 1, "geometry": { "x": 10, "y": 10, "width": 20, "height": 20 },
                  "color": [255, 0, 0, 255], "mapped": true },
                { "op": "advance", "ms": 300 },
                { "op": "destroy", "window": 1 },
                { "op": "advance", "ms": 300 }
            ]
        }"#,
    );
    let out = run(&t, EffectSetup::default()).unwrap();
    assert_eq!(out.windows, 0);
    assert_eq!(out.frame.pixel(15, 15), Some(BLACK));
    assert_eq!(out.stats.live_pixmaps(), 0);
    // back buffer and background tile
    assert_eq!(out.stats.live_pictures(), 2);
    assert_eq!(out.stats.rejected_frees, 0);
}

#[test]
fn advance_wakes_for_every_tick() {
    let t = trace(
        r#"{
            "screen": { "width": 40, "height": 40 },
            "steps": [
                { "op": "create", "window": 1, "geometry": { "x": 0, "y": 0, "width": 10, "height": 10 },
                  "window_type": "tooltip", "mapped": true },
                { "op": "advance", "ms": 30 }
            ]
        }"#,
    );
    let mut replay = Replay::new(&t, EffectSetup::default()).unwrap();
    for step in &t.steps {
        replay.apply(step);
    }
    let w = replay.compositor().window(WindowId(1)).unwrap();
    // fade at 0.03 per 3 ms tick: ten ticks in 30 ms
    assert!((w.transform.opacity - 0.3).abs() < 1e-9, "{}", w.transform.opacity);
    assert!(replay.compositor().is_animating(WindowId(1)));
}
