//! Frame pipeline.
//!
//! Opaque windows are copied into the back buffer top-down, each one cutting
//! its shape out of the region left to paint, so nothing below an opaque
//! window is ever drawn twice. The background fills what remains. Translucent
//! windows are then blended back-to-front, each clipped to the part of the
//! damage that was still uncovered when it was visited.

use crate::{
    compositor::Compositor,
    display::DisplayServer,
    foundation::{
        core::{Geometry, IRect, Rect},
        region::Region,
    },
    render::backend::{BlendOp, CompositeSurface, Drawable, PictureId},
    window::{
        record::{PaintMode, PaintRect, Transform, Window},
        stack::WindowKey,
    },
};

/// Where a window lands on screen under `transform`.
///
/// The bordered bounds are shrunk around their center by `scale` (clamped to
/// at most 1) and shifted by the pixel offsets. The clip is that rectangle cut
/// back to the untransformed bounds: nothing is ever drawn outside them.
pub fn effect_paint_rect(geometry: &Geometry, transform: &Transform) -> PaintRect {
    let bounds = geometry.bordered();
    let scale = if transform.scale.is_finite() && transform.scale > 0.0 {
        transform.scale.min(1.0)
    } else {
        1.0
    };

    let outer = bounds.to_kurbo();
    let width = outer.width() * scale;
    let height = outer.height() * scale;
    let x0 = outer.x0 + (outer.width() - width) / 2.0 + f64::from(transform.offset_x);
    let y0 = outer.y0 + (outer.height() - height) / 2.0 + f64::from(transform.offset_y);

    let dst = IRect::from_kurbo_trunc(Rect::new(x0, y0, x0 + width, y0 + height));
    PaintRect {
        dst,
        clip: dst.intersect(&bounds),
    }
}

fn refresh_paint_rect(w: &mut Window) -> PaintRect {
    match w.paint_rect {
        Some(rect) if !w.transform.needs_effect => rect,
        _ => {
            let rect = effect_paint_rect(&w.geometry, &w.transform);
            w.paint_rect = Some(rect);
            w.transform.needs_effect = false;
            rect
        }
    }
}

impl<D: DisplayServer, S: CompositeSurface> Compositor<D, S> {
    /// Composite one frame covering `damage`.
    #[tracing::instrument(level = "trace", skip_all, fields(rects = damage.rects().len()))]
    pub(crate) fn paint(&mut self, damage: Region) {
        let root = self.surface.root_picture();
        let buffer = self.back_buffer().unwrap_or_else(|| {
            tracing::warn!("back buffer unavailable, painting straight to the screen");
            root
        });

        let mut region = damage.clone();
        region.intersect_rect(self.screen.to_rect());
        let clip_changed = std::mem::take(&mut self.clip_changed);

        let mut blended = Vec::new();
        for key in self.stack.keys_top_down() {
            if self.paint_opaque(key, buffer, &mut region, clip_changed) {
                blended.push(key);
            }
        }

        self.surface.set_clip(buffer, Some(&region));
        self.paint_background(buffer);

        // keys were collected top-down; blend bottom-up
        for key in blended.into_iter().rev() {
            self.paint_blended(key, buffer);
        }
        self.surface.set_clip(buffer, None);

        if buffer != root {
            self.surface.set_clip(root, Some(&damage));
            self.surface.composite(
                BlendOp::Src,
                buffer,
                None,
                root,
                self.screen.to_rect(),
            );
            self.surface.set_clip(root, None);
        }
    }

    fn back_buffer(&mut self) -> Option<PictureId> {
        if self.root_buffer.is_none() {
            self.root_buffer = self.surface.create_buffer(self.screen);
        }
        self.root_buffer
    }

    fn paint_background(&mut self, buffer: PictureId) {
        if self.root_tile.is_none() {
            self.root_tile = self.surface.create_root_tile();
        }
        match self.root_tile {
            Some(tile) => {
                self.surface
                    .composite(BlendOp::Src, tile, None, buffer, self.screen.to_rect())
            }
            None => tracing::warn!("background tile unavailable"),
        }
    }

    /// First pass for one window. Solid windows are copied and cut out of
    /// `region`; returns whether the window takes part in the blended pass.
    fn paint_opaque(
        &mut self,
        key: WindowKey,
        buffer: PictureId,
        region: &mut Region,
        clip_changed: bool,
    ) -> bool {
        let screen = self.screen;
        let Some(w) = self.stack.get_mut(key) else {
            return false;
        };
        if !w.damaged || w.input_only || w.geometry.is_offscreen(screen) {
            return false;
        }
        if !w.viewable && w.pixmap.is_none() {
            return false;
        }

        if w.pixmap.is_none() {
            w.pixmap = self.surface.name_window_pixmap(w.id);
        }
        if w.picture.is_none() {
            let drawable = w.pixmap.map_or(Drawable::Window(w.id), Drawable::Pixmap);
            w.picture = self
                .surface
                .create_window_picture(drawable, w.argb_visual);
        }
        let Some(picture) = w.picture else {
            tracing::warn!(window = w.id.0, "no picture for window, skipped this frame");
            return false;
        };

        if clip_changed {
            w.invalidate_regions();
        }
        if w.border_size.is_none() {
            let mut shape = self.display.bounding_region(w.id);
            if shape.is_empty() && !w.shaped {
                // destroyed server-side while its exit animation runs
                w.border_size = Some(w.extents_region());
            } else {
                let (x, y) = w.geometry.content_origin();
                shape.translate(x, y);
                w.border_size = Some(shape);
            }
        }
        if w.extents.is_none() {
            w.extents = Some(w.extents_region());
        }

        let rect = refresh_paint_rect(w);
        if w.mode == PaintMode::Solid {
            let mut clip = region.clone();
            if let Some(shape) = &w.border_size {
                clip.intersect(shape);
                region.subtract(shape);
            }
            self.surface.set_clip(buffer, Some(&clip));
            self.surface.set_scale(picture, 1.0);
            self.surface
                .composite(BlendOp::Src, picture, None, buffer, rect.dst);
        }
        w.border_clip = Some(region.clone());
        true
    }

    /// Second pass for one window: blend it over everything below.
    fn paint_blended(&mut self, key: WindowKey, buffer: PictureId) {
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        let Some(mut clip) = w.border_clip.take() else {
            return;
        };
        if w.alpha_mask_stale || w.transform.opacity >= 1.0 {
            if let Some(mask) = w.alpha_mask.take() {
                self.surface.free_picture(mask);
            }
            w.alpha_mask_stale = false;
        }
        if w.mode == PaintMode::Solid {
            return;
        }
        let Some(picture) = w.picture else {
            return;
        };
        if let Some(shape) = &w.border_size {
            clip.intersect(shape);
        }
        let rect = refresh_paint_rect(w);
        match rect.clip {
            Some(bounds) => clip.intersect_rect(bounds),
            None => return,
        }
        if clip.is_empty() {
            return;
        }

        if w.transform.opacity < 1.0 && w.alpha_mask.is_none() {
            w.alpha_mask = self.surface.create_alpha_mask(w.transform.opacity);
            if w.alpha_mask.is_none() {
                tracing::warn!(window = w.id.0, "no alpha mask for window, skipped this frame");
                return;
            }
        }

        tracing::trace!(
            window = w.id.0,
            opacity = w.transform.opacity,
            scale = w.transform.scale,
            "blending window"
        );
        self.surface.set_clip(buffer, Some(&clip));
        self.surface.set_scale(picture, w.transform.scale.min(1.0));
        self.surface
            .composite(BlendOp::Over, picture, w.alpha_mask, buffer, rect.dst);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
