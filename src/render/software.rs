//! In-memory implementation of the compositing capability.
//!
//! Pictures are premultiplied RGBA8. Window contents are registered per window
//! id and captured into pixmaps by value, so a pixmap keeps showing what the
//! window looked like when it was named, the way an off-screen backing store does.

use std::collections::HashMap;

use crate::{
    foundation::{
        core::{IRect, Size, WindowId},
        region::Region,
    },
    render::{
        backend::{BlendOp, CompositeSurface, Drawable, FrameRGBA, PictureId, PixmapId},
        blend::{self, PremulRgba8, TRANSPARENT},
    },
};

/// Allocation bookkeeping, used to verify that resources are released exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub pixmaps_created: u64,
    pub pixmaps_freed: u64,
    pub pictures_created: u64,
    pub pictures_freed: u64,
    /// Frees of handles that were never issued or were already released.
    pub rejected_frees: u64,
    pub failed_allocations: u64,
    pub composites: u64,
}

impl SurfaceStats {
    pub fn live_pixmaps(&self) -> u64 {
        self.pixmaps_created.saturating_sub(self.pixmaps_freed)
    }

    pub fn live_pictures(&self) -> u64 {
        self.pictures_created.saturating_sub(self.pictures_freed)
    }
}

#[derive(Clone, Debug, Default)]
struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    fn filled(width: u32, height: u32, px: PremulRgba8) -> Self {
        let len = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
        }
    }

    fn bounds(&self) -> IRect {
        IRect::new(0, 0, self.width, self.height)
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        Some(idx * 4)
    }

    fn get(&self, x: i64, y: i64) -> Option<PremulRgba8> {
        let i = self.offset(x, y)?;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn put(&mut self, x: i64, y: i64, px: PremulRgba8) {
        if let Some(i) = self.offset(x, y) {
            if let Some(dst) = self.data.get_mut(i..i + 4) {
                dst.copy_from_slice(&px);
            }
        }
    }

    fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }
}

#[derive(Debug)]
enum Content {
    /// Drawable pixels: the root, off-screen buffers.
    Image(Image),
    Window { drawable: Drawable, argb: bool },
    /// Infinite repeat of one pixel: background tiles and alpha masks.
    Solid(PremulRgba8),
}

#[derive(Debug)]
struct Picture {
    content: Content,
    clip: Option<Region>,
    scale: f64,
}

impl Picture {
    fn new(content: Content) -> Self {
        Self {
            content,
            clip: None,
            scale: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct SoftwareSurface {
    background: PremulRgba8,
    windows: HashMap<WindowId, Image>,
    pixmaps: HashMap<PixmapId, Image>,
    pictures: HashMap<PictureId, Picture>,
    root: PictureId,
    next_id: u32,
    fail_allocations: bool,
    stats: SurfaceStats,
}

impl SoftwareSurface {
    /// A screen of `screen` size whose desktop background is the straight-alpha `background`.
    pub fn new(screen: Size, background: [u8; 4]) -> Self {
        let root = PictureId(0);
        let mut pictures = HashMap::new();
        pictures.insert(
            root,
            Picture::new(Content::Image(Image::filled(
                screen.width,
                screen.height,
                TRANSPARENT,
            ))),
        );
        Self {
            background: blend::premultiply(background),
            windows: HashMap::new(),
            pixmaps: HashMap::new(),
            pictures,
            root,
            next_id: 1,
            fail_allocations: false,
            stats: SurfaceStats::default(),
        }
    }

    /// Give `window` uniform contents of the straight-alpha color `rgba`.
    pub fn set_window_content(&mut self, window: WindowId, size: Size, rgba: [u8; 4]) {
        self.windows.insert(
            window,
            Image::filled(size.width, size.height, blend::premultiply(rgba)),
        );
    }

    pub fn remove_window_content(&mut self, window: WindowId) {
        self.windows.remove(&window);
    }

    /// Replace the visible screen with a blank one of the new size.
    pub fn resize_screen(&mut self, screen: Size) {
        if let Some(root) = self.pictures.get_mut(&self.root) {
            root.content = Content::Image(Image::filled(screen.width, screen.height, TRANSPARENT));
            root.clip = None;
        }
    }

    /// Make every subsequent allocation fail until switched off again.
    pub fn set_fail_allocations(&mut self, fail: bool) {
        self.fail_allocations = fail;
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Pixels of a drawable picture; `None` for unknown ids and non-drawable pictures.
    pub fn readback(&self, picture: PictureId) -> Option<FrameRGBA> {
        match &self.pictures.get(&picture)?.content {
            Content::Image(img) => Some(img.to_frame()),
            _ => None,
        }
    }

    /// The visible screen.
    pub fn root_frame(&self) -> FrameRGBA {
        self.readback(self.root).unwrap_or(FrameRGBA {
            width: 0,
            height: 0,
            data: Vec::new(),
            premultiplied: true,
        })
    }

    fn allocate(&mut self) -> Option<u32> {
        if self.fail_allocations {
            self.stats.failed_allocations += 1;
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        Some(id)
    }

    fn add_picture(&mut self, content: Content) -> Option<PictureId> {
        let id = PictureId(self.allocate()?);
        self.pictures.insert(id, Picture::new(content));
        self.stats.pictures_created += 1;
        Some(id)
    }

    fn sample(&self, picture: &Picture, x: i64, y: i64) -> PremulRgba8 {
        match &picture.content {
            Content::Image(img) => img.get(x, y).unwrap_or(TRANSPARENT),
            Content::Solid(px) => *px,
            Content::Window { drawable, argb } => {
                let source = match drawable {
                    Drawable::Pixmap(p) => self.pixmaps.get(p),
                    Drawable::Window(w) => self.windows.get(w),
                };
                match source.and_then(|img| img.get(x, y)) {
                    // opaque visuals carry no alpha
                    Some([r, g, b, _]) if !argb => [r, g, b, 255],
                    Some(px) => px,
                    None => TRANSPARENT,
                }
            }
        }
    }
}

impl CompositeSurface for SoftwareSurface {
    fn root_picture(&self) -> PictureId {
        self.root
    }

    fn name_window_pixmap(&mut self, window: WindowId) -> Option<PixmapId> {
        let id = PixmapId(self.allocate()?);
        let snapshot = self.windows.get(&window).cloned().unwrap_or_default();
        self.pixmaps.insert(id, snapshot);
        self.stats.pixmaps_created += 1;
        Some(id)
    }

    fn free_pixmap(&mut self, pixmap: PixmapId) {
        if self.pixmaps.remove(&pixmap).is_some() {
            self.stats.pixmaps_freed += 1;
        } else {
            tracing::warn!(?pixmap, "free of unknown pixmap ignored");
            self.stats.rejected_frees += 1;
        }
    }

    fn create_window_picture(&mut self, drawable: Drawable, argb: bool) -> Option<PictureId> {
        self.add_picture(Content::Window { drawable, argb })
    }

    fn create_buffer(&mut self, size: Size) -> Option<PictureId> {
        self.add_picture(Content::Image(Image::filled(
            size.width,
            size.height,
            TRANSPARENT,
        )))
    }

    fn create_alpha_mask(&mut self, opacity: f64) -> Option<PictureId> {
        self.add_picture(Content::Solid([0, 0, 0, blend::coverage(opacity)]))
    }

    fn create_root_tile(&mut self) -> Option<PictureId> {
        self.add_picture(Content::Solid(self.background))
    }

    fn free_picture(&mut self, picture: PictureId) {
        if picture != self.root && self.pictures.remove(&picture).is_some() {
            self.stats.pictures_freed += 1;
        } else {
            tracing::warn!(?picture, "free of unknown picture ignored");
            self.stats.rejected_frees += 1;
        }
    }

    fn set_clip(&mut self, picture: PictureId, clip: Option<&Region>) {
        if let Some(p) = self.pictures.get_mut(&picture) {
            p.clip = clip.cloned();
        }
    }

    fn set_scale(&mut self, picture: PictureId, scale: f64) {
        if let Some(p) = self.pictures.get_mut(&picture) {
            p.scale = if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                1.0
            };
        }
    }

    fn composite(
        &mut self,
        op: BlendOp,
        src: PictureId,
        mask: Option<PictureId>,
        dst: PictureId,
        dst_rect: IRect,
    ) {
        self.stats.composites += 1;
        if src == dst {
            tracing::warn!(?src, "composite onto itself ignored");
            return;
        }
        let Some(mut target) = self.pictures.remove(&dst) else {
            tracing::warn!(?dst, "composite into unknown picture ignored");
            return;
        };

        if let Content::Image(img) = &mut target.content {
            match self.pictures.get(&src) {
                Some(source) => {
                    let mask = mask.and_then(|m| self.pictures.get(&m));
                    let areas = match (&target.clip, dst_rect.intersect(&img.bounds())) {
                        (_, None) => Vec::new(),
                        (None, Some(area)) => vec![area],
                        (Some(clip), Some(area)) => {
                            let mut clip = clip.clone();
                            clip.intersect_rect(area);
                            clip.rects().to_vec()
                        }
                    };
                    for area in areas {
                        self.blend_area(op, source, mask, img, dst_rect, area);
                    }
                }
                None => tracing::warn!(?src, "composite from unknown picture ignored"),
            }
        } else {
            tracing::warn!(?dst, "composite into a non-drawable picture ignored");
        }

        self.pictures.insert(dst, target);
    }
}

impl SoftwareSurface {
    fn blend_area(
        &self,
        op: BlendOp,
        source: &Picture,
        mask: Option<&Picture>,
        img: &mut Image,
        dst_rect: IRect,
        area: IRect,
    ) {
        let scale = source.scale;
        for y in area.y..area.bottom() {
            let ly = i64::from(y) - i64::from(dst_rect.y);
            let sy = (ly as f64 / scale).floor() as i64;
            for x in area.x..area.right() {
                let lx = i64::from(x) - i64::from(dst_rect.x);
                let sx = (lx as f64 / scale).floor() as i64;

                let px = self.sample(source, sx, sy);
                let cov = mask.map_or(255, |m| self.sample(m, lx, ly)[3]);
                let Some(under) = img.get(i64::from(x), i64::from(y)) else {
                    continue;
                };
                let out = match op {
                    BlendOp::Src => blend::copy(under, px, cov),
                    BlendOp::Over => blend::over(under, px, cov),
                };
                img.put(i64::from(x), i64::from(y), out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/software.rs"]
mod tests;
