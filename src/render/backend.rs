use crate::foundation::{
    core::{IRect, Size, WindowId},
    region::Region,
};

/// Handle to a backing pixmap captured from a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixmapId(pub u32);

/// Handle to a compositing picture (window content, buffer, mask or fill).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PictureId(pub u32);

/// Porter-Duff operator used when compositing a picture onto another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    /// Replace destination pixels.
    Src,
    /// Source over destination.
    Over,
}

/// What a window picture reads its pixels from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drawable {
    Pixmap(PixmapId),
    /// No pixmap could be captured; read the live window instead.
    Window(WindowId),
}

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to
/// make this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Compositing capability the paint pipeline draws through.
///
/// Allocation calls return `None` on exhaustion; the pipeline then skips the
/// affected window for the frame and retries on the next damage. Freeing a
/// handle the surface does not know must be a harmless no-op.
pub trait CompositeSurface {
    /// The visible screen picture.
    fn root_picture(&self) -> PictureId;

    /// Capture the off-screen contents of `window` into a pixmap.
    fn name_window_pixmap(&mut self, window: WindowId) -> Option<PixmapId>;

    fn free_pixmap(&mut self, pixmap: PixmapId);

    /// Picture over window contents, in the window's own visual format.
    fn create_window_picture(&mut self, drawable: Drawable, argb: bool) -> Option<PictureId>;

    /// Off-screen buffer the size of the screen.
    fn create_buffer(&mut self, size: Size) -> Option<PictureId>;

    /// Repeating alpha-only picture of constant `opacity`.
    fn create_alpha_mask(&mut self, opacity: f64) -> Option<PictureId>;

    /// Repeating picture holding the desktop background.
    fn create_root_tile(&mut self) -> Option<PictureId>;

    fn free_picture(&mut self, picture: PictureId);

    /// Restrict drawing into `picture` to `clip`; `None` removes the clip.
    fn set_clip(&mut self, picture: PictureId, clip: Option<&Region>);

    /// Uniform scale applied when `picture` is used as a composite source.
    fn set_scale(&mut self, picture: PictureId, scale: f64);

    /// Composite `src` (optionally masked) onto `dst` inside `dst_rect`, honouring the
    /// destination clip. Source pixel `(0, 0)` lands on `dst_rect`'s origin.
    fn composite(
        &mut self,
        op: BlendOp,
        src: PictureId,
        mask: Option<PictureId>,
        dst: PictureId,
        dst_rect: IRect,
    );
}
