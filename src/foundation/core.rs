pub use kurbo::Rect;

/// Opaque display-server window handle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct WindowId(pub u32);

/// Wall-clock time in milliseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self`, zero if `earlier` is later.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Screen dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_rect(self) -> IRect {
        IRect::new(0, 0, self.width, self.height)
    }
}

/// Integer pixel rectangle. The origin may be negative (off-screen windows).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

pub(crate) fn span(len: u32) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl IRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from half-open edges; `None` when the edges describe an empty area.
    pub fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Option<Self> {
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1.abs_diff(x0),
            height: y1.abs_diff(y0),
        })
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(span(self.width))
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(span(self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersect(&self, other: &IRect) -> Option<IRect> {
        Self::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    pub fn translate(&self, dx: i32, dy: i32) -> IRect {
        IRect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    pub fn to_kurbo(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Snap a floating-point rectangle to pixels, truncating toward zero the way
    /// integer rectangle assignment does on the display side.
    pub fn from_kurbo_trunc(rect: Rect) -> IRect {
        let x = rect.x0.trunc() as i32;
        let y = rect.y0.trunc() as i32;
        let width = rect.width().max(0.0).trunc() as u32;
        let height = rect.height().max(0.0).trunc() as u32;
        IRect::new(x, y, width, height)
    }
}

/// Window placement as reported by the display: outer position, inner size and border.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub border_width: u32,
}

impl Geometry {
    /// Bounding rectangle including the border on every side.
    pub fn bordered(&self) -> IRect {
        let border = self.border_width.saturating_mul(2);
        IRect::new(
            self.x,
            self.y,
            self.width.saturating_add(border),
            self.height.saturating_add(border),
        )
    }

    /// Screen position of the window's (0, 0) content pixel.
    pub fn content_origin(&self) -> (i32, i32) {
        let border = span(self.border_width);
        (self.x.saturating_add(border), self.y.saturating_add(border))
    }

    pub fn same_size(&self, other: &Geometry) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Fully outside the screen, so there is nothing to paint.
    pub fn is_offscreen(&self, screen: Size) -> bool {
        self.x.saturating_add(span(self.width)) < 1
            || self.y.saturating_add(span(self.height)) < 1
            || self.x >= span(screen.width)
            || self.y >= span(screen.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
