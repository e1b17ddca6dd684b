use crate::{
    display::{DamageId, WindowAttributes},
    foundation::{
        core::{Geometry, IRect, WindowId},
        region::Region,
    },
    render::backend::{PictureId, PixmapId},
};

/// Window classification, as advertised by the window-type hint.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum WindowType {
    Desktop,
    Dock,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Dialog,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Combo,
    Dnd,
    Normal,
}

impl WindowType {
    pub const COUNT: usize = 14;

    pub const ALL: [WindowType; Self::COUNT] = [
        Self::Desktop,
        Self::Dock,
        Self::Toolbar,
        Self::Menu,
        Self::Utility,
        Self::Splash,
        Self::Dialog,
        Self::DropdownMenu,
        Self::PopupMenu,
        Self::Tooltip,
        Self::Notification,
        Self::Combo,
        Self::Dnd,
        Self::Normal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Dock => "dock",
            Self::Toolbar => "toolbar",
            Self::Menu => "menu",
            Self::Utility => "utility",
            Self::Splash => "splash",
            Self::Dialog => "dialog",
            Self::DropdownMenu => "dropdown-menu",
            Self::PopupMenu => "popup-menu",
            Self::Tooltip => "tooltip",
            Self::Notification => "notification",
            Self::Combo => "combo",
            Self::Dnd => "dnd",
            Self::Normal => "normal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Classify a window: the explicit hint wins; otherwise transient and
    /// override-redirect windows are dialogs and everything else is normal.
    pub fn classify(hint: Option<WindowType>, transient_for: bool, override_redirect: bool) -> Self {
        match hint {
            Some(t) => t,
            None if transient_for || override_redirect => Self::Dialog,
            None => Self::Normal,
        }
    }
}

/// How a window is blended into the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    /// Fully opaque, painted with source-copy in the first pass.
    Solid,
    /// Opaque format at partial opacity.
    Translucent,
    /// Per-pixel alpha visual.
    AlphaChannel,
}

/// Visual transform written by effects and read by the paint pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// In `[0, 1]`.
    pub opacity: f64,
    /// In `(0, 1]`; `1.0` means unscaled.
    pub scale: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Paint rectangle must be recomputed before the next paint.
    pub needs_effect: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
            needs_effect: false,
        }
    }
}

/// Destination and clip of a window on screen after its transform is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintRect {
    /// Where the (possibly scaled) window content lands.
    pub dst: IRect,
    /// `dst` cut back to the window's untransformed bounds; `None` when nothing remains.
    pub clip: Option<IRect>,
}

#[derive(Debug)]
pub struct Window {
    pub id: WindowId,
    pub geometry: Geometry,
    pub window_type: WindowType,
    pub override_redirect: bool,
    pub input_only: bool,
    pub argb_visual: bool,
    pub viewable: bool,

    pub mode: PaintMode,
    pub transform: Transform,
    /// An action is driving the transform; solid windows paint in the blended pass meanwhile.
    pub animating: bool,

    pub damaged: bool,
    pub damage: Option<DamageId>,
    pub pixmap: Option<PixmapId>,
    pub picture: Option<PictureId>,
    pub alpha_mask: Option<PictureId>,
    /// Mode was recomputed since `alpha_mask` was built.
    pub alpha_mask_stale: bool,

    pub extents: Option<Region>,
    pub border_size: Option<Region>,
    pub border_clip: Option<Region>,
    pub paint_rect: Option<PaintRect>,

    pub shaped: bool,
    pub shape_bounds: IRect,
}

impl Window {
    pub fn new(id: WindowId, attrs: &WindowAttributes, window_type: WindowType) -> Self {
        let g = attrs.geometry;
        Self {
            id,
            geometry: g,
            window_type,
            override_redirect: attrs.override_redirect,
            input_only: attrs.input_only,
            argb_visual: attrs.argb_visual,
            viewable: false,
            mode: PaintMode::Solid,
            transform: Transform::default(),
            animating: false,
            damaged: false,
            damage: None,
            pixmap: None,
            picture: None,
            alpha_mask: None,
            alpha_mask_stale: false,
            extents: None,
            border_size: None,
            border_clip: None,
            paint_rect: None,
            shaped: false,
            shape_bounds: IRect::new(g.x, g.y, g.width, g.height),
        }
    }

    /// Bordered bounding rectangle as a region.
    pub fn extents_region(&self) -> Region {
        Region::from_rect(self.geometry.bordered())
    }

    /// Re-derive the paint mode from visual format and opacity.
    ///
    /// The cached alpha mask is marked stale, and the last known extents are
    /// returned so the caller can damage them.
    pub fn determine_mode(&mut self) -> Option<Region> {
        if self.alpha_mask.is_some() {
            self.alpha_mask_stale = true;
        }
        self.mode = if self.argb_visual && !self.input_only {
            PaintMode::AlphaChannel
        } else if self.transform.opacity < 1.0 {
            PaintMode::Translucent
        } else {
            PaintMode::Solid
        };
        self.extents.clone()
    }

    /// Mode while an action runs: solid windows must blend over what lies below
    /// them, because the transformed content no longer covers its bounds.
    pub fn promote_while_animating(&mut self) {
        if self.mode == PaintMode::Solid {
            self.mode = PaintMode::AlphaChannel;
        }
    }

    /// Drop every cached region; they are rebuilt lazily on the next paint.
    pub fn invalidate_regions(&mut self) {
        self.border_size = None;
        self.extents = None;
        self.border_clip = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/window/record.rs"]
mod tests;
