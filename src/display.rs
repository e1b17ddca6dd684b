//! Contracts with the display connection: window queries, properties, damage
//! objects, and the classified lifecycle events it delivers.

use crate::{
    foundation::{
        core::{Geometry, WindowId},
        region::Region,
    },
    window::record::WindowType,
};

/// Server-side damage tracking object for one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DamageId(pub u32);

/// Attributes fetched once when a window is first observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowAttributes {
    pub geometry: Geometry,
    #[serde(default)]
    pub viewable: bool,
    #[serde(default)]
    pub override_redirect: bool,
    /// Input-only windows have no visual and never paint.
    #[serde(default)]
    pub input_only: bool,
    /// The window's visual format carries an alpha channel.
    #[serde(default)]
    pub argb_visual: bool,
}

/// Raw value of the opacity property that means fully opaque.
pub const OPAQUE: u32 = u32::MAX;

/// Convert the raw opacity property into `[0, 1]`.
pub fn opacity_from_property(raw: u32) -> f64 {
    f64::from(raw) / f64::from(OPAQUE)
}

/// Raw property value for an opacity in `[0, 1]`.
pub fn opacity_to_property(opacity: f64) -> u32 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * f64::from(OPAQUE)).round() as u32
}

/// Queries the compositor core needs from the display connection.
///
/// Every query tolerates windows that vanished between notification and query:
/// attribute fetches return `None`, region queries return an empty region, and
/// destroy/selection calls on dead handles are silently ignored.
pub trait DisplayServer {
    fn window_attributes(&mut self, window: WindowId) -> Option<WindowAttributes>;

    /// Raw opacity property; `None` when absent.
    fn opacity_property(&mut self, window: WindowId) -> Option<u32>;

    /// Window-type hint; `None` when absent or unrecognised.
    fn window_type_property(&mut self, window: WindowId) -> Option<WindowType>;

    fn has_transient_for(&mut self, window: WindowId) -> bool;

    /// Start or stop listening for property changes on `window`.
    fn select_property_input(&mut self, window: WindowId, enabled: bool);

    fn create_damage(&mut self, window: WindowId) -> Option<DamageId>;

    fn destroy_damage(&mut self, damage: DamageId);

    /// Take the damage accumulated since the last call, in window-local coordinates.
    fn subtract_damage(&mut self, damage: DamageId) -> Region;

    /// Bounding shape of `window`, in window-local coordinates.
    fn bounding_region(&mut self, window: WindowId) -> Region;
}

/// Where a circulate request placed the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Place {
    OnTop,
    OnBottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Bounding,
    Clip,
    Input,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigureNotify {
    pub window: WindowId,
    pub geometry: Geometry,
    /// Sibling this window now sits directly above; `None` means bottom of the stack.
    pub above: Option<WindowId>,
    pub override_redirect: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeNotify {
    pub window: WindowId,
    pub kind: ShapeKind,
    pub shaped: bool,
    /// Shape extents relative to the window origin.
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Classified window-lifecycle notification, delivered in display-server order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    Create(WindowId),
    Map(WindowId),
    Unmap(WindowId),
    Configure(ConfigureNotify),
    Circulate { window: WindowId, place: Place },
    /// `gone` is true when the display has already destroyed the window.
    Destroy { window: WindowId, gone: bool },
    Reparent { window: WindowId, to_root: bool },
    Damage(WindowId),
    Shape(ShapeNotify),
    OpacityChanged(WindowId),
}
