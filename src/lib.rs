#![forbid(unsafe_code)]

pub mod animation;
pub mod compositor;
pub mod config;
pub mod display;
pub mod foundation;
pub mod headless;
pub mod render;
pub mod replay;
pub mod window;

pub use animation::{
    action::{ActionEngine, Completion},
    ease::Ease,
    effect::{Effect, EffectKind, EffectRegistry, EffectTable, LifecycleEvent},
};
pub use compositor::Compositor;
pub use config::{CompositorConfig, EffectSetup};
pub use display::{DisplayServer, Place, WindowAttributes, WindowEvent};
pub use foundation::{
    clock::{Clock, ManualClock, SystemClock},
    core::{Geometry, IRect, Millis, Size, WindowId},
    error::{CompositorError, CompositorResult},
    region::Region,
};
pub use headless::MemoryDisplay;
pub use render::{
    backend::{CompositeSurface, FrameRGBA},
    software::{SoftwareSurface, SurfaceStats},
};
pub use replay::{ReplayOutcome, Trace};
pub use window::record::{PaintMode, WindowType};
