//! Headless trace replay.
//!
//! A trace is a JSON script of display-side changes and clock advances. Each
//! change is applied to a [`MemoryDisplay`] and delivered to the compositor as
//! the matching notification; clock advances run the same loop a live session
//! does: sleep until the next animation tick, pump, paint.

use std::{collections::HashMap, io::Read};

use crate::{
    compositor::Compositor,
    config::EffectSetup,
    display::{
        ConfigureNotify, Place, ShapeKind, ShapeNotify, WindowAttributes, WindowEvent,
        opacity_to_property,
    },
    foundation::{
        clock::{Clock, ManualClock},
        core::{Geometry, IRect, Millis, Size, WindowId},
        error::{CompositorError, CompositorResult},
        region::Region,
    },
    headless::MemoryDisplay,
    render::{
        backend::FrameRGBA,
        software::{SoftwareSurface, SurfaceStats},
    },
    window::record::WindowType,
};

/// Window id the replay uses for the root window.
pub const ROOT: WindowId = WindowId(0);

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Trace {
    pub screen: Size,
    /// Straight-alpha desktop color.
    #[serde(default = "default_background")]
    pub background: [u8; 4],
    #[serde(default)]
    pub start_ms: u64,
    pub steps: Vec<Step>,
}

fn default_background() -> [u8; 4] {
    [0, 0, 0, 255]
}

fn default_color() -> [u8; 4] {
    WHITE
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create {
        window: WindowId,
        geometry: Geometry,
        /// Straight-alpha fill of the window contents.
        #[serde(default = "default_color")]
        color: [u8; 4],
        #[serde(default)]
        window_type: Option<WindowType>,
        #[serde(default)]
        opacity: Option<f64>,
        #[serde(default)]
        override_redirect: bool,
        #[serde(default)]
        transient_for: bool,
        #[serde(default)]
        argb: bool,
        #[serde(default)]
        input_only: bool,
        /// Already viewable when first observed.
        #[serde(default)]
        mapped: bool,
    },
    Map {
        window: WindowId,
    },
    Unmap {
        window: WindowId,
    },
    Configure {
        window: WindowId,
        geometry: Geometry,
        #[serde(default)]
        above: Option<WindowId>,
    },
    Circulate {
        window: WindowId,
        place: Place,
    },
    /// The client drew: optionally new contents, over `rect` (window-local) or everything.
    Damage {
        window: WindowId,
        #[serde(default)]
        color: Option<[u8; 4]>,
        #[serde(default)]
        rect: Option<IRect>,
    },
    /// Window-local bounding shape; `None` or empty removes it.
    Shape {
        window: WindowId,
        #[serde(default)]
        rects: Option<Vec<IRect>>,
    },
    Opacity {
        window: WindowId,
        opacity: Option<f64>,
    },
    Destroy {
        window: WindowId,
    },
    Reparent {
        window: WindowId,
        to_root: bool,
    },
    ForceRelease {
        window: WindowId,
    },
    Advance {
        ms: u64,
    },
    Paint,
}

impl Trace {
    pub fn from_json_str(s: &str) -> CompositorResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader(r: impl Read) -> CompositorResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn validate(&self) -> CompositorResult<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(CompositorError::validation("screen width/height must be > 0"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Step::Create {
                window, opacity, ..
            } = step
            {
                if *window == ROOT {
                    return Err(CompositorError::validation(format!(
                        "step {i}: window {} is reserved for the root",
                        ROOT.0
                    )));
                }
                if opacity.is_some_and(|o| !(0.0..=1.0).contains(&o)) {
                    return Err(CompositorError::validation(format!(
                        "step {i}: opacity must be within [0, 1]"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Result of a replay.
#[derive(Clone, Debug)]
pub struct ReplayOutcome {
    pub frame: FrameRGBA,
    pub frames_painted: usize,
    pub elapsed_ms: u64,
    pub windows: usize,
    pub stats: SurfaceStats,
}

pub struct Replay {
    compositor: Compositor<MemoryDisplay, SoftwareSurface>,
    clock: ManualClock,
    colors: HashMap<WindowId, [u8; 4]>,
    start: Millis,
    frames_painted: usize,
}

impl Replay {
    pub fn new(trace: &Trace, setup: EffectSetup) -> CompositorResult<Self> {
        trace.validate()?;
        let start = Millis(trace.start_ms);
        let clock = ManualClock::new(start);
        let compositor = Compositor::new(
            MemoryDisplay::new(),
            SoftwareSurface::new(trace.screen, trace.background),
            clock.clone(),
            setup,
            ROOT,
            trace.screen,
        );
        Ok(Self {
            compositor,
            clock,
            colors: HashMap::new(),
            start,
            frames_painted: 0,
        })
    }

    pub fn compositor(&self) -> &Compositor<MemoryDisplay, SoftwareSurface> {
        &self.compositor
    }

    /// Apply every step, then paint whatever damage is left.
    #[tracing::instrument(level = "debug", skip_all, fields(steps = trace.steps.len()))]
    pub fn run(mut self, trace: &Trace) -> ReplayOutcome {
        for step in &trace.steps {
            self.apply(step);
        }
        self.paint();
        let surface = self.compositor.surface();
        ReplayOutcome {
            frame: surface.root_frame(),
            frames_painted: self.frames_painted,
            elapsed_ms: self.clock.now().since(self.start),
            windows: self.compositor.stack().len(),
            stats: surface.stats(),
        }
    }

    pub fn apply(&mut self, step: &Step) {
        tracing::trace!(?step, "replay step");
        match step {
            Step::Create {
                window,
                geometry,
                color,
                window_type,
                opacity,
                override_redirect,
                transient_for,
                argb,
                input_only,
                mapped,
            } => {
                let display = self.compositor.display_mut();
                display.add_window(
                    *window,
                    WindowAttributes {
                        geometry: *geometry,
                        viewable: *mapped,
                        override_redirect: *override_redirect,
                        input_only: *input_only,
                        argb_visual: *argb,
                    },
                );
                display.set_window_type(*window, *window_type);
                display.set_transient_for(*window, *transient_for);
                display.set_opacity(*window, opacity.map(opacity_to_property));
                self.set_color(*window, *color);
                self.compositor.handle_event(WindowEvent::Create(*window));
                if *mapped {
                    self.expose(*window);
                }
            }
            Step::Map { window } => {
                self.compositor.display_mut().set_viewable(*window, true);
                self.compositor.handle_event(WindowEvent::Map(*window));
                self.expose(*window);
            }
            Step::Unmap { window } => {
                self.compositor.display_mut().set_viewable(*window, false);
                self.compositor.handle_event(WindowEvent::Unmap(*window));
            }
            Step::Configure {
                window,
                geometry,
                above,
            } => self.configure(*window, *geometry, *above),
            Step::Circulate { window, place } => {
                self.compositor.handle_event(WindowEvent::Circulate {
                    window: *window,
                    place: *place,
                });
            }
            Step::Damage {
                window,
                color,
                rect,
            } => {
                if let Some(color) = color {
                    self.set_color(*window, *color);
                }
                let display = self.compositor.display_mut();
                match rect {
                    Some(rect) => display.report_damage(*window, &Region::from_rect(*rect)),
                    None => display.report_full_damage(*window),
                }
                self.compositor.handle_event(WindowEvent::Damage(*window));
            }
            Step::Shape { window, rects } => self.shape(*window, rects.as_deref()),
            Step::Opacity { window, opacity } => {
                self.compositor
                    .display_mut()
                    .set_opacity(*window, opacity.map(opacity_to_property));
                self.compositor
                    .handle_event(WindowEvent::OpacityChanged(*window));
            }
            Step::Destroy { window } => {
                self.compositor.display_mut().remove_window(*window);
                self.compositor.surface_mut().remove_window_content(*window);
                self.colors.remove(window);
                self.compositor.handle_event(WindowEvent::Destroy {
                    window: *window,
                    gone: true,
                });
            }
            Step::Reparent { window, to_root } => {
                self.compositor.handle_event(WindowEvent::Reparent {
                    window: *window,
                    to_root: *to_root,
                });
            }
            Step::ForceRelease { window } => self.compositor.force_release(*window),
            Step::Advance { ms } => self.advance(*ms),
            Step::Paint => self.paint(),
        }
    }

    /// Let `ms` pass, waking for every animation tick that falls inside it.
    pub fn advance(&mut self, ms: u64) {
        let target = self.clock.now().saturating_add(ms);
        while let Some(wait) = self.compositor.time_until_next_animation_event() {
            let wake = self
                .clock
                .now()
                .saturating_add(u64::try_from(wait.as_millis()).unwrap_or(u64::MAX));
            if wake > target {
                break;
            }
            self.clock.set(wake);
            self.compositor.pump_animations();
            self.paint();
        }
        self.clock.set(target);
        self.compositor.pump_animations();
        self.paint();
    }

    fn paint(&mut self) {
        if self.compositor.paint_due_region() {
            self.frames_painted += 1;
        }
    }

    fn set_color(&mut self, window: WindowId, color: [u8; 4]) {
        self.colors.insert(window, color);
        let Some(attrs) = self.compositor.display().attributes(window) else {
            return;
        };
        let bordered = attrs.geometry.bordered();
        self.compositor.surface_mut().set_window_content(
            window,
            Size::new(bordered.width, bordered.height),
            color,
        );
    }

    /// The server damages a window in full once it becomes visible.
    fn expose(&mut self, window: WindowId) {
        self.compositor.display_mut().report_full_damage(window);
        self.compositor.handle_event(WindowEvent::Damage(window));
    }

    fn configure(&mut self, window: WindowId, geometry: Geometry, above: Option<WindowId>) {
        if window == ROOT {
            let screen = Size::new(geometry.width, geometry.height);
            self.compositor.surface_mut().resize_screen(screen);
            self.compositor
                .handle_event(WindowEvent::Configure(ConfigureNotify {
                    window,
                    geometry,
                    above: None,
                    override_redirect: false,
                }));
            return;
        }
        let Some(old) = self.compositor.display().attributes(window) else {
            return;
        };
        self.compositor.display_mut().set_geometry(window, geometry);
        let resized = !old.geometry.same_size(&geometry)
            || old.geometry.border_width != geometry.border_width;
        if resized {
            let color = self.colors.get(&window).copied().unwrap_or(WHITE);
            self.set_color(window, color);
        }
        self.compositor
            .handle_event(WindowEvent::Configure(ConfigureNotify {
                window,
                geometry,
                above,
                override_redirect: old.override_redirect,
            }));
        if resized && old.viewable {
            self.expose(window);
        }
    }

    fn shape(&mut self, window: WindowId, rects: Option<&[IRect]>) {
        let shape = rects
            .map(|r| Region::from_rects(r.iter().copied()))
            .filter(|r| !r.is_empty());
        let bounds = shape.as_ref().and_then(Region::extents);
        self.compositor
            .display_mut()
            .set_shape(window, shape.clone());
        let bounds = bounds.unwrap_or_default();
        self.compositor.handle_event(WindowEvent::Shape(ShapeNotify {
            window,
            kind: ShapeKind::Bounding,
            shaped: shape.is_some(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }));
    }
}

/// Replay `trace` from start to finish and return the last frame.
pub fn run(trace: &Trace, setup: EffectSetup) -> CompositorResult<ReplayOutcome> {
    Ok(Replay::new(trace, setup)?.run(trace))
}

#[cfg(test)]
#[path = "../tests/unit/replay.rs"]
mod tests;
