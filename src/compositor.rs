//! The compositor context: every piece of per-session state, owned in one place
//! and threaded through lifecycle handling, animation and painting.

use std::time::Duration;

use crate::{
    animation::action::{ActionEngine, Completion, Finished},
    config::EffectSetup,
    display::{DisplayServer, WindowEvent},
    foundation::{
        clock::Clock,
        core::{Millis, Size, WindowId},
        region::Region,
    },
    render::{backend::CompositeSurface, backend::PictureId, damage::DamageAccumulator},
    window::{record::Window, stack::WindowStack},
};

pub struct Compositor<D: DisplayServer, S: CompositeSurface> {
    pub(crate) display: D,
    pub(crate) surface: S,
    clock: Box<dyn Clock>,
    pub(crate) stack: WindowStack,
    pub(crate) actions: ActionEngine,
    pub(crate) effects: EffectSetup,
    pub(crate) damage: DamageAccumulator,
    /// Stacking or geometry changed; cached per-window clip regions are stale.
    pub(crate) clip_changed: bool,
    pub(crate) screen: Size,
    pub(crate) root: WindowId,
    pub(crate) root_buffer: Option<PictureId>,
    pub(crate) root_tile: Option<PictureId>,
}

impl<D: DisplayServer, S: CompositeSurface> Compositor<D, S> {
    /// Start a session on `root`. The first paint covers the whole screen.
    pub fn new(
        display: D,
        surface: S,
        clock: impl Clock + 'static,
        effects: EffectSetup,
        root: WindowId,
        screen: Size,
    ) -> Self {
        let mut damage = DamageAccumulator::new();
        damage.add(Region::from_rect(screen.to_rect()));
        Self {
            display,
            surface,
            clock: Box::new(clock),
            stack: WindowStack::new(),
            actions: ActionEngine::new(effects.tick_interval_ms),
            effects,
            damage,
            clip_changed: true,
            screen,
            root,
            root_buffer: None,
            root_tile: None,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn stack(&self) -> &WindowStack {
        &self.stack
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.stack.find(id).and_then(|key| self.stack.get(key))
    }

    pub fn is_animating(&self, id: WindowId) -> bool {
        self.stack
            .find(id)
            .is_some_and(|key| self.actions.is_active(key))
    }

    pub fn active_animations(&self) -> usize {
        self.actions.len()
    }

    /// Apply one lifecycle notification.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Create(id) => self.register(id),
            WindowEvent::Map(id) => self.notify_map(id),
            WindowEvent::Unmap(id) => self.notify_unmap(id),
            WindowEvent::Configure(ev) => self.notify_configure(ev),
            WindowEvent::Circulate { window, place } => self.notify_circulate(window, place),
            WindowEvent::Destroy { window, gone } => self.notify_destroy(window, gone),
            WindowEvent::Reparent { window, to_root } => self.notify_reparent(window, to_root),
            WindowEvent::Damage(id) => self.notify_damage(id),
            WindowEvent::Shape(ev) => self.notify_shape(ev),
            WindowEvent::OpacityChanged(id) => self.notify_opacity(id),
        }
    }

    /// Run the animation tick if it is due, then the completions of every
    /// action that finished during it.
    pub fn pump_animations(&mut self) {
        let now = self.now();
        let finished = self
            .actions
            .tick(now, &mut self.stack, self.screen, &mut self.damage);
        for f in finished {
            self.run_completion(f);
        }
    }

    /// Paint one frame if anything is damaged. Returns whether a frame was painted.
    pub fn paint_due_region(&mut self) -> bool {
        match self.damage.take() {
            Some(region) => {
                self.paint(region);
                true
            }
            None => false,
        }
    }

    /// How long the event loop may sleep before the next animation tick;
    /// `None` when nothing is animating.
    pub fn time_until_next_animation_event(&self) -> Option<Duration> {
        self.actions
            .next_deadline(self.now())
            .map(Duration::from_millis)
    }

    /// Damage the whole screen, e.g. after an expose.
    pub fn repaint_all(&mut self) {
        self.damage.add(Region::from_rect(self.screen.to_rect()));
    }

    pub(crate) fn run_completion(&mut self, finished: Finished) {
        tracing::trace!(?finished, "running completion");
        match finished.completion {
            Completion::None => {}
            Completion::FinishUnmap => self.finish_unmap(finished.key),
            Completion::FinishDestroy => self.finish_destroy(finished.key, finished.gone),
        }
    }
}
