//! Window state machine: how each lifecycle notification moves a record between
//! tracked-unmapped, mapped, unmapping and destroying.
//!
//! Handlers never fail. A window that vanished from the display between the
//! notification and a query is logged and skipped.

use crate::{
    animation::{
        action::{ActionRequest, Completion},
        effect::LifecycleEvent,
    },
    compositor::Compositor,
    display::{ConfigureNotify, DisplayServer, Place, ShapeKind, ShapeNotify, opacity_from_property},
    foundation::{
        core::{IRect, Size, WindowId},
        region::Region,
    },
    render::backend::CompositeSurface,
    window::{
        record::{Transform, Window, WindowType},
        stack::WindowKey,
    },
};

impl<D: DisplayServer, S: CompositeSurface> Compositor<D, S> {
    /// Start tracking `id`. A window that is already viewable is mapped right away.
    pub fn register(&mut self, id: WindowId) {
        if id == self.root {
            return;
        }
        if let Some(key) = self.stack.find(id) {
            // back under the root before its destroy animation ended
            if self.actions.completion(key) != Some(Completion::FinishDestroy) {
                return;
            }
            if let Some(pending) = self.actions.cancel(key) {
                self.run_completion(pending);
            }
            tracing::debug!(window = id.0, "returned while being destroyed");
        }
        let Some(attrs) = self.display.window_attributes(id) else {
            tracing::debug!(window = id.0, "window vanished before registration");
            return;
        };
        let hint = self.display.window_type_property(id);
        let transient = self.display.has_transient_for(id);
        let window_type = WindowType::classify(hint, transient, attrs.override_redirect);

        let mut window = Window::new(id, &attrs, window_type);
        if !attrs.input_only {
            window.damage = self.display.create_damage(id);
        }
        self.stack.push_top(window);
        tracing::debug!(window = id.0, window_type = window_type.name(), "registered");

        if attrs.viewable {
            self.notify_map(id);
        }
    }

    pub fn notify_map(&mut self, id: WindowId) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let now = self.now();
        let screen = self.screen;
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        w.viewable = true;
        if w.input_only {
            return;
        }
        self.display.select_property_input(id, true);

        let opacity = self
            .display
            .opacity_property(id)
            .map_or(1.0, opacity_from_property);
        w.transform = Transform {
            opacity,
            needs_effect: true,
            ..Transform::default()
        };
        if let Some(extents) = w.determine_mode() {
            self.damage.add(extents);
        }
        w.damaged = false;
        tracing::debug!(window = id.0, opacity, "mapped");

        let Some(effect) = self.effects.table.select(w.window_type, LifecycleEvent::Map) else {
            // an exit animation must not keep fading the remapped window
            w.animating = false;
            if let Some(outgoing) = self.actions.cancel(key) {
                self.run_completion(outgoing);
            }
            return;
        };
        let req = ActionRequest {
            start: 0.0,
            end: opacity,
            step: effect.step,
            curve: effect.curve(),
            completion: Completion::None,
            gone: false,
            fire_outgoing: true,
        };
        if let Some(outgoing) = self
            .actions
            .start(now, key, w, screen, &mut self.damage, req)
        {
            self.run_completion(outgoing);
        }
    }

    pub fn notify_unmap(&mut self, id: WindowId) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let now = self.now();
        let screen = self.screen;
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        w.viewable = false;

        let effect = self
            .effects
            .table
            .select(w.window_type, LifecycleEvent::Unmap);
        match effect {
            Some(effect) if w.pixmap.is_some() => {
                tracing::debug!(window = id.0, effect = %effect.name, "unmapping");
                let req = ActionRequest {
                    start: w.transform.opacity,
                    end: 0.0,
                    step: effect.step,
                    curve: effect.curve(),
                    completion: Completion::FinishUnmap,
                    gone: false,
                    fire_outgoing: false,
                };
                self.actions
                    .start(now, key, w, screen, &mut self.damage, req);
            }
            _ => self.finish_unmap(key),
        }
    }

    /// Release everything an unmapped window no longer needs to paint.
    pub(crate) fn finish_unmap(&mut self, key: WindowKey) {
        let Some(w) = self.stack.get_mut(key) else {
            tracing::debug!(?key, "unmap completion for a released window ignored");
            return;
        };
        w.damaged = false;
        if let Some(extents) = w.extents.take() {
            self.damage.add(extents);
        }
        if let Some(pixmap) = w.pixmap.take() {
            self.surface.free_pixmap(pixmap);
        }
        if let Some(picture) = w.picture.take() {
            self.surface.free_picture(picture);
        }
        // a remap may have overtaken the exit animation
        if !w.viewable {
            self.display.select_property_input(w.id, false);
        }
        w.border_size = None;
        w.border_clip = None;
        self.clip_changed = true;
        tracing::debug!(window = w.id.0, "unmapped");
    }

    pub fn notify_configure(&mut self, ev: ConfigureNotify) {
        if ev.window == self.root {
            self.resize_screen(Size::new(ev.geometry.width, ev.geometry.height));
            return;
        }
        let Some(key) = self.stack.find(ev.window) else {
            return;
        };
        let now = self.now();
        let screen = self.screen;
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };

        let mut damage = w.viewable.then(|| w.extents.clone().unwrap_or_default());
        let old = w.geometry;
        let resized = !old.same_size(&ev.geometry) || old.border_width != ev.geometry.border_width;
        if resized {
            if let Some(pixmap) = w.pixmap.take() {
                self.surface.free_pixmap(pixmap);
            }
            if let Some(picture) = w.picture.take() {
                self.surface.free_picture(picture);
            }
        }

        w.geometry = ev.geometry;
        w.override_redirect = ev.override_redirect;
        w.shape_bounds = if w.shaped {
            w.shape_bounds.translate(
                ev.geometry.x.saturating_sub(old.x),
                ev.geometry.y.saturating_sub(old.y),
            )
        } else {
            IRect::new(ev.geometry.x, ev.geometry.y, ev.geometry.width, ev.geometry.height)
        };
        w.transform.needs_effect = true;

        if let Some(damage) = damage.as_mut() {
            let extents = w.extents_region();
            damage.union(&extents);
            w.extents = Some(extents);
        }
        let viewable = w.viewable;
        let window_type = w.window_type;

        self.stack.restack(key, ev.above);
        if let Some(damage) = damage {
            self.damage.add(damage);
        }
        self.clip_changed = true;

        if !(resized && viewable) {
            return;
        }
        let Some(effect) = self.effects.table.select(window_type, LifecycleEvent::Resize) else {
            return;
        };
        let opacity = self
            .display
            .opacity_property(ev.window)
            .map_or(1.0, opacity_from_property);
        let req = ActionRequest {
            start: 0.0,
            end: opacity,
            step: effect.step,
            curve: effect.curve(),
            completion: Completion::None,
            gone: false,
            fire_outgoing: true,
        };
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        if let Some(outgoing) = self
            .actions
            .start(now, key, w, screen, &mut self.damage, req)
        {
            self.run_completion(outgoing);
        }
    }

    pub fn notify_circulate(&mut self, id: WindowId, place: Place) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let new_above = match place {
            Place::OnTop => self
                .stack
                .top()
                .and_then(|top| self.stack.get(top))
                .map(|w| w.id),
            Place::OnBottom => None,
        };
        self.stack.restack(key, new_above);
        self.clip_changed = true;
    }

    /// `gone` is true when the display already destroyed the window, false when
    /// it merely left the root (reparented away).
    pub fn notify_destroy(&mut self, id: WindowId, gone: bool) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let now = self.now();
        let screen = self.screen;
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };

        let effect = self
            .effects
            .table
            .select(w.window_type, LifecycleEvent::Destroy);
        match effect {
            Some(effect) if w.pixmap.is_some() => {
                tracing::debug!(window = id.0, gone, effect = %effect.name, "destroying");
                let req = ActionRequest {
                    start: w.transform.opacity,
                    end: 0.0,
                    step: effect.step,
                    curve: effect.curve(),
                    completion: Completion::FinishDestroy,
                    gone,
                    fire_outgoing: false,
                };
                self.actions
                    .start(now, key, w, screen, &mut self.damage, req);
            }
            _ => self.finish_destroy(key, gone),
        }
    }

    /// Remove the record and release every resource it owns.
    pub(crate) fn finish_destroy(&mut self, key: WindowKey, gone: bool) {
        let pending = self.actions.cancel(key);
        if gone {
            self.finish_unmap(key);
        }
        let Some(mut w) = self.stack.remove(key) else {
            tracing::debug!(?key, "destroy completion for a released window ignored");
            return;
        };
        if let Some(extents) = w.extents.take() {
            self.damage.add(extents);
        }
        if let Some(pixmap) = w.pixmap.take() {
            self.surface.free_pixmap(pixmap);
        }
        for picture in [w.picture.take(), w.alpha_mask.take()].into_iter().flatten() {
            self.surface.free_picture(picture);
        }
        if let Some(damage) = w.damage.take() {
            self.display.destroy_damage(damage);
        }
        self.clip_changed = true;
        tracing::debug!(window = w.id.0, gone, "destroyed");

        // the record is gone, so whatever this completion would do is a no-op
        if let Some(pending) = pending {
            self.run_completion(pending);
        }
    }

    /// Tear `id` down now, whatever its animation state: the cancelled action's
    /// completion runs first, then anything still left is released.
    pub fn force_release(&mut self, id: WindowId) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        if let Some(pending) = self.actions.cancel(key) {
            self.run_completion(pending);
        }
        if self.stack.get(key).is_some() {
            self.finish_destroy(key, true);
        }
    }

    pub fn notify_reparent(&mut self, id: WindowId, to_root: bool) {
        if to_root {
            self.register(id);
        } else {
            self.notify_destroy(id, false);
        }
    }

    /// Fold the display's damage report for `id` into the frame damage.
    pub fn notify_damage(&mut self, id: WindowId) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        let Some(damage) = w.damage else {
            return;
        };
        let reported = self.display.subtract_damage(damage);
        let region = if w.damaged {
            let (x, y) = w.geometry.content_origin();
            let mut parts = reported;
            parts.translate(x, y);
            parts
        } else {
            w.extents_region()
        };
        w.damaged = true;
        self.damage.add(region);
    }

    pub fn notify_shape(&mut self, ev: ShapeNotify) {
        if ev.kind == ShapeKind::Input {
            return;
        }
        let Some(key) = self.stack.find(ev.window) else {
            return;
        };
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        let mut damage = Region::from_rect(w.shape_bounds);
        w.shaped = ev.shaped;
        w.shape_bounds = if ev.shaped {
            IRect::new(
                w.geometry.x.saturating_add(ev.x),
                w.geometry.y.saturating_add(ev.y),
                ev.width,
                ev.height,
            )
        } else {
            IRect::new(w.geometry.x, w.geometry.y, w.geometry.width, w.geometry.height)
        };
        damage.union_rect(w.shape_bounds);
        w.border_size = None;
        self.damage.add(damage);
        self.clip_changed = true;
    }

    /// Re-read the opacity property of a mapped window.
    pub fn notify_opacity(&mut self, id: WindowId) {
        let Some(key) = self.stack.find(id) else {
            return;
        };
        let opacity = self
            .display
            .opacity_property(id)
            .map_or(1.0, opacity_from_property);
        let animating = self.actions.is_active(key);
        let Some(w) = self.stack.get_mut(key) else {
            return;
        };
        if !w.viewable || w.input_only {
            return;
        }
        w.transform.opacity = opacity;
        if let Some(extents) = w.determine_mode() {
            self.damage.add(extents);
        }
        if animating {
            w.promote_while_animating();
        }
        tracing::debug!(window = id.0, opacity, "opacity changed");
    }

    pub(crate) fn resize_screen(&mut self, screen: Size) {
        if screen == self.screen {
            return;
        }
        self.screen = screen;
        if let Some(buffer) = self.root_buffer.take() {
            self.surface.free_picture(buffer);
        }
        self.clip_changed = true;
        self.repaint_all();
        tracing::debug!(width = screen.width, height = screen.height, "screen resized");
    }
}
