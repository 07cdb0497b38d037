//! Scroll instances and their lifecycle

use glidebar_animation::ScrollAnimation;
use glidebar_core::{
    Axis, AxisDescriptor, Edge, Horizontal, HorizontalController, MetricsCache, Notification,
    NotificationDispatcher, NotificationKind, ScrollDetail, ScrollSurface, Settings,
    SettingsOverrides, Subscriptions, UpdateContext, Vertical, VerticalController,
};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::pipeline::PipelineState;
use crate::runtime::{Environment, InstanceId, Runtime, Task};

/// Programmatic scroll in flight
#[derive(Debug, Default)]
pub(crate) struct AnimationState {
    /// Bumped by every new animation and by destroy; frame callbacks
    /// carrying an older value stop
    pub(crate) generation: u64,
    pub(crate) current: Option<ScrollAnimation>,
    /// Waiting for the frame that re-enables scroll events
    pub(crate) restoring: bool,
}

impl AnimationState {
    pub(crate) fn supersede(&mut self) -> u64 {
        self.generation += 1;
        self.current = None;
        self.restoring = false;
        self.generation
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current.is_some() || self.restoring
    }
}

/// One container with custom scrollbars
pub(crate) struct Instance<S: ScrollSurface> {
    pub(crate) surface: S,
    pub(crate) settings: Settings,
    pub(crate) cache: MetricsCache,
    pub(crate) vertical: VerticalController,
    pub(crate) horizontal: HorizontalController,
    /// Scrollbar elements were created
    pub(crate) has_tracks: bool,
    pub(crate) subscriptions: Subscriptions,
    pub(crate) dispatcher: NotificationDispatcher,
    pub(crate) pipeline: PipelineState,
    pub(crate) animation: AnimationState,
    /// Scroll events are ignored while a suppressed programmatic scroll runs
    pub(crate) suppress_events: bool,
    pub(crate) destroyed: bool,
}

impl<S: ScrollSurface> Instance<S> {
    fn new(surface: S, settings: Settings, has_tracks: bool) -> Self {
        Self {
            surface,
            settings,
            cache: MetricsCache::new(),
            vertical: VerticalController::new(),
            horizontal: HorizontalController::new(),
            has_tracks,
            subscriptions: Subscriptions::new(),
            dispatcher: NotificationDispatcher::new(),
            pipeline: PipelineState::default(),
            animation: AnimationState::default(),
            suppress_events: false,
            destroyed: false,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        !self.destroyed
    }

    /// Not scrolling, animating or suppressing events
    pub(crate) fn is_settled(&self) -> bool {
        self.destroyed
            || (self.pipeline.is_idle() && !self.animation.is_active() && !self.suppress_events)
    }

    /// Deliver a notification to the host and to registered handlers
    pub(crate) fn emit(&mut self, kind: NotificationKind) {
        let notification = Notification::new(kind, &self.cache);
        trace!(event = kind.name(), "notification");
        self.surface.dispatch(&notification);
        self.dispatcher.dispatch(&notification);
    }

    fn update_context(&self, touch: bool) -> UpdateContext {
        UpdateContext {
            limits: self.settings.track_limits(),
            has_track: self.has_tracks,
            touch,
        }
    }

    /// Refresh both axes from the cached geometry and the live offsets,
    /// emitting edge notifications
    pub(crate) fn update_axes(&mut self, touch: bool) {
        let ctx = self.update_context(touch);

        let offset = self.surface.scroll_offset(Axis::Vertical);
        if let Some(edge) = self
            .vertical
            .update(&mut self.cache, offset, &ctx, &mut self.surface)
        {
            self.emit_edge::<Vertical>(edge);
        }

        let offset = self.surface.scroll_offset(Axis::Horizontal);
        if let Some(edge) = self
            .horizontal
            .update(&mut self.cache, offset, &ctx, &mut self.surface)
        {
            self.emit_edge::<Horizontal>(edge);
        }
    }

    fn emit_edge<A: AxisDescriptor>(&mut self, edge: Edge) {
        self.emit(NotificationKind::ScrollReachEdge);
        self.emit(A::edge_kind(edge));
    }

    /// Replace the scrollbar elements, then render both axes into the new
    /// ones. Edge state is kept, so no edge notification repeats.
    pub(crate) fn rebuild_tracks(&mut self, has_tracks: bool, env: &Environment) {
        if self.has_tracks {
            self.vertical
                .disable(&mut self.cache, true, &mut self.surface);
            self.horizontal
                .disable(&mut self.cache, true, &mut self.surface);
            self.surface.remove_scrollbar(Axis::Vertical);
            self.surface.remove_scrollbar(Axis::Horizontal);
            self.surface.restore_style();
        }

        self.has_tracks = has_tracks;
        if has_tracks {
            self.surface.hide_native_scrollbars(env.native_scrollbar_size);
            let prefix = self.settings.class_prefix.clone();
            self.surface.create_scrollbar(Axis::Vertical, &prefix);
            self.surface.create_scrollbar(Axis::Horizontal, &prefix);
        }
        trace!(has_tracks, "scrollbars rebuilt");

        for state in [&mut self.cache.vertical, &mut self.cache.horizontal] {
            state.enabled = false;
            state.size = 1.0;
            state.position = 0.0;
        }
        self.update_axes(env.touch);
    }

    /// Move enabled axes 1px away from the edge they sit on
    pub(crate) fn nudge_off_edges(&mut self) {
        if let Some(offset) = self.vertical.edge_nudge(&self.cache) {
            self.surface.set_scroll_offset(Axis::Vertical, offset);
        }
        if let Some(offset) = self.horizontal.edge_nudge(&self.cache) {
            self.surface.set_scroll_offset(Axis::Horizontal, offset);
        }
    }
}

/// Whether custom scrollbar elements are needed. Forcing is turned off
/// where overlay scrollbars cannot be hidden, since both would show.
fn wants_tracks(env: &Environment, settings: &mut Settings) -> bool {
    if env.native_scrollbar_size == 0.0 && !env.can_hide_native_scrollbars {
        settings.force_scrollbars = false;
    }
    env.native_scrollbar_size > 0.0 || settings.force_scrollbars
}

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    /// Attach custom scrollbars to `surface`
    pub fn create(&mut self, surface: S, overrides: &SettingsOverrides) -> Result<InstanceId> {
        let mut settings = Settings::default().merged(overrides);
        settings.validate()?;

        let env = self.env;
        let has_tracks = wants_tracks(&env, &mut settings);
        let auto_update = settings.auto_update;

        let mut instance = Instance::new(surface, settings, has_tracks);
        if has_tracks {
            instance
                .surface
                .hide_native_scrollbars(env.native_scrollbar_size);
            let prefix = instance.settings.class_prefix.clone();
            instance.surface.create_scrollbar(Axis::Vertical, &prefix);
            instance.surface.create_scrollbar(Axis::Horizontal, &prefix);
        }
        if env.touch && instance.settings.prevent_parent_scroll {
            let class = instance.settings.nobounce_class();
            instance.surface.set_container_class(&class, true);
        }

        let id = self.instances.insert(instance);
        if auto_update {
            self.registry.push(id);
        }
        debug!(?id, has_tracks, auto_update, "scroll instance created");

        self.measure(id);
        self.bind(id);

        if auto_update && self.poll_timer.is_none() {
            self.poll_tick();
        }

        Ok(id)
    }

    /// Tear an instance down. Listeners, scrollbars and styles go
    /// immediately; the registry entry goes on the next frame.
    pub fn destroy(&mut self, id: InstanceId) -> Result<()> {
        if !self.instances.contains_key(id) {
            return Err(Error::UnknownInstance(id));
        }
        self.destroy_instance(id);
        Ok(())
    }

    pub(crate) fn destroy_instance(&mut self, id: InstanceId) {
        let now = self.clock.now();
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed {
            return;
        }
        instance.destroyed = true;

        if let Some(timer) = instance.pipeline.stop_timer.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(timer) = instance.pipeline.throttle.cancel_trailing() {
            self.scheduler.cancel(timer);
        }
        instance.animation.supersede();
        instance.suppress_events = false;

        for subscription in instance.subscriptions.take_all() {
            instance.surface.unlisten(subscription.id);
        }

        let has_tracks = instance.has_tracks;
        instance
            .vertical
            .disable(&mut instance.cache, has_tracks, &mut instance.surface);
        instance
            .horizontal
            .disable(&mut instance.cache, has_tracks, &mut instance.surface);
        if has_tracks {
            instance.surface.remove_scrollbar(Axis::Vertical);
            instance.surface.remove_scrollbar(Axis::Horizontal);
        }

        instance.surface.restore_style();
        let class = instance.settings.nobounce_class();
        instance.surface.set_container_class(&class, false);

        self.scheduler.request_frame(Task::Unregister(id), now);
        debug!(?id, "scroll instance destroyed");

        // Its scrollstop will never come
        self.release_pause_if_settled();
    }

    /// Replace the settings of a live instance with `overrides` applied.
    /// Listener bindings, the no-bounce class and the scrollbar elements
    /// follow the new settings.
    pub fn configure(&mut self, id: InstanceId, overrides: &SettingsOverrides) -> Result<()> {
        let env = self.env;
        let instance = self.instance_mut(id)?;
        if instance.destroyed {
            return Ok(());
        }

        let mut settings = instance.settings.merged(overrides);
        settings.validate()?;
        let has_tracks = wants_tracks(&env, &mut settings);

        let old_class = instance.settings.nobounce_class();
        let new_class = settings.nobounce_class();
        let was_nobounce = env.touch && instance.settings.prevent_parent_scroll;
        let is_nobounce = env.touch && settings.prevent_parent_scroll;
        if was_nobounce && (!is_nobounce || old_class != new_class) {
            instance.surface.set_container_class(&old_class, false);
        }
        if is_nobounce && (!was_nobounce || old_class != new_class) {
            instance.surface.set_container_class(&new_class, true);
        }

        let rebuild = has_tracks != instance.has_tracks
            || (has_tracks && settings.class_prefix != instance.settings.class_prefix);
        instance.settings = settings;
        if rebuild {
            instance.rebuild_tracks(has_tracks, &env);
        }

        if instance.settings.auto_update {
            if !self.registry.contains(&id) {
                self.registry.push(id);
            }
        } else {
            self.registry.retain(|registered| *registered != id);
        }

        self.rebind(id);
        self.measure(id);
        if self.poll_timer.is_none() && self.registry.contains(&id) {
            self.poll_tick();
        }
        Ok(())
    }

    /// Register a handler for one notification kind
    pub fn on<F>(&mut self, id: InstanceId, kind: NotificationKind, handler: F) -> Result<()>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let instance = self.instance_mut(id)?;
        if instance.is_live() {
            instance.dispatcher.register(kind, handler);
        }
        Ok(())
    }

    /// Snapshot of the cached metrics, as carried by notifications
    pub fn state(&self, id: InstanceId) -> Result<ScrollDetail> {
        let instance = self.instances.get(id).ok_or(Error::UnknownInstance(id))?;
        Ok(ScrollDetail::from_cache(&instance.cache))
    }

    pub fn cache(&self, id: InstanceId) -> Result<&MetricsCache> {
        let instance = self.instances.get(id).ok_or(Error::UnknownInstance(id))?;
        Ok(&instance.cache)
    }

    pub fn settings(&self, id: InstanceId) -> Result<&Settings> {
        let instance = self.instances.get(id).ok_or(Error::UnknownInstance(id))?;
        Ok(&instance.settings)
    }

    pub fn surface(&self, id: InstanceId) -> Result<&S> {
        let instance = self.instances.get(id).ok_or(Error::UnknownInstance(id))?;
        Ok(&instance.surface)
    }

    pub fn surface_mut(&mut self, id: InstanceId) -> Result<&mut S> {
        let instance = self
            .instances
            .get_mut(id)
            .ok_or(Error::UnknownInstance(id))?;
        Ok(&mut instance.surface)
    }

    /// Destroyed but not yet removed
    pub fn is_destroyed(&self, id: InstanceId) -> bool {
        self.instances
            .get(id)
            .is_some_and(|instance| instance.destroyed)
    }

    /// Destroyed instances waiting for removal are still found here;
    /// callers treat them as no-ops
    pub(crate) fn instance_mut(&mut self, id: InstanceId) -> Result<&mut Instance<S>> {
        self.instances
            .get_mut(id)
            .ok_or(Error::UnknownInstance(id))
    }
}
