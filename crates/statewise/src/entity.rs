//! Stateful entities
//!
//! An [`Entity`] owns a rectangle, a rendered surface and a table of named
//! [`Style`]s (its states). It switches between them either instantly with
//! [`Entity::construct`] or over time with [`Entity::transition`]; the host
//! drives it with [`Entity::handle_event`] and [`Entity::update`] and draws it
//! with [`Entity::draw`].

use std::collections::HashMap;
use std::rc::Rc;

use glam::IVec2;
use indexmap::IndexMap;
use statewise_macros::WithSetters;

use crate::animation::FrameAnimation;
use crate::error::{Error, Result};
use crate::events::{EventHandle, EventRegistration, EventRouter, HitTarget, StandardEvent};
use crate::geometry::Rect;
use crate::input::InputEvent;
use crate::render::{Renderer, Surface};
use crate::style::{AssetHandle, ImageSource, Style};
use crate::transition::{Transition, TransitionOptions};

/// Name of the state constructed when an entity is created
pub const DEFAULT_STATE: &str = "default";

/// What to construct or transition to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A registered state, which becomes the selected state
    State(String),
    /// An inline style; clears the selection
    Style(Style),
    /// Nothing; clears the selection
    Empty,
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::State(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::State(name)
    }
}

impl From<Style> for Target {
    fn from(style: Style) -> Self {
        Target::Style(style)
    }
}

impl From<&Style> for Target {
    fn from(style: &Style) -> Self {
        Target::Style(style.clone())
    }
}

/// Configuration for [`Entity::new`]
#[derive(Debug, Clone, WithSetters)]
pub struct EntityConfig {
    /// Initial rectangle, relative to whatever the entity is drawn onto
    pub rect: Rect,
    /// Initial states; `default` is constructed immediately when present
    #[setters(skip)]
    pub states: IndexMap<String, Style>,
    /// Re-dispatch the last input snapshot on every `update`
    pub refresh_input_on_update: bool,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            states: IndexMap::new(),
            refresh_input_on_update: true,
        }
    }
}

impl EntityConfig {
    pub fn new(rect: impl Into<Rect>) -> Self {
        Self::default().with_rect(rect)
    }

    /// Add (or replace) a state
    pub fn with_state(mut self, name: impl Into<String>, style: Style) -> Self {
        self.states.insert(name.into(), style);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.rect.w < 0 || self.rect.h < 0 {
            return Err(Error::InvalidRect {
                w: self.rect.w,
                h: self.rect.h,
            });
        }
        Ok(())
    }
}

/// Outcome of validating a transition request, applied separately so that
/// containers can validate every child before touching any of them
pub(crate) enum Plan {
    /// Already in the requested state
    Skip,
    Instant {
        style: Style,
        selected: Option<String>,
    },
    Animate {
        transition: Transition,
        selected: Option<String>,
    },
}

/// A rectangle with named styles, an event table and an optional running transition
pub struct Entity<R: Renderer> {
    rect: Rect,
    // Set by a containing composite while it forwards events
    frame_origin: IVec2,
    renderer: Rc<R>,
    surface: R::Surface,

    states: IndexMap<String, Style>,
    selected_state: Option<String>,
    style: Style,
    transition: Option<Transition>,

    events: EventRouter<Self>,
    last_input: Option<InputEvent>,
    refresh_input_on_update: bool,

    animations: HashMap<AssetHandle, FrameAnimation>,
    active_animation: Option<AssetHandle>,
    frozen: bool,
}

impl<R: Renderer> Entity<R> {
    pub fn new(renderer: Rc<R>, config: EntityConfig) -> Result<Self> {
        config.validate()?;
        let EntityConfig {
            rect,
            states,
            refresh_input_on_update,
        } = config;

        let (w, h) = rect.surface_size();
        let surface = renderer.create_surface(w, h);
        let mut entity = Self {
            rect,
            frame_origin: IVec2::ZERO,
            renderer,
            surface,
            states,
            selected_state: None,
            style: Style::default(),
            transition: None,
            events: EventRouter::new(),
            last_input: None,
            refresh_input_on_update,
            animations: HashMap::new(),
            active_animation: None,
            frozen: false,
        };

        if entity.has_state(DEFAULT_STATE) {
            entity.construct(DEFAULT_STATE)?;
        }
        Ok(entity)
    }

    // States

    /// Register a state, replacing any state with the same name
    pub fn add_state(&mut self, name: impl Into<String>, style: Style) {
        self.states.insert(name.into(), style);
    }

    pub fn state(&self, name: &str) -> Option<&Style> {
        self.states.get(name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Registered states in insertion order
    pub fn states(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.states.iter().map(|(name, style)| (name.as_str(), style))
    }

    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    fn resolve_target(&self, target: Target) -> Result<(Style, Option<String>)> {
        match target {
            Target::State(name) => match self.states.get(&name) {
                Some(style) => Ok((style.clone(), Some(name))),
                None => Err(Error::UnknownState {
                    state: name,
                    owner: "entity".to_string(),
                }),
            },
            Target::Style(style) => Ok((style, None)),
            Target::Empty => Ok((Style::default(), None)),
        }
    }

    // Switching styles

    /// Switch to `target` immediately
    ///
    /// Cancels any running transition, resolves `Auto` rect components against
    /// the current rect, and renders onto a fresh surface.
    pub fn construct(&mut self, target: impl Into<Target>) -> Result<()> {
        let (style, selected) = self.resolve_target(target.into())?;
        self.transition = None;
        self.selected_state = selected;
        self.set_style(style);
        self.render();
        Ok(())
    }

    /// Interpolate from the current style to `target` over `duration`
    ///
    /// Transitioning to the already selected state is a no-op unless
    /// `options.force` is set. A zero duration constructs the target
    /// immediately. On error the entity is left untouched.
    pub fn transition(
        &mut self,
        target: impl Into<Target>,
        duration: f32,
        options: &TransitionOptions,
    ) -> Result<()> {
        let plan = self.plan_transition(target.into(), duration, options)?;
        self.apply_plan(plan);
        Ok(())
    }

    pub(crate) fn plan_transition(
        &self,
        target: Target,
        duration: f32,
        options: &TransitionOptions,
    ) -> Result<Plan> {
        if let Target::State(name) = &target {
            if !options.force && self.selected_state.as_deref() == Some(name.as_str()) {
                return Ok(Plan::Skip);
            }
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidDuration(duration));
        }

        let (mut style, selected) = self.resolve_target(target)?;
        // Auto components are fixed now, later rect changes do not affect them
        style.resolve_rect(self.rect);

        if duration == 0.0 {
            return Ok(Plan::Instant { style, selected });
        }

        let mut start = self.style.clone();
        start.rect = Some(self.rect.into());
        let transition = Transition::new(duration, &start, &style, options)?;
        Ok(Plan::Animate {
            transition,
            selected,
        })
    }

    pub(crate) fn apply_plan(&mut self, plan: Plan) {
        match plan {
            Plan::Skip => {}
            Plan::Instant { style, selected } => {
                self.transition = None;
                self.selected_state = selected;
                self.set_style(style);
                self.render();
            }
            Plan::Animate {
                transition,
                selected,
            } => {
                log::debug!(
                    "Entity transition to {:?} over {}",
                    selected.as_deref().unwrap_or("<inline style>"),
                    transition.duration()
                );
                self.transition = Some(transition);
                self.selected_state = selected;
            }
        }
    }

    /// Render `style` on top of the current surface
    ///
    /// The surface is not reset and the selection is unchanged. The style's
    /// attributes (except `rect`) are merged into the current style.
    pub fn overlay(&mut self, style: &Style) {
        let mut applied = style.clone();
        applied.rect = None;
        self.renderer.render(&mut self.surface, &applied);
        self.style = self.style.merge(&applied);
    }

    fn set_style(&mut self, mut style: Style) {
        if let Some(rect) = style.resolve_rect(self.rect) {
            self.rect = rect;
        }
        self.style = style;
    }

    fn render(&mut self) {
        let (w, h) = self.rect.surface_size();
        let mut surface = self.renderer.create_surface(w, h);
        match self.frame_style() {
            Some(style) => self.renderer.render(&mut surface, &style),
            None => self.renderer.render(&mut surface, &self.style),
        }
        self.surface = surface;
        log::trace!("Rendered entity at {:?}", self.rect);
    }

    /// The current style with the playing animation frame as its image
    fn frame_style(&self) -> Option<Style> {
        let frame = self.animations.get(&self.style.anim?)?.frame()?;
        let mut style = self.style.clone();
        style.image = Some(ImageSource::Handle(frame));
        Some(style)
    }

    // Driving

    /// Feed one input event
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.last_input = Some(event.clone());
        self.dispatch(event);
    }

    /// Advance time by `dt`
    ///
    /// Re-dispatches the last input snapshot first (see
    /// [`EntityConfig::refresh_input_on_update`]), then ticks the running
    /// transition and animation.
    pub fn update(&mut self, dt: f32) {
        self.refresh_input();
        self.advance(dt);
    }

    pub(crate) fn refresh_input(&mut self) {
        if !self.refresh_input_on_update {
            return;
        }
        if let Some(event) = &self.last_input {
            let idle = event.to_idle();
            self.dispatch(&idle);
        }
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        let mut dirty = false;

        if let Some(transition) = self.transition.as_mut() {
            transition.tick(dt);
            if transition.is_finished() {
                let end = transition.target().clone();
                self.transition = None;
                log::debug!("Entity transition finished");
                self.set_style(end);
            } else {
                let current = transition.current().clone();
                self.set_style(current);
            }
            dirty = true;
        }

        if self.tick_animation() {
            dirty = true;
        }

        if dirty {
            self.render();
        }
    }

    fn tick_animation(&mut self) -> bool {
        let handle = self.style.anim;
        if handle != self.active_animation {
            let previous = self.active_animation.and_then(|h| self.animations.get_mut(&h));
            if let Some(previous) = previous {
                previous.reset();
            }
            self.active_animation = handle;
        }
        if self.frozen {
            return false;
        }
        match handle.and_then(|h| self.animations.get_mut(&h)) {
            Some(animation) => animation.tick(),
            None => false,
        }
    }

    fn dispatch(&mut self, event: &InputEvent) {
        let mut active = self.events.begin_dispatch();
        active.dispatch(self, event);
        self.events.end_dispatch(active);
    }

    /// Blit the surface onto `target` at the entity's position
    pub fn draw(&self, target: &mut R::Surface) {
        let offset = self
            .style
            .anim
            .and_then(|h| self.animations.get(&h))
            .map(FrameAnimation::current_offset)
            .unwrap_or(IVec2::ZERO);
        target.blit(&self.surface, self.rect().position() + offset);
    }

    // Events

    /// Register a handler
    pub fn register_event(&mut self, registration: EventRegistration<Self>) -> EventHandle {
        self.events.register(registration)
    }

    pub fn unregister_event(&mut self, handle: &EventHandle) -> bool {
        self.events.unregister(handle)
    }

    /// Shorthand for an owner callback on a standard event
    pub fn on(
        &mut self,
        event: StandardEvent,
        callback: impl FnMut(&mut Self, bool) + 'static,
    ) -> EventHandle {
        self.register_event(EventRegistration::with_owner(callback).on(event))
    }

    /// Registered handlers; inside a callback this includes the running ones
    pub fn events(&self) -> &EventRouter<Self> {
        &self.events
    }

    // Animations

    pub fn add_animation(&mut self, handle: AssetHandle, animation: FrameAnimation) {
        self.animations.insert(handle, animation);
    }

    pub fn animation(&self, handle: AssetHandle) -> Option<&FrameAnimation> {
        self.animations.get(&handle)
    }

    /// Stop advancing the current animation
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // Accessors

    /// Rectangle in the coordinate space events arrive in
    pub fn rect(&self) -> Rect {
        self.rect.translated(self.frame_origin)
    }

    /// Rectangle relative to the parent
    pub fn local_rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: impl Into<Rect>) {
        self.rect = rect.into().translated(-self.frame_origin);
    }

    /// The style currently rendered
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn active_transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn surface(&self) -> &R::Surface {
        &self.surface
    }

    pub fn renderer(&self) -> &Rc<R> {
        &self.renderer
    }

    pub(crate) fn set_frame_origin(&mut self, origin: IVec2) {
        self.frame_origin = origin;
    }
}

impl<R: Renderer> HitTarget for Entity<R> {
    fn hit_rect(&self) -> Rect {
        self.rect()
    }
}

impl<R: Renderer> std::fmt::Debug for Entity<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("rect", &self.rect)
            .field("selected_state", &self.selected_state)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("transitioning", &self.transition.is_some())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
