//! Composite entities
//!
//! A [`CompositeEntity`] groups named children (entities or other composites)
//! under one rectangle. Children keep rectangles relative to the composite;
//! while events are forwarded each child sees itself at its absolute position.
//!
//! Composite states map child names to [`Fragment`]s: a child state name, an
//! inline style for entity children, or an inline composite style for composite
//! children. Switching the composite switches every listed child, and a
//! request is validated for all children before any of them changes.

use std::rc::Rc;

use glam::IVec2;
use indexmap::IndexMap;
use statewise_macros::WithSetters;

use crate::entity::{Entity, Plan, Target, DEFAULT_STATE};
use crate::error::{Error, Result};
use crate::events::{EventHandle, EventRegistration, EventRouter, HitTarget, StandardEvent};
use crate::geometry::Rect;
use crate::input::InputEvent;
use crate::render::{Renderer, Surface};
use crate::style::Style;
use crate::transition::TransitionOptions;

/// Names children can not use
pub const RESERVED_NAMES: [&str; 11] = [
    "rect",
    "states",
    "selected_state",
    "children",
    "events",
    "style",
    "construct",
    "transition",
    "update",
    "draw",
    "handle_event",
];

/// One child's part of a composite state
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A state of the child
    State(String),
    /// An inline style (entity children only)
    Style(Style),
    /// An inline composite style (composite children only)
    Composite(CompositeStyle),
}

/// `child name -> fragment`
pub type CompositeStyle = IndexMap<String, Fragment>;

impl From<&str> for Fragment {
    fn from(name: &str) -> Self {
        Fragment::State(name.to_string())
    }
}

impl From<String> for Fragment {
    fn from(name: String) -> Self {
        Fragment::State(name)
    }
}

impl From<Style> for Fragment {
    fn from(style: Style) -> Self {
        Fragment::Style(style)
    }
}

impl From<CompositeStyle> for Fragment {
    fn from(style: CompositeStyle) -> Self {
        Fragment::Composite(style)
    }
}

/// What a composite constructs or transitions to
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeTarget {
    State(String),
    Style(CompositeStyle),
}

impl From<&str> for CompositeTarget {
    fn from(name: &str) -> Self {
        CompositeTarget::State(name.to_string())
    }
}

impl From<String> for CompositeTarget {
    fn from(name: String) -> Self {
        CompositeTarget::State(name)
    }
}

impl From<CompositeStyle> for CompositeTarget {
    fn from(style: CompositeStyle) -> Self {
        CompositeTarget::Style(style)
    }
}

/// A child of a composite
pub enum Child<R: Renderer> {
    Entity(Entity<R>),
    Composite(CompositeEntity<R>),
}

impl<R: Renderer> From<Entity<R>> for Child<R> {
    fn from(entity: Entity<R>) -> Self {
        Child::Entity(entity)
    }
}

impl<R: Renderer> From<CompositeEntity<R>> for Child<R> {
    fn from(composite: CompositeEntity<R>) -> Self {
        Child::Composite(composite)
    }
}

impl<R: Renderer> Child<R> {
    /// Rectangle relative to the parent
    pub fn local_rect(&self) -> Rect {
        match self {
            Child::Entity(entity) => entity.local_rect(),
            Child::Composite(composite) => composite.local_rect(),
        }
    }

    pub fn has_state(&self, name: &str) -> bool {
        match self {
            Child::Entity(entity) => entity.has_state(name),
            Child::Composite(composite) => composite.has_state(name),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        match self {
            Child::Entity(entity) => entity.is_transitioning(),
            Child::Composite(composite) => composite.is_transitioning(),
        }
    }

    pub fn draw(&self, target: &mut R::Surface) {
        match self {
            Child::Entity(entity) => entity.draw(target),
            Child::Composite(composite) => composite.draw(target),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Child::Entity(_) => "entity state or style",
            Child::Composite(_) => "composite state or composite style",
        }
    }

    fn set_frame_origin(&mut self, origin: IVec2) {
        match self {
            Child::Entity(entity) => entity.set_frame_origin(origin),
            Child::Composite(composite) => composite.frame_origin = origin,
        }
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match self {
            Child::Entity(entity) => entity.handle_event(event),
            Child::Composite(composite) => composite.handle_event(event),
        }
    }

    fn refresh_input(&mut self) {
        match self {
            Child::Entity(entity) => entity.refresh_input(),
            Child::Composite(composite) => composite.refresh_input(),
        }
    }

    fn advance(&mut self, dt: f32) {
        match self {
            Child::Entity(entity) => entity.advance(dt),
            Child::Composite(composite) => composite.advance(dt),
        }
    }

    /// Check that constructing `fragment` on this child cannot fail,
    /// descending into nested composites
    fn validate(&self, name: &str, fragment: &Fragment) -> Result<()> {
        match (self, fragment) {
            (_, Fragment::State(state)) if !self.has_state(state) => Err(Error::UnknownState {
                state: state.clone(),
                owner: format!("child '{name}'"),
            }),
            (Child::Entity(_), Fragment::State(_)) => Ok(()),
            (Child::Composite(composite), Fragment::State(state)) => match composite.state(state) {
                Some(style) => composite.validate_style(style),
                None => Ok(()),
            },
            (Child::Entity(_), Fragment::Style(_)) => Ok(()),
            (Child::Composite(composite), Fragment::Composite(style)) => composite.validate_style(style),
            _ => Err(Error::IncompatibleFragment {
                child: name.to_string(),
                expected: self.kind(),
            }),
        }
    }

    fn construct(&mut self, name: &str, fragment: Fragment) -> Result<()> {
        match (self, fragment) {
            (Child::Entity(entity), Fragment::State(state)) => entity.construct(state),
            (Child::Entity(entity), Fragment::Style(style)) => entity.construct(style),
            (Child::Composite(composite), Fragment::State(state)) => composite.construct(state),
            (Child::Composite(composite), Fragment::Composite(style)) => composite.construct(style),
            (child, _) => Err(Error::IncompatibleFragment {
                child: name.to_string(),
                expected: child.kind(),
            }),
        }
    }

    fn plan_transition(
        &self,
        name: &str,
        fragment: Fragment,
        duration: f32,
        options: &TransitionOptions,
    ) -> Result<ChildPlan> {
        match (self, fragment) {
            (Child::Entity(entity), Fragment::State(state)) => entity
                .plan_transition(Target::State(state), duration, options)
                .map(ChildPlan::Entity),
            (Child::Entity(entity), Fragment::Style(style)) => entity
                .plan_transition(Target::Style(style), duration, options)
                .map(ChildPlan::Entity),
            (Child::Composite(composite), Fragment::State(state)) => composite
                .plan_transition(CompositeTarget::State(state), duration, options)
                .map(ChildPlan::Composite),
            (Child::Composite(composite), Fragment::Composite(style)) => composite
                .plan_transition(CompositeTarget::Style(style), duration, options)
                .map(ChildPlan::Composite),
            (child, _) => Err(Error::IncompatibleFragment {
                child: name.to_string(),
                expected: child.kind(),
            }),
        }
    }

    fn apply_plan(&mut self, plan: ChildPlan) {
        match (self, plan) {
            (Child::Entity(entity), ChildPlan::Entity(plan)) => entity.apply_plan(plan),
            (Child::Composite(composite), ChildPlan::Composite(plan)) => composite.apply_plan(plan),
            // Plans are built from the same child they are applied to
            _ => log::warn!("Ignoring a transition plan built for a different kind of child"),
        }
    }
}

pub(crate) enum ChildPlan {
    Entity(Plan),
    Composite(CompositePlan),
}

pub(crate) enum CompositePlan {
    Skip,
    Apply {
        selected: Option<String>,
        children: Vec<(String, ChildPlan)>,
    },
}

/// Configuration for [`CompositeEntity::new`]
#[derive(Debug, Clone, WithSetters)]
pub struct CompositeConfig {
    pub rect: Rect,
    #[setters(skip)]
    pub states: IndexMap<String, CompositeStyle>,
    /// Re-dispatch the last input snapshot on every `update`
    pub refresh_input_on_update: bool,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            states: IndexMap::new(),
            refresh_input_on_update: true,
        }
    }
}

impl CompositeConfig {
    pub fn new(rect: impl Into<Rect>) -> Self {
        Self::default().with_rect(rect)
    }

    pub fn with_state(mut self, name: impl Into<String>, style: CompositeStyle) -> Self {
        self.states.insert(name.into(), style);
        self
    }
}

/// Container of named children that switches them together
pub struct CompositeEntity<R: Renderer> {
    rect: Rect,
    frame_origin: IVec2,
    renderer: Rc<R>,
    children: IndexMap<String, Child<R>>,
    states: IndexMap<String, CompositeStyle>,
    selected_state: Option<String>,
    events: EventRouter<Self>,
    last_input: Option<InputEvent>,
    refresh_input_on_update: bool,
}

impl<R: Renderer> CompositeEntity<R> {
    pub fn new(renderer: Rc<R>, config: CompositeConfig) -> Result<Self> {
        let CompositeConfig {
            rect,
            mut states,
            refresh_input_on_update,
        } = config;
        if rect.w < 0 || rect.h < 0 {
            return Err(Error::InvalidRect {
                w: rect.w,
                h: rect.h,
            });
        }
        states.entry(DEFAULT_STATE.to_string()).or_default();

        Ok(Self {
            rect,
            frame_origin: IVec2::ZERO,
            renderer,
            children: IndexMap::new(),
            states,
            selected_state: Some(DEFAULT_STATE.to_string()),
            events: EventRouter::new(),
            last_input: None,
            refresh_input_on_update,
        })
    }

    // Children

    /// Add a child under `name`
    ///
    /// A child that has a `default` state is also added to the composite's
    /// `default` state.
    pub fn add_child(&mut self, name: impl Into<String>, child: impl Into<Child<R>>) -> Result<()> {
        let name = name.into();
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(Error::AttributeCollision(name));
        }
        if self.children.contains_key(&name) {
            return Err(Error::DuplicateChild(name));
        }

        let child = child.into();
        if child.has_state(DEFAULT_STATE) {
            self.states
                .entry(DEFAULT_STATE.to_string())
                .or_default()
                .entry(name.clone())
                .or_insert_with(|| Fragment::State(DEFAULT_STATE.to_string()));
        }
        self.children.insert(name, child);
        Ok(())
    }

    /// Builder form of [`CompositeEntity::add_child`]
    pub fn with_child(mut self, name: impl Into<String>, child: impl Into<Child<R>>) -> Result<Self> {
        self.add_child(name, child)?;
        Ok(self)
    }

    /// Remove a child, and every state fragment that addressed it
    pub fn remove_child(&mut self, name: &str) -> Option<Child<R>> {
        let child = self.children.shift_remove(name)?;
        for style in self.states.values_mut() {
            style.shift_remove(name);
        }
        Some(child)
    }

    pub fn child(&self, name: &str) -> Option<&Child<R>> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Child<R>> {
        self.children.get_mut(name)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity<R>> {
        match self.children.get(name)? {
            Child::Entity(entity) => Some(entity),
            Child::Composite(_) => None,
        }
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity<R>> {
        match self.children.get_mut(name)? {
            Child::Entity(entity) => Some(entity),
            Child::Composite(_) => None,
        }
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeEntity<R>> {
        match self.children.get(name)? {
            Child::Composite(composite) => Some(composite),
            Child::Entity(_) => None,
        }
    }

    pub fn composite_mut(&mut self, name: &str) -> Option<&mut CompositeEntity<R>> {
        match self.children.get_mut(name)? {
            Child::Composite(composite) => Some(composite),
            Child::Entity(_) => None,
        }
    }

    /// Children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Child<R>)> {
        self.children.iter().map(|(name, child)| (name.as_str(), child))
    }

    // States

    pub fn add_state(&mut self, name: impl Into<String>, style: CompositeStyle) {
        self.states.insert(name.into(), style);
    }

    pub fn state(&self, name: &str) -> Option<&CompositeStyle> {
        self.states.get(name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    /// Whether any child is still transitioning
    pub fn is_transitioning(&self) -> bool {
        self.children.values().any(Child::is_transitioning)
    }

    fn resolve_target(&self, target: CompositeTarget) -> Result<(CompositeStyle, Option<String>)> {
        match target {
            CompositeTarget::State(name) => match self.states.get(&name) {
                Some(style) => Ok((style.clone(), Some(name))),
                None => Err(Error::UnknownState {
                    state: name,
                    owner: "composite".to_string(),
                }),
            },
            CompositeTarget::Style(style) => Ok((style, None)),
        }
    }

    fn validate_style(&self, style: &CompositeStyle) -> Result<()> {
        for (name, fragment) in style {
            let child = self
                .children
                .get(name)
                .ok_or_else(|| Error::UnknownChild(name.clone()))?;
            child.validate(name, fragment)?;
        }
        Ok(())
    }

    // Switching

    /// Construct every child listed in `target` with its fragment
    ///
    /// All fragments are checked first, down through nested composites; on
    /// error no child at any depth changes.
    pub fn construct(&mut self, target: impl Into<CompositeTarget>) -> Result<()> {
        let (style, selected) = self.resolve_target(target.into())?;
        self.validate_style(&style)?;

        for (name, fragment) in style {
            if let Some(child) = self.children.get_mut(&name) {
                child.construct(&name, fragment)?;
            }
        }
        self.selected_state = selected;
        Ok(())
    }

    /// Start a transition on every child listed in `target`
    ///
    /// Each child follows its own transition rules (including the no-op on
    /// its already selected state). Every child's transition is built before
    /// any is started, so an error leaves all children untouched.
    pub fn transition(
        &mut self,
        target: impl Into<CompositeTarget>,
        duration: f32,
        options: &TransitionOptions,
    ) -> Result<()> {
        let plan = self.plan_transition(target.into(), duration, options)?;
        self.apply_plan(plan);
        Ok(())
    }

    fn plan_transition(
        &self,
        target: CompositeTarget,
        duration: f32,
        options: &TransitionOptions,
    ) -> Result<CompositePlan> {
        if let CompositeTarget::State(name) = &target {
            if !options.force && self.selected_state.as_deref() == Some(name.as_str()) {
                return Ok(CompositePlan::Skip);
            }
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidDuration(duration));
        }

        let (style, selected) = self.resolve_target(target)?;
        let mut children = Vec::with_capacity(style.len());
        for (name, fragment) in style {
            let child = self
                .children
                .get(&name)
                .ok_or_else(|| Error::UnknownChild(name.clone()))?;
            let plan = child.plan_transition(&name, fragment, duration, options)?;
            children.push((name, plan));
        }
        Ok(CompositePlan::Apply { selected, children })
    }

    fn apply_plan(&mut self, plan: CompositePlan) {
        let CompositePlan::Apply { selected, children } = plan else {
            return;
        };
        log::debug!(
            "Composite transition to {:?} across {} children",
            selected.as_deref().unwrap_or("<inline style>"),
            children.len()
        );
        for (name, plan) in children {
            if let Some(child) = self.children.get_mut(&name) {
                child.apply_plan(plan);
            }
        }
        self.selected_state = selected;
    }

    // Driving

    /// Feed one input event to the composite's own handlers, then to every child
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.last_input = Some(event.clone());
        self.dispatch(event);

        let origin = self.rect().position();
        for (name, child) in self.children.iter_mut() {
            log::trace!("Forwarding event to child '{name}'");
            child.set_frame_origin(origin);
            child.handle_event(event);
            child.set_frame_origin(IVec2::ZERO);
        }
    }

    /// Refresh input, then advance every child by `dt` in insertion order
    pub fn update(&mut self, dt: f32) {
        self.refresh_input();
        self.advance(dt);
    }

    fn refresh_input(&mut self) {
        if self.refresh_input_on_update {
            if let Some(event) = &self.last_input {
                let idle = event.to_idle();
                self.dispatch(&idle);
            }
        }

        let origin = self.rect().position();
        for child in self.children.values_mut() {
            child.set_frame_origin(origin);
            child.refresh_input();
            child.set_frame_origin(IVec2::ZERO);
        }
    }

    fn advance(&mut self, dt: f32) {
        for child in self.children.values_mut() {
            child.advance(dt);
        }
    }

    fn dispatch(&mut self, event: &InputEvent) {
        let mut active = self.events.begin_dispatch();
        active.dispatch(self, event);
        self.events.end_dispatch(active);
    }

    /// Draw every child onto a surface the size of the composite, then blit it
    /// at the composite's position
    pub fn draw(&self, target: &mut R::Surface) {
        let (w, h) = self.rect.surface_size();
        let mut surface = self.renderer.create_surface(w, h);
        for child in self.children.values() {
            child.draw(&mut surface);
        }
        target.blit(&surface, self.rect().position());
    }

    // Events

    pub fn register_event(&mut self, registration: EventRegistration<Self>) -> EventHandle {
        self.events.register(registration)
    }

    pub fn unregister_event(&mut self, handle: &EventHandle) -> bool {
        self.events.unregister(handle)
    }

    pub fn on(
        &mut self,
        event: StandardEvent,
        callback: impl FnMut(&mut Self, bool) + 'static,
    ) -> EventHandle {
        self.register_event(EventRegistration::with_owner(callback).on(event))
    }

    // Accessors

    /// Rectangle in the coordinate space events arrive in
    pub fn rect(&self) -> Rect {
        self.rect.translated(self.frame_origin)
    }

    pub fn local_rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: impl Into<Rect>) {
        self.rect = rect.into().translated(-self.frame_origin);
    }

    pub fn renderer(&self) -> &Rc<R> {
        &self.renderer
    }
}

impl<R: Renderer> HitTarget for CompositeEntity<R> {
    fn hit_rect(&self) -> Rect {
        self.rect()
    }
}

impl<R: Renderer> std::fmt::Debug for CompositeEntity<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeEntity")
            .field("rect", &self.rect)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("selected_state", &self.selected_state)
            .finish_non_exhaustive()
    }
}
