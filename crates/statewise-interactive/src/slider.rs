//! Slider component
//!
//! A track with a pointer. The pointer follows the cursor from a left click
//! on it until the next left release, and its position along the track maps
//! to a value in `0..=max`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::IVec2;
use statewise::{
    catppuccin::mocha, Child, CompositeConfig, CompositeEntity, Entity, EntityConfig,
    EventRegistration, InputEvent, Rect, Renderer, Result, Rgba, StandardEvent, Style,
    DEFAULT_STATE,
};
use statewise_macros::WithSetters;

const TRACK: &str = "track";
const POINTER: &str = "pointer";

const POINTER_HOVER: &str = "hover";
const POINTER_PRESSED: &str = "pressed";

/// Visual styling for a slider
#[derive(Debug, Clone, WithSetters)]
pub struct SliderStyle {
    /// Fill of the track the pointer runs along
    pub track_color: Rgba,
    pub track_border_color: Rgba,
    pub track_border_width: i32,
    /// Pointer color when idle
    pub pointer_color: Rgba,
    /// Pointer color when hovered
    pub pointer_hover_color: Rgba,
    /// Pointer color while dragged
    pub pointer_active_color: Rgba,
    /// Slide along the y axis instead of x
    pub vertical: bool,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            track_color: mocha::SURFACE0,
            track_border_color: mocha::SURFACE1,
            track_border_width: 2,
            pointer_color: mocha::BASE,
            pointer_hover_color: mocha::SURFACE2,
            pointer_active_color: mocha::MAUVE,
            vertical: false,
        }
    }
}

impl SliderStyle {
    fn axis(&self) -> usize {
        usize::from(self.vertical)
    }

    fn track_style(&self, size: IVec2) -> Style {
        let thickness = track_rect(size, self.axis()).size()[1 - self.axis()];
        Style::new()
            .with_bg(self.track_color)
            .with_border(self.track_border_color)
            .with_border_width(self.track_border_width)
            .with_border_radius(thickness / 2)
    }

    fn pointer_style(&self, size: IVec2, color: Rgba) -> Style {
        Style::new()
            .with_bg(color)
            .with_border_radius(pointer_side(size, self.axis()) / 2)
    }
}

/// The track spans the full length at half the thickness, centred
fn track_rect(size: IVec2, axis: usize) -> Rect {
    let cross = 1 - axis;
    let mut dims = size.max(IVec2::ZERO);
    dims[cross] = size[cross] / 2;
    let mut position = IVec2::ZERO;
    position[cross] = (size[cross] - dims[cross]) / 2;
    Rect::from_position_size(position, dims)
}

/// The pointer is a square as thick as the slider
fn pointer_side(size: IVec2, axis: usize) -> i32 {
    size[1 - axis].min(size[axis]).max(0)
}

/// Distance the pointer's leading edge can move
fn travel(size: IVec2, axis: usize) -> i32 {
    (size[axis] - pointer_side(size, axis)).max(0)
}

/// Pointer rectangle for a filled share in `0.0..=1.0`
fn pointer_rect(size: IVec2, axis: usize, fraction: f32) -> Rect {
    let mut position = IVec2::ZERO;
    position[axis] = (travel(size, axis) as f32 * fraction.clamp(0.0, 1.0)).round() as i32;
    Rect::from_position_size(position, IVec2::splat(pointer_side(size, axis)))
}

/// Filled share for a pointer centred at `along` on the slider's axis
fn fraction_at(size: IVec2, axis: usize, along: f32) -> f32 {
    let travel = travel(size, axis) as f32;
    if travel <= 0.0 {
        return 0.0;
    }
    let half = pointer_side(size, axis) as f32 / 2.0;
    ((along - half) / travel).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy)]
struct SliderModel {
    value: f32,
    max: f32,
    dragging: bool,
    disabled: bool,
}

impl SliderModel {
    fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Default)]
struct SliderCallbacks {
    on_change: Option<Box<dyn FnMut(f32)>>,
}

/// A draggable slider over `0..=max`
///
/// # Example
///
/// ```ignore
/// let slider = Slider::new(renderer, (10, 10, 200, 20), 100.0)?
///     .on_change(|value| println!("Value: {value}"));
/// ```
pub struct Slider<R: Renderer> {
    composite: CompositeEntity<R>,
    model: Rc<Cell<SliderModel>>,
    callbacks: Rc<RefCell<SliderCallbacks>>,
    axis: usize,
}

fn show<R: Renderer>(pointer: &mut Entity<R>, state: &str) {
    if pointer.selected_state() == Some(state) {
        return;
    }
    if let Err(err) = pointer.construct(state) {
        log::warn!("Slider pointer could not switch to '{state}': {err}");
    }
}

impl<R: Renderer + 'static> Slider<R> {
    /// A slider at zero counting up to `max`
    pub fn new(renderer: Rc<R>, rect: impl Into<Rect>, max: f32) -> Result<Self> {
        Self::styled(renderer, rect, max, SliderStyle::default())
    }

    pub fn styled(
        renderer: Rc<R>,
        rect: impl Into<Rect>,
        max: f32,
        style: SliderStyle,
    ) -> Result<Self> {
        let rect = rect.into();
        let size = rect.size();
        let axis = style.axis();

        let track = Entity::new(
            renderer.clone(),
            EntityConfig::new(track_rect(size, axis))
                .with_state(DEFAULT_STATE, style.track_style(size)),
        )?;
        let pointer = Entity::new(
            renderer.clone(),
            EntityConfig::new(pointer_rect(size, axis, 0.0))
                .with_state(DEFAULT_STATE, style.pointer_style(size, style.pointer_color))
                .with_state(POINTER_HOVER, style.pointer_style(size, style.pointer_hover_color))
                .with_state(
                    POINTER_PRESSED,
                    style.pointer_style(size, style.pointer_active_color),
                ),
        )?;
        let composite = CompositeEntity::new(renderer, CompositeConfig::new(rect))?
            .with_child(TRACK, track)?
            .with_child(POINTER, pointer)?;

        let mut slider = Self {
            composite,
            model: Rc::new(Cell::new(SliderModel {
                value: 0.0,
                max: max.max(0.0),
                dragging: false,
                disabled: false,
            })),
            callbacks: Rc::new(RefCell::new(SliderCallbacks::default())),
            axis,
        };
        slider.wire();
        Ok(slider)
    }

    // The composite sees every event before its children, so the pointer
    // moves before its own handlers test the cursor against it.
    fn wire(&mut self) {
        let axis = self.axis;
        let model = self.model.clone();
        let callbacks = self.callbacks.clone();
        self.composite.register_event(
            EventRegistration::with_event(
                move |composite: &mut CompositeEntity<R>, event: &InputEvent, _| {
                    let mut state = model.get();
                    let Some(cursor) = event.cursor_position.filter(|_| state.dragging) else {
                        return;
                    };
                    let local = cursor - composite.rect().position().as_vec2();
                    let size = composite.local_rect().size();
                    let fraction = fraction_at(size, axis, local[axis]);
                    if let Some(pointer) = composite.entity_mut(POINTER) {
                        pointer.set_rect(pointer_rect(size, axis, fraction));
                    }

                    let value = fraction * state.max;
                    if value == state.value {
                        return;
                    }
                    state.value = value;
                    model.set(state);
                    if let Some(on_change) = callbacks.borrow_mut().on_change.as_mut() {
                        on_change(value);
                    }
                },
            )
            .named("drag")
            .always(),
        );

        let Some(pointer) = self.composite.entity_mut(POINTER) else {
            return;
        };

        let model = self.model.clone();
        pointer.register_event(
            EventRegistration::with_owner(move |pointer: &mut Entity<R>, pressed: bool| {
                let mut state = model.get();
                if !pressed || state.disabled {
                    return;
                }
                state.dragging = true;
                model.set(state);
                show(pointer, POINTER_PRESSED);
            })
            .on(StandardEvent::LeftClick),
        );

        let model = self.model.clone();
        pointer.register_event(
            EventRegistration::with_owner(move |pointer: &mut Entity<R>, released: bool| {
                let mut state = model.get();
                if !released || !state.dragging {
                    return;
                }
                state.dragging = false;
                model.set(state);
                show(pointer, DEFAULT_STATE);
            })
            .on(StandardEvent::LeftRelease),
        );

        // After release, so a release over the pointer lands on hover
        let model = self.model.clone();
        pointer.register_event(
            EventRegistration::with_owner(move |pointer: &mut Entity<R>, hovered: bool| {
                if model.get().dragging {
                    return;
                }
                show(pointer, if hovered { POINTER_HOVER } else { DEFAULT_STATE });
            })
            .on(StandardEvent::Hover),
        );
    }

    /// Called with the new value whenever dragging changes it
    pub fn on_change(self, f: impl FnMut(f32) + 'static) -> Self {
        self.callbacks.borrow_mut().on_change = Some(Box::new(f));
        self
    }
}

impl<R: Renderer> Slider<R> {
    pub fn value(&self) -> f32 {
        self.model.get().value
    }

    pub fn max(&self) -> f32 {
        self.model.get().max
    }

    /// Position of the pointer along the track in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        self.model.get().fraction()
    }

    pub fn is_dragging(&self) -> bool {
        self.model.get().dragging
    }

    /// Set the value, clamped to `0..=max`, and move the pointer to it
    ///
    /// Does not call `on_change`; non-finite values are ignored.
    pub fn set_value(&mut self, value: f32) {
        if !value.is_finite() {
            log::warn!("Slider ignoring non-finite value {value}");
            return;
        }
        let mut state = self.model.get();
        state.value = value.clamp(0.0, state.max);
        self.model.set(state);
        self.place_pointer();
    }

    /// Change the maximum; the current value is clamped to it
    pub fn set_max(&mut self, max: f32) {
        if !max.is_finite() {
            log::warn!("Slider ignoring non-finite max {max}");
            return;
        }
        let mut state = self.model.get();
        state.max = max.max(0.0);
        state.value = state.value.clamp(0.0, state.max);
        self.model.set(state);
        self.place_pointer();
    }

    /// A disabled slider cannot be picked up; a running drag ends
    pub fn set_disabled(&mut self, disabled: bool) {
        let mut state = self.model.get();
        state.disabled = disabled;
        state.dragging &= !disabled;
        self.model.set(state);
    }

    pub fn is_disabled(&self) -> bool {
        self.model.get().disabled
    }

    fn place_pointer(&mut self) {
        let size = self.composite.local_rect().size();
        let rect = pointer_rect(size, self.axis, self.fraction());
        if let Some(pointer) = self.composite.entity_mut(POINTER) {
            pointer.set_rect(rect);
        }
    }

    /// Pointer rectangle relative to the slider
    pub fn pointer_rect(&self) -> Option<Rect> {
        self.composite.entity(POINTER).map(Entity::local_rect)
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.composite.handle_event(event);
    }

    pub fn update(&mut self, dt: f32) {
        self.composite.update(dt);
    }

    pub fn draw(&self, target: &mut R::Surface) {
        self.composite.draw(target);
    }

    pub fn rect(&self) -> Rect {
        self.composite.rect()
    }

    pub fn composite(&self) -> &CompositeEntity<R> {
        &self.composite
    }

    /// The underlying composite; its handlers keep dragging the pointer
    pub fn into_composite(self) -> CompositeEntity<R> {
        self.composite
    }
}

impl<R: Renderer> From<Slider<R>> for Child<R> {
    fn from(slider: Slider<R>) -> Self {
        slider.into_composite().into()
    }
}
