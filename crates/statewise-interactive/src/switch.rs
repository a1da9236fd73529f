//! Switch component
//!
//! A body with a knob that slides between an off and an on position. A left
//! click on the body flips the value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::IVec2;
use statewise::{
    catppuccin::mocha, Child, CompositeConfig, CompositeEntity, CompositeStyle, Curve, Entity,
    EntityConfig, EventRegistration, Fragment, InputEvent, Rect, Renderer, Result, Rgba,
    StandardEvent, Style, TransitionOptions,
};
use statewise_macros::WithSetters;

const BODY: &str = "body";
const KNOB: &str = "knob";

/// Name of the composite state backing a switch value
pub const fn switch_state(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Visual styling for a switch
#[derive(Debug, Clone, WithSetters)]
pub struct SwitchStyle {
    /// Body color when off
    pub off_color: Rgba,
    /// Body color when on
    pub on_color: Rgba,
    pub knob_color: Rgba,
    /// Gap between the knob and the body edge
    pub knob_margin: i32,
    /// Seconds the knob takes to slide across; 0 switches instantly
    pub transition_duration: f32,
    pub easing: Curve,
}

impl Default for SwitchStyle {
    fn default() -> Self {
        Self {
            off_color: mocha::SURFACE0,
            on_color: mocha::LAVENDER,
            knob_color: mocha::BASE,
            knob_margin: 2,
            transition_duration: 0.15,
            easing: Curve::from("quadratic_out"),
        }
    }
}

impl SwitchStyle {
    /// Where the knob sits inside a body of `size`
    pub fn knob_rect(&self, size: IVec2, on: bool) -> Rect {
        let margin = self.knob_margin;
        let side = (size.y - 2 * margin).max(0);
        let x = if on {
            (size.x - margin - side).max(margin)
        } else {
            margin
        };
        Rect::new(x, margin, side, side)
    }

    fn body_style(&self, size: IVec2, on: bool) -> Style {
        let color = if on { self.on_color } else { self.off_color };
        Style::new()
            .with_bg(color)
            .with_border_radius(size.y / 2)
    }

    fn knob_style(&self, size: IVec2, on: bool) -> Style {
        let rect = self.knob_rect(size, on);
        Style::new()
            .with_rect(rect)
            .with_bg(self.knob_color)
            .with_border_radius(rect.h / 2)
    }

    fn transition_options(&self) -> TransitionOptions {
        TransitionOptions::new().with_easing(self.easing.clone())
    }
}

#[derive(Default)]
struct SwitchCallbacks {
    on_toggle: Option<Box<dyn FnMut(bool)>>,
}

/// An on/off switch
///
/// # Example
///
/// ```ignore
/// let switch = Switch::new(renderer, (10, 10, 50, 30))?
///     .on_toggle(|on| println!("Switch is {on}"));
/// ```
pub struct Switch<R: Renderer> {
    composite: CompositeEntity<R>,
    value: Rc<Cell<bool>>,
    disabled: Rc<Cell<bool>>,
    callbacks: Rc<RefCell<SwitchCallbacks>>,
    duration: f32,
    options: TransitionOptions,
}

impl<R: Renderer + 'static> Switch<R> {
    /// An off switch with the default style
    pub fn new(renderer: Rc<R>, rect: impl Into<Rect>) -> Result<Self> {
        Self::styled(renderer, rect, SwitchStyle::default())
    }

    pub fn styled(renderer: Rc<R>, rect: impl Into<Rect>, style: SwitchStyle) -> Result<Self> {
        let rect = rect.into();
        let size = rect.size();

        let mut body_config = EntityConfig::new(rect.at_origin());
        let mut knob_config = EntityConfig::new(style.knob_rect(size, false));
        let mut config = CompositeConfig::new(rect);
        for on in [false, true] {
            let state = switch_state(on);
            body_config = body_config.with_state(state, style.body_style(size, on));
            knob_config = knob_config.with_state(state, style.knob_style(size, on));
            let fragments: CompositeStyle = [BODY, KNOB]
                .into_iter()
                .map(|child| (child.to_string(), Fragment::from(state)))
                .collect();
            config = config.with_state(state, fragments);
        }

        let mut composite = CompositeEntity::new(renderer.clone(), config)?
            .with_child(BODY, Entity::new(renderer.clone(), body_config)?)?
            .with_child(KNOB, Entity::new(renderer, knob_config)?)?;
        composite.construct(switch_state(false))?;

        let mut switch = Self {
            composite,
            value: Rc::new(Cell::new(false)),
            disabled: Rc::new(Cell::new(false)),
            callbacks: Rc::new(RefCell::new(SwitchCallbacks::default())),
            duration: style.transition_duration,
            options: style.transition_options(),
        };
        switch.wire();
        Ok(switch)
    }

    fn wire(&mut self) {
        let value = self.value.clone();
        let disabled = self.disabled.clone();
        let callbacks = self.callbacks.clone();
        let duration = self.duration;
        let options = self.options.clone();
        self.composite.register_event(
            EventRegistration::with_owner(move |composite: &mut CompositeEntity<R>, clicked| {
                if !clicked || disabled.get() {
                    return;
                }
                let on = !value.get();
                value.set(on);
                if let Err(err) = composite.transition(switch_state(on), duration, &options) {
                    log::warn!("Switch could not slide to '{}': {err}", switch_state(on));
                }
                if let Some(on_toggle) = callbacks.borrow_mut().on_toggle.as_mut() {
                    on_toggle(on);
                }
            })
            .on(StandardEvent::LeftClick),
        );
    }

    /// Called with the new value after a click flips the switch
    pub fn on_toggle(self, f: impl FnMut(bool) + 'static) -> Self {
        self.callbacks.borrow_mut().on_toggle = Some(Box::new(f));
        self
    }
}

impl<R: Renderer> Switch<R> {
    pub fn value(&self) -> bool {
        self.value.get()
    }

    /// Set the value instantly, without calling `on_toggle`
    pub fn set_value(&mut self, on: bool) -> Result<()> {
        self.composite.construct(switch_state(on))?;
        self.value.set(on);
        Ok(())
    }

    /// Flip the value with the usual slide, without calling `on_toggle`
    pub fn toggle(&mut self) -> Result<()> {
        let on = !self.value.get();
        self.composite
            .transition(switch_state(on), self.duration, &self.options)?;
        self.value.set(on);
        Ok(())
    }

    /// A disabled switch ignores clicks
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
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

    /// Knob rectangle relative to the switch
    pub fn knob_rect(&self) -> Option<Rect> {
        self.composite.entity(KNOB).map(Entity::local_rect)
    }

    pub fn composite(&self) -> &CompositeEntity<R> {
        &self.composite
    }

    /// The underlying composite; its handlers keep flipping the value
    pub fn into_composite(self) -> CompositeEntity<R> {
        self.composite
    }
}

impl<R: Renderer> From<Switch<R>> for Child<R> {
    fn from(switch: Switch<R>) -> Self {
        switch.into_composite().into()
    }
}

#[cfg(test)]
mod tests {
    use statewise::{InputState, MouseButton};
    use statewise_raster::RasterRenderer;

    use super::*;

    fn instant() -> SwitchStyle {
        SwitchStyle::default().with_transition_duration(0.0)
    }

    fn switch(style: SwitchStyle) -> Switch<RasterRenderer> {
        Switch::styled(Rc::new(RasterRenderer::new()), (10, 10, 40, 20), style).unwrap()
    }

    fn click(switch: &mut Switch<RasterRenderer>, input: &mut InputState, at: (f32, f32)) {
        switch.handle_event(&input.cursor_moved(at));
        switch.handle_event(&input.press(MouseButton::Left));
        switch.handle_event(&input.release(MouseButton::Left));
    }

    #[test]
    fn test_knob_positions() {
        let style = SwitchStyle::default();
        let size = IVec2::new(40, 20);
        assert_eq!(style.knob_rect(size, false), Rect::new(2, 2, 16, 16));
        assert_eq!(style.knob_rect(size, true), Rect::new(22, 2, 16, 16));
        // too narrow to travel
        assert_eq!(style.knob_rect(IVec2::new(10, 20), true), Rect::new(2, 2, 16, 16));
    }

    #[test]
    fn test_click_flips_value() {
        let toggles = Rc::new(RefCell::new(Vec::new()));
        let sink = toggles.clone();
        let mut switch = switch(instant()).on_toggle(move |on| sink.borrow_mut().push(on));
        let mut input = InputState::new();
        assert!(!switch.value());

        click(&mut switch, &mut input, (20.0, 15.0));
        assert!(switch.value());
        assert_eq!(switch.composite().selected_state(), Some("on"));
        assert_eq!(switch.knob_rect(), Some(Rect::new(22, 2, 16, 16)));

        click(&mut switch, &mut input, (45.0, 25.0));
        assert!(!switch.value());
        assert_eq!(switch.knob_rect(), Some(Rect::new(2, 2, 16, 16)));
        assert_eq!(*toggles.borrow(), vec![true, false]);
    }

    #[test]
    fn test_click_outside_and_idle_ticks_ignored() {
        let mut switch = switch(instant());
        let mut input = InputState::new();
        click(&mut switch, &mut input, (5.0, 15.0));
        assert!(!switch.value());

        // the pressed snapshot is replayed as idle and must not flip again
        switch.handle_event(&input.cursor_moved((20.0, 15.0)));
        switch.handle_event(&input.press(MouseButton::Left));
        switch.update(0.1);
        switch.update(0.1);
        assert!(switch.value());
    }

    #[test]
    fn test_knob_slides_over_duration() {
        let style = SwitchStyle::default()
            .with_transition_duration(1.0)
            .with_easing("linear");
        let mut switch = switch(style);
        let mut input = InputState::new();

        click(&mut switch, &mut input, (20.0, 15.0));
        assert!(switch.composite().is_transitioning());
        switch.update(0.5);
        assert_eq!(switch.knob_rect(), Some(Rect::new(12, 2, 16, 16)));
        switch.update(0.5);
        assert!(!switch.composite().is_transitioning());
        assert_eq!(switch.knob_rect(), Some(Rect::new(22, 2, 16, 16)));
    }

    #[test]
    fn test_disabled_and_programmatic_changes() {
        let toggles = Rc::new(RefCell::new(Vec::new()));
        let sink = toggles.clone();
        let mut switch = switch(instant()).on_toggle(move |on| sink.borrow_mut().push(on));
        let mut input = InputState::new();

        switch.set_disabled(true);
        click(&mut switch, &mut input, (20.0, 15.0));
        assert!(!switch.value());

        switch.set_value(true).unwrap();
        assert!(switch.value());
        switch.toggle().unwrap();
        assert!(!switch.value());
        assert_eq!(switch.composite().selected_state(), Some("off"));
        assert!(toggles.borrow().is_empty());
    }

    #[test]
    fn test_draws_body_and_knob() {
        let renderer = Rc::new(RasterRenderer::new());
        let mut switch = Switch::styled(renderer.clone(), (10, 10, 40, 20), instant()).unwrap();
        switch.set_value(true).unwrap();

        let mut screen = renderer.create_surface(60, 40);
        switch.draw(&mut screen);
        assert_eq!(screen.pixel(15, 20), Some(mocha::LAVENDER));
        assert_eq!(screen.pixel(40, 20), Some(mocha::BASE));
        assert_eq!(screen.pixel(5, 5), Some(Rgba::transparent()));
    }
}
