//! Button component
//!
//! A clickable entity with idle, hover, pressed and disabled states wired to
//! the standard hover/click/release events.

use std::cell::RefCell;
use std::rc::Rc;

use statewise::{
    catppuccin::mocha, Child, Curve, Entity, EntityConfig, EventRegistration, InputEvent, Rect,
    Renderer, Result, Rgba, StandardEvent, Style, TransitionOptions,
};
use statewise_macros::WithSetters;

/// Visual state of a button, stored as the entity's selected state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Not being interacted with
    #[default]
    Idle,
    /// Pointer over the button
    Hovered,
    /// Left button held after pressing on the button
    Pressed,
    /// Ignores input
    Disabled,
}

impl ButtonState {
    pub const ALL: [ButtonState; 4] = [
        ButtonState::Idle,
        ButtonState::Hovered,
        ButtonState::Pressed,
        ButtonState::Disabled,
    ];

    /// Name of the entity state backing this button state
    pub const fn name(self) -> &'static str {
        match self {
            ButtonState::Idle => "default",
            ButtonState::Hovered => "hover",
            ButtonState::Pressed => "pressed",
            ButtonState::Disabled => "disabled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }

    fn of<R: Renderer>(entity: &Entity<R>) -> Self {
        entity
            .selected_state()
            .and_then(Self::from_name)
            .unwrap_or_default()
    }
}

/// Visual styling for a button
#[derive(Debug, Clone, WithSetters)]
pub struct ButtonStyle {
    /// Background color when idle
    pub idle_color: Rgba,
    /// Background color when hovered
    pub hover_color: Rgba,
    /// Background color when pressed
    pub pressed_color: Rgba,
    /// Background color when disabled
    pub disabled_color: Rgba,

    /// Border color when idle
    pub idle_border_color: Rgba,
    /// Border color when hovered
    pub hover_border_color: Rgba,
    /// Border color when pressed
    pub pressed_border_color: Rgba,
    /// Border color when disabled
    pub disabled_border_color: Rgba,

    /// Label color
    pub text_color: Rgba,
    /// Disabled label color
    pub disabled_text_color: Rgba,

    pub border_width: i32,
    pub border_radius: i32,

    /// Seconds spent fading between states; 0 switches instantly
    pub transition_duration: f32,
    pub easing: Curve,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            // Fill Colors
            idle_color: mocha::BASE,
            hover_color: mocha::MANTLE,
            pressed_color: mocha::CRUST,
            disabled_color: mocha::BASE.with_alpha(204),
            // Border Colors
            idle_border_color: mocha::SURFACE0,
            hover_border_color: mocha::SURFACE1,
            pressed_border_color: mocha::SURFACE0,
            disabled_border_color: mocha::SURFACE0.with_alpha(204),
            // Text Colors
            text_color: mocha::TEXT,
            disabled_text_color: mocha::SUBTEXT1,
            // Others
            border_width: 2,
            border_radius: 12,
            transition_duration: 0.1,
            easing: Curve::from("quadratic_out"),
        }
    }
}

impl ButtonStyle {
    /// The entity style used for `state`
    pub fn state_style(&self, state: ButtonState, label: &str) -> Style {
        let (bg, border) = match state {
            ButtonState::Idle => (self.idle_color, self.idle_border_color),
            ButtonState::Hovered => (self.hover_color, self.hover_border_color),
            ButtonState::Pressed => (self.pressed_color, self.pressed_border_color),
            ButtonState::Disabled => (self.disabled_color, self.disabled_border_color),
        };
        let text_color = match state {
            ButtonState::Disabled => self.disabled_text_color,
            _ => self.text_color,
        };

        let base = Style::new()
            .with_border_width(self.border_width)
            .with_border_radius(self.border_radius)
            .with_text(label);
        base.merge(
            &Style::new()
                .with_bg(bg)
                .with_border(border)
                .with_text_color(text_color),
        )
    }

    fn transition_options(&self) -> TransitionOptions {
        TransitionOptions::new().with_easing(self.easing.clone())
    }
}

#[derive(Default)]
struct ButtonCallbacks {
    on_click: Option<Box<dyn FnMut()>>,
    on_hover: Option<Box<dyn FnMut(bool)>>,
}

/// A clickable button
///
/// # Example
///
/// ```ignore
/// let button = Button::new(renderer, (10, 10, 120, 40), "Click me")?
///     .on_click(|| println!("Clicked!"));
/// ```
pub struct Button<R: Renderer> {
    entity: Entity<R>,
    callbacks: Rc<RefCell<ButtonCallbacks>>,
}

fn switch<R: Renderer>(
    entity: &mut Entity<R>,
    state: ButtonState,
    duration: f32,
    options: &TransitionOptions,
) {
    if let Err(err) = entity.transition(state.name(), duration, options) {
        log::warn!("Button could not switch to {state:?}: {err}");
    }
}

impl<R: Renderer + 'static> Button<R> {
    /// Create a button with the default style
    pub fn new(renderer: Rc<R>, rect: impl Into<Rect>, label: impl Into<String>) -> Result<Self> {
        Self::styled(renderer, rect, label, ButtonStyle::default())
    }

    /// Create a button with a custom style
    pub fn styled(
        renderer: Rc<R>,
        rect: impl Into<Rect>,
        label: impl Into<String>,
        style: ButtonStyle,
    ) -> Result<Self> {
        let label = label.into();
        let config = ButtonState::ALL
            .into_iter()
            .fold(EntityConfig::new(rect), |config, state| {
                config.with_state(state.name(), style.state_style(state, &label))
            });

        let mut button = Self {
            entity: Entity::new(renderer, config)?,
            callbacks: Rc::new(RefCell::new(ButtonCallbacks::default())),
        };
        button.wire(&style);
        Ok(button)
    }

    // Handlers run in registration order, so hover settles the state before
    // a release is looked at.
    fn wire(&mut self, style: &ButtonStyle) {
        let duration = style.transition_duration;

        let options = style.transition_options();
        let callbacks = self.callbacks.clone();
        self.entity.register_event(
            EventRegistration::with_owner(move |entity: &mut Entity<R>, hovered: bool| {
                let target = match (ButtonState::of(entity), hovered) {
                    (ButtonState::Idle, true) => ButtonState::Hovered,
                    (ButtonState::Hovered | ButtonState::Pressed, false) => ButtonState::Idle,
                    _ => return,
                };
                switch(entity, target, duration, &options);
                if let Some(on_hover) = callbacks.borrow_mut().on_hover.as_mut() {
                    on_hover(hovered);
                }
            })
            .on(StandardEvent::Hover),
        );

        let options = style.transition_options();
        self.entity.register_event(
            EventRegistration::with_owner(move |entity: &mut Entity<R>, pressed: bool| {
                if !pressed {
                    return;
                }
                if matches!(
                    ButtonState::of(entity),
                    ButtonState::Idle | ButtonState::Hovered
                ) {
                    switch(entity, ButtonState::Pressed, duration, &options);
                }
            })
            .on(StandardEvent::LeftClick),
        );

        let options = style.transition_options();
        let callbacks = self.callbacks.clone();
        self.entity.register_event(
            EventRegistration::with_owner(move |entity: &mut Entity<R>, released: bool| {
                if !released || ButtonState::of(entity) != ButtonState::Pressed {
                    return;
                }
                switch(entity, ButtonState::Hovered, duration, &options);
                if let Some(on_click) = callbacks.borrow_mut().on_click.as_mut() {
                    on_click();
                }
            })
            .on(StandardEvent::LeftRelease),
        );
    }

    /// Called when the left button is released over a pressed button
    pub fn on_click(self, f: impl FnMut() + 'static) -> Self {
        self.callbacks.borrow_mut().on_click = Some(Box::new(f));
        self
    }

    /// Called with `true` when the pointer enters and `false` when it leaves
    pub fn on_hover(self, f: impl FnMut(bool) + 'static) -> Self {
        self.callbacks.borrow_mut().on_hover = Some(Box::new(f));
        self
    }
}

impl<R: Renderer> Button<R> {
    /// Enable or disable the button; switches instantly
    pub fn set_disabled(&mut self, disabled: bool) -> Result<()> {
        let state = if disabled {
            ButtonState::Disabled
        } else {
            ButtonState::Idle
        };
        self.entity.construct(state.name())
    }

    pub fn is_disabled(&self) -> bool {
        self.state() == ButtonState::Disabled
    }

    pub fn state(&self) -> ButtonState {
        ButtonState::of(&self.entity)
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.entity.handle_event(event);
    }

    pub fn update(&mut self, dt: f32) {
        self.entity.update(dt);
    }

    pub fn draw(&self, target: &mut R::Surface) {
        self.entity.draw(target);
    }

    pub fn rect(&self) -> Rect {
        self.entity.rect()
    }

    pub fn entity(&self) -> &Entity<R> {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity<R> {
        &mut self.entity
    }

    /// The underlying entity; its handlers keep firing the button's callbacks
    pub fn into_entity(self) -> Entity<R> {
        self.entity
    }
}

impl<R: Renderer> From<Button<R>> for Child<R> {
    fn from(button: Button<R>) -> Self {
        button.into_entity().into()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use statewise::{CompositeConfig, CompositeEntity, InputState, MouseButton};
    use statewise_raster::RasterRenderer;

    use super::*;

    fn instant() -> ButtonStyle {
        ButtonStyle::default().with_transition_duration(0.0)
    }

    fn button(style: ButtonStyle) -> Button<RasterRenderer> {
        Button::styled(
            Rc::new(RasterRenderer::new()),
            (10, 10, 40, 20),
            "ok",
            style,
        )
        .unwrap()
    }

    #[test]
    fn test_states_follow_pointer() {
        let mut button = button(instant());
        let mut input = InputState::new();
        assert_eq!(button.state(), ButtonState::Idle);

        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        assert_eq!(button.state(), ButtonState::Hovered);
        assert_eq!(
            button.entity().surface().pixel(20, 10),
            Some(mocha::MANTLE)
        );

        button.handle_event(&input.press(MouseButton::Left));
        assert_eq!(button.state(), ButtonState::Pressed);

        button.handle_event(&input.release(MouseButton::Left));
        assert_eq!(button.state(), ButtonState::Hovered);

        button.handle_event(&input.cursor_moved((0.0, 0.0)));
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut button = button(instant()).on_click(move || counter.set(counter.get() + 1));
        let mut input = InputState::new();

        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        button.handle_event(&input.press(MouseButton::Left));
        button.handle_event(&input.release(MouseButton::Left));
        assert_eq!(clicks.get(), 1);

        // Dragging off before releasing cancels the click
        button.handle_event(&input.press(MouseButton::Left));
        button.handle_event(&input.cursor_moved((100.0, 100.0)));
        button.handle_event(&input.release(MouseButton::Left));
        assert_eq!(clicks.get(), 1);
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn test_right_button_does_not_press() {
        let mut button = button(instant());
        let mut input = InputState::new();
        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        button.handle_event(&input.press(MouseButton::Right));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_hover_callback_on_enter_and_leave() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut button = button(instant()).on_hover(move |h| log.borrow_mut().push(h));
        let mut input = InputState::new();

        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        button.handle_event(&input.cursor_moved((21.0, 15.0)));
        button.update(0.1);
        button.handle_event(&input.cursor_moved((0.0, 0.0)));
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut button = button(instant()).on_click(move || counter.set(counter.get() + 1));
        button.set_disabled(true).unwrap();
        assert!(button.is_disabled());

        let mut input = InputState::new();
        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        button.handle_event(&input.press(MouseButton::Left));
        button.handle_event(&input.release(MouseButton::Left));
        assert_eq!(button.state(), ButtonState::Disabled);
        assert_eq!(clicks.get(), 0);

        button.set_disabled(false).unwrap();
        button.update(0.0);
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_hover_fades_over_duration() {
        let style = ButtonStyle::default()
            .with_idle_color((0, 0, 0))
            .with_hover_color((100, 100, 100))
            .with_transition_duration(1.0)
            .with_easing("linear");
        let mut button = button(style);
        let mut input = InputState::new();

        button.handle_event(&input.cursor_moved((20.0, 15.0)));
        assert!(button.entity().is_transitioning());
        button.update(0.5);
        assert_eq!(
            button.entity().style().bg,
            Some(Rgba::rgb(50, 50, 50).into())
        );
        button.update(0.5);
        assert!(!button.entity().is_transitioning());
        assert_eq!(
            button.entity().style().bg,
            Some(Rgba::rgb(100, 100, 100).into())
        );
    }

    #[test]
    fn test_button_inside_composite() {
        let renderer = Rc::new(RasterRenderer::new());
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let button = Button::styled(renderer.clone(), (5, 5, 20, 10), "ok", instant())
            .unwrap()
            .on_click(move || counter.set(counter.get() + 1));

        let mut panel = CompositeEntity::new(renderer, CompositeConfig::new((100, 100, 50, 50)))
            .unwrap()
            .with_child("ok", button)
            .unwrap();

        let mut input = InputState::new();
        panel.handle_event(&input.cursor_moved((110.0, 110.0)));
        assert_eq!(
            panel.entity("ok").and_then(Entity::selected_state),
            Some("hover")
        );
        panel.handle_event(&input.press(MouseButton::Left));
        panel.handle_event(&input.release(MouseButton::Left));
        assert_eq!(clicks.get(), 1);
    }
}
