//! Backend-agnostic input events
//!
//! Entities never poll devices. The host converts whatever its windowing
//! library delivers into [`InputEvent`]s; [`InputState`] helps with that by
//! tracking the pointer and held buttons between raw events.

use std::collections::HashSet;

use glam::Vec2;

/// Backend-agnostic mouse button representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Additional mouse buttons (back, forward, etc.)
    Other(u8),
}

/// Backend-agnostic named key representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Shift,
    Control,
    Alt,
    /// Function keys F1-F12
    F(u8),
}

/// Backend-agnostic key representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named key (Enter, Escape, arrows, etc.)
    Named(NamedKey),
    /// A character key (letters, numbers, symbols)
    Character(String),
    /// Unknown/unhandled key
    Unknown,
}

/// What happened
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Nothing new; used for the synthetic refresh on `update`
    Idle,
    CursorMoved,
    ButtonPressed(MouseButton),
    ButtonReleased(MouseButton),
    KeyPressed(Key),
    KeyReleased(Key),
    /// Scroll delta (horizontal, vertical) in pixels
    Scroll(Vec2),
}

/// One input event together with the pointer/button snapshot at that moment
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Cursor position in the coordinate space of the receiver, if known
    pub cursor_position: Option<Vec2>,
    /// Mouse buttons held after this event
    pub buttons_pressed: HashSet<MouseButton>,
}

impl InputEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            cursor_position: None,
            buttons_pressed: HashSet::new(),
        }
    }

    pub fn idle() -> Self {
        Self::new(EventKind::Idle)
    }

    pub fn cursor_moved(position: impl Into<Vec2>) -> Self {
        Self::new(EventKind::CursorMoved).with_cursor(position)
    }

    /// A press; the button is also recorded as held
    pub fn button_pressed(button: MouseButton) -> Self {
        Self::new(EventKind::ButtonPressed(button)).with_button_held(button)
    }

    pub fn button_released(button: MouseButton) -> Self {
        Self::new(EventKind::ButtonReleased(button))
    }

    pub fn with_cursor(mut self, position: impl Into<Vec2>) -> Self {
        self.cursor_position = Some(position.into());
        self
    }

    pub fn with_button_held(mut self, button: MouseButton) -> Self {
        self.buttons_pressed.insert(button);
        self
    }

    /// Same snapshot, no new occurrence
    pub fn to_idle(&self) -> Self {
        Self {
            kind: EventKind::Idle,
            cursor_position: self.cursor_position,
            buttons_pressed: self.buttons_pressed.clone(),
        }
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn pressed_button(&self) -> Option<MouseButton> {
        match self.kind {
            EventKind::ButtonPressed(button) => Some(button),
            _ => None,
        }
    }

    pub fn released_button(&self) -> Option<MouseButton> {
        match self.kind {
            EventKind::ButtonReleased(button) => Some(button),
            _ => None,
        }
    }
}

/// Tracks the pointer and held buttons across raw events
///
/// Each method records the change and returns the [`InputEvent`] to dispatch.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current cursor position in window coordinates, if known
    pub cursor_position: Option<Vec2>,
    /// Set of mouse buttons currently held down
    pub buttons_pressed: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn event(&self, kind: EventKind) -> InputEvent {
        InputEvent {
            kind,
            cursor_position: self.cursor_position,
            buttons_pressed: self.buttons_pressed.clone(),
        }
    }

    pub fn cursor_moved(&mut self, position: impl Into<Vec2>) -> InputEvent {
        self.cursor_position = Some(position.into());
        self.event(EventKind::CursorMoved)
    }

    /// The cursor left the window
    pub fn cursor_left(&mut self) -> InputEvent {
        self.cursor_position = None;
        self.event(EventKind::CursorMoved)
    }

    pub fn press(&mut self, button: MouseButton) -> InputEvent {
        self.buttons_pressed.insert(button);
        self.event(EventKind::ButtonPressed(button))
    }

    pub fn release(&mut self, button: MouseButton) -> InputEvent {
        self.buttons_pressed.remove(&button);
        self.event(EventKind::ButtonReleased(button))
    }

    pub fn key_pressed(&self, key: Key) -> InputEvent {
        self.event(EventKind::KeyPressed(key))
    }

    pub fn key_released(&self, key: Key) -> InputEvent {
        self.event(EventKind::KeyReleased(key))
    }

    pub fn scroll(&self, delta: impl Into<Vec2>) -> InputEvent {
        self.event(EventKind::Scroll(delta.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_tracks_buttons() {
        let mut state = InputState::new();
        state.cursor_moved((4.0, 5.0));

        let press = state.press(MouseButton::Left);
        assert_eq!(press.pressed_button(), Some(MouseButton::Left));
        assert!(press.is_pressed(MouseButton::Left));
        assert_eq!(press.cursor_position, Some(Vec2::new(4.0, 5.0)));

        let release = state.release(MouseButton::Left);
        assert_eq!(release.released_button(), Some(MouseButton::Left));
        assert!(!release.is_pressed(MouseButton::Left));
    }

    #[test]
    fn test_to_idle_keeps_snapshot() {
        let event = InputEvent::button_pressed(MouseButton::Right).with_cursor((1.0, 2.0));
        let idle = event.to_idle();
        assert_eq!(idle.kind, EventKind::Idle);
        assert_eq!(idle.cursor_position, event.cursor_position);
        assert!(idle.is_pressed(MouseButton::Right));
        assert_eq!(idle.pressed_button(), None);
    }

    #[test]
    fn test_cursor_left_clears_position() {
        let mut state = InputState::new();
        state.cursor_moved((1.0, 1.0));
        assert_eq!(state.cursor_left().cursor_position, None);
    }
}
