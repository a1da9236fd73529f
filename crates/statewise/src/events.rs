//! Event routing for entities
//!
//! Every entity owns an [`EventRouter`]: an ordered table of named handlers,
//! each a predicate plus a callback. On every input event all handlers run in
//! registration order and receive the predicate's result, so callbacks see
//! both the `true` and the `false` edge of a condition (level-triggered).
//!
//! Callbacks may mutate their owner, including its router. Handlers
//! registered or removed while a dispatch is running take effect from the
//! next dispatch, but queries on the router already report them.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::geometry::Rect;
use crate::input::{InputEvent, MouseButton};

/// Something with an on-screen rectangle that standard predicates can test against
pub trait HitTarget {
    /// Rectangle in the coordinate space of incoming events
    fn hit_rect(&self) -> Rect;
}

/// Built-in predicates, addressed by name (`onhover`, `onleftclick`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardEvent {
    /// Cursor inside the rectangle
    Hover,
    /// Any button pressed while hovered
    Click,
    LeftClick,
    MiddleClick,
    RightClick,
    /// Any button released, wherever the cursor is
    Release,
    LeftRelease,
    MiddleRelease,
    RightRelease,
}

impl StandardEvent {
    pub const ALL: [StandardEvent; 9] = [
        StandardEvent::Hover,
        StandardEvent::Click,
        StandardEvent::LeftClick,
        StandardEvent::MiddleClick,
        StandardEvent::RightClick,
        StandardEvent::Release,
        StandardEvent::LeftRelease,
        StandardEvent::MiddleRelease,
        StandardEvent::RightRelease,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StandardEvent::Hover => "onhover",
            StandardEvent::Click => "onclick",
            StandardEvent::LeftClick => "onleftclick",
            StandardEvent::MiddleClick => "onmiddleclick",
            StandardEvent::RightClick => "onrightclick",
            StandardEvent::Release => "onrelease",
            StandardEvent::LeftRelease => "onleftrelease",
            StandardEvent::MiddleRelease => "onmiddlerelease",
            StandardEvent::RightRelease => "onrightrelease",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }

    /// Evaluate the predicate for a target occupying `rect`
    pub fn matches(self, rect: Rect, event: &InputEvent) -> bool {
        let hovered = event
            .cursor_position
            .is_some_and(|position| rect.contains_point(position));
        let pressed = |button: MouseButton| hovered && event.pressed_button() == Some(button);
        let released = |button: MouseButton| event.released_button() == Some(button);

        match self {
            StandardEvent::Hover => hovered,
            StandardEvent::Click => hovered && event.pressed_button().is_some(),
            StandardEvent::LeftClick => pressed(MouseButton::Left),
            StandardEvent::MiddleClick => pressed(MouseButton::Middle),
            StandardEvent::RightClick => pressed(MouseButton::Right),
            StandardEvent::Release => event.released_button().is_some(),
            StandardEvent::LeftRelease => released(MouseButton::Left),
            StandardEvent::MiddleRelease => released(MouseButton::Middle),
            StandardEvent::RightRelease => released(MouseButton::Right),
        }
    }
}

impl fmt::Display for StandardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a handler's callback receives `true`
pub enum Condition<T> {
    Standard(StandardEvent),
    Custom(Box<dyn Fn(&T, &InputEvent) -> bool>),
    Always,
}

impl<T: HitTarget> Condition<T> {
    pub fn evaluate(&self, owner: &T, event: &InputEvent) -> bool {
        match self {
            Condition::Standard(standard) => standard.matches(owner.hit_rect(), event),
            Condition::Custom(predicate) => predicate(owner, event),
            Condition::Always => true,
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Standard(standard) => f.debug_tuple("Standard").field(standard).finish(),
            Condition::Custom(_) => f.write_str("Custom(..)"),
            Condition::Always => f.write_str("Always"),
        }
    }
}

/// What a handler calls with the predicate result
pub enum Callback<T> {
    /// Receives only the result
    Flag(Box<dyn FnMut(bool)>),
    /// Receives the owner and the result
    Owner(Box<dyn FnMut(&mut T, bool)>),
    /// Receives the owner, the event being dispatched and the result
    Event(Box<dyn FnMut(&mut T, &InputEvent, bool)>),
}

/// Description of a handler to register
///
/// ```ignore
/// entity.register_event(
///     EventRegistration::with_owner(|entity: &mut Entity<_>, hovered| { /* ... */ })
///         .on(StandardEvent::Hover),
/// );
/// ```
pub struct EventRegistration<T> {
    name: Option<String>,
    condition: Option<Condition<T>>,
    callback: Callback<T>,
}

impl<T> EventRegistration<T> {
    pub fn new(callback: impl FnMut(bool) + 'static) -> Self {
        Self {
            name: None,
            condition: None,
            callback: Callback::Flag(Box::new(callback)),
        }
    }

    pub fn with_owner(callback: impl FnMut(&mut T, bool) + 'static) -> Self {
        Self {
            name: None,
            condition: None,
            callback: Callback::Owner(Box::new(callback)),
        }
    }

    /// A callback that also reads the dispatched event, e.g. to follow the cursor
    pub fn with_event(callback: impl FnMut(&mut T, &InputEvent, bool) + 'static) -> Self {
        Self {
            name: None,
            condition: None,
            callback: Callback::Event(Box::new(callback)),
        }
    }

    /// Handler name; a standard name also selects the standard predicate
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on(mut self, event: StandardEvent) -> Self {
        self.condition = Some(Condition::Standard(event));
        self
    }

    pub fn when(mut self, predicate: impl Fn(&T, &InputEvent) -> bool + 'static) -> Self {
        self.condition = Some(Condition::Custom(Box::new(predicate)));
        self
    }

    pub fn always(mut self) -> Self {
        self.condition = Some(Condition::Always);
        self
    }
}

/// Returned by registration, used to unregister
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventHandle(String);

impl EventHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

struct Handler<T> {
    condition: Condition<T>,
    callback: Callback<T>,
}

/// Ordered `name -> (predicate, callback)` table
pub struct EventRouter<T> {
    handlers: IndexMap<String, Handler<T>>,
    next_id: usize,
    // Set on the stand-in router an owner holds while a dispatch is running
    collecting: bool,
    // Names of the handlers taken out for that dispatch
    dispatched: IndexSet<String>,
    deferred_removals: Vec<String>,
}

impl<T> Default for EventRouter<T> {
    fn default() -> Self {
        Self {
            handlers: IndexMap::new(),
            next_id: 0,
            collecting: false,
            dispatched: IndexSet::new(),
            deferred_removals: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for EventRouter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("handlers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> EventRouter<T> {
    /// Whether a handler is registered under `name`
    ///
    /// Inside a callback this answers for the router as it will be after the
    /// running dispatch: the dispatched handlers plus pending changes.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name) || self.keeps_dispatched(name)
    }

    /// Handler names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let kept = self
            .dispatched
            .iter()
            .filter(move |name| self.keeps_dispatched(name));
        let added = self
            .handlers
            .keys()
            .filter(move |name| !self.keeps_dispatched(name));
        kept.chain(added).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keeps_dispatched(&self, name: &str) -> bool {
        self.dispatched.contains(name) && !self.deferred_removals.iter().any(|n| n == name)
    }
}

impl<T: HitTarget> EventRouter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler, replacing any handler with the same name
    pub fn register(&mut self, registration: EventRegistration<T>) -> EventHandle {
        let EventRegistration {
            name,
            condition,
            callback,
        } = registration;

        let name = match (name, &condition) {
            (Some(name), _) => name,
            (None, Some(Condition::Standard(standard))) => standard.name().to_string(),
            (None, _) => {
                let generated = format!("handler_{}", self.next_id);
                self.next_id += 1;
                generated
            }
        };
        let condition = condition.unwrap_or_else(|| match StandardEvent::from_name(&name) {
            Some(standard) => Condition::Standard(standard),
            None => Condition::Always,
        });

        log::trace!("Registering event handler '{name}' ({condition:?})");
        self.handlers.insert(name.clone(), Handler { condition, callback });
        EventHandle(name)
    }

    /// Remove a handler; returns whether it was present
    ///
    /// During a dispatch the removal is deferred and always reported as done.
    pub fn unregister(&mut self, handle: &EventHandle) -> bool {
        let removed = self.handlers.shift_remove(handle.name()).is_some();
        if self.collecting {
            self.deferred_removals.push(handle.name().to_string());
            return true;
        }
        removed
    }

    /// Take the handlers out for a dispatch, leaving a collector in their place
    ///
    /// The owner keeps the collector while callbacks run so that they can
    /// register and unregister handlers. Pair with [`EventRouter::end_dispatch`].
    pub fn begin_dispatch(&mut self) -> EventRouter<T> {
        let collector = EventRouter {
            handlers: IndexMap::new(),
            next_id: self.next_id,
            collecting: true,
            dispatched: self.handlers.keys().cloned().collect(),
            deferred_removals: Vec::new(),
        };
        std::mem::replace(self, collector)
    }

    /// Put the dispatched handlers back and apply what the callbacks changed
    pub fn end_dispatch(&mut self, active: EventRouter<T>) {
        let collector = std::mem::replace(self, active);
        for name in &collector.deferred_removals {
            self.handlers.shift_remove(name);
        }
        self.handlers.extend(collector.handlers);
        self.next_id = collector.next_id;
    }

    /// Run every handler against `event`
    pub fn dispatch(&mut self, owner: &mut T, event: &InputEvent) {
        for (name, handler) in self.handlers.iter_mut() {
            let result = handler.condition.evaluate(owner, event);
            log::trace!("Dispatch '{name}': {result}");
            match &mut handler.callback {
                Callback::Flag(callback) => callback(result),
                Callback::Owner(callback) => callback(owner, result),
                Callback::Event(callback) => callback(owner, event, result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    struct Target {
        rect: Rect,
        events: EventRouter<Target>,
        seen: Vec<(String, bool)>,
    }

    impl HitTarget for Target {
        fn hit_rect(&self) -> Rect {
            self.rect
        }
    }

    impl Target {
        fn new() -> Self {
            Self {
                rect: Rect::new(0, 0, 10, 10),
                events: EventRouter::new(),
                seen: Vec::new(),
            }
        }

        fn handle_event(&mut self, event: &InputEvent) {
            let mut active = self.events.begin_dispatch();
            active.dispatch(self, event);
            self.events.end_dispatch(active);
        }
    }

    fn inside() -> InputEvent {
        InputEvent::cursor_moved(Vec2::new(5.0, 5.0))
    }

    #[test]
    fn test_standard_predicates() {
        let rect = Rect::new(0, 0, 10, 10);
        let press = InputEvent::button_pressed(MouseButton::Left).with_cursor((3.0, 3.0));
        assert!(StandardEvent::Hover.matches(rect, &press));
        assert!(StandardEvent::Click.matches(rect, &press));
        assert!(StandardEvent::LeftClick.matches(rect, &press));
        assert!(!StandardEvent::RightClick.matches(rect, &press));

        let outside = InputEvent::button_pressed(MouseButton::Left).with_cursor((30.0, 3.0));
        assert!(!StandardEvent::LeftClick.matches(rect, &outside));

        // release counts anywhere
        let release = InputEvent::button_released(MouseButton::Left).with_cursor((30.0, 3.0));
        assert!(StandardEvent::Release.matches(rect, &release));
        assert!(StandardEvent::LeftRelease.matches(rect, &release));
        assert!(!StandardEvent::MiddleRelease.matches(rect, &release));
    }

    #[test]
    fn test_default_names_and_conditions() {
        let mut router: EventRouter<Target> = EventRouter::new();
        let a = router.register(EventRegistration::new(|_| {}).on(StandardEvent::Hover));
        let b = router.register(EventRegistration::new(|_| {}));
        let c = router.register(EventRegistration::new(|_| {}).named("onleftclick"));
        let d = router.register(EventRegistration::new(|_| {}));

        assert_eq!(a.name(), "onhover");
        assert_eq!(b.name(), "handler_0");
        assert_eq!(c.name(), "onleftclick");
        assert_eq!(d.name(), "handler_1");
        assert!(matches!(
            router.handlers["onleftclick"].condition,
            Condition::Standard(StandardEvent::LeftClick)
        ));
        assert!(matches!(router.handlers["handler_0"].condition, Condition::Always));
    }

    #[test]
    fn test_level_triggered_results() {
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut target = Target::new();
        let sink = results.clone();
        target.events.register(
            EventRegistration::new(move |hit| sink.borrow_mut().push(hit)).on(StandardEvent::Hover),
        );

        target.handle_event(&inside());
        target.handle_event(&InputEvent::cursor_moved((50.0, 5.0)));

        assert_eq!(*results.borrow(), vec![true, false]);
    }

    #[test]
    fn test_owner_callbacks_and_custom_predicate() {
        let mut target = Target::new();
        target.events.register(
            EventRegistration::with_owner(|t: &mut Target, hit| t.seen.push(("wide".into(), hit)))
                .named("wide")
                .when(|t, event| {
                    event
                        .cursor_position
                        .is_some_and(|p| p.x < (t.rect.right() * 2) as f32)
                }),
        );

        target.handle_event(&InputEvent::cursor_moved((15.0, 50.0)));
        assert_eq!(target.seen, vec![("wide".to_string(), true)]);
    }

    #[test]
    fn test_event_callback_reads_cursor() {
        let mut target = Target::new();
        target.events.register(
            EventRegistration::with_event(|t: &mut Target, event: &InputEvent, hit| {
                let x = event.cursor_position.map_or(-1.0, |p| p.x);
                t.seen.push((x.to_string(), hit));
            })
            .on(StandardEvent::Hover),
        );

        target.handle_event(&inside());
        target.handle_event(&InputEvent::cursor_moved((40.0, 5.0)));
        assert_eq!(
            target.seen,
            vec![("5".to_string(), true), ("40".to_string(), false)]
        );
    }

    #[test]
    fn test_changes_during_dispatch_apply_next_time() {
        let mut target = Target::new();
        target.events.register(
            EventRegistration::with_owner(|t: &mut Target, _| {
                t.seen.push(("first".into(), true));
                if !t.events.contains("late") {
                    t.events.register(
                        EventRegistration::with_owner(|t: &mut Target, _| {
                            t.seen.push(("late".into(), true))
                        })
                        .named("late"),
                    );
                }
            })
            .named("first"),
        );

        target.handle_event(&inside());
        assert_eq!(target.seen.len(), 1);
        assert!(target.events.contains("late"));

        target.handle_event(&inside());
        let names: Vec<&str> = target.seen.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["first", "first", "late"]);
    }

    #[test]
    fn test_unregister_during_dispatch() {
        let mut target = Target::new();
        let handle = target.events.register(
            EventRegistration::with_owner(|t: &mut Target, _| t.seen.push(("x".into(), true)))
                .named("x"),
        );
        target.events.register(
            EventRegistration::with_owner(move |t: &mut Target, _| {
                t.events.unregister(&handle);
            })
            .named("remover"),
        );

        target.handle_event(&inside());
        target.handle_event(&inside());
        assert_eq!(target.seen.len(), 1);
        assert!(!target.events.contains("x"));
        assert!(target.events.contains("remover"));
    }

    #[test]
    fn test_queries_during_dispatch_see_pending_table() {
        let mut target = Target::new();
        let handle = target.events.register(EventRegistration::new(|_| {}).named("x"));
        target.events.register(
            EventRegistration::with_owner(move |t: &mut Target, _| {
                let before: Vec<String> = t.events.names().map(String::from).collect();
                t.seen.push((before.join(","), t.events.contains("x")));

                t.events.unregister(&handle);
                t.events.register(EventRegistration::new(|_| {}).named("y"));
                let after: Vec<String> = t.events.names().map(String::from).collect();
                t.seen.push((after.join(","), t.events.contains("x")));
                assert_eq!(t.events.len(), 2);
            })
            .named("inspector"),
        );

        target.handle_event(&inside());
        assert_eq!(
            target.seen,
            vec![
                ("x,inspector".to_string(), true),
                ("inspector,y".to_string(), false),
            ]
        );
        assert_eq!(target.events.names().collect::<Vec<_>>(), vec!["inspector", "y"]);
    }
}
