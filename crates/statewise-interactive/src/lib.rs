//! # statewise-interactive
//!
//! Reusable widgets for statewise.
//!
//! Single-part widgets are thin wrappers around an
//! [`Entity`](statewise::Entity): they build its states from a style record
//! and wire its standard events. [`Slider`] and [`Switch`] are built from
//! several parts and wrap a [`CompositeEntity`](statewise::CompositeEntity)
//! instead. Every widget can be placed in a composite like any other child.

mod button;
mod progress_bar;
mod slider;
mod switch;

pub use button::*;
pub use progress_bar::*;
pub use slider::*;
pub use switch::*;
