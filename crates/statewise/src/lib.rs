//! # statewise
//!
//! Renderer agnostic widget layer built around styles, states and eased
//! transitions.
//!
//! This crate holds the engine only: it never rasterizes, polls devices or
//! loads assets. Rendering goes through the [`Renderer`] trait (see
//! `statewise-raster` for a CPU implementation), input arrives as
//! [`InputEvent`]s, and assets are opaque [`AssetHandle`]s.
//!
//! ## Core Types
//!
//! - [`Style`] - Sparse record of visual attributes
//! - [`Entity`] - Named states, a surface and an optional running transition
//! - [`CompositeEntity`] - Named children switched together
//!
//! ## Transitions
//!
//! - [`Transition`] - Interpolation between two styles over time
//! - [`easing`] - Named easing curves
//!
//! ## Input & Events
//!
//! - [`InputEvent`] / [`InputState`] - Backend-agnostic input
//! - [`EventRouter`] - Per-entity predicate/callback table
//! - [`StandardEvent`] - Built-in hover/click/release predicates

mod animation;
mod color;
mod composite;
mod entity;
mod error;
mod events;
mod geometry;
mod input;
mod render;
mod style;
mod transition;

pub mod easing;

#[cfg(test)]
mod test_support;

// Core types
pub use color::*;
pub use composite::*;
pub use entity::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use render::*;
pub use style::*;

// Transitions & animation
pub use animation::*;
pub use easing::{easing_by_name, Curve, EasingFn, EASING_FUNCTIONS};
pub use transition::*;

// Input & Events
pub use events::*;
pub use input::*;
