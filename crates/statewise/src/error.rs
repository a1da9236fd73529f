//! Error types for the style/state engine.
//!
//! Every error here describes an invalid configuration handed to the engine by
//! the caller. None of them are transient, and nothing is retried internally.

use thiserror::Error;

use crate::style::StyleKey;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised synchronously by entities, composites and transitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A named state (or a composite child's state) is not registered.
    #[error("'{state}' is not a valid state of {owner}")]
    UnknownState {
        /// The requested state name.
        state: String,
        /// Description of the entity that was asked.
        owner: String,
    },

    /// A color cannot take part in a transition (symbolic, indexed or out of range).
    #[error("{key}: '{value}' can not be used in a transition, colors must be RGB or RGBA channels in 0..=255")]
    InvalidColor {
        /// The style key holding the color.
        key: StyleKey,
        /// Debug rendering of the offending value.
        value: String,
    },

    /// Unknown easing curve name.
    #[error("invalid easing function: '{0}'")]
    InvalidCurve(String),

    /// A composite child name collides with a reserved attribute name.
    #[error("'{0}' is already an attribute of a composite, children can not use that name")]
    AttributeCollision(String),

    /// A composite already has a child with this name.
    #[error("a child named '{0}' already exists")]
    DuplicateChild(String),

    /// A composite style names a child that does not exist.
    #[error("composite has no child named '{0}'")]
    UnknownChild(String),

    /// A fragment kind does not match the kind of child it targets.
    #[error("fragment for child '{child}' does not match the child kind ({expected} expected)")]
    IncompatibleFragment {
        /// The child the fragment was addressed to.
        child: String,
        /// The fragment kind the child accepts.
        expected: &'static str,
    },

    /// Transition durations must be finite and strictly positive.
    #[error("invalid transition duration {0}, expected a finite value > 0")]
    InvalidDuration(f32),

    /// Corner radii accept one to four values.
    #[error("{key}: expected 1 to 4 corner radii, got {len}")]
    InvalidRadius {
        /// The style key holding the radius.
        key: StyleKey,
        /// How many values were supplied.
        len: usize,
    },

    /// Rectangles in configuration records must have a non-negative size.
    #[error("invalid rect {w}x{h}, width and height must be >= 0")]
    InvalidRect {
        /// Supplied width.
        w: i32,
        /// Supplied height.
        h: i32,
    },

    /// A string did not name a style key.
    #[error("unknown style key '{0}'")]
    UnknownStyleKey(String),
}
