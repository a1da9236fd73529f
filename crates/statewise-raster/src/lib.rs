//! # statewise-raster
//!
//! CPU reference renderer for statewise.
//!
//! [`RasterRenderer`] draws styles onto [`Canvas`] surfaces with plain
//! axis-aligned fills. It is meant for headless use, tests and as a template
//! for real backends, not for pixel-perfect output.

mod canvas;
mod renderer;

pub use canvas::*;
pub use renderer::*;
