//! Render capability consumed by entities.
//!
//! The engine never rasterizes anything itself. Backends implement
//! [`Renderer`] to turn a [`Style`] into pixels on their own [`Surface`] type;
//! `statewise-raster` provides a CPU implementation.

use glam::IVec2;

use crate::style::Style;

/// A drawable image owned by an entity
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Draw `source` onto `self` with its top-left corner at `position`
    ///
    /// Parts of `source` falling outside `self` are clipped.
    fn blit(&mut self, source: &Self, position: IVec2)
    where
        Self: Sized;
}

/// Turns styles into pixels
///
/// Renderers are stateless from the engine's point of view and are shared
/// between entities through an `Rc`.
pub trait Renderer {
    type Surface: Surface;

    /// A fresh, fully transparent surface
    fn create_surface(&self, width: u32, height: u32) -> Self::Surface;

    /// Draw `style` onto `surface`
    ///
    /// The style's `rect` has already been applied to the surface size, so
    /// drawing happens in surface-local coordinates. Keys the renderer does
    /// not support are ignored.
    fn render(&self, surface: &mut Self::Surface, style: &Style);
}
