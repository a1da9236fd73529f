use std::cell::RefCell;
use std::collections::HashMap;

use glam::IVec2;
use log::{trace, warn};
use statewise::{
    css, AssetHandle, ColorValue, ImageScale, ImageSource, Rect, Renderer, Rgba, Style,
};

use crate::canvas::Canvas;

/// Border width used when a style sets `border` without `border_width`
pub const DEFAULT_BORDER_WIDTH: i32 = 2;

/// CPU renderer drawing styles onto [`Canvas`] surfaces
///
/// Draw order is background, foreground, image, border. Everything is an
/// axis-aligned fill: corner radii and text are accepted but not drawn.
///
/// Images are looked up in two registries, one keyed by [`AssetHandle`] (also
/// used for animation frames) and one keyed by path.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    images: RefCell<HashMap<AssetHandle, Canvas>>,
    paths: RefCell<HashMap<String, Canvas>>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `image` available under `handle`; replaces any previous image
    pub fn register_image(&self, handle: impl Into<AssetHandle>, image: Canvas) {
        self.images.borrow_mut().insert(handle.into(), image);
    }

    /// Make `image` available under a path, for [`ImageSource::Path`]
    pub fn register_path(&self, path: impl Into<String>, image: Canvas) {
        self.paths.borrow_mut().insert(path.into(), image);
    }

    pub fn has_image(&self, handle: AssetHandle) -> bool {
        self.images.borrow().contains_key(&handle)
    }

    /// Concrete color for any [`ColorValue`]
    ///
    /// Named colors come from the CSS basic palette, indexed colors are packed
    /// `0xRRGGBBAA`. Out of range channels resolve to `None`.
    pub fn resolve_color(color: &ColorValue) -> Option<Rgba> {
        match color {
            ColorValue::Named(name) => css::named(name),
            ColorValue::Indexed(packed) => Some(Rgba::from_packed(*packed)),
            _ => color.to_rgba(),
        }
    }

    fn color(key: &str, color: Option<&ColorValue>) -> Option<Rgba> {
        let color = color?;
        let resolved = Self::resolve_color(color);
        if resolved.is_none() {
            warn!("{key}: can not resolve color {color:?}, skipping");
        }
        resolved
    }

    fn image(&self, source: &ImageSource, keep_alpha: bool) -> Option<Canvas> {
        let image = match source {
            ImageSource::Handle(handle) => self.images.borrow().get(handle).cloned(),
            ImageSource::Path(path) => self.paths.borrow().get(path).map(|image| {
                if keep_alpha {
                    image.clone()
                } else {
                    image.opaque()
                }
            }),
        };
        if image.is_none() {
            warn!("image {source:?} is not registered, skipping");
        }
        image
    }
}

impl Renderer for RasterRenderer {
    type Surface = Canvas;

    fn create_surface(&self, width: u32, height: u32) -> Canvas {
        Canvas::new(width, height)
    }

    fn render(&self, surface: &mut Canvas, style: &Style) {
        let full = Rect::new(0, 0, surface.width() as i32, surface.height() as i32);
        trace!("render {}x{} {:?}", full.w, full.h, style.keys());

        if let Some(bg) = Self::color("bg", style.bg.as_ref()) {
            surface.fill_rect(full, bg);
        }

        if let Some(fg) = Self::color("fg", style.fg.as_ref()) {
            // No fg_rect means an empty foreground
            if let Some(fg_rect) = style.fg_rect {
                surface.fill_rect(fg_rect, fg);
            }
        }

        if let Some(source) = &style.image {
            if let Some(mut image) = self.image(source, style.img_alpha.unwrap_or(false)) {
                match style.img_scale {
                    Some(ImageScale::Auto) => {
                        image = image.scaled(surface.width(), surface.height());
                    }
                    Some(ImageScale::Size(w, h)) => {
                        image = image.scaled(w.max(0) as u32, h.max(0) as u32);
                    }
                    None => {}
                }
                surface.draw_canvas(&image, IVec2::ZERO);
            }
        }

        if style.text.is_some() {
            trace!("text rendering is not supported by the raster renderer");
        }

        if let Some(border) = Self::color("border", style.border.as_ref()) {
            let width = style.border_width.unwrap_or(DEFAULT_BORDER_WIDTH);
            surface.stroke_rect(full, width, border);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statewise::Surface;

    fn render(style: &Style, w: u32, h: u32) -> Canvas {
        let renderer = RasterRenderer::new();
        let mut surface = renderer.create_surface(w, h);
        renderer.render(&mut surface, style);
        surface
    }

    #[test]
    fn test_background_fills_surface() {
        let canvas = render(&Style::new().with_bg((10, 20, 30)), 3, 2);
        assert!(canvas.pixels().iter().all(|p| *p == Rgba::rgb(10, 20, 30)));
        assert_eq!(canvas.size(), (3, 2));
    }

    #[test]
    fn test_named_and_indexed_colors() {
        assert_eq!(
            RasterRenderer::resolve_color(&ColorValue::from("red")),
            Some(css::RED)
        );
        assert_eq!(
            RasterRenderer::resolve_color(&ColorValue::Indexed(0x11223344)),
            Some(Rgba::new(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(
            RasterRenderer::resolve_color(&ColorValue::Rgba([300, 0, 0, 255])),
            None
        );
        assert_eq!(
            RasterRenderer::resolve_color(&ColorValue::from("no-such-color")),
            None
        );
    }

    #[test]
    fn test_foreground_needs_fg_rect() {
        let style = Style::new().with_fg((0, 255, 0));
        let canvas = render(&style, 4, 4);
        assert!(canvas.pixels().iter().all(|p| *p == Rgba::transparent()));

        let mut style = style;
        style.fg_rect = Some(Rect::new(1, 1, 2, 2));
        let canvas = render(&style, 4, 4);
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::transparent()));
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(canvas.pixel(3, 3), Some(Rgba::transparent()));
    }

    #[test]
    fn test_border_default_width() {
        let canvas = render(&Style::new().with_border((255, 255, 255)), 8, 8);
        assert_eq!(canvas.pixel(1, 4), Some(css::WHITE));
        assert_eq!(canvas.pixel(2, 4), Some(Rgba::transparent()));
    }

    #[test]
    fn test_border_drawn_over_background() {
        let style = Style::new()
            .with_bg((0, 0, 0))
            .with_border((255, 255, 255))
            .with_border_width(1);
        let canvas = render(&style, 4, 4);
        assert_eq!(canvas.pixel(0, 0), Some(css::WHITE));
        assert_eq!(canvas.pixel(1, 1), Some(css::BLACK));
    }

    #[test]
    fn test_image_handle_scaled_to_entity() {
        let renderer = RasterRenderer::new();
        renderer.register_image(AssetHandle(7), Canvas::filled(1, 1, css::BLUE));
        let style = Style::new()
            .with_image(AssetHandle(7))
            .with_img_scale(ImageScale::Auto);

        let mut surface = renderer.create_surface(3, 3);
        renderer.render(&mut surface, &style);
        assert!(surface.pixels().iter().all(|p| *p == css::BLUE));
    }

    #[test]
    fn test_path_image_alpha() {
        let renderer = RasterRenderer::new();
        renderer.register_path("ghost.png", Canvas::filled(1, 1, Rgba::new(9, 9, 9, 0)));

        let mut surface = renderer.create_surface(1, 1);
        renderer.render(&mut surface, &Style::new().with_image("ghost.png"));
        assert_eq!(surface.pixel(0, 0), Some(Rgba::rgb(9, 9, 9)));

        let mut surface = renderer.create_surface(1, 1);
        let style = Style::new().with_image("ghost.png").with_img_alpha(true);
        renderer.render(&mut surface, &style);
        assert_eq!(surface.pixel(0, 0).map(|p| p.a), Some(0));
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let style = Style::new()
            .with_bg((1, 2, 3))
            .with_image(AssetHandle(99));
        let canvas = render(&style, 2, 2);
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::rgb(1, 2, 3)));
    }
}
