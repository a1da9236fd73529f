use glam::IVec2;
use statewise::{Rect, Rgba, Surface};

/// RGBA pixel buffer, row-major, straight alpha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::transparent())
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap existing pixels; `None` when the length does not match the size
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, e.g. for uploading to a texture or writing a file
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Composite `color` over the pixel at `(x, y)`; out of bounds is ignored
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// The part of `rect` inside the canvas, as pixel ranges
    fn clip(&self, rect: Rect) -> Option<(std::ops::Range<i32>, std::ops::Range<i32>)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        (x0 < x1 && y0 < y1).then_some((x0..x1, y0..y1))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((xs, ys)) = self.clip(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Outline drawn inside `rect`
    pub fn stroke_rect(&mut self, rect: Rect, width: i32, color: Rgba) {
        if width <= 0 {
            return;
        }
        let w = width.min(rect.w).min(rect.h);
        if w * 2 >= rect.w.min(rect.h) {
            self.fill_rect(rect, color);
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.y + w, w, rect.h - 2 * w), color);
        self.fill_rect(Rect::new(rect.right() - w, rect.y + w, w, rect.h - 2 * w), color);
    }

    /// Composite `source` onto this canvas with its top-left corner at `position`
    pub fn draw_canvas(&mut self, source: &Canvas, position: IVec2) {
        for sy in 0..source.height as i32 {
            for sx in 0..source.width as i32 {
                if let Some(color) = source.pixel(sx, sy) {
                    self.blend_pixel(position.x + sx, position.y + sy, color);
                }
            }
        }
    }

    /// Nearest-neighbour resize
    pub fn scaled(&self, width: u32, height: u32) -> Canvas {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Canvas::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as usize;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as usize;
                out.pixels[y as usize * width as usize + x as usize] =
                    self.pixels[sy * self.width as usize + sx];
            }
        }
        out
    }

    /// Same pixels with alpha forced to 255
    pub fn opaque(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|p| p.with_alpha(255)).collect(),
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn blit(&mut self, source: &Self, position: IVec2) {
        self.draw_canvas(source, position);
    }
}
