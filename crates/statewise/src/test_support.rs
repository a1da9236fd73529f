//! Renderer double that records what it was asked to draw.

use std::cell::Cell;
use std::rc::Rc;

use glam::IVec2;

use crate::render::{Renderer, Surface};
use crate::style::Style;

#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub surfaces_created: Cell<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedSurface {
    pub width: u32,
    pub height: u32,
    pub renders: Vec<Style>,
    /// (position, source size, number of renders on the source)
    pub blits: Vec<(IVec2, (u32, u32), usize)>,
}

impl RecordedSurface {
    pub fn last_render(&self) -> Option<&Style> {
        self.renders.last()
    }
}

impl Surface for RecordedSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn blit(&mut self, source: &Self, position: IVec2) {
        self.blits
            .push((position, source.size(), source.renders.len()));
    }
}

impl Renderer for RecordingRenderer {
    type Surface = RecordedSurface;

    fn create_surface(&self, width: u32, height: u32) -> RecordedSurface {
        self.surfaces_created.set(self.surfaces_created.get() + 1);
        RecordedSurface {
            width,
            height,
            renders: Vec::new(),
            blits: Vec::new(),
        }
    }

    fn render(&self, surface: &mut RecordedSurface, style: &Style) {
        surface.renders.push(style.clone());
    }
}

pub(crate) fn renderer() -> Rc<RecordingRenderer> {
    Rc::new(RecordingRenderer::default())
}
