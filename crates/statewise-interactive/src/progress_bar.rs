//! Progress bar component
//!
//! An outer fill with an inner bar whose width follows `value / max`.

use std::rc::Rc;

use glam::IVec2;
use statewise::{
    Child, Entity, EntityConfig, Rect, Renderer, Result, Rgba, Style, DEFAULT_STATE,
};
use statewise_macros::WithSetters;

/// Visual styling for a progress bar
#[derive(Debug, Clone, PartialEq, WithSetters)]
pub struct ProgressBarStyle {
    /// Color behind the bar
    pub outer_color: Rgba,
    /// Color of the bar itself
    pub inner_color: Rgba,
    /// Space between the outer edge and the bar, per axis
    pub padding: IVec2,
}

impl Default for ProgressBarStyle {
    fn default() -> Self {
        Self {
            outer_color: Rgba::rgb(50, 50, 50),
            inner_color: Rgba::rgb(255, 0, 0),
            padding: IVec2::new(5, 5),
        }
    }
}

/// A horizontal bar filled proportionally to a value
///
/// The fill is drawn through the `fg`/`fg_rect` pair of the entity's
/// `default` state, which is rebuilt whenever the value changes.
pub struct ProgressBar<R: Renderer> {
    entity: Entity<R>,
    style: ProgressBarStyle,
    value: f32,
    max: f32,
}

impl<R: Renderer> ProgressBar<R> {
    /// An empty bar counting up to `max`
    pub fn new(renderer: Rc<R>, rect: impl Into<Rect>, max: f32) -> Result<Self> {
        Self::styled(renderer, rect, max, ProgressBarStyle::default())
    }

    pub fn styled(
        renderer: Rc<R>,
        rect: impl Into<Rect>,
        max: f32,
        style: ProgressBarStyle,
    ) -> Result<Self> {
        let mut bar = Self {
            entity: Entity::new(renderer, EntityConfig::new(rect))?,
            style,
            value: 0.0,
            max,
        };
        bar.refresh()?;
        Ok(bar)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set the value, clamped to `0..=max`; non-finite values are ignored
    pub fn set_value(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            log::warn!("ProgressBar ignoring non-finite value {value}");
            return Ok(());
        }
        self.value = value.clamp(0.0, self.max.max(0.0));
        self.refresh()
    }

    /// Change the maximum; the current value is clamped to it
    pub fn set_max(&mut self, max: f32) -> Result<()> {
        if !max.is_finite() {
            log::warn!("ProgressBar ignoring non-finite max {max}");
            return Ok(());
        }
        self.max = max;
        self.value = self.value.clamp(0.0, max.max(0.0));
        self.refresh()
    }

    /// Filled share in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// The bar's rectangle in surface coordinates, `None` when empty
    pub fn fill_rect(&self) -> Option<Rect> {
        let size = self.entity.local_rect().size();
        let padding = self.style.padding;
        let inner = (size - padding * 2).max(IVec2::ZERO);
        let width = (inner.x as f32 * self.fraction()).round() as i32;
        (width > 0 && inner.y > 0).then_some(Rect::new(padding.x, padding.y, width, inner.y))
    }

    fn refresh(&mut self) -> Result<()> {
        let mut style = Style::new()
            .with_bg(self.style.outer_color)
            .with_fg(self.style.inner_color);
        style.fg_rect = self.fill_rect();
        self.entity.add_state(DEFAULT_STATE, style);
        self.entity.construct(DEFAULT_STATE)
    }

    pub fn draw(&self, target: &mut R::Surface) {
        self.entity.draw(target);
    }

    pub fn entity(&self) -> &Entity<R> {
        &self.entity
    }

    pub fn into_entity(self) -> Entity<R> {
        self.entity
    }
}

impl<R: Renderer> From<ProgressBar<R>> for Child<R> {
    fn from(bar: ProgressBar<R>) -> Self {
        bar.into_entity().into()
    }
}

#[cfg(test)]
mod tests {
    use statewise_raster::RasterRenderer;

    use super::*;

    fn bar(max: f32) -> ProgressBar<RasterRenderer> {
        ProgressBar::new(Rc::new(RasterRenderer::new()), (0, 0, 110, 20), max).unwrap()
    }

    #[test]
    fn test_empty_bar_has_no_fill() {
        let bar = bar(100.0);
        assert_eq!(bar.fill_rect(), None);
        assert_eq!(bar.entity().style().fg_rect, None);
        assert_eq!(bar.entity().surface().pixel(50, 10), Some(Rgba::rgb(50, 50, 50)));
    }

    #[test]
    fn test_fill_follows_value() {
        let mut bar = bar(100.0);
        bar.set_value(50.0).unwrap();
        assert_eq!(bar.fill_rect(), Some(Rect::new(5, 5, 50, 10)));
        assert_eq!(bar.entity().style().fg_rect, Some(Rect::new(5, 5, 50, 10)));

        let surface = bar.entity().surface();
        assert_eq!(surface.pixel(5, 5), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(54, 14), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(55, 10), Some(Rgba::rgb(50, 50, 50)));
        assert_eq!(surface.pixel(4, 10), Some(Rgba::rgb(50, 50, 50)));
    }

    #[test]
    fn test_value_is_clamped() {
        let mut bar = bar(10.0);
        bar.set_value(25.0).unwrap();
        assert_eq!(bar.value(), 10.0);
        assert_eq!(bar.fill_rect(), Some(Rect::new(5, 5, 100, 10)));

        bar.set_value(-3.0).unwrap();
        assert_eq!(bar.value(), 0.0);
        assert_eq!(bar.fill_rect(), None);

        bar.set_value(f32::NAN).unwrap();
        assert_eq!(bar.value(), 0.0);
    }

    #[test]
    fn test_shrinking_max_rescales() {
        let mut bar = bar(100.0);
        bar.set_value(40.0).unwrap();
        bar.set_max(20.0).unwrap();
        assert_eq!(bar.value(), 20.0);
        assert_eq!(bar.fraction(), 1.0);

        bar.set_max(0.0).unwrap();
        assert_eq!(bar.fraction(), 0.0);
        assert_eq!(bar.fill_rect(), None);
    }

    #[test]
    fn test_custom_padding() {
        let style = ProgressBarStyle::default().with_padding(IVec2::new(0, 2));
        let mut bar =
            ProgressBar::styled(Rc::new(RasterRenderer::new()), (0, 0, 10, 6), 4.0, style)
                .unwrap();
        bar.set_value(1.0).unwrap();
        assert_eq!(bar.fill_rect(), Some(Rect::new(0, 2, 3, 2)));
    }
}
