use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use statewise_macros::WithSetters;

use crate::color::ColorValue;
use crate::error::{Error, Result};
use crate::geometry::{Rect, RectSpec};

/// Opaque reference to an externally loaded asset (image, font, animation frame)
///
/// The engine never looks inside an asset, it only forwards handles to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(pub u64);

impl From<u64> for AssetHandle {
    fn from(id: u64) -> Self {
        AssetHandle(id)
    }
}

/// Corner radii: one value for every corner, or up to four per-corner values
///
/// Missing per-corner values mean "unconstrained" and are padded with `-1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Radius {
    Uniform(i32),
    Corners(Vec<i32>),
}

impl Radius {
    /// Per-corner radii (top-left, top-right, bottom-left, bottom-right)
    pub fn corners(&self, key: StyleKey) -> Result<[i32; 4]> {
        match self {
            Radius::Uniform(r) => Ok([*r; 4]),
            Radius::Corners(values) => {
                if values.is_empty() || values.len() > 4 {
                    return Err(Error::InvalidRadius {
                        key,
                        len: values.len(),
                    });
                }
                let mut out = [-1; 4];
                out[..values.len()].copy_from_slice(values);
                Ok(out)
            }
        }
    }
}

impl From<i32> for Radius {
    fn from(r: i32) -> Self {
        Radius::Uniform(r)
    }
}

impl From<[i32; 4]> for Radius {
    fn from(corners: [i32; 4]) -> Self {
        Radius::Corners(corners.to_vec())
    }
}

impl From<Vec<i32>> for Radius {
    fn from(corners: Vec<i32>) -> Self {
        Radius::Corners(corners)
    }
}

/// Where an image comes from
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Already loaded by the asset collaborator
    Handle(AssetHandle),
    /// A path the renderer knows how to resolve
    Path(String),
}

impl From<AssetHandle> for ImageSource {
    fn from(handle: AssetHandle) -> Self {
        ImageSource::Handle(handle)
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(path.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(path: String) -> Self {
        ImageSource::Path(path)
    }
}

/// How an image is scaled before it is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageScale {
    /// Match the size of the entity
    Auto,
    /// Explicit size in pixels
    Size(i32, i32),
}

impl From<(i32, i32)> for ImageScale {
    fn from((w, h): (i32, i32)) -> Self {
        ImageScale::Size(w, h)
    }
}

/// Visual attributes of an entity at one instant
///
/// All fields are `Option<T>`: an absent attribute means "no constraint", which
/// lets states only specify what they change.
#[derive(Debug, Clone, Default, PartialEq, WithSetters)]
pub struct Style {
    /// Background color
    pub bg: Option<ColorValue>,
    /// Foreground color, drawn inside `fg_rect`
    pub fg: Option<ColorValue>,
    /// Border color
    pub border: Option<ColorValue>,
    /// Text color
    pub text_color: Option<ColorValue>,

    /// Width of the border
    pub border_width: Option<i32>,
    /// Rounded corners of the background and border
    pub border_radius: Option<Radius>,
    /// Rounded corners of the foreground
    pub fg_radius: Option<Radius>,

    /// Rectangle of the entity; `Auto` components keep the current value
    pub rect: Option<RectSpec>,

    pub image: Option<ImageSource>,
    pub img_scale: Option<ImageScale>,
    /// Keep the image's alpha channel (only meaningful for path images)
    pub img_alpha: Option<bool>,

    pub text: Option<String>,
    pub font: Option<AssetHandle>,
    pub text_antialias: Option<bool>,
    /// Text center relative to the entity; centered when absent
    pub text_pos: Option<Vec2>,

    /// Frame animation played instead of `image`
    pub anim: Option<AssetHandle>,

    // Computed by widgets (e.g. a progress bar's fill), never interpolated.
    #[setters(skip)]
    pub fg_rect: Option<Rect>,
}

/// Color-valued keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Bg,
    Fg,
    Border,
    TextColor,
}

/// Radius-valued keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RadiusKey {
    Border,
    Fg,
}

/// How a key behaves during a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Per-channel, rounded and clamped to 0..=255
    Color(ColorKey),
    /// Per-corner, rounded
    Corners(RadiusKey),
    /// Per-component, rounded
    Rect,
    /// Held at the start value until the transition finishes
    Hold,
}

/// Every attribute a [`Style`] can carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    Bg,
    Fg,
    Border,
    TextColor,
    BorderWidth,
    BorderRadius,
    FgRadius,
    Rect,
    Image,
    ImgScale,
    ImgAlpha,
    Text,
    Font,
    TextAntialias,
    TextPos,
    Anim,
    FgRect,
}

impl StyleKey {
    pub const ALL: [StyleKey; 17] = [
        StyleKey::Bg,
        StyleKey::Fg,
        StyleKey::Border,
        StyleKey::TextColor,
        StyleKey::BorderWidth,
        StyleKey::BorderRadius,
        StyleKey::FgRadius,
        StyleKey::Rect,
        StyleKey::Image,
        StyleKey::ImgScale,
        StyleKey::ImgAlpha,
        StyleKey::Text,
        StyleKey::Font,
        StyleKey::TextAntialias,
        StyleKey::TextPos,
        StyleKey::Anim,
        StyleKey::FgRect,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StyleKey::Bg => "bg",
            StyleKey::Fg => "fg",
            StyleKey::Border => "border",
            StyleKey::TextColor => "text_color",
            StyleKey::BorderWidth => "border_width",
            StyleKey::BorderRadius => "border_radius",
            StyleKey::FgRadius => "fg_radius",
            StyleKey::Rect => "rect",
            StyleKey::Image => "image",
            StyleKey::ImgScale => "img_scale",
            StyleKey::ImgAlpha => "img_alpha",
            StyleKey::Text => "text",
            StyleKey::Font => "font",
            StyleKey::TextAntialias => "text_antialias",
            StyleKey::TextPos => "text_pos",
            StyleKey::Anim => "anim",
            StyleKey::FgRect => "fg_rect",
        }
    }

    pub const fn interpolation(self) -> Interpolation {
        match self {
            StyleKey::Bg => Interpolation::Color(ColorKey::Bg),
            StyleKey::Fg => Interpolation::Color(ColorKey::Fg),
            StyleKey::Border => Interpolation::Color(ColorKey::Border),
            StyleKey::TextColor => Interpolation::Color(ColorKey::TextColor),
            StyleKey::BorderRadius => Interpolation::Corners(RadiusKey::Border),
            StyleKey::FgRadius => Interpolation::Corners(RadiusKey::Fg),
            StyleKey::Rect => Interpolation::Rect,
            StyleKey::BorderWidth
            | StyleKey::Image
            | StyleKey::ImgScale
            | StyleKey::ImgAlpha
            | StyleKey::Text
            | StyleKey::Font
            | StyleKey::TextAntialias
            | StyleKey::TextPos
            | StyleKey::Anim
            | StyleKey::FgRect => Interpolation::Hold,
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StyleKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| Error::UnknownStyleKey(s.to_string()))
    }
}

impl ColorKey {
    pub const fn style_key(self) -> StyleKey {
        match self {
            ColorKey::Bg => StyleKey::Bg,
            ColorKey::Fg => StyleKey::Fg,
            ColorKey::Border => StyleKey::Border,
            ColorKey::TextColor => StyleKey::TextColor,
        }
    }
}

impl RadiusKey {
    pub const fn style_key(self) -> StyleKey {
        match self {
            RadiusKey::Border => StyleKey::BorderRadius,
            RadiusKey::Fg => StyleKey::FgRadius,
        }
    }
}

impl Style {
    /// Create a new empty style
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self, key: ColorKey) -> Option<&ColorValue> {
        match key {
            ColorKey::Bg => self.bg.as_ref(),
            ColorKey::Fg => self.fg.as_ref(),
            ColorKey::Border => self.border.as_ref(),
            ColorKey::TextColor => self.text_color.as_ref(),
        }
    }

    pub fn color_mut(&mut self, key: ColorKey) -> &mut Option<ColorValue> {
        match key {
            ColorKey::Bg => &mut self.bg,
            ColorKey::Fg => &mut self.fg,
            ColorKey::Border => &mut self.border,
            ColorKey::TextColor => &mut self.text_color,
        }
    }

    pub fn radius(&self, key: RadiusKey) -> Option<&Radius> {
        match key {
            RadiusKey::Border => self.border_radius.as_ref(),
            RadiusKey::Fg => self.fg_radius.as_ref(),
        }
    }

    pub fn radius_mut(&mut self, key: RadiusKey) -> &mut Option<Radius> {
        match key {
            RadiusKey::Border => &mut self.border_radius,
            RadiusKey::Fg => &mut self.fg_radius,
        }
    }

    /// Whether the attribute is present
    pub fn contains(&self, key: StyleKey) -> bool {
        match key {
            StyleKey::Bg => self.bg.is_some(),
            StyleKey::Fg => self.fg.is_some(),
            StyleKey::Border => self.border.is_some(),
            StyleKey::TextColor => self.text_color.is_some(),
            StyleKey::BorderWidth => self.border_width.is_some(),
            StyleKey::BorderRadius => self.border_radius.is_some(),
            StyleKey::FgRadius => self.fg_radius.is_some(),
            StyleKey::Rect => self.rect.is_some(),
            StyleKey::Image => self.image.is_some(),
            StyleKey::ImgScale => self.img_scale.is_some(),
            StyleKey::ImgAlpha => self.img_alpha.is_some(),
            StyleKey::Text => self.text.is_some(),
            StyleKey::Font => self.font.is_some(),
            StyleKey::TextAntialias => self.text_antialias.is_some(),
            StyleKey::TextPos => self.text_pos.is_some(),
            StyleKey::Anim => self.anim.is_some(),
            StyleKey::FgRect => self.fg_rect.is_some(),
        }
    }

    /// Present attributes, in [`StyleKey::ALL`] order
    pub fn keys(&self) -> Vec<StyleKey> {
        StyleKey::ALL
            .into_iter()
            .filter(|key| self.contains(*key))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        StyleKey::ALL.into_iter().all(|key| !self.contains(key))
    }

    /// Copy one attribute (present or absent) from `other`
    pub fn copy_key_from(&mut self, key: StyleKey, other: &Style) {
        match key {
            StyleKey::Bg => self.bg = other.bg.clone(),
            StyleKey::Fg => self.fg = other.fg.clone(),
            StyleKey::Border => self.border = other.border.clone(),
            StyleKey::TextColor => self.text_color = other.text_color.clone(),
            StyleKey::BorderWidth => self.border_width = other.border_width,
            StyleKey::BorderRadius => self.border_radius = other.border_radius.clone(),
            StyleKey::FgRadius => self.fg_radius = other.fg_radius.clone(),
            StyleKey::Rect => self.rect = other.rect,
            StyleKey::Image => self.image = other.image.clone(),
            StyleKey::ImgScale => self.img_scale = other.img_scale,
            StyleKey::ImgAlpha => self.img_alpha = other.img_alpha,
            StyleKey::Text => self.text = other.text.clone(),
            StyleKey::Font => self.font = other.font,
            StyleKey::TextAntialias => self.text_antialias = other.text_antialias,
            StyleKey::TextPos => self.text_pos = other.text_pos,
            StyleKey::Anim => self.anim = other.anim,
            StyleKey::FgRect => self.fg_rect = other.fg_rect,
        }
    }

    /// Merge this style with another, preferring values from `other` when present
    ///
    /// This is used to derive hover/pressed states from a base style, where each
    /// layer only specifies the attributes that change.
    pub fn merge(&self, other: &Style) -> Style {
        let mut merged = self.clone();
        for key in other.keys() {
            merged.copy_key_from(key, other);
        }
        merged
    }

    /// Resolve `Auto` components of `rect` against `current`
    ///
    /// Returns the resolved rectangle when the style has a `rect`.
    pub fn resolve_rect(&mut self, current: Rect) -> Option<Rect> {
        let resolved = self.rect?.resolve(current);
        self.rect = Some(resolved.into());
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectField::Auto;

    #[test]
    fn test_merge_prefers_other() {
        let base = Style::new().with_bg((255, 0, 0)).with_border_width(3);
        let hover = Style::new().with_bg((0, 255, 0));

        let merged = base.merge(&hover);

        assert_eq!(merged.bg, Some(ColorValue::Rgb([0, 255, 0])));
        assert_eq!(merged.border_width, Some(3));
    }

    #[test]
    fn test_merge_preserves_base_when_other_empty() {
        let base = Style::new().with_text("hi").with_border_radius(4);
        let merged = base.merge(&Style::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn test_keys_in_declaration_order() {
        let style = Style::new()
            .with_text("x")
            .with_bg((1, 2, 3))
            .with_rect((0, 0, 5, 5));
        assert_eq!(style.keys(), vec![StyleKey::Bg, StyleKey::Rect, StyleKey::Text]);
        assert!(!style.is_empty());
        assert!(Style::new().is_empty());
    }

    #[test]
    fn test_key_names_parse_back() {
        for key in StyleKey::ALL {
            assert_eq!(key.name().parse::<StyleKey>(), Ok(key));
        }
        assert_eq!(
            "shadow".parse::<StyleKey>(),
            Err(Error::UnknownStyleKey("shadow".into()))
        );
    }

    #[test]
    fn test_radius_padding_and_limits() {
        assert_eq!(Radius::from(5).corners(StyleKey::BorderRadius), Ok([5; 4]));
        assert_eq!(
            Radius::from(vec![3, 4]).corners(StyleKey::BorderRadius),
            Ok([3, 4, -1, -1])
        );
        assert_eq!(
            Radius::from(vec![1, 2, 3, 4, 5]).corners(StyleKey::FgRadius),
            Err(Error::InvalidRadius {
                key: StyleKey::FgRadius,
                len: 5
            })
        );
    }

    #[test]
    fn test_resolve_rect_in_place() {
        let mut style = Style::new().with_rect(RectSpec::new(Auto, 10, Auto, Auto));
        let resolved = style.resolve_rect(Rect::new(5, 5, 20, 20));
        assert_eq!(resolved, Some(Rect::new(5, 10, 20, 20)));
        assert_eq!(style.rect, Some(RectSpec::from((5, 10, 20, 20))));
    }

    #[test]
    fn test_interpolation_table() {
        assert_eq!(
            StyleKey::TextColor.interpolation(),
            Interpolation::Color(ColorKey::TextColor)
        );
        assert_eq!(StyleKey::BorderWidth.interpolation(), Interpolation::Hold);
        assert_eq!(StyleKey::Rect.interpolation(), Interpolation::Rect);
    }
}
