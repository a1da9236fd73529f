/// 8-bit RGBA color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[repr(C)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Decode a packed `0xRRGGBBAA` value
    pub const fn from_packed(packed: u32) -> Self {
        Self::new(
            (packed >> 24) as u8,
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }

    /// with alpha builder method
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.a = alpha;
        self
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Composite `self` over `dst` (straight alpha, source-over)
    pub fn over(self, dst: Rgba) -> Rgba {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }

        let sa = self.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| -> u8 {
            let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };

        Rgba {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

/// A color as written in a style
///
/// Only channel sequences take part in transitions. Named and indexed colors
/// are resolved by the renderer and must be converted to channels by the
/// caller before they can be interpolated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorValue {
    /// Three channels, alpha defaults to 255
    Rgb([i32; 3]),
    /// Four channels
    Rgba([i32; 4]),
    /// Symbolic color name (e.g. `"red"`)
    Named(String),
    /// Packed `0xRRGGBBAA` color
    Indexed(u32),
}

impl ColorValue {
    /// Channels expanded to RGBA, or `None` for symbolic/indexed colors.
    ///
    /// Channels are returned as written, without range checking.
    pub fn channels(&self) -> Option<[i32; 4]> {
        match self {
            ColorValue::Rgb([r, g, b]) => Some([*r, *g, *b, 255]),
            ColorValue::Rgba(c) => Some(*c),
            ColorValue::Named(_) | ColorValue::Indexed(_) => None,
        }
    }

    /// Concrete color when every channel is within 0..=255
    pub fn to_rgba(&self) -> Option<Rgba> {
        let c = self.channels()?;
        if c.iter().all(|v| (0..=255).contains(v)) {
            Some(Rgba::new(c[0] as u8, c[1] as u8, c[2] as u8, c[3] as u8))
        } else {
            None
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, ColorValue::Named(_) | ColorValue::Indexed(_))
    }
}

impl From<Rgba> for ColorValue {
    fn from(c: Rgba) -> Self {
        ColorValue::Rgba([c.r as i32, c.g as i32, c.b as i32, c.a as i32])
    }
}

impl From<(u8, u8, u8)> for ColorValue {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorValue::Rgb([r as i32, g as i32, b as i32])
    }
}

impl From<(u8, u8, u8, u8)> for ColorValue {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        ColorValue::Rgba([r as i32, g as i32, b as i32, a as i32])
    }
}

impl From<[i32; 3]> for ColorValue {
    fn from(c: [i32; 3]) -> Self {
        ColorValue::Rgb(c)
    }
}

impl From<[i32; 4]> for ColorValue {
    fn from(c: [i32; 4]) -> Self {
        ColorValue::Rgba(c)
    }
}

impl From<&str> for ColorValue {
    fn from(name: &str) -> Self {
        ColorValue::Named(name.to_string())
    }
}

impl From<String> for ColorValue {
    fn from(name: String) -> Self {
        ColorValue::Named(name)
    }
}

impl From<u32> for ColorValue {
    fn from(packed: u32) -> Self {
        ColorValue::Indexed(packed)
    }
}

/// CSS color constants
pub mod css {
    use super::Rgba;

    pub const AQUA: Rgba = Rgba::rgb(0, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const FUCHSIA: Rgba = Rgba::rgb(255, 0, 255);
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);
    pub const GREEN: Rgba = Rgba::rgb(0, 128, 0);
    pub const LIME: Rgba = Rgba::rgb(0, 255, 0);
    pub const MAROON: Rgba = Rgba::rgb(128, 0, 0);
    pub const NAVY: Rgba = Rgba::rgb(0, 0, 128);
    pub const OLIVE: Rgba = Rgba::rgb(128, 128, 0);
    pub const PURPLE: Rgba = Rgba::rgb(128, 0, 128);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const SILVER: Rgba = Rgba::rgb(192, 192, 192);
    pub const TEAL: Rgba = Rgba::rgb(0, 128, 128);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);

    /// Look up a basic CSS color by (case-insensitive) name
    pub fn named(name: &str) -> Option<Rgba> {
        let color = match name.to_ascii_lowercase().as_str() {
            "aqua" | "cyan" => AQUA,
            "black" => BLACK,
            "blue" => BLUE,
            "fuchsia" | "magenta" => FUCHSIA,
            "gray" | "grey" => GRAY,
            "green" => GREEN,
            "lime" => LIME,
            "maroon" => MAROON,
            "navy" => NAVY,
            "olive" => OLIVE,
            "purple" => PURPLE,
            "red" => RED,
            "silver" => SILVER,
            "teal" => TEAL,
            "white" => WHITE,
            "yellow" => YELLOW,
            "transparent" => Rgba::transparent(),
            _ => return None,
        };
        Some(color)
    }
}

/// Catppuccin color palette
pub mod catppuccin {
    pub mod mocha {
        use crate::color::Rgba;

        pub const ROSEWATER: Rgba = Rgba::rgb(245, 224, 220);
        pub const PINK: Rgba = Rgba::rgb(245, 194, 231);
        pub const MAUVE: Rgba = Rgba::rgb(203, 166, 247);
        pub const RED: Rgba = Rgba::rgb(243, 139, 168);
        pub const PEACH: Rgba = Rgba::rgb(250, 179, 135);
        pub const YELLOW: Rgba = Rgba::rgb(249, 226, 175);
        pub const GREEN: Rgba = Rgba::rgb(166, 227, 161);
        pub const TEAL: Rgba = Rgba::rgb(148, 226, 213);
        pub const BLUE: Rgba = Rgba::rgb(137, 180, 250);
        pub const LAVENDER: Rgba = Rgba::rgb(180, 190, 254);
        pub const TEXT: Rgba = Rgba::rgb(205, 214, 244);
        pub const SUBTEXT1: Rgba = Rgba::rgb(186, 194, 222);
        pub const SUBTEXT0: Rgba = Rgba::rgb(166, 173, 200);
        pub const OVERLAY0: Rgba = Rgba::rgb(108, 112, 134);
        pub const SURFACE2: Rgba = Rgba::rgb(88, 91, 112);
        pub const SURFACE1: Rgba = Rgba::rgb(69, 71, 90);
        pub const SURFACE0: Rgba = Rgba::rgb(49, 50, 68);
        pub const BASE: Rgba = Rgba::rgb(30, 30, 46);
        pub const MANTLE: Rgba = Rgba::rgb(24, 24, 37);
        pub const CRUST: Rgba = Rgba::rgb(17, 17, 27);
    }
}
