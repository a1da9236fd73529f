//! Interpolation between two styles over time.
//!
//! A [`Transition`] is built from a start and an end [`Style`], normalizes the
//! keys it animates (colors to RGBA channels, radii to four corners, rects to
//! concrete components) and produces an interpolated style on every
//! [`Transition::tick`]. It never touches an entity; [`crate::Entity`] owns one
//! and renders whatever it returns.

use statewise_macros::WithSetters;

use crate::color::ColorValue;
use crate::easing::{Curve, EasingFn};
use crate::error::{Error, Result};
use crate::geometry::{Rect, RectSpec};
use crate::style::{ColorKey, Interpolation, Radius, RadiusKey, Style, StyleKey};

/// Options for starting a transition
#[derive(Debug, Clone, Default, WithSetters)]
pub struct TransitionOptions {
    /// Keys to animate; defaults to every key present in the end style
    pub keys: Option<Vec<StyleKey>>,
    /// Animate the union of the start and end keys, ignoring `keys`
    pub all_keys: bool,
    /// Easing curve, `linear` by default
    pub easing: Curve,
    /// Restart even when the target is already the selected state
    pub force: bool,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Track {
    Color {
        key: ColorKey,
        from: [i32; 4],
        to: [i32; 4],
    },
    Corners {
        key: RadiusKey,
        from: [i32; 4],
        to: [i32; 4],
    },
    Rect {
        from: [i32; 4],
        to: [i32; 4],
    },
}

/// Linearly interpolate between two integer components, rounding to the nearest integer
///
/// Computed in `f64` so components far apart cannot overflow; the float to
/// int cast saturates at the `i32` bounds.
fn lerp_component(from: i32, to: i32, progress: f32) -> i32 {
    let (from, to) = (f64::from(from), f64::from(to));
    (from + (to - from) * f64::from(progress)).round() as i32
}

fn lerp4(from: [i32; 4], to: [i32; 4], progress: f32) -> [i32; 4] {
    std::array::from_fn(|i| lerp_component(from[i], to[i], progress))
}

impl Track {
    fn write(&self, style: &mut Style, values: [i32; 4]) {
        match self {
            Track::Color { key, .. } => {
                let clamped = values.map(|v| v.clamp(0, 255));
                *style.color_mut(*key) = Some(ColorValue::Rgba(clamped));
            }
            Track::Corners { key, .. } => {
                *style.radius_mut(*key) = Some(Radius::Corners(values.to_vec()));
            }
            Track::Rect { .. } => {
                style.rect = Some(RectSpec::from(Rect::from(values)));
            }
        }
    }

    fn endpoints(&self) -> ([i32; 4], [i32; 4]) {
        match self {
            Track::Color { from, to, .. }
            | Track::Corners { from, to, .. }
            | Track::Rect { from, to } => (*from, *to),
        }
    }
}

/// Channels of a color that may take part in a transition
fn transition_channels(key: StyleKey, value: &ColorValue) -> Result<[i32; 4]> {
    let invalid = || Error::InvalidColor {
        key,
        value: format!("{value:?}"),
    };
    let channels = value.channels().ok_or_else(invalid)?;
    if channels.iter().any(|c| !(0..=255).contains(c)) {
        return Err(invalid());
    }
    Ok(channels)
}

/// Stateful interpolation between two styles, advanced by [`Transition::tick`]
#[derive(Debug, Clone)]
pub struct Transition {
    duration: f32,
    easing: EasingFn,
    elapsed: f32,
    progress: f32,
    keys: Vec<StyleKey>,
    tracks: Vec<Track>,
    held: Vec<StyleKey>,
    end: Style,
    current: Style,
    finished: bool,
}

impl Transition {
    /// Build a transition from `start` to `end`
    ///
    /// Fails on a non-positive duration, an unknown easing name, a color that
    /// is not a channel sequence in `0..=255`, or a radius with more than four
    /// corners. Input values are never clamped.
    pub fn new(duration: f32, start: &Style, end: &Style, options: &TransitionOptions) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::InvalidDuration(duration));
        }
        let easing = options.easing.resolve()?;

        let requested = |key: StyleKey| {
            if options.all_keys {
                start.contains(key) || end.contains(key)
            } else if let Some(keys) = &options.keys {
                keys.contains(&key)
            } else {
                end.contains(key)
            }
        };
        // Keys missing from the end style have nothing to move towards
        let keys: Vec<StyleKey> = StyleKey::ALL
            .into_iter()
            .filter(|key| requested(*key) && end.contains(*key))
            .collect();

        let mut tracks = Vec::new();
        let mut held = Vec::new();
        for &key in &keys {
            match key.interpolation() {
                Interpolation::Color(color_key) => {
                    let Some(to) = end.color(color_key) else {
                        continue;
                    };
                    let to = transition_channels(key, to)?;
                    let from = match start.color(color_key) {
                        Some(value) => transition_channels(key, value)?,
                        None => [0, 0, 0, 0],
                    };
                    tracks.push(Track::Color {
                        key: color_key,
                        from,
                        to,
                    });
                }
                Interpolation::Corners(radius_key) => {
                    let Some(to) = end.radius(radius_key) else {
                        continue;
                    };
                    let to = to.corners(key)?;
                    let from = match start.radius(radius_key) {
                        Some(value) => value.corners(key)?,
                        None => to,
                    };
                    tracks.push(Track::Corners {
                        key: radius_key,
                        from,
                        to,
                    });
                }
                Interpolation::Rect => {
                    let Some(end_rect) = end.rect else {
                        continue;
                    };
                    let start_fields = start.rect.map(|r| r.fields());
                    let end_fields = end_rect.fields();
                    let mut from = [0; 4];
                    let mut to = [0; 4];
                    for i in 0..4 {
                        let start_value = start_fields.and_then(|f| f[i].value());
                        to[i] = end_fields[i].value().or(start_value).unwrap_or(0);
                        from[i] = start_value.unwrap_or(to[i]);
                    }
                    tracks.push(Track::Rect { from, to });
                }
                Interpolation::Hold => held.push(key),
            }
        }

        let mut current = start.clone();
        for track in &tracks {
            let (from, _) = track.endpoints();
            track.write(&mut current, from);
        }

        log::debug!(
            "Transition over {duration} for {} keys ({} interpolated)",
            keys.len(),
            tracks.len()
        );

        Ok(Self {
            duration,
            easing,
            elapsed: 0.0,
            progress: 0.0,
            keys,
            tracks,
            held,
            end: end.clone(),
            current,
            finished: false,
        })
    }

    /// Advance by `dt` and return the interpolated style
    ///
    /// Once finished, every selected key holds its exact end value and further
    /// ticks change nothing.
    pub fn tick(&mut self, dt: f32) -> &Style {
        if self.finished {
            return &self.current;
        }

        self.elapsed += dt;
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.progress = (self.easing)(t);

        if self.elapsed >= self.duration {
            self.finish();
        } else {
            for track in &self.tracks {
                let (from, to) = track.endpoints();
                track.write(&mut self.current, lerp4(from, to, self.progress));
            }
        }

        &self.current
    }

    fn finish(&mut self) {
        self.finished = true;
        self.progress = 1.0;
        for track in &self.tracks {
            let (_, to) = track.endpoints();
            track.write(&mut self.current, to);
        }
        for key in &self.held {
            self.current.copy_key_from(*key, &self.end);
        }
    }

    pub fn current(&self) -> &Style {
        &self.current
    }

    /// The end style as given, before normalization
    pub fn target(&self) -> &Style {
        &self.end
    }

    /// Keys taking part in this transition, in declaration order
    pub fn keys(&self) -> &[StyleKey] {
        &self.keys
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Eased progress of the last tick
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectField::Auto;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn bg_style(c: (u8, u8, u8)) -> Style {
        Style::new().with_bg(c)
    }

    #[test]
    fn test_linear_color_midpoint() {
        let mut tr = Transition::new(
            10.0,
            &bg_style((0, 0, 0)),
            &bg_style((100, 200, 50)),
            &TransitionOptions::new(),
        )
        .unwrap();

        let style = tr.tick(5.0);
        assert_eq!(style.bg, Some(ColorValue::Rgba([50, 100, 25, 255])));
        assert!(!tr.is_finished());
    }

    #[test]
    fn test_finished_is_sticky_and_exact() {
        let end = Style::new()
            .with_bg((10, 20, 30))
            .with_border_radius(8)
            .with_rect((0, 0, 40, 40))
            .with_border_width(4);
        let start = Style::new()
            .with_bg((200, 200, 200))
            .with_border_radius(0)
            .with_rect((10, 10, 20, 20))
            .with_border_width(1);
        let mut tr = Transition::new(3.0, &start, &end, &TransitionOptions::new()).unwrap();

        tr.tick(1.0);
        assert_eq!(tr.current().border_width, Some(1));
        tr.tick(2.0);
        assert!(tr.is_finished());

        let current = tr.current().clone();
        assert_eq!(current.bg, Some(ColorValue::Rgba([10, 20, 30, 255])));
        assert_eq!(current.border_radius, Some(Radius::Corners(vec![8; 4])));
        assert_eq!(current.rect, Some(RectSpec::from((0, 0, 40, 40))));
        assert_eq!(current.border_width, Some(4));

        tr.tick(5.0);
        assert!(tr.is_finished());
        assert_eq!(tr.current(), &current);
        assert_eq!(tr.progress(), 1.0);
    }

    #[test]
    fn test_rejects_out_of_range_color() {
        let end = Style::new().with_bg([300, -50, 255, 255]);
        let err = Transition::new(1.0, &Style::new(), &end, &TransitionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { key: StyleKey::Bg, .. }));
    }

    #[test]
    fn test_rejects_symbolic_colors() {
        let start = Style::new().with_border("red");
        let end = Style::new().with_border((0, 0, 0));
        let err = Transition::new(1.0, &start, &end, &TransitionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { key: StyleKey::Border, .. }));

        let end = Style::new().with_fg(0xff0000ffu32);
        let err = Transition::new(1.0, &Style::new(), &end, &TransitionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { key: StyleKey::Fg, .. }));
    }

    #[test]
    fn test_rejects_bad_duration_and_curve() {
        let s = bg_style((1, 1, 1));
        let opts = TransitionOptions::new();
        assert_eq!(
            Transition::new(0.0, &s, &s, &opts).unwrap_err(),
            Error::InvalidDuration(0.0)
        );
        assert!(Transition::new(f32::NAN, &s, &s, &opts).is_err());
        assert_eq!(
            Transition::new(1.0, &s, &s, &opts.with_easing("wobble")).unwrap_err(),
            Error::InvalidCurve("wobble".into())
        );
    }

    #[test]
    fn test_missing_start_color_fades_from_transparent() {
        let mut tr = Transition::new(
            2.0,
            &Style::new(),
            &bg_style((100, 100, 100)),
            &TransitionOptions::new(),
        )
        .unwrap();
        assert_eq!(tr.current().bg, Some(ColorValue::Rgba([0, 0, 0, 0])));
        assert_eq!(
            tr.tick(1.0).bg,
            Some(ColorValue::Rgba([50, 50, 50, 128]))
        );
    }

    #[test]
    fn test_radius_broadcast_and_missing_start() {
        let start = Style::new().with_fg_radius(vec![0, 10]);
        let end = Style::new().with_fg_radius(20).with_border_radius(6);
        let mut tr = Transition::new(2.0, &start, &end, &TransitionOptions::new()).unwrap();
        let style = tr.tick(1.0);
        // padded corners move from -1 towards 20
        assert_eq!(style.fg_radius, Some(Radius::Corners(vec![10, 15, 10, 10])));
        assert_eq!(style.border_radius, Some(Radius::Corners(vec![6; 4])));
    }

    #[test]
    fn test_rect_auto_fields_take_start_value() {
        let start = Style::new().with_rect((5, 5, 20, 20));
        let end = Style::new().with_rect(RectSpec::new(Auto, 10, Auto, 40));
        let mut tr = Transition::new(1.0, &start, &end, &TransitionOptions::new()).unwrap();
        assert_eq!(tr.tick(1.0).rect, Some(RectSpec::from((5, 10, 20, 40))));
    }

    #[test]
    fn test_rect_spanning_i32_range() {
        let start = Style::new().with_rect((-2_000_000_000, 0, 10, 10));
        let end = Style::new().with_rect((2_000_000_000, 0, 10, 10));
        let mut tr = Transition::new(2.0, &start, &end, &TransitionOptions::new()).unwrap();
        assert_eq!(tr.tick(1.0).rect, Some(RectSpec::from((0, 0, 10, 10))));
        assert_eq!(
            tr.tick(1.0).rect,
            Some(RectSpec::from((2_000_000_000, 0, 10, 10)))
        );
        assert!(tr.is_finished());
    }

    #[test]
    fn test_key_selection() {
        let start = Style::new().with_bg((0, 0, 0)).with_text("a");
        let end = Style::new().with_bg((10, 10, 10)).with_fg((5, 5, 5));

        let tr = Transition::new(1.0, &start, &end, &TransitionOptions::new()).unwrap();
        assert_eq!(tr.keys(), &[StyleKey::Bg, StyleKey::Fg]);

        let opts = TransitionOptions::new().with_keys(vec![StyleKey::Fg, StyleKey::Border]);
        let tr = Transition::new(1.0, &start, &end, &opts).unwrap();
        assert_eq!(tr.keys(), &[StyleKey::Fg]);

        // text is only in start, so it is dropped
        let opts = TransitionOptions::new().with_all_keys(true);
        let tr = Transition::new(1.0, &start, &end, &opts).unwrap();
        assert_eq!(tr.keys(), &[StyleKey::Bg, StyleKey::Fg]);
        assert_eq!(tr.current().text.as_deref(), Some("a"));
    }

    #[test]
    fn test_eased_progress() {
        let opts = TransitionOptions::new().with_easing("quadratic_in");
        let mut tr = Transition::new(
            10.0,
            &bg_style((0, 0, 0)),
            &bg_style((200, 200, 200)),
            &opts,
        )
        .unwrap();
        assert_eq!(tr.tick(5.0).bg, Some(ColorValue::Rgba([50, 50, 50, 255])));
    }

    #[test]
    fn test_custom_curve() {
        fn snap(t: f32) -> f32 {
            if t < 1.0 {
                0.0
            } else {
                1.0
            }
        }
        let opts = TransitionOptions::new().with_easing(snap as EasingFn);
        let mut tr = Transition::new(
            4.0,
            &bg_style((0, 0, 0)),
            &bg_style((80, 80, 80)),
            &opts,
        )
        .unwrap();
        assert_eq!(tr.tick(3.0).bg, Some(ColorValue::Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_determinism_under_random_ticks() {
        let start = Style::new()
            .with_bg((0, 0, 0))
            .with_rect((0, 0, 10, 10))
            .with_border_radius(2);
        let end = Style::new()
            .with_bg((255, 128, 7))
            .with_rect((100, 50, 30, 30))
            .with_border_radius(vec![9, 3]);
        let opts = TransitionOptions::new().with_easing("sine_in_out");

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tr = Transition::new(25.0, &start, &end, &opts).unwrap();
            let mut styles = Vec::new();
            while !tr.is_finished() {
                styles.push(tr.tick(rng.random_range(0.1..3.0)).clone());
            }
            styles
        };

        let a = run(42);
        assert_eq!(a, run(42));
        assert!(!a.is_empty());
    }
}
