use glam::{IVec2, Vec2};

/// Integer rectangle: top-left corner plus size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_position_size(position: IVec2, size: IVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    /// Exclusive right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Check if a point is inside this rectangle
    ///
    /// The left/top edges are inclusive, the right/bottom edges exclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }

    /// Same size, moved by `offset`
    pub fn translated(&self, offset: IVec2) -> Rect {
        Rect::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.w,
            self.h,
        )
    }

    /// Same size, placed at the origin
    pub fn at_origin(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    pub const fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.w, self.h]
    }

    /// Width and height clamped to zero, as surface dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.w.max(0) as u32, self.h.max(0) as u32)
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((x, y, w, h): (i32, i32, i32, i32)) -> Self {
        Self::new(x, y, w, h)
    }
}

impl From<[i32; 4]> for Rect {
    fn from(arr: [i32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

/// One component of a [`RectSpec`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RectField {
    /// Keep the entity's current value for this component
    Auto,
    /// Use this value
    At(i32),
}

impl RectField {
    pub fn value(self) -> Option<i32> {
        match self {
            RectField::Auto => None,
            RectField::At(v) => Some(v),
        }
    }
}

impl From<i32> for RectField {
    fn from(v: i32) -> Self {
        RectField::At(v)
    }
}

/// The `rect` attribute of a style: `(x, y, w, h)` where any component may be
/// [`RectField::Auto`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RectSpec {
    pub x: RectField,
    pub y: RectField,
    pub w: RectField,
    pub h: RectField,
}

impl RectSpec {
    pub fn new(
        x: impl Into<RectField>,
        y: impl Into<RectField>,
        w: impl Into<RectField>,
        h: impl Into<RectField>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            w: w.into(),
            h: h.into(),
        }
    }

    /// Every component set to `Auto`
    pub const fn auto() -> Self {
        Self {
            x: RectField::Auto,
            y: RectField::Auto,
            w: RectField::Auto,
            h: RectField::Auto,
        }
    }

    pub const fn fields(&self) -> [RectField; 4] {
        [self.x, self.y, self.w, self.h]
    }

    pub fn from_fields(fields: [RectField; 4]) -> Self {
        Self::new(fields[0], fields[1], fields[2], fields[3])
    }

    /// Replace every `Auto` component with the matching component of `current`
    pub fn resolve(&self, current: Rect) -> Rect {
        let cur = current.to_array();
        let f = self.fields();
        let pick = |i: usize| f[i].value().unwrap_or(cur[i]);
        Rect::new(pick(0), pick(1), pick(2), pick(3))
    }

    /// The rectangle, if no component is `Auto`
    pub fn as_rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.x.value()?,
            self.y.value()?,
            self.w.value()?,
            self.h.value()?,
        ))
    }

    pub fn is_concrete(&self) -> bool {
        self.as_rect().is_some()
    }
}

impl From<Rect> for RectSpec {
    fn from(r: Rect) -> Self {
        Self::new(r.x, r.y, r.w, r.h)
    }
}

impl From<(i32, i32, i32, i32)> for RectSpec {
    fn from(t: (i32, i32, i32, i32)) -> Self {
        Rect::from(t).into()
    }
}

impl From<[i32; 4]> for RectSpec {
    fn from(arr: [i32; 4]) -> Self {
        Rect::from(arr).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RectField::Auto;

    #[test]
    fn test_contains_point_edges() {
        let r = Rect::new(102, 103, 10, 10);
        assert!(r.contains_point(Vec2::new(108.0, 106.0)));
        assert!(r.contains_point(Vec2::new(102.0, 103.0)));
        assert!(!r.contains_point(Vec2::new(112.0, 106.0)));
        assert!(!r.contains_point(Vec2::new(8.0, 6.0)));
    }

    #[test]
    fn test_resolve_auto_fields() {
        let spec = RectSpec::new(Auto, 10, Auto, Auto);
        assert_eq!(spec.resolve(Rect::new(5, 5, 20, 20)), Rect::new(5, 10, 20, 20));
        assert!(!spec.is_concrete());
    }

    #[test]
    fn test_concrete_spec_round_trips_to_rect() {
        let spec = RectSpec::from((1, 2, 3, 4));
        assert_eq!(spec.as_rect(), Some(Rect::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_translated_keeps_size() {
        let r = Rect::new(2, 3, 10, 10).translated(IVec2::new(100, 100));
        assert_eq!(r, Rect::new(102, 103, 10, 10));
        assert_eq!(r.at_origin(), Rect::new(0, 0, 10, 10));
    }

    #[test]
    fn test_edges_saturate() {
        let r = Rect::new(2_000_000_000, 10, 2_000_000_000, i32::MAX);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert!(r.contains_point(Vec2::new(2_100_000_000.0, 20.0)));
        assert_eq!(r.translated(IVec2::new(i32::MAX, 0)).x, i32::MAX);
    }
}
