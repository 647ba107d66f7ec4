//! Normalized coordinates.
//!
//! Every component sees its own area as the unit square `[0,1]×[0,1]`, x to
//! the right and y upwards. A [`Rect`] places one such area inside the
//! coordinate space of its parent; it may lie partly or fully outside the
//! parent's unit square.

use crate::error::{GuiError, GuiResult};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle stored as its min and max corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub const UNIT: Rect = Rect {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1.0,
        max_y: 1.0,
    };

    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Like [`Rect::new`], but rejects non-finite corners and inverted axes.
    /// Zero-area rectangles are accepted.
    pub fn checked(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> GuiResult<Self> {
        let r = Self::new(min_x, min_y, max_x, max_y);
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> GuiResult<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(GuiError::InvalidBounds(*self));
        }
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether the rectangle overlaps the unit viewport with non-zero extent.
    pub fn intersects_unit(&self) -> bool {
        self.max_x > 0.0 && self.min_x < 1.0 && self.max_y > 0.0 && self.min_y < 1.0
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Maps a point of the surrounding space into this rectangle's local
    /// unit space. Fails on zero-width or zero-height rectangles instead of
    /// producing NaN or infinite coordinates.
    pub fn to_local(&self, p: Vec2) -> GuiResult<Vec2> {
        if self.is_degenerate() {
            return Err(GuiError::DegenerateBounds(*self));
        }
        Ok(Vec2::new(
            (p.x - self.min_x) / self.width(),
            (p.y - self.min_y) / self.height(),
        ))
    }

    /// Inverse of [`Rect::to_local`].
    pub fn to_parent(&self, local: Vec2) -> Vec2 {
        Vec2::new(
            self.min_x + local.x * self.width(),
            self.min_y + local.y * self.height(),
        )
    }

    /// Maps a rectangle given in this rectangle's local space into the
    /// surrounding space. Composes: `a.sub_rect(b).sub_rect(c)` places `c`
    /// inside `b` inside `a`.
    pub fn sub_rect(&self, local: Rect) -> Rect {
        let min = self.to_parent(Vec2::new(local.min_x, local.min_y));
        let max = self.to_parent(Vec2::new(local.max_x, local.max_y));
        Rect::new(min.x, min.y, max.x, max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_trip_local_parent() {
        let rects = [
            Rect::new(0.2, 0.2, 0.4, 0.4),
            Rect::new(-0.5, 0.0, 0.25, 2.0),
            Rect::new(0.0, -3.0, 10.0, -1.5),
        ];
        for r in rects {
            for i in 0..=10 {
                for j in 0..=10 {
                    let p = Vec2::new(i as f32 / 10.0, j as f32 / 10.0);
                    let back = r.to_parent(r.to_local(p).unwrap());
                    assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-5);
                    assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_remap_is_an_error() {
        let r = Rect::new(0.3, 0.1, 0.3, 0.9);
        assert!(matches!(
            r.to_local(Vec2::new(0.3, 0.5)),
            Err(GuiError::DegenerateBounds(_))
        ));
    }

    #[test]
    fn test_checked_rejects_inverted() {
        assert!(Rect::checked(0.5, 0.0, 0.4, 1.0).is_err());
        assert!(Rect::checked(0.0, 0.0, f32::NAN, 1.0).is_err());
        assert!(Rect::checked(0.4, 0.4, 0.4, 0.4).is_ok());
    }

    #[test]
    fn test_sub_rect_composes() {
        let outer = Rect::new(0.5, 0.5, 1.0, 1.0);
        let inner = outer.sub_rect(Rect::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(inner, Rect::new(0.5, 0.5, 0.75, 0.75));
    }

    #[test]
    fn test_intersects_unit() {
        assert!(Rect::new(0.9, 0.9, 1.5, 1.5).intersects_unit());
        assert!(!Rect::new(1.0, 0.0, 2.0, 1.0).intersects_unit());
        assert!(!Rect::new(-1.0, -1.0, 0.0, 0.5).intersects_unit());
    }
}
