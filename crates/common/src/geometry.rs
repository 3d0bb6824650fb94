//! Geometric primitives for viewport math.

use serde::{Deserialize, Serialize};

/// A 2D rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Vertical midpoint, used for center-proximity scoring.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Intersection with another rect, or `None` when disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Fraction of this rect covered by `other`, in `[0, 1]`.
    pub fn coverage_by(&self, other: &Rect) -> f64 {
        if self.area() <= 0.0 {
            return 0.0;
        }
        self.intersection(other)
            .map(|i| i.area() / self.area())
            .unwrap_or(0.0)
    }
}

/// A margin value, in pixels or as a percentage of a reference length.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum MarginValue {
    Pixels(f64),
    Percentage(f64),
}

impl MarginValue {
    /// Resolve to pixels against a reference length.
    pub fn to_pixels(&self, reference: f64) -> f64 {
        match self {
            MarginValue::Pixels(px) => *px,
            MarginValue::Percentage(pct) => reference * pct / 100.0,
        }
    }
}

impl Default for MarginValue {
    fn default() -> Self {
        MarginValue::Pixels(0.0)
    }
}

/// Per-edge margins applied when expanding a watch region.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Margins {
    /// Equal top and bottom margins, zero on the sides.
    pub const fn vertical(value: MarginValue) -> Self {
        Self {
            top: value,
            right: MarginValue::Pixels(0.0),
            bottom: value,
            left: MarginValue::Pixels(0.0),
        }
    }

    /// Expand `rect`, resolving percentages against its own dimensions.
    pub fn expand(&self, rect: &Rect) -> Rect {
        let top = self.top.to_pixels(rect.height);
        let right = self.right.to_pixels(rect.width);
        let bottom = self.bottom.to_pixels(rect.height);
        let left = self.left.to_pixels(rect.width);

        Rect::new(
            rect.x - left,
            rect.y - top,
            rect.width + left + right,
            rect.height + top + bottom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);

        let i = a.intersection(&b).unwrap();
        assert_eq!(i.x, 50.0);
        assert_eq!(i.y, 50.0);
        assert_eq!(i.width, 50.0);
        assert_eq!(i.height, 50.0);
    }

    #[test]
    fn test_no_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(200.0, 200.0, 100.0, 100.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_coverage() {
        let target = Rect::new(0.0, 50.0, 100.0, 100.0);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!((target.coverage_by(&viewport) - 0.5).abs() < 1e-9);

        let empty = Rect::ZERO;
        assert_eq!(empty.coverage_by(&viewport), 0.0);
    }

    #[test]
    fn test_margin_expand() {
        let viewport = Rect::new(0.0, 100.0, 200.0, 400.0);
        let margins = Margins::vertical(MarginValue::Percentage(50.0));
        let expanded = margins.expand(&viewport);

        assert_eq!(expanded.y, -100.0);
        assert_eq!(expanded.height, 800.0);
        assert_eq!(expanded.x, 0.0);
        assert_eq!(expanded.width, 200.0);
    }
}
