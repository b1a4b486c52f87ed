use super::{Path64, Point64};
use crate::error::ClipError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle with integer bounds.
///
/// `top` is the minimum y and `bottom` the maximum y. A valid rect has `left <= right` and
/// `top <= bottom`, a rect with zero width or height is valid but empty.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect64 {
    /// Minimum x.
    pub left: i64,
    /// Minimum y.
    pub top: i64,
    /// Maximum x.
    pub right: i64,
    /// Maximum y.
    pub bottom: i64,
}

impl Rect64 {
    #[inline]
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Rect64 {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rect that any point or rect [Rect64::union]s into (inverted to the extremes).
    #[inline]
    pub(crate) const fn inverted() -> Self {
        Rect64::new(i64::MAX, i64::MAX, i64::MIN, i64::MIN)
    }

    /// Returns an error if the rect is inverted (`left > right` or `top > bottom`).
    pub fn validate(&self) -> Result<(), ClipError> {
        if self.left > self.right || self.top > self.bottom {
            return Err(ClipError::InvalidRect);
        }
        Ok(())
    }

    /// Width (saturating).
    #[inline]
    pub fn width(&self) -> i64 {
        self.right.saturating_sub(self.left)
    }

    /// Height (saturating).
    #[inline]
    pub fn height(&self) -> i64 {
        self.bottom.saturating_sub(self.top)
    }

    /// True if the rect covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// Center point, rounded toward negative infinity.
    #[inline]
    pub fn mid_point(&self) -> Point64 {
        let mid = |a: i64, b: i64| ((a as i128 + b as i128).div_euclid(2)) as i64;
        Point64::new(mid(self.left, self.right), mid(self.top, self.bottom))
    }

    /// Half open containment: `left <= x < right` and `top <= y < bottom`.
    #[inline]
    pub fn contains_point(&self, pt: Point64) -> bool {
        pt.x >= self.left && pt.x < self.right && pt.y >= self.top && pt.y < self.bottom
    }

    /// Inclusive containment, points on any side count as inside.
    #[inline]
    pub fn contains_point_inclusive(&self, pt: Point64) -> bool {
        pt.x >= self.left && pt.x <= self.right && pt.y >= self.top && pt.y <= self.bottom
    }

    /// True if `other` lies completely within this rect (shared sides allowed).
    #[inline]
    pub fn contains_rect(&self, other: &Rect64) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// True if the rects overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &Rect64) -> bool {
        self.left.max(other.left) <= self.right.min(other.right)
            && self.top.max(other.top) <= self.bottom.min(other.bottom)
    }

    /// Smallest rect covering both rects.
    #[inline]
    pub fn union(&self, other: &Rect64) -> Rect64 {
        Rect64::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Grow the rect to include `pt`.
    #[inline]
    pub(crate) fn include(&mut self, pt: Point64) {
        self.left = self.left.min(pt.x);
        self.right = self.right.max(pt.x);
        self.top = self.top.min(pt.y);
        self.bottom = self.bottom.max(pt.y);
    }

    /// Corners as a counter clockwise (positive area) path starting at (`left`, `top`).
    pub fn as_path(&self) -> Path64 {
        vec![
            Point64::new(self.left, self.top),
            Point64::new(self.right, self.top),
            Point64::new(self.right, self.bottom),
            Point64::new(self.left, self.bottom),
        ]
    }

    /// Rect described by a 4 point axis aligned path (any start corner, either direction).
    ///
    /// # Examples
    ///
    /// ```
    /// # use polyclip::geometry::*;
    /// let path = vec![
    ///     Point64::new(10, 0),
    ///     Point64::new(10, 5),
    ///     Point64::new(0, 5),
    ///     Point64::new(0, 0),
    /// ];
    /// assert_eq!(Rect64::from_path(&path), Ok(Rect64::new(0, 0, 10, 5)));
    ///
    /// let diamond = vec![
    ///     Point64::new(5, 0),
    ///     Point64::new(10, 5),
    ///     Point64::new(5, 10),
    ///     Point64::new(0, 5),
    /// ];
    /// assert!(Rect64::from_path(&diamond).is_err());
    /// ```
    pub fn from_path(path: &[Point64]) -> Result<Rect64, ClipError> {
        if path.len() != 4 {
            return Err(ClipError::InvalidRect);
        }

        let mut r = Rect64::inverted();
        for &pt in path {
            r.include(pt);
        }

        for i in 0..4 {
            let p = path[i];
            let q = path[(i + 1) % 4];
            let on_corner = (p.x == r.left || p.x == r.right) && (p.y == r.top || p.y == r.bottom);
            let axis_aligned = p.x == q.x || p.y == q.y;
            if !on_corner || !axis_aligned {
                return Err(ClipError::InvalidRect);
            }
        }

        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_queries() {
        let r = Rect64::new(0, 0, 10, 20);
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 20);
        assert!(!r.is_empty());
        assert!(Rect64::new(0, 0, 0, 5).is_empty());
        assert_eq!(r.mid_point(), Point64::new(5, 10));
        assert!(r.contains_point(Point64::new(0, 0)));
        assert!(!r.contains_point(Point64::new(10, 5)));
        assert!(r.contains_point_inclusive(Point64::new(10, 5)));
        assert!(r.contains_rect(&Rect64::new(2, 2, 10, 20)));
        assert!(r.intersects(&Rect64::new(10, 20, 30, 30)));
        assert!(!r.intersects(&Rect64::new(11, 0, 30, 30)));
        assert_eq!(
            r.union(&Rect64::new(-5, 5, 3, 40)),
            Rect64::new(-5, 0, 10, 40)
        );
    }

    #[test]
    fn validation() {
        assert_eq!(Rect64::new(5, 0, 0, 5).validate(), Err(ClipError::InvalidRect));
        assert!(Rect64::new(0, 0, 0, 0).validate().is_ok());
        let r = Rect64::new(-3, -2, 7, 9);
        assert_eq!(Rect64::from_path(&r.as_path()), Ok(r));
        assert!(Rect64::from_path(&r.as_path()[..3]).is_err());
    }
}
