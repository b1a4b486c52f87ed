use crate::{
    core::math::{in_coord_range, round_to_i64, Vector2},
    error::ClipError,
};
use std::ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Point on the 64 bit integer lattice.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point64 {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

impl Point64 {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Point64 { x, y }
    }

    /// Construct from a floating point position, rounding half to even on both coordinates.
    ///
    /// Returns [ClipError::CoordinateOverflow] if a coordinate is not finite or does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use polyclip::geometry::Point64;
    /// # use polyclip::core::math::Vector2;
    /// let p = Point64::from_vector2(Vector2::new(2.5, -0.5)).unwrap();
    /// assert_eq!(p, Point64::new(2, 0));
    /// ```
    #[inline]
    pub fn from_vector2(v: Vector2) -> Result<Self, ClipError> {
        match (round_to_i64(v.x), round_to_i64(v.y)) {
            (Some(x), Some(y)) => Ok(Point64::new(x, y)),
            _ => Err(ClipError::CoordinateOverflow),
        }
    }

    /// Position as a floating point vector.
    #[inline]
    pub fn pos(&self) -> Vector2 {
        Vector2::from(*self)
    }

    /// Returns true if both coordinates are inside the supported input range.
    #[inline]
    pub fn in_range(&self) -> bool {
        in_coord_range(*self)
    }

    /// Checked addition, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Point64::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    /// Checked subtraction, `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Point64::new(
            self.x.checked_sub(other.x)?,
            self.y.checked_sub(other.y)?,
        ))
    }
}

impl From<(i64, i64)> for Point64 {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Point64::new(x, y)
    }
}

impl ops::Add for Point64 {
    type Output = Point64;
    #[inline]
    fn add(self, rhs: Point64) -> Self::Output {
        Point64::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Point64 {
    type Output = Point64;
    #[inline]
    fn sub(self, rhs: Point64) -> Self::Output {
        Point64::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Neg for Point64 {
    type Output = Point64;
    #[inline]
    fn neg(self) -> Self::Output {
        Point64::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Point64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
