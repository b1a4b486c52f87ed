use crate::core::traits::FuzzyEq;
use crate::geometry::Point64;
use std::ops;

/// Floating point 2D vector, used for edge normals and intermediate offset positions.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new vector with x and y components.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Create a zero vector (x = 0, y = 0).
    #[inline]
    pub fn zero() -> Self {
        Vector2::new(0.0, 0.0)
    }

    /// Uniformly scale the vector by `scale_factor`.
    #[inline]
    pub fn scale(&self, scale_factor: f64) -> Self {
        vec2(scale_factor * self.x, scale_factor * self.y)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Compute the perpendicular dot product (`self.x * other.y - self.y * other.x`).
    #[inline]
    pub fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Length of the vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Normalize the vector (length = 1), a (near) zero length vector normalizes to zero.
    pub fn normalize(&self) -> Self {
        let h = self.length();
        if h.fuzzy_eq_zero_eps(0.001) {
            return Vector2::zero();
        }

        self.scale(1.0 / h)
    }

    /// Fuzzy equal comparison with another vector using `fuzzy_epsilon` given.
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: f64) -> bool {
        self.x.fuzzy_eq_eps(other.x, fuzzy_epsilon) && self.y.fuzzy_eq_eps(other.y, fuzzy_epsilon)
    }

    /// Fuzzy equal comparison with another vector using f64::fuzzy_epsilon().
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, f64::fuzzy_epsilon())
    }

    /// Reflect this point through `pivot`.
    #[inline]
    pub fn reflect(&self, pivot: Self) -> Self {
        vec2(pivot.x + (pivot.x - self.x), pivot.y + (pivot.y - self.y))
    }

    /// Position translated by `dx`, `dy`.
    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        vec2(self.x + dx, self.y + dy)
    }
}

impl From<Point64> for Vector2 {
    #[inline]
    fn from(p: Point64) -> Self {
        vec2(p.x as f64, p.y as f64)
    }
}

#[inline(always)]
pub fn vec2(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

macro_rules! ImplBinaryOp {
    ($op_trait:ident, $op_func:ident, $op:tt) => {
        impl ops::$op_trait<Vector2> for Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl ops::$op_trait<&Vector2> for Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: &Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

ImplBinaryOp!(Add, add, +);
ImplBinaryOp!(Sub, sub, -);

impl ops::Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Self::Output {
        Vector2::new(-self.x, -self.y)
    }
}
