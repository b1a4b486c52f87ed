use crate::geometry::Point64;

/// Largest coordinate magnitude accepted as input, keeps every difference within `i64` and every
/// cross product within `i128`.
pub const MAX_COORD: i64 = i64::MAX / 2;

/// Smallest coordinate accepted as input.
pub const MIN_COORD: i64 = -MAX_COORD;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use polyclip::core::math::*;
/// let (min_val, max_val) = min_max(8, 4);
/// assert_eq!(min_val, 4);
/// assert_eq!(max_val, 8);
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Exact cross product of the vectors `pt1 -> pt2` and `pt2 -> pt3`.
///
/// Positive when the turn at `pt2` is counter clockwise (y-up), negative when clockwise, zero when
/// the three points are collinear.
///
/// # Examples
///
/// ```
/// # use polyclip::core::math::*;
/// # use polyclip::geometry::Point64;
/// let a = Point64::new(0, 0);
/// let b = Point64::new(10, 0);
/// assert!(cross_product(a, b, Point64::new(10, 10)) > 0);
/// assert!(cross_product(a, b, Point64::new(10, -10)) < 0);
/// assert_eq!(cross_product(a, b, Point64::new(20, 0)), 0);
/// ```
#[inline]
pub fn cross_product(pt1: Point64, pt2: Point64, pt3: Point64) -> i128 {
    let a = pt2.x as i128 - pt1.x as i128;
    let b = pt3.y as i128 - pt2.y as i128;
    let c = pt2.y as i128 - pt1.y as i128;
    let d = pt3.x as i128 - pt2.x as i128;
    a * b - c * d
}

/// Sign (-1, 0, 1) of [cross_product].
#[inline]
pub fn cross_product_sign(pt1: Point64, pt2: Point64, pt3: Point64) -> i32 {
    cross_product(pt1, pt2, pt3).signum() as i32
}

/// Exact dot product of the vectors `pt1 -> pt2` and `pt2 -> pt3`.
#[inline]
pub fn dot_product(pt1: Point64, pt2: Point64, pt3: Point64) -> i128 {
    let a = pt2.x as i128 - pt1.x as i128;
    let b = pt3.x as i128 - pt2.x as i128;
    let c = pt2.y as i128 - pt1.y as i128;
    let d = pt3.y as i128 - pt2.y as i128;
    a * b + c * d
}

/// Returns true if `pt1`, `shared_pt` and `pt2` lie on one line (exact).
#[inline]
pub fn is_collinear(pt1: Point64, shared_pt: Point64, pt2: Point64) -> bool {
    cross_product(pt1, shared_pt, pt2) == 0
}

/// Squared perpendicular distance of `pt` from the infinite line through `line1` and `line2`.
pub fn perpendic_dist_from_line_sqrd(pt: Point64, line1: Point64, line2: Point64) -> f64 {
    let a = (pt.x as f64) - (line1.x as f64);
    let b = (pt.y as f64) - (line1.y as f64);
    let c = (line2.x as f64) - (line1.x as f64);
    let d = (line2.y as f64) - (line1.y as f64);
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Twice the signed area of the triangle (`pt1`, `pt2`, `pt3`), positive when counter clockwise.
#[inline]
pub fn area_triangle(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    cross_product(pt1, pt2, pt3) as f64
}

/// Inverse slope (`dx/dy`) of the segment `pt1 -> pt2`. Horizontal segments return
/// `-f64::MAX` when heading right (+x) and `f64::MAX` when heading left.
#[inline]
pub fn get_dx(pt1: Point64, pt2: Point64) -> f64 {
    let dy = (pt2.y as f64) - (pt1.y as f64);
    if dy != 0.0 {
        ((pt2.x as f64) - (pt1.x as f64)) / dy
    } else if pt2.x > pt1.x {
        -f64::MAX
    } else {
        f64::MAX
    }
}

/// Rounds half to even and converts to `i64`, `None` if the result is not finite or does not fit.
///
/// # Examples
///
/// ```
/// # use polyclip::core::math::*;
/// assert_eq!(round_to_i64(2.5), Some(2));
/// assert_eq!(round_to_i64(3.5), Some(4));
/// assert_eq!(round_to_i64(-2.5), Some(-2));
/// assert_eq!(round_to_i64(f64::NAN), None);
/// assert_eq!(round_to_i64(1e30), None);
/// ```
#[inline]
pub fn round_to_i64(v: f64) -> Option<i64> {
    num_traits::cast::<f64, i64>(v.round_ties_even())
}

/// Rounds half to even and converts to `i64`, saturating at the `i64` range (NaN maps to zero).
///
/// Used where the value is already known to lie between two valid coordinates.
#[inline]
pub fn round_saturating(v: f64) -> i64 {
    v.round_ties_even() as i64
}

/// Both coordinates differ by less than 2.
#[inline]
pub fn pts_really_close(pt1: Point64, pt2: Point64) -> bool {
    (pt1.x as i128 - pt2.x as i128).abs() < 2 && (pt1.y as i128 - pt2.y as i128).abs() < 2
}

/// Returns true if `pt` lies within the supported input coordinate range.
#[inline]
pub fn in_coord_range(pt: Point64) -> bool {
    (MIN_COORD..=MAX_COORD).contains(&pt.x) && (MIN_COORD..=MAX_COORD).contains(&pt.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i64, y: i64) -> Point64 {
        Point64::new(x, y)
    }

    #[test]
    fn cross_product_does_not_overflow_at_range_limits() {
        let a = pt(MIN_COORD, MIN_COORD);
        let b = pt(MAX_COORD, MIN_COORD);
        let c = pt(MAX_COORD, MAX_COORD);
        assert!(cross_product(a, b, c) > 0);
        assert_eq!(cross_product_sign(c, b, a), -1);
    }

    #[test]
    fn collinear_and_dot() {
        assert!(is_collinear(pt(0, 0), pt(5, 5), pt(-3, -3)));
        assert!(!is_collinear(pt(0, 0), pt(5, 5), pt(-3, -2)));
        // reversal (180 degree spike) has a negative dot product
        assert!(dot_product(pt(0, 0), pt(5, 0), pt(2, 0)) < 0);
        assert!(dot_product(pt(0, 0), pt(5, 0), pt(9, 0)) > 0);
    }

    #[test]
    fn dx_of_horizontals() {
        assert_eq!(get_dx(pt(0, 0), pt(5, 0)), -f64::MAX);
        assert_eq!(get_dx(pt(5, 0), pt(0, 0)), f64::MAX);
        assert_eq!(get_dx(pt(0, 0), pt(5, 10)), 0.5);
    }

    #[test]
    fn perpendicular_distance() {
        assert_eq!(perpendic_dist_from_line_sqrd(pt(0, 3), pt(-5, 0), pt(5, 0)), 9.0);
        assert_eq!(perpendic_dist_from_line_sqrd(pt(0, 3), pt(1, 1), pt(1, 1)), 0.0);
    }

    #[test]
    fn triangle_area_sign_matches_path_area() {
        // counter clockwise (y-up) triangle
        let a = area_triangle(pt(0, 0), pt(10, 0), pt(0, 10));
        assert!(a > 0.0);
        assert_eq!(a.abs(), 100.0);
    }
}
