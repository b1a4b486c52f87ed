use super::{cross_product_sign, round_saturating};
use crate::geometry::Point64;

/// Point where the segments `ln1a->ln1b` and `ln2a->ln2b` cross, rounded half to even.
///
/// The parametric position along the first segment is clamped to `[0, 1]` so the result never
/// leaves the first segment. Returns `None` when the segments are parallel.
///
/// # Examples
///
/// ```
/// # use polyclip::core::math::*;
/// # use polyclip::geometry::Point64;
/// let p = get_segment_intersect_pt(
///     Point64::new(0, 0),
///     Point64::new(10, 10),
///     Point64::new(0, 10),
///     Point64::new(10, 0),
/// );
/// assert_eq!(p, Some(Point64::new(5, 5)));
/// ```
pub fn get_segment_intersect_pt(
    ln1a: Point64,
    ln1b: Point64,
    ln2a: Point64,
    ln2b: Point64,
) -> Option<Point64> {
    let dx1 = ln1b.x as f64 - ln1a.x as f64;
    let dy1 = ln1b.y as f64 - ln1a.y as f64;
    let dx2 = ln2b.x as f64 - ln2a.x as f64;
    let dy2 = ln2b.y as f64 - ln2a.y as f64;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0.0 {
        return None;
    }

    let t = ((ln1a.x as f64 - ln2a.x as f64) * dy2 - (ln1a.y as f64 - ln2a.y as f64) * dx2) / det;
    let ip = if t <= 0.0 {
        ln1a
    } else if t >= 1.0 {
        ln1b
    } else {
        Point64::new(
            round_saturating(ln1a.x as f64 + t * dx1),
            round_saturating(ln1a.y as f64 + t * dy1),
        )
    };
    Some(ip)
}

/// Returns true if the segments `seg1a->seg1b` and `seg2a->seg2b` intersect.
///
/// When `inclusive` is false only proper crossings count, otherwise touching end points count
/// too (collinear segments never count).
pub fn segments_intersect(
    seg1a: Point64,
    seg1b: Point64,
    seg2a: Point64,
    seg2b: Point64,
    inclusive: bool,
) -> bool {
    let res1 = cross_product_sign(seg1a, seg2a, seg2b);
    let res2 = cross_product_sign(seg1b, seg2a, seg2b);
    let res3 = cross_product_sign(seg2a, seg1a, seg1b);
    let res4 = cross_product_sign(seg2b, seg1a, seg1b);
    if inclusive {
        if res1 * res2 > 0 || res3 * res4 > 0 {
            return false;
        }
        res1 != 0 || res2 != 0 || res3 != 0 || res4 != 0
    } else {
        res1 * res2 < 0 && res3 * res4 < 0
    }
}

/// Closest point to `off_pt` on the segment `seg1->seg2`, rounded half to even.
pub fn get_closest_point_on_segment(off_pt: Point64, seg1: Point64, seg2: Point64) -> Point64 {
    if seg1 == seg2 {
        return seg1;
    }

    let dx = seg2.x as f64 - seg1.x as f64;
    let dy = seg2.y as f64 - seg1.y as f64;
    let q = ((off_pt.x as f64 - seg1.x as f64) * dx + (off_pt.y as f64 - seg1.y as f64) * dy)
        / (dx * dx + dy * dy);
    let q = q.clamp(0.0, 1.0);
    Point64::new(
        seg1.x + round_saturating(q * dx),
        seg1.y + round_saturating(q * dy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i64, y: i64) -> Point64 {
        Point64::new(x, y)
    }

    #[test]
    fn intersect_pt_rounds_half_to_even() {
        // true crossing at (2.5, 2.5)
        let p = get_segment_intersect_pt(pt(0, 0), pt(5, 5), pt(0, 5), pt(5, 0));
        assert_eq!(p, Some(pt(2, 2)));
        assert_eq!(
            get_segment_intersect_pt(pt(0, 0), pt(5, 0), pt(0, 1), pt(5, 1)),
            None
        );
    }

    #[test]
    fn proper_and_touching_intersects() {
        assert!(segments_intersect(pt(0, 0), pt(10, 10), pt(0, 10), pt(10, 0), false));
        // touching at an end point
        assert!(!segments_intersect(pt(0, 0), pt(5, 5), pt(5, 5), pt(10, 0), false));
        assert!(segments_intersect(pt(0, 0), pt(5, 5), pt(5, 5), pt(10, 0), true));
        // collinear never counts
        assert!(!segments_intersect(pt(0, 0), pt(5, 0), pt(2, 0), pt(8, 0), true));
    }

    #[test]
    fn closest_point_is_clamped() {
        assert_eq!(get_closest_point_on_segment(pt(5, 7), pt(0, 0), pt(10, 0)), pt(5, 0));
        assert_eq!(get_closest_point_on_segment(pt(-5, 7), pt(0, 0), pt(10, 0)), pt(0, 0));
        assert_eq!(get_closest_point_on_segment(pt(3, 3), pt(1, 1), pt(1, 1)), pt(1, 1));
    }
}
