use super::{Point64, Rect64};
use crate::{
    core::math::{cross_product, min_max, round_to_i64},
    engine::FillRule,
    error::ClipError,
};
use std::f64::consts::PI;

/// Ordered sequence of points. Closed paths do not repeat the first point at the end.
pub type Path64 = Vec<Point64>;

/// Set of paths.
pub type Paths64 = Vec<Path64>;

/// Result of locating a point against a closed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointInPolygonResult {
    /// Point is inside the filled region.
    Inside,
    /// Point is outside the filled region.
    Outside,
    /// Point lies on one of the path's segments.
    OnBoundary,
}

/// Measurement and transform methods shared by all point slices.
pub trait PathExt {
    /// Signed area treating the slice as a closed path, positive when counter clockwise (y-up).
    fn area(&self) -> f64;

    /// Returns true if [PathExt::area] is not negative.
    fn is_positive(&self) -> bool {
        self.area() >= 0.0
    }

    /// Bounding rect of all points, default (zero) rect for an empty slice.
    fn bounds(&self) -> Rect64;

    /// Winding number of the closed path around `pt` (points on the boundary may count either
    /// way, see [PathExt::point_in_polygon]).
    fn winding_number(&self, pt: Point64) -> i32;

    /// Locate `pt` against the closed path using `fill_rule` to classify its winding number.
    fn point_in_polygon(&self, pt: Point64, fill_rule: FillRule) -> PointInPolygonResult;

    /// Copy translated by (`dx`, `dy`), [ClipError::CoordinateOverflow] if a point overflows.
    fn translated(&self, dx: i64, dy: i64) -> Result<Path64, ClipError>;

    /// Copy with the order of points reversed.
    fn reversed(&self) -> Path64;

    /// Copy without consecutive duplicate points. For a closed path trailing points equal to the
    /// first point are removed as well.
    fn strip_duplicates(&self, is_closed: bool) -> Path64;
}

impl PathExt for [Point64] {
    fn area(&self) -> f64 {
        let n = self.len();
        if n < 3 {
            return 0.0;
        }

        // exact while it fits, terms are at most 2^126 so long paths near the range limit
        // finish the sum in floating point
        let mut exact: i128 = 0;
        let mut approx = 0.0;
        let mut prev = self[n - 1];
        for &pt in self {
            let term =
                (prev.y as i128 + pt.y as i128) * (prev.x as i128 - pt.x as i128);
            match exact.checked_add(term) {
                Some(s) => exact = s,
                None => {
                    approx += exact as f64;
                    exact = term;
                }
            }
            prev = pt;
        }

        (approx + exact as f64) * 0.5
    }

    fn bounds(&self) -> Rect64 {
        if self.is_empty() {
            return Rect64::default();
        }
        let mut r = Rect64::inverted();
        for &pt in self {
            r.include(pt);
        }
        r
    }

    fn winding_number(&self, pt: Point64) -> i32 {
        let n = self.len();
        if n < 3 {
            return 0;
        }
        let mut wn = 0;
        let mut prev = self[n - 1];
        for &curr in self {
            if prev.y <= pt.y {
                if curr.y > pt.y && cross_product(prev, curr, pt) > 0 {
                    wn += 1;
                }
            } else if curr.y <= pt.y && cross_product(prev, curr, pt) < 0 {
                wn -= 1;
            }
            prev = curr;
        }
        wn
    }

    fn point_in_polygon(&self, pt: Point64, fill_rule: FillRule) -> PointInPolygonResult {
        let n = self.len();
        if n < 3 {
            return PointInPolygonResult::Outside;
        }

        let mut prev = self[n - 1];
        for &curr in self {
            let (min_x, max_x) = min_max(prev.x, curr.x);
            let (min_y, max_y) = min_max(prev.y, curr.y);
            if (min_x..=max_x).contains(&pt.x)
                && (min_y..=max_y).contains(&pt.y)
                && cross_product(prev, curr, pt) == 0
            {
                return PointInPolygonResult::OnBoundary;
            }
            prev = curr;
        }

        if fill_rule.is_inside(self.winding_number(pt)) {
            PointInPolygonResult::Inside
        } else {
            PointInPolygonResult::Outside
        }
    }

    fn translated(&self, dx: i64, dy: i64) -> Result<Path64, ClipError> {
        let delta = Point64::new(dx, dy);
        self.iter()
            .map(|pt| pt.checked_add(delta).ok_or(ClipError::CoordinateOverflow))
            .collect()
    }

    fn reversed(&self) -> Path64 {
        self.iter().rev().copied().collect()
    }

    fn strip_duplicates(&self, is_closed: bool) -> Path64 {
        let mut result: Path64 = Vec::with_capacity(self.len());
        for &pt in self {
            if result.last() != Some(&pt) {
                result.push(pt);
            }
        }

        if is_closed {
            while result.len() > 1 && result.last() == result.first() {
                result.pop();
            }
        }

        result
    }
}

/// Sum of the signed areas of all paths.
pub fn area_paths(paths: &[Path64]) -> f64 {
    paths.iter().map(|p| p.area()).sum()
}

/// Bounding rect over all points of all paths, default (zero) rect if there are no points.
pub fn bounds_paths(paths: &[Path64]) -> Rect64 {
    let mut r = Rect64::inverted();
    let mut any = false;
    for pt in paths.iter().flatten() {
        r.include(*pt);
        any = true;
    }
    if any {
        r
    } else {
        Rect64::default()
    }
}

/// Copy of `paths` with every path reversed.
pub fn reverse_paths(paths: &[Path64]) -> Paths64 {
    paths.iter().map(|p| p.reversed()).collect()
}

/// Copy of `paths` translated by (`dx`, `dy`).
pub fn translate_paths(paths: &[Path64], dx: i64, dy: i64) -> Result<Paths64, ClipError> {
    paths.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Counter clockwise ellipse approximation centered at `center`.
///
/// A non positive `radius_y` uses `radius_x`, fewer than 3 `steps` picks a step count from the
/// radii. Returns an empty path if `radius_x <= 0`.
///
/// # Examples
///
/// ```
/// # use polyclip::geometry::*;
/// let circle = ellipse(Point64::new(0, 0), 10.0, 10.0, 4).unwrap();
/// assert_eq!(
///     circle,
///     vec![
///         Point64::new(10, 0),
///         Point64::new(0, 10),
///         Point64::new(-10, 0),
///         Point64::new(0, -10)
///     ]
/// );
/// ```
pub fn ellipse(
    center: Point64,
    radius_x: f64,
    radius_y: f64,
    steps: usize,
) -> Result<Path64, ClipError> {
    if radius_x.is_nan() || radius_x <= 0.0 {
        return Ok(Path64::new());
    }
    let radius_y = if radius_y > 0.0 { radius_y } else { radius_x };
    let steps = if steps > 2 {
        steps
    } else {
        (PI * ((radius_x + radius_y) / 2.0).sqrt()).ceil() as usize
    }
    .max(3);

    let (step_sin, step_cos) = (2.0 * PI / steps as f64).sin_cos();
    let (cx, cy) = (center.x as f64, center.y as f64);
    let to_point = |x: f64, y: f64| match (round_to_i64(x), round_to_i64(y)) {
        (Some(x), Some(y)) => Ok(Point64::new(x, y)),
        _ => Err(ClipError::CoordinateOverflow),
    };

    let mut result = Path64::with_capacity(steps);
    result.push(to_point(cx + radius_x, cy)?);
    let (mut dx, mut dy) = (step_cos, step_sin);
    for _ in 1..steps {
        result.push(to_point(cx + radius_x * dx, cy + radius_y * dy)?);
        let x = dx * step_cos - dy * step_sin;
        dy = dx * step_sin + dy * step_cos;
        dx = x;
    }

    Ok(result)
}
