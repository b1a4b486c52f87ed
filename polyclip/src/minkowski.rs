//! Minkowski sum and difference of a pattern swept along a path.
use crate::{
    engine::{ClipType, Clipper, FillRule},
    error::{guarded, ClipError, ReserveExt},
    geometry::{Path64, PathExt, Paths64, Point64},
};

fn check_range(path: &[Point64]) -> Result<(), ClipError> {
    match path.iter().find(|pt| !pt.in_range()) {
        Some(pt) => Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y }),
        None => Ok(()),
    }
}

/// Quads joining consecutive placements of `pattern` along `path`.
fn minkowski_quads(
    pattern: &[Point64],
    path: &[Point64],
    is_sum: bool,
    is_closed: bool,
) -> Result<Paths64, ClipError> {
    let pat_len = pattern.len();
    let path_len = path.len();

    let mut placed: Paths64 = Vec::new();
    placed.try_reserve(path_len).or_exhausted("minkowski placements")?;
    for &pt in path {
        let copy = pattern
            .iter()
            .map(|&p| {
                if is_sum {
                    pt.checked_add(p)
                } else {
                    pt.checked_sub(p)
                }
                .filter(Point64::in_range)
                .ok_or(ClipError::CoordinateOverflow)
            })
            .collect::<Result<Path64, _>>()?;
        placed.push(copy);
    }

    let mut quads: Paths64 = Vec::new();
    quads
        .try_reserve(path_len * pat_len)
        .or_exhausted("minkowski quads")?;
    let (start, mut g) = if is_closed { (0, path_len - 1) } else { (1, 0) };
    for i in start..path_len {
        let mut h = pat_len - 1;
        for j in 0..pat_len {
            let mut quad = vec![placed[g][h], placed[i][h], placed[i][j], placed[g][j]];
            if !quad.is_positive() {
                quad.reverse();
            }
            quads.push(quad);
            h = j;
        }
        g = i;
    }
    Ok(quads)
}

fn minkowski(
    pattern: &[Point64],
    path: &[Point64],
    is_sum: bool,
    is_closed: bool,
) -> Result<Paths64, ClipError> {
    check_range(pattern)?;
    check_range(path)?;
    if pattern.is_empty() || path.is_empty() || (!is_closed && path.len() < 2) {
        return Ok(Paths64::new());
    }

    let quads = minkowski_quads(pattern, path, is_sum, is_closed)?;
    log::trace!("minkowski union of {} quads", quads.len());
    let mut clipper = Clipper::new();
    clipper.preserve_collinear(false).add_subject(&quads);
    Ok(clipper.execute(ClipType::Union, FillRule::NonZero)?.closed)
}

/// Region swept by `pattern` translated along `path` (every point of the result is a pattern
/// point plus a path point).
///
/// With `is_closed` the path's closing segment is swept as well.
///
/// # Examples
///
/// ```
/// # use polyclip::minkowski::*;
/// # use polyclip::geometry::*;
/// let pattern = Rect64::new(-1, -1, 1, 1).as_path();
/// let line = vec![Point64::new(0, 0), Point64::new(10, 0)];
/// let result = minkowski_sum(&pattern, &line, false).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].bounds(), Rect64::new(-1, -1, 11, 1));
/// assert_eq!(result[0].area(), 24.0);
/// ```
pub fn minkowski_sum(
    pattern: &[Point64],
    path: &[Point64],
    is_closed: bool,
) -> Result<Paths64, ClipError> {
    guarded(|| minkowski(pattern, path, true, is_closed))
}

/// Like [minkowski_sum] but placing `path point - pattern point`.
pub fn minkowski_diff(
    pattern: &[Point64],
    path: &[Point64],
    is_closed: bool,
) -> Result<Paths64, ClipError> {
    guarded(|| minkowski(pattern, path, false, is_closed))
}
