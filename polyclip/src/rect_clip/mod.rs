//! Clipping paths against an axis aligned rectangle without running the sweep.
//!
//! Closed paths are clipped one half plane at a time, open paths segment by segment. Both use
//! region codes to accept or reject whole paths and segments early.
mod lines;

use crate::{
    engine::{ClipType, Clipper, FillRule},
    error::{guarded, ClipError, ReserveExt},
    geometry::{Path64, PathExt, Paths64, Point64, Rect64},
};

pub(crate) const INSIDE: u8 = 0;
pub(crate) const LEFT: u8 = 1;
pub(crate) const RIGHT: u8 = 2;
pub(crate) const TOP: u8 = 4;
pub(crate) const BOTTOM: u8 = 8;

/// Region code of `pt` relative to `rect` (boundary counts as inside), one of nine regions.
#[inline]
pub(crate) fn region_code(rect: &Rect64, pt: Point64) -> u8 {
    let mut code = INSIDE;
    if pt.x < rect.left {
        code |= LEFT;
    } else if pt.x > rect.right {
        code |= RIGHT;
    }
    if pt.y < rect.top {
        code |= TOP;
    } else if pt.y > rect.bottom {
        code |= BOTTOM;
    }
    code
}

/// `n / d` rounded half to even, `d` must not be zero.
#[inline]
pub(crate) fn div_round_half_even(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    let q = n.div_euclid(d);
    let r = n.rem_euclid(d);
    match (2 * r).cmp(&d) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
    }
}

/// Point on the line through `a` and `b` at `x` (the line must not be vertical).
#[inline]
pub(crate) fn point_at_x(a: Point64, b: Point64, x: i64) -> Point64 {
    let dy = b.y as i128 - a.y as i128;
    let dx = b.x as i128 - a.x as i128;
    let y = a.y as i128 + div_round_half_even(dy * (x as i128 - a.x as i128), dx);
    Point64::new(x, y as i64)
}

/// Point on the line through `a` and `b` at `y` (the line must not be horizontal).
#[inline]
pub(crate) fn point_at_y(a: Point64, b: Point64, y: i64) -> Point64 {
    let dy = b.y as i128 - a.y as i128;
    let dx = b.x as i128 - a.x as i128;
    let x = a.x as i128 + div_round_half_even(dx * (y as i128 - a.y as i128), dy);
    Point64::new(x as i64, y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    #[inline]
    fn keeps(self, rect: &Rect64, pt: Point64) -> bool {
        match self {
            Side::Left => pt.x >= rect.left,
            Side::Top => pt.y >= rect.top,
            Side::Right => pt.x <= rect.right,
            Side::Bottom => pt.y <= rect.bottom,
        }
    }

    /// Crossing of segment `a -> b` (one end kept, the other not) with the side's line.
    #[inline]
    fn crossing(self, rect: &Rect64, a: Point64, b: Point64) -> Point64 {
        match self {
            Side::Left => point_at_x(a, b, rect.left),
            Side::Top => point_at_y(a, b, rect.top),
            Side::Right => point_at_x(a, b, rect.right),
            Side::Bottom => point_at_y(a, b, rect.bottom),
        }
    }

    /// Returns true if `pt` lies on the side's line.
    #[inline]
    fn on_line(self, rect: &Rect64, pt: Point64) -> bool {
        match self {
            Side::Left => pt.x == rect.left,
            Side::Top => pt.y == rect.top,
            Side::Right => pt.x == rect.right,
            Side::Bottom => pt.y == rect.bottom,
        }
    }

    /// Coordinate along the side's line.
    #[inline]
    fn along(self, pt: Point64) -> i64 {
        match self {
            Side::Left | Side::Right => pt.y,
            Side::Top | Side::Bottom => pt.x,
        }
    }
}

/// Clips closed and open paths against one rectangle.
///
/// # Examples
///
/// ```
/// # use polyclip::rect_clip::*;
/// # use polyclip::geometry::*;
/// let clipper = RectClipper::new(Rect64::new(0, 0, 10, 10)).unwrap();
/// let result = clipper.clip(&[Rect64::new(-5, -5, 5, 5).as_path()]).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].area(), 25.0);
/// ```
#[derive(Debug, Clone)]
pub struct RectClipper {
    rect: Rect64,
}

impl RectClipper {
    /// Returns [ClipError::InvalidRect] if `rect` is inverted.
    pub fn new(rect: Rect64) -> Result<Self, ClipError> {
        rect.validate()?;
        if !Point64::new(rect.left, rect.top).in_range()
            || !Point64::new(rect.right, rect.bottom).in_range()
        {
            return Err(ClipError::InvalidRect);
        }
        Ok(Self { rect })
    }

    #[inline]
    pub fn rect(&self) -> Rect64 {
        self.rect
    }

    /// Portions of the closed `paths` inside the rectangle, orientation of every path is kept.
    ///
    /// A path that surrounds the rectangle yields the rectangle itself, unless it is a hole
    /// (negative area) in which case it yields nothing.
    pub fn clip(&self, paths: &[Path64]) -> Result<Paths64, ClipError> {
        let mut result = Paths64::new();
        if self.rect.is_empty() {
            return Ok(result);
        }
        result.try_reserve(paths.len()).or_exhausted("clip result")?;
        for path in paths {
            self.clip_path(path, &mut result)?;
        }
        Ok(result)
    }

    /// Portions of the open `paths` inside the rectangle (boundary inclusive), a path is split
    /// every time it leaves the rectangle.
    pub fn clip_lines(&self, paths: &[Path64]) -> Result<Paths64, ClipError> {
        let mut result = Paths64::new();
        for path in paths {
            lines::clip_line(&self.rect, path, &mut result)?;
        }
        Ok(result)
    }

    fn clip_path(&self, path: &[Point64], result: &mut Paths64) -> Result<(), ClipError> {
        let path = path.strip_duplicates(true);
        if path.len() < 3 {
            return Ok(());
        }
        for pt in path.iter() {
            if !pt.in_range() {
                return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y });
            }
        }

        let codes: Vec<u8> = path.iter().map(|&pt| region_code(&self.rect, pt)).collect();
        if codes.iter().all(|&c| c == INSIDE) {
            push_clean(path, result);
            return Ok(());
        }
        if codes.iter().fold(u8::MAX, |acc, &c| acc & c) != INSIDE {
            // every vertex beyond the same side
            return Ok(());
        }

        let mut clipped = path;
        for side in Side::ALL {
            clipped = clip_to_side(&self.rect, side, &clipped)?;
            if clipped.len() < 3 {
                return Ok(());
            }
        }
        let clipped = clipped.strip_duplicates(true);
        if clipped.len() < 3 {
            return Ok(());
        }

        if clipped.area() < 0.0 && self.is_whole_rect(&clipped) {
            // hole surrounding the rect
            return Ok(());
        }

        if doubles_back(&self.rect, &clipped) {
            log::debug!(
                "clipped path runs back along the rect boundary, cleaning {} points with a union",
                clipped.len()
            );
            return cleanup_with_union(clipped, result);
        }

        push_clean(clipped, result);
        Ok(())
    }

    fn is_whole_rect(&self, path: &[Point64]) -> bool {
        path.bounds() == self.rect
            && path.area().abs() == self.rect.width() as f64 * self.rect.height() as f64
    }
}

/// One Sutherland-Hodgman pass against a single side.
fn clip_to_side(rect: &Rect64, side: Side, path: &[Point64]) -> Result<Path64, ClipError> {
    let mut out = Path64::new();
    out.try_reserve(path.len() + 4).or_exhausted("clip path")?;
    let Some(&last) = path.last() else {
        return Ok(out);
    };
    let mut prev = last;
    let mut prev_kept = side.keeps(rect, prev);
    for &curr in path {
        let curr_kept = side.keeps(rect, curr);
        if curr_kept != prev_kept {
            out.try_reserve(1).or_exhausted("clip path")?;
            out.push(side.crossing(rect, prev, curr));
        }
        if curr_kept {
            out.try_reserve(1).or_exhausted("clip path")?;
            out.push(curr);
        }
        prev = curr;
        prev_kept = curr_kept;
    }
    Ok(out)
}

/// Returns true if two boundary runs of `path` on the same side of `rect` overlap, the zero
/// width bridge that half plane clipping leaves when a path exits and re-enters around itself.
fn doubles_back(rect: &Rect64, path: &[Point64]) -> bool {
    let n = path.len();
    let mut runs: Vec<(i64, i64)> = Vec::new();
    for side in Side::ALL {
        runs.clear();
        for i in 0..n {
            let (a, b) = (path[i], path[(i + 1) % n]);
            if side.on_line(rect, a) && side.on_line(rect, b) {
                runs.push(crate::core::math::min_max(side.along(a), side.along(b)));
            }
        }
        // sorted by start, a run overlaps an earlier one iff it starts before the furthest end
        runs.sort_unstable();
        let mut furthest = i64::MIN;
        for &(lo, hi) in &runs {
            if lo < furthest && lo < hi {
                return true;
            }
            furthest = furthest.max(hi);
        }
    }
    false
}

/// Splits a path with overlapping boundary runs into simple paths, keeping its orientation.
fn cleanup_with_union(path: Path64, result: &mut Paths64) -> Result<(), ClipError> {
    let is_hole = path.area() < 0.0;
    let subject = if is_hole { path.reversed() } else { path };
    let mut clipper = Clipper::new();
    clipper.preserve_collinear(false).add_subject(&[subject]);
    let cleaned = clipper.execute(ClipType::Union, FillRule::NonZero)?;
    for p in cleaned.closed {
        result.push(if is_hole { p.reversed() } else { p });
    }
    Ok(())
}

/// Pushes `path` with collinear vertices and spikes removed, dropping it if nothing with area
/// remains.
fn push_clean(mut path: Path64, result: &mut Paths64) {
    let mut i = 0;
    let mut stable = 0;
    while path.len() >= 3 && stable < path.len() {
        let n = path.len();
        let (prev, curr, next) = (path[(i + n - 1) % n], path[i % n], path[(i + 1) % n]);
        if crate::core::math::cross_product(prev, curr, next) == 0 {
            path.remove(i % n);
            stable = 0;
            if i > 0 {
                i -= 1;
            }
        } else {
            stable += 1;
            i = (i + 1) % path.len();
        }
    }
    if path.len() >= 3 {
        result.push(path);
    }
}

/// Clip closed `paths` to `rect`, see [RectClipper::clip].
pub fn rect_clip(rect: Rect64, paths: &[Path64]) -> Result<Paths64, ClipError> {
    guarded(|| RectClipper::new(rect)?.clip(paths))
}

/// Clip open `paths` to `rect`, see [RectClipper::clip_lines].
pub fn rect_clip_lines(rect: Rect64, paths: &[Path64]) -> Result<Paths64, ClipError> {
    guarded(|| RectClipper::new(rect)?.clip_lines(paths))
}
