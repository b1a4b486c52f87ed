use super::{point_at_x, point_at_y, region_code, BOTTOM, INSIDE, LEFT, RIGHT, TOP};
use crate::{
    error::{ClipError, ReserveExt},
    geometry::{Path64, PathExt, Paths64, Point64, Rect64},
};

/// Clip segment `p -> q` to `rect` (boundary inclusive), `None` if nothing of it is inside.
///
/// Crossings are always computed on the original segment so clipping one end never moves the
/// line.
fn clip_segment(rect: &Rect64, p: Point64, q: Point64) -> Option<(Point64, Point64)> {
    let (mut a, mut b) = (p, q);
    let (mut code_a, mut code_b) = (region_code(rect, a), region_code(rect, b));
    // each step pins one coordinate, rounding may cost one more step per axis
    for _ in 0..8 {
        if code_a | code_b == INSIDE {
            return Some((a, b));
        }
        if code_a & code_b != INSIDE {
            return None;
        }

        let out = if code_a != INSIDE { code_a } else { code_b };
        let pt = if out & LEFT != 0 {
            point_at_x(p, q, rect.left)
        } else if out & RIGHT != 0 {
            point_at_x(p, q, rect.right)
        } else if out & TOP != 0 {
            point_at_y(p, q, rect.top)
        } else {
            debug_assert!(out & BOTTOM != 0);
            point_at_y(p, q, rect.bottom)
        };

        if out == code_a {
            a = pt;
            code_a = region_code(rect, a);
        } else {
            b = pt;
            code_b = region_code(rect, b);
        }
    }
    None
}

fn flush(run: &mut Path64, result: &mut Paths64) -> Result<(), ClipError> {
    if run.len() >= 2 {
        result.try_reserve(1).or_exhausted("clip result")?;
        result.push(std::mem::take(run));
    } else {
        run.clear();
    }
    Ok(())
}

/// Appends the pieces of the open `path` inside `rect` to `result`.
pub(super) fn clip_line(
    rect: &Rect64,
    path: &[Point64],
    result: &mut Paths64,
) -> Result<(), ClipError> {
    let path = path.strip_duplicates(false);
    for pt in path.iter() {
        if !pt.in_range() {
            return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y });
        }
    }
    if path.len() < 2 {
        return Ok(());
    }

    let mut run = Path64::new();
    for w in path.windows(2) {
        let (p, q) = (w[0], w[1]);
        let Some((a, b)) = clip_segment(rect, p, q) else {
            flush(&mut run, result)?;
            continue;
        };

        if run.last() != Some(&a) {
            flush(&mut run, result)?;
            run.push(a);
        }
        if run.last() != Some(&b) {
            run.push(b);
        }
        if b != q {
            // left the rect
            flush(&mut run, result)?;
        }
    }
    flush(&mut run, result)
}
