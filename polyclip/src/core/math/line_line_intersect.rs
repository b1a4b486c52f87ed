use super::Vector2;
use crate::core::traits::FuzzyEq;

/// Holds the result of intersecting the lines through two segments.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr {
    /// Lines are (almost) parallel or one of the segments is a point.
    NoIntersect,
    /// The intersect lies within both line segments.
    TrueIntersect {
        /// Parametric value for intersect on first segment.
        seg1_t: f64,
        /// Parametric value for intersect on second segment.
        seg2_t: f64,
    },
    /// The lines intersect but one or both of the segments must be extended to reach it.
    FalseIntersect {
        /// Parametric value for intersect on first segment.
        seg1_t: f64,
        /// Parametric value for intersect on second segment.
        seg2_t: f64,
    },
}

impl LineLineIntr {
    /// Parametric value along the first segment, if the lines cross.
    #[inline]
    pub fn seg1_t(&self) -> Option<f64> {
        match *self {
            LineLineIntr::NoIntersect => None,
            LineLineIntr::TrueIntersect { seg1_t, .. }
            | LineLineIntr::FalseIntersect { seg1_t, .. } => Some(seg1_t),
        }
    }
}

/// Finds the intersect between the lines through `v1->v2` and `u1->u2`.
///
/// Uses the parametric form `P(t) = p0 + t * (p1 - p0)` for both segments and perpendicular dot
/// products (see <http://geomalgorithms.com/a05-_intersect-1.html>).
///
/// # Examples
///
/// ```
/// # use polyclip::core::math::*;
/// let v1 = Vector2::new(0.0, 0.0);
/// let v2 = Vector2::new(1.0, 0.0);
/// let u1 = Vector2::new(0.5, -1.0);
/// let u2 = Vector2::new(0.5, 1.0);
/// if let LineLineIntr::TrueIntersect{seg1_t: t1, seg2_t: t2} = line_line_intr(v1, v2, u1, u2, 1e-8) {
///    assert_eq!(t1, 0.5);
///    assert_eq!(t2, 0.5);
/// } else {
///     unreachable!("expected true intersection between line segments");
/// }
///```
pub fn line_line_intr(
    v1: Vector2,
    v2: Vector2,
    u1: Vector2,
    u2: Vector2,
    epsilon: f64,
) -> LineLineIntr {
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_pdot_u = v.perp_dot(u);
    let w = v1 - u1;

    // almost parallel lines would give a very distant intersect
    if v_pdot_u.fuzzy_eq_zero_eps(epsilon) {
        return NoIntersect;
    }

    let seg1_t = u.perp_dot(w) / v_pdot_u;
    let seg2_t = v.perp_dot(w) / v_pdot_u;

    // compare at length scale so epsilon means the same for long and short segments
    let seg1_length = v.length();
    let seg2_length = u.length();
    let in_seg = |t: f64, len: f64| {
        let d = t * len;
        d >= -epsilon && d <= len + epsilon
    };

    if !in_seg(seg1_t, seg1_length) || !in_seg(seg2_t, seg2_length) {
        return FalseIntersect { seg1_t, seg2_t };
    }

    TrueIntersect { seg1_t, seg2_t }
}

/// Point where the lines through `v1->v2` and `u1->u2` cross, `None` if they are parallel.
#[inline]
pub fn line_line_intr_pt(v1: Vector2, v2: Vector2, u1: Vector2, u2: Vector2) -> Option<Vector2> {
    line_line_intr(v1, v2, u1, u2, 1e-12)
        .seg1_t()
        .map(|t| v1 + (v2 - v1).scale(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    #[test]
    fn extended_lines_give_false_intersect() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(3.0, -1.0),
            vec2(3.0, 1.0),
            1e-8,
        );
        match r {
            LineLineIntr::FalseIntersect { seg1_t, seg2_t } => {
                assert!(seg1_t.fuzzy_eq(3.0));
                assert!(seg2_t.fuzzy_eq(0.5));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let p = line_line_intr_pt(
            vec2(0.0, 0.0),
            vec2(1.0, 1.0),
            vec2(0.0, 1.0),
            vec2(1.0, 2.0),
        );
        assert!(p.is_none());
        let q = line_line_intr_pt(
            vec2(0.0, 0.0),
            vec2(2.0, 2.0),
            vec2(0.0, 2.0),
            vec2(2.0, 0.0),
        );
        assert!(q.is_some_and(|q| q.fuzzy_eq(vec2(1.0, 1.0))));
    }
}
