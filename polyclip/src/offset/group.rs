use super::{EndType, JoinType, OffsetOptions};
use crate::{
    core::math::{line_line_intr_pt, vec2, Vector2},
    error::{ClipError, ReserveExt},
    geometry::{ellipse, Path64, PathExt, Paths64, Point64, Rect64},
};
use std::f64::consts::PI;

/// Arc tolerance used when none is given, scaled by `log10(2 + |delta|)`.
const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

/// Paths sharing a join and end type.
#[derive(Debug, Clone)]
pub(super) struct OffsetGroup {
    pub paths: Paths64,
    pub join_type: JoinType,
    pub end_type: EndType,
    /// Path holding the bottom most vertex (largest y, then smallest x) among closed paths.
    lowest_path_idx: Option<usize>,
    /// The outer path at the extreme vertex is clockwise, so the whole group is treated as
    /// reversed.
    is_reversed: bool,
}

impl OffsetGroup {
    pub fn new(paths: &[Path64], join_type: JoinType, end_type: EndType) -> Self {
        let is_closed = end_type.is_closed();
        let paths: Paths64 = paths.iter().map(|p| p.strip_duplicates(is_closed)).collect();

        let (lowest_path_idx, is_reversed) = if end_type == EndType::Polygon {
            let lowest = lowest_closed_path_idx(&paths);
            (lowest, lowest.is_some_and(|i| paths[i].area() < 0.0))
        } else {
            (None, false)
        };

        Self {
            paths,
            join_type,
            end_type,
            lowest_path_idx,
            is_reversed,
        }
    }
}

fn lowest_closed_path_idx(paths: &[Path64]) -> Option<usize> {
    let mut result = None;
    let mut bot_pt = Point64::new(i64::MAX, i64::MIN);
    for (i, path) in paths.iter().enumerate().filter(|(_, p)| p.len() >= 3) {
        for &pt in path {
            if pt.y > bot_pt.y || (pt.y == bot_pt.y && pt.x < bot_pt.x) {
                result = Some(i);
                bot_pt = pt;
            }
        }
    }
    result
}

#[inline]
fn unit_normal(pt1: Point64, pt2: Point64) -> Vector2 {
    if pt1 == pt2 {
        return Vector2::zero();
    }
    let d = Vector2::from(pt2) - Vector2::from(pt1);
    let inv_hypot = 1.0 / d.length();
    vec2(d.y * inv_hypot, -d.x * inv_hypot)
}

#[inline]
fn perpendic(pt: Point64, norm: Vector2, delta: f64) -> Vector2 {
    Vector2::from(pt) + norm.scale(delta)
}

/// Offsets the paths of one group, producing the raw (self overlapping) loops.
pub(super) struct GroupOffsetter<'a> {
    group: &'a OffsetGroup,
    /// Delta applied along edge normals (negated for reversed groups).
    group_delta: f64,
    join_type: JoinType,
    end_type: EndType,
    temp_lim: f64,
    steps_per_rad: f64,
    step_sin: f64,
    step_cos: f64,
    norms: Vec<Vector2>,
    path_out: Path64,
}

impl<'a> GroupOffsetter<'a> {
    pub fn new(group: &'a OffsetGroup, delta: f64, options: &OffsetOptions) -> Self {
        let group_delta = if group.end_type != EndType::Polygon || group.lowest_path_idx.is_none()
        {
            delta.abs()
        } else if group.is_reversed {
            -delta
        } else {
            delta
        };
        let abs_delta = group_delta.abs();

        let temp_lim = if options.miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (options.miter_limit * options.miter_limit)
        };

        let mut result = Self {
            group,
            group_delta,
            join_type: group.join_type,
            end_type: group.end_type,
            temp_lim,
            steps_per_rad: 0.0,
            step_sin: 0.0,
            step_cos: 1.0,
            norms: Vec::new(),
            path_out: Path64::new(),
        };

        if group.join_type == JoinType::Round || group.end_type == EndType::Round {
            let arc_tol = if options.arc_tolerance > 0.01 {
                options.arc_tolerance.min(abs_delta)
            } else {
                (2.0 + abs_delta).log10() * DEFAULT_ARC_TOLERANCE
            };
            let steps_per_360 = (PI / (1.0 - arc_tol / abs_delta).acos())
                .ceil()
                .clamp(2.0, 512.0);
            let (sin, cos) = (2.0 * PI / steps_per_360).sin_cos();
            result.step_sin = if group_delta < 0.0 { -sin } else { sin };
            result.step_cos = cos;
            result.steps_per_rad = steps_per_360 / (2.0 * PI);
            log::debug!(
                "round offset by {}: {} steps per revolution",
                group_delta,
                steps_per_360
            );
        }

        result
    }

    /// Appends one loop per non degenerate input path to `loops`.
    pub fn offset_into(mut self, loops: &mut Paths64) -> Result<(), ClipError> {
        let group = self.group;
        let abs_delta = self.group_delta.abs();
        loops
            .try_reserve(group.paths.len())
            .or_exhausted("offset loops")?;

        for path in group.paths.iter() {
            self.path_out.clear();
            self.end_type = group.end_type;
            match path.len() {
                0 => continue,
                1 => {
                    loops.push(self.offset_single_point(path[0], abs_delta)?);
                    continue;
                }
                2 if group.end_type == EndType::Joined => {
                    self.end_type = if group.join_type == JoinType::Round {
                        EndType::Round
                    } else {
                        EndType::Square
                    };
                }
                _ => {}
            }

            self.build_normals(path)?;
            match self.end_type {
                EndType::Polygon => {
                    if path.len() < 3 || self.is_contracted_away(path) {
                        continue;
                    }
                    self.offset_polygon(path)?;
                    if group.is_reversed {
                        self.path_out.reverse();
                    }
                    loops.push(std::mem::take(&mut self.path_out));
                }
                EndType::Joined => {
                    self.offset_open_joined(path, loops)?;
                }
                _ => {
                    self.offset_open_path(path)?;
                    loops.push(std::mem::take(&mut self.path_out));
                }
            }
        }
        Ok(())
    }

    fn offset_single_point(&self, pt: Point64, abs_delta: f64) -> Result<Path64, ClipError> {
        if self.join_type == JoinType::Round {
            let steps = (self.steps_per_rad * 2.0 * PI).ceil() as usize;
            ellipse(pt, abs_delta, abs_delta, steps)
        } else {
            let d = abs_delta.ceil() as i64;
            let r = Rect64::new(
                pt.x.checked_sub(d).ok_or(ClipError::CoordinateOverflow)?,
                pt.y.checked_sub(d).ok_or(ClipError::CoordinateOverflow)?,
                pt.x.checked_add(d).ok_or(ClipError::CoordinateOverflow)?,
                pt.y.checked_add(d).ok_or(ClipError::CoordinateOverflow)?,
            );
            Ok(r.as_path())
        }
    }

    /// A closed path shrinking by more than half its narrower bounding dimension vanishes.
    fn is_contracted_away(&self, path: &[Point64]) -> bool {
        let contracting = (path.area() < 0.0) != (self.group_delta < 0.0);
        if !contracting {
            return false;
        }
        let r = path.bounds();
        let min_dim = self.group_delta.abs() * 2.0;
        min_dim > r.width() as f64 || min_dim > r.height() as f64
    }

    fn build_normals(&mut self, path: &[Point64]) -> Result<(), ClipError> {
        self.norms.clear();
        self.norms
            .try_reserve(path.len())
            .or_exhausted("offset normals")?;
        let n = path.len();
        for i in 0..n {
            self.norms.push(unit_normal(path[i], path[(i + 1) % n]));
        }
        Ok(())
    }

    #[inline]
    fn push(&mut self, v: Vector2) -> Result<(), ClipError> {
        let pt = Point64::from_vector2(v)?;
        self.path_out.try_reserve(1).or_exhausted("offset path")?;
        self.path_out.push(pt);
        Ok(())
    }

    fn offset_polygon(&mut self, path: &[Point64]) -> Result<(), ClipError> {
        let n = path.len();
        let mut k = n - 1;
        for j in 0..n {
            self.offset_point(path, j, k)?;
            k = j;
        }
        Ok(())
    }

    /// Offsets the closed path on both sides, one loop each.
    fn offset_open_joined(&mut self, path: &[Point64], loops: &mut Paths64) -> Result<(), ClipError> {
        self.offset_polygon(path)?;
        loops.push(std::mem::take(&mut self.path_out));

        let reversed = path.reversed();
        // normals of the reversed path
        self.norms.reverse();
        self.norms.rotate_left(1);
        for norm in self.norms.iter_mut() {
            *norm = -*norm;
        }

        self.offset_polygon(&reversed)?;
        loops.push(std::mem::take(&mut self.path_out));
        Ok(())
    }

    fn offset_open_path(&mut self, path: &[Point64]) -> Result<(), ClipError> {
        let high = path.len() - 1;

        // start cap
        self.do_cap(path, 0)?;

        // one side going forward
        for j in 1..high {
            self.offset_point(path, j, j - 1)?;
        }

        // normals for the way back
        for i in (1..=high).rev() {
            self.norms[i] = -self.norms[i - 1];
        }
        self.norms[0] = self.norms[high];

        // end cap
        self.do_cap(path, high)?;

        // other side going back
        for j in (1..high).rev() {
            self.offset_point(path, j, j + 1)?;
        }
        Ok(())
    }

    fn do_cap(&mut self, path: &[Point64], j: usize) -> Result<(), ClipError> {
        match self.end_type {
            EndType::Butt => self.do_bevel(path, j, j),
            EndType::Round => self.do_round(path, j, j, PI),
            _ => self.do_square(path, j, j),
        }
    }

    /// Emits the join at vertex `j` between the edge ending at `j` (normal `k`) and the edge
    /// starting at `j` (normal `j`).
    fn offset_point(&mut self, path: &[Point64], j: usize, k: usize) -> Result<(), ClipError> {
        if path[j] == path[k] {
            return Ok(());
        }

        let (nj, nk) = (self.norms[j], self.norms[k]);
        let sin_a = nk.perp_dot(nj).clamp(-1.0, 1.0);
        let cos_a = nj.dot(nk);

        if cos_a > -0.999 && sin_a * self.group_delta < 0.0 {
            // concave, the reversed loop this leaves is removed by the finishing union
            self.push(perpendic(path[j], nk, self.group_delta))?;
            if cos_a < 0.99 {
                self.push(path[j].into())?;
            }
            self.push(perpendic(path[j], nj, self.group_delta))
        } else if cos_a > 0.999 && self.join_type != JoinType::Round {
            // almost straight
            self.do_miter(path, j, k, cos_a)
        } else {
            match self.join_type {
                JoinType::Miter => {
                    if cos_a > self.temp_lim - 1.0 {
                        self.do_miter(path, j, k, cos_a)
                    } else {
                        self.do_square(path, j, k)
                    }
                }
                JoinType::Round => self.do_round(path, j, k, sin_a.atan2(cos_a)),
                JoinType::Bevel => self.do_bevel(path, j, k),
                JoinType::Square => self.do_square(path, j, k),
            }
        }
    }

    fn do_bevel(&mut self, path: &[Point64], j: usize, k: usize) -> Result<(), ClipError> {
        let (pt1, pt2) = if j == k {
            let abs_delta = self.group_delta.abs();
            (
                perpendic(path[j], self.norms[j], -abs_delta),
                perpendic(path[j], self.norms[j], abs_delta),
            )
        } else {
            (
                perpendic(path[j], self.norms[k], self.group_delta),
                perpendic(path[j], self.norms[j], self.group_delta),
            )
        };
        self.push(pt1)?;
        self.push(pt2)
    }

    fn do_square(&mut self, path: &[Point64], j: usize, k: usize) -> Result<(), ClipError> {
        let (nj, nk) = (self.norms[j], self.norms[k]);
        let vec = if j == k {
            vec2(nj.y, -nj.x)
        } else {
            (vec2(-nk.y, nk.x) + vec2(nj.y, -nj.x)).normalize()
        };

        let delta = self.group_delta;
        let abs_delta = delta.abs();
        // vertex pushed out along the bisector, then the square side through it
        let pt_q = Vector2::from(path[j]) + vec.scale(abs_delta);
        let pt1 = pt_q.translate(delta * vec.y, delta * -vec.x);
        let pt2 = pt_q.translate(delta * -vec.y, delta * vec.x);
        // offset edge the side is clipped against
        let pt3 = perpendic(path[k], nk, delta);

        if j == k {
            let pt4 = pt3 + vec.scale(delta);
            let pt = line_line_intr_pt(pt1, pt2, pt3, pt4).unwrap_or(pt1);
            self.push(pt.reflect(pt_q))?;
            self.push(pt)
        } else {
            let pt4 = perpendic(path[j], nk, delta);
            let pt = line_line_intr_pt(pt1, pt2, pt3, pt4).unwrap_or(pt1);
            self.push(pt)?;
            self.push(pt.reflect(pt_q))
        }
    }

    fn do_miter(&mut self, path: &[Point64], j: usize, k: usize, cos_a: f64) -> Result<(), ClipError> {
        let q = self.group_delta / (cos_a + 1.0);
        let v = Vector2::from(path[j]) + (self.norms[k] + self.norms[j]).scale(q);
        self.push(v)
    }

    fn do_round(&mut self, path: &[Point64], j: usize, k: usize, angle: f64) -> Result<(), ClipError> {
        let pt = Vector2::from(path[j]);
        let mut offset_vec = self.norms[k].scale(self.group_delta);
        if j == k {
            offset_vec = -offset_vec;
        }
        self.push(pt + offset_vec)?;

        let steps = (self.steps_per_rad * angle.abs()).ceil() as usize;
        for _ in 1..steps {
            offset_vec = vec2(
                offset_vec.x * self.step_cos - self.step_sin * offset_vec.y,
                offset_vec.x * self.step_sin + offset_vec.y * self.step_cos,
            );
            self.push(pt + offset_vec)?;
        }
        self.push(perpendic(path[j], self.norms[j], self.group_delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    fn square() -> Path64 {
        Rect64::new(0, 0, 10, 10).as_path()
    }

    #[test]
    fn normals_point_right_of_travel() {
        let n = unit_normal(Point64::new(0, 0), Point64::new(10, 0));
        assert_fuzzy_eq!(n, vec2(0.0, -1.0));
        let n = unit_normal(Point64::new(0, 0), Point64::new(0, 5));
        assert_fuzzy_eq!(n, vec2(1.0, 0.0));
        assert_fuzzy_eq!(unit_normal(Point64::new(3, 3), Point64::new(3, 3)), Vector2::zero());
    }

    #[test]
    fn reversed_group_detection() {
        let g = OffsetGroup::new(&[square()], JoinType::Miter, EndType::Polygon);
        assert!(!g.is_reversed);
        assert_eq!(g.lowest_path_idx, Some(0));

        let hole_first = vec![Rect64::new(2, 2, 8, 8).as_path(), square().reversed()];
        let g = OffsetGroup::new(&hole_first, JoinType::Miter, EndType::Polygon);
        assert!(g.is_reversed);
        assert_eq!(g.lowest_path_idx, Some(1));

        let g = OffsetGroup::new(&[square().reversed()], JoinType::Miter, EndType::Butt);
        assert!(!g.is_reversed);
    }

    #[test]
    fn miter_loop_of_square() {
        let g = OffsetGroup::new(&[square()], JoinType::Miter, EndType::Polygon);
        let mut loops = Vec::new();
        GroupOffsetter::new(&g, 1.0, &OffsetOptions::new())
            .offset_into(&mut loops)
            .unwrap();
        assert_eq!(
            loops,
            vec![vec![
                Point64::new(-1, -1),
                Point64::new(11, -1),
                Point64::new(11, 11),
                Point64::new(-1, 11)
            ]]
        );
    }

    #[test]
    fn bevel_loop_of_square() {
        let g = OffsetGroup::new(&[square()], JoinType::Bevel, EndType::Polygon);
        let mut loops = Vec::new();
        GroupOffsetter::new(&g, 2.0, &OffsetOptions::new())
            .offset_into(&mut loops)
            .unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 8);
        // each corner is cut by a triangle with legs of 2
        assert_fuzzy_eq!(loops[0].area(), 196.0 - 4.0 * 2.0);
    }

    #[test]
    fn round_steps_clamped() {
        let g = OffsetGroup::new(&[square()], JoinType::Round, EndType::Polygon);
        let mut opts = OffsetOptions::new();
        opts.arc_tolerance = 1e-9;
        // tiny tolerances fall back to the default scaled tolerance
        let o = GroupOffsetter::new(&g, 1e6, &opts);
        assert!(o.steps_per_rad * 2.0 * PI <= 512.0);
        opts.arc_tolerance = 5.0;
        let o = GroupOffsetter::new(&g, 5.0, &opts);
        assert_fuzzy_eq!(o.steps_per_rad * 2.0 * PI, 2.0, 1e-9);
    }
}
