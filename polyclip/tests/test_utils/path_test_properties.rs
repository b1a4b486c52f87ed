use super::to_debug_json_str;
use polyclip::{
    engine::{ClipType, FillRule},
    geometry::{Path64, PathExt, Paths64, Point64, Rect64},
};

/// Holds a set of properties of a path for comparison in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathProperties {
    pub vertex_count: usize,
    pub area: f64,
    pub bounds: Rect64,
}

impl PathProperties {
    // property comparer epsilon
    pub const PROP_CMP_EPS: f64 = 1e-6;

    pub fn new(
        vertex_count: usize,
        area: f64,
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    ) -> Self {
        Self {
            vertex_count,
            area,
            bounds: Rect64::new(left, top, right, bottom),
        }
    }

    pub fn from_path(path: &[Point64], invert_area: bool) -> Self {
        let area = if invert_area { -path.area() } else { path.area() };
        Self {
            vertex_count: path.len(),
            area,
            bounds: path.bounds(),
        }
    }

    pub fn matches(&self, other: &Self) -> bool {
        self.vertex_count == other.vertex_count
            && (self.area - other.area).abs() < Self::PROP_CMP_EPS
            && self.bounds == other.bounds
    }
}

pub fn create_property_set<'a, I>(paths: I, invert_area: bool) -> Vec<PathProperties>
where
    I: IntoIterator<Item = &'a Path64>,
{
    paths
        .into_iter()
        .map(|p| PathProperties::from_path(p, invert_area))
        .collect()
}

pub fn property_sets_match(result_set: &[PathProperties], expected_set: &[PathProperties]) -> bool {
    let mut sets_match = true;
    if result_set.len() != expected_set.len() {
        sets_match = false;
    } else {
        // using simple N^2 comparisons to compare property sets (sets are always relatively small,
        // e.g. N < 10)
        for properties_expected in expected_set {
            let match_count = result_set
                .iter()
                .filter(|properties_result| properties_expected.matches(properties_result))
                .count();

            if match_count != 1 {
                sets_match = false;
                break;
            }
        }
    }

    if !sets_match {
        eprintln!("result:\n{:?}", result_set);
        eprintln!("expected:\n{:?}", expected_set);
    }

    sets_match
}

/// Rotate a closed path so it starts at its lexicographically smallest point.
pub fn canonical_path(path: &[Point64]) -> Path64 {
    let Some(start) = (0..path.len()).min_by_key(|&i| (path[i].x, path[i].y)) else {
        return Path64::new();
    };
    let mut result = path.to_vec();
    result.rotate_left(start);
    result
}

/// Closed paths rotated by [canonical_path] and sorted.
pub fn canonical_paths(paths: &[Path64]) -> Paths64 {
    let mut result: Paths64 = paths.iter().map(|p| canonical_path(p)).collect();
    result.sort_by_key(|p| p.iter().map(|pt| (pt.x, pt.y)).collect::<Vec<_>>());
    result
}

/// Open paths oriented so the first point is not greater than the last, then sorted.
pub fn canonical_open_paths(paths: &[Path64]) -> Paths64 {
    let mut result: Paths64 = paths
        .iter()
        .map(|p| match (p.first(), p.last()) {
            (Some(a), Some(b)) if (b.x, b.y) < (a.x, a.y) => p.reversed(),
            _ => p.clone(),
        })
        .collect();
    result.sort_by_key(|p| p.iter().map(|pt| (pt.x, pt.y)).collect::<Vec<_>>());
    result
}

/// Sum of winding numbers of all `paths` around `pt`.
pub fn winding_sum(paths: &[Path64], pt: Point64) -> i32 {
    paths.iter().map(|p| p.winding_number(pt)).sum()
}

/// Panics with a dump of both path sets if any of `samples` is covered (nonzero winding) by
/// exactly one of them.
pub fn assert_same_coverage(result: &[Path64], expected: &[Path64], samples: &[Point64]) {
    for &pt in samples {
        let a = winding_sum(result, pt) != 0;
        let b = winding_sum(expected, pt) != 0;
        if a != b {
            panic!(
                "coverage differs at ({}, {}): result {} expected {}\nresult: {}\nexpected: {}",
                pt.x,
                pt.y,
                a,
                b,
                to_debug_json_str(result),
                to_debug_json_str(expected)
            );
        }
    }
}

/// Odd coordinate sample points over `[min, max]` on both axes.
pub fn odd_grid(min: i64, max: i64) -> Vec<Point64> {
    let first = if min % 2 == 0 { min + 1 } else { min };
    let mut result = Vec::new();
    let mut y = first;
    while y <= max {
        let mut x = first;
        while x <= max {
            result.push(Point64::new(x, y));
            x += 2;
        }
        y += 2;
    }
    result
}

fn dist_sqrd_to_segment(pt: Point64, a: Point64, b: Point64) -> f64 {
    let (px, py) = (pt.x as f64, pt.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let len_sqrd = dx * dx + dy * dy;
    let t = if len_sqrd == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sqrd).clamp(0.0, 1.0)
    };
    let (ex, ey) = (ax + t * dx - px, ay + t * dy - py);
    ex * ex + ey * ey
}

/// Returns true if `pt` is within `dist` of an edge of any closed path in `paths`.
pub fn near_any_edge(paths: &[Path64], pt: Point64, dist: f64) -> bool {
    let dist_sqrd = dist * dist;
    paths.iter().filter(|p| !p.is_empty()).any(|p| {
        let mut prev = p[p.len() - 1];
        p.iter().any(|&curr| {
            let near = dist_sqrd_to_segment(pt, prev, curr) <= dist_sqrd;
            prev = curr;
            near
        })
    })
}

/// Whether `pt` belongs to the result of `clip_type` applied to `subjects` and `clips`, decided
/// from the winding numbers of the inputs under `fill_rule`.
pub fn inside_by_winding(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    clips: &[Path64],
    pt: Point64,
) -> bool {
    let in_subject = fill_rule.is_inside(winding_sum(subjects, pt));
    let in_clip = fill_rule.is_inside(winding_sum(clips, pt));
    match clip_type {
        ClipType::Intersection => in_subject && in_clip,
        ClipType::Union => in_subject || in_clip,
        ClipType::Difference => in_subject && !in_clip,
        ClipType::Xor => in_subject != in_clip,
    }
}

/// Checks `result` against [inside_by_winding] at every sample further than `margin` from all
/// input and result edges. Returns the number of samples checked.
pub fn assert_matches_winding(
    result: &[Path64],
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    clips: &[Path64],
    samples: &[Point64],
    margin: f64,
) -> usize {
    let mut checked = 0;
    for &pt in samples {
        if near_any_edge(subjects, pt, margin)
            || near_any_edge(clips, pt, margin)
            || near_any_edge(result, pt, margin)
        {
            continue;
        }
        checked += 1;
        let expected = inside_by_winding(clip_type, fill_rule, subjects, clips, pt);
        let got = winding_sum(result, pt) != 0;
        if got != expected {
            panic!(
                "{:?} {:?} wrong at ({}, {}): result {} expected {}\nsubjects: {}\nclips: {}\nresult: {}",
                clip_type,
                fill_rule,
                pt.x,
                pt.y,
                got,
                expected,
                to_debug_json_str(subjects),
                to_debug_json_str(clips),
                to_debug_json_str(result)
            );
        }
    }
    checked
}

/// Sample points on a regular grid covering `bounds`, offset from the lattice by `phase`.
pub fn sample_grid(bounds: Rect64, step: i64, phase: i64) -> Vec<Point64> {
    let mut result = Vec::new();
    let mut y = bounds.top + phase;
    while y <= bounds.bottom {
        let mut x = bounds.left + phase;
        while x <= bounds.right {
            result.push(Point64::new(x, y));
            x += step;
        }
        y += step;
    }
    result
}
