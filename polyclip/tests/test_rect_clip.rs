mod test_utils;

use polyclip::{
    engine::FillRule,
    geometry::{area_paths, PathExt, Rect64},
    ops::intersect,
    path64, paths64,
    rect_clip::{rect_clip, rect_clip_lines, RectClipper},
    ClipError,
};
use test_utils::{assert_same_coverage, canonical_open_paths, init_logger, odd_grid};

fn rect() -> Rect64 {
    Rect64::new(0, 0, 10, 10)
}

#[test]
fn square_over_corner() {
    init_logger();
    let result = rect_clip(rect(), &[path64![(-5, -5), (5, -5), (5, 5), (-5, 5)]]).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].area(), 25.0);
}

#[test]
fn matches_boolean_intersection() {
    init_logger();
    let r = Rect64::new(10, 10, 50, 50);
    let paths = paths64![
        [(0, 0), (30, 0), (30, 30), (0, 30)],
        [(20, 40), (60, 40), (60, 60), (20, 60)],
        [(24, 4), (44, 4), (44, 24), (24, 24)],
        [(70, 70), (80, 70), (80, 80)],
    ];
    let clipped = rect_clip(r, &paths).unwrap();
    let expected = intersect(&paths, &[r.as_path()], FillRule::NonZero).unwrap();
    assert_same_coverage(&clipped, &expected, &odd_grid(-1, 81));
    assert!(clipped.iter().all(|p| p.area() > 0.0));
}

#[test]
fn concave_path_split_in_two() {
    init_logger();
    // U shape upside down, only the legs reach into the rect
    let arch = path64![
        (1, -8),
        (9, -8),
        (9, 8),
        (7, 8),
        (7, -5),
        (3, -5),
        (3, 8),
        (1, 8)
    ];
    let result = rect_clip(rect(), &[arch.clone()]).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(area_paths(&result), 32.0);
    let expected = intersect(&[arch], &[rect().as_path()], FillRule::NonZero).unwrap();
    assert_same_coverage(&result, &expected, &odd_grid(-1, 11));
}

#[test]
fn diamond_cut_on_all_sides() {
    init_logger();
    let diamond = path64![(5, -2), (12, 5), (5, 12), (-2, 5)];
    let result = rect_clip(rect(), &[diamond]).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].len(), 8);
    // rect minus four corner triangles
    assert_eq!(result[0].area(), 100.0 - 4.0 * 4.5);
}

#[test]
fn wrapping_outer_and_hole() {
    init_logger();
    let outer = Rect64::new(-10, -10, 20, 20).as_path();
    let result = rect_clip(rect(), &[outer.clone()]).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].bounds(), rect());
    assert_eq!(result[0].area(), 100.0);

    assert!(rect_clip(rect(), &[outer.reversed()]).unwrap().is_empty());
}

#[test]
fn path_entirely_inside_is_kept() {
    init_logger();
    let inner = path64![(2, 2), (8, 2), (5, 8)];
    assert_eq!(rect_clip(rect(), &[inner.clone()]).unwrap(), vec![inner]);
}

#[test]
fn path_on_boundary_has_no_area() {
    init_logger();
    let flat = path64![(0, 0), (10, 0), (5, 0)];
    assert!(rect_clip(rect(), &[flat]).unwrap().is_empty());
}

#[test]
fn lines_split_on_exit() {
    init_logger();
    let zigzag = path64![(-5, 2), (5, 2), (5, 15), (8, 15), (8, 5), (20, 5)];
    let result = rect_clip_lines(rect(), &[zigzag]).unwrap();
    assert_eq!(
        canonical_open_paths(&result),
        vec![
            path64![(0, 2), (5, 2), (5, 10)],
            path64![(8, 10), (8, 5), (10, 5)],
        ]
    );
}

#[test]
fn lines_outside_and_on_boundary() {
    init_logger();
    let outside = path64![(-5, -5), (-5, 20), (20, 20)];
    let along_top = path64![(-5, 0), (15, 0)];
    let result = rect_clip_lines(rect(), &[outside, along_top]).unwrap();
    assert_eq!(result, vec![path64![(0, 0), (10, 0)]]);
}

#[test]
fn lines_diagonal_snaps_to_lattice() {
    init_logger();
    let line = path64![(-3, 0), (12, 5)];
    let result = rect_clip_lines(rect(), &[line]).unwrap();
    assert_eq!(result.len(), 1);
    // y = (x + 3) / 3, at x = 0 -> 1, at x = 10 -> 13 / 3 rounds to 4
    assert_eq!(result[0], path64![(0, 1), (10, 4)]);
}

#[test]
fn invalid_and_empty_rects() {
    let paths = vec![Rect64::new(0, 0, 5, 5).as_path()];
    assert_eq!(
        rect_clip(Rect64::new(5, 0, 0, 5), &paths),
        Err(ClipError::InvalidRect)
    );
    assert_eq!(
        rect_clip_lines(Rect64::new(0, 5, 5, 0), &paths),
        Err(ClipError::InvalidRect)
    );
    assert!(rect_clip(Rect64::new(2, 2, 2, 8), &paths).unwrap().is_empty());
    assert!(RectClipper::new(Rect64::new(0, 0, i64::MAX, 10)).is_err());
}

#[test]
fn clipper_reused_for_many_calls() {
    init_logger();
    let clipper = RectClipper::new(rect()).unwrap();
    for i in 0..5 {
        let sq = Rect64::new(i * 3 - 5, 0, i * 3 + 5, 10).as_path();
        let result = clipper.clip(&[sq.clone()]).unwrap();
        let expected = intersect(&[sq], &[rect().as_path()], FillRule::NonZero).unwrap();
        assert_eq!(area_paths(&result), area_paths(&expected));
    }
}
