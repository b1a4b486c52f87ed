mod test_utils;

use polyclip::{
    geometry::{area_paths, Path64, PathExt, Rect64},
    offset::{inflate_paths, ClipperOffset, EndType, JoinType, OffsetOptions},
    path64, ClipError,
};
use std::f64::consts::PI;
use test_utils::{create_property_set, init_logger, property_sets_match, PathProperties};

fn square() -> Path64 {
    path64![(0, 0), (10, 0), (10, 10), (0, 10)]
}

fn offset(paths: &[Path64], delta: f64, join: JoinType, end: EndType) -> Vec<Path64> {
    inflate_paths(paths, delta, join, end, &OffsetOptions::default()).unwrap()
}

#[test]
fn miter_square_inflate() {
    init_logger();
    let result = offset(&[square()], 2.0, JoinType::Miter, EndType::Polygon);
    assert!(property_sets_match(
        &create_property_set(&result, false),
        &[PathProperties::new(4, 196.0, -2, -2, 12, 12)]
    ));
}

#[test]
fn zero_delta_returns_canonical_copy() {
    init_logger();
    let with_duplicates = path64![(0, 0), (10, 0), (10, 0), (10, 10), (0, 10), (0, 0)];
    let degenerate = path64![(50, 50), (60, 60)];
    let result = offset(
        &[with_duplicates, degenerate],
        0.0,
        JoinType::Round,
        EndType::Polygon,
    );
    assert_eq!(result, vec![square()]);
}

#[test]
fn each_join_type_inflates_square() {
    init_logger();
    for join in [JoinType::Square, JoinType::Bevel, JoinType::Round, JoinType::Miter] {
        let result = offset(&[square()], 5.0, join, EndType::Polygon);
        assert_eq!(result.len(), 1, "{:?}", join);
        assert_eq!(result[0].bounds(), Rect64::new(-5, -5, 15, 15), "{:?}", join);
        let area = result[0].area();
        // between the beveled square and the full miter square
        assert!(area >= 400.0 - 4.0 * 12.5 && area <= 400.0, "{:?}: {}", join, area);
    }
}

#[test]
fn round_join_area_approaches_arc() {
    init_logger();
    let result = offset(&[square()], 5.0, JoinType::Round, EndType::Polygon);
    let exact = 100.0 + 4.0 * 50.0 + PI * 25.0;
    let area = result[0].area();
    assert!(area < exact + 1.0 && area > exact - 6.0, "area: {}", area);
}

#[test]
fn deflate_until_vanished() {
    init_logger();
    let result = offset(&[square()], -2.0, JoinType::Miter, EndType::Polygon);
    assert!(property_sets_match(
        &create_property_set(&result, false),
        &[PathProperties::new(4, 36.0, 2, 2, 8, 8)]
    ));
    assert!(offset(&[square()], -5.0, JoinType::Miter, EndType::Polygon).is_empty());
    assert!(offset(&[square()], -50.0, JoinType::Round, EndType::Polygon).is_empty());
}

#[test]
fn hole_shrinks_as_outer_grows() {
    init_logger();
    let outer = Rect64::new(0, 0, 20, 20).as_path();
    let hole = Rect64::new(5, 5, 15, 15).as_path().reversed();
    let result = offset(&[outer, hole], 2.0, JoinType::Miter, EndType::Polygon);
    assert!(property_sets_match(
        &create_property_set(&result, false),
        &[
            PathProperties::new(4, 576.0, -2, -2, 22, 22),
            PathProperties::new(4, -36.0, 7, 7, 13, 13),
        ]
    ));
}

#[test]
fn hole_closes_when_offset_exceeds_half_width() {
    init_logger();
    let outer = Rect64::new(0, 0, 20, 20).as_path();
    let hole = Rect64::new(8, 8, 12, 12).as_path().reversed();
    let result = offset(&[outer, hole], 3.0, JoinType::Miter, EndType::Polygon);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].area(), 26.0 * 26.0);
}

#[test]
fn open_path_end_types() {
    init_logger();
    let line = path64![(0, 0), (10, 0)];

    let butt = offset(&[line.clone()], 2.0, JoinType::Miter, EndType::Butt);
    assert!(property_sets_match(
        &create_property_set(&butt, false),
        &[PathProperties::new(4, 40.0, 0, -2, 10, 2)]
    ));

    let square_end = offset(&[line.clone()], 2.0, JoinType::Miter, EndType::Square);
    assert_eq!(square_end.len(), 1);
    assert_eq!(square_end[0].bounds(), Rect64::new(-2, -2, 12, 2));
    assert_eq!(square_end[0].area(), 56.0);

    let round_end = offset(&[line], 10.0, JoinType::Miter, EndType::Round);
    assert_eq!(round_end.len(), 1);
    let bounds = round_end[0].bounds();
    assert_eq!((bounds.top, bounds.bottom), (-10, 10));
    assert!((-10..=-9).contains(&bounds.left) && (19..=20).contains(&bounds.right));
    let exact = 200.0 + PI * 100.0;
    let area = round_end[0].area();
    assert!(area < exact + 1.0 && area > exact * 0.97, "area: {}", area);
}

#[test]
fn joined_open_path_forms_band() {
    init_logger();
    let open_square = path64![(0, 0), (10, 0), (10, 10), (0, 10)];
    let result = offset(&[open_square], 1.0, JoinType::Miter, EndType::Joined);
    // 12x12 outer minus 8x8 hole
    assert_eq!(result.len(), 2);
    assert_eq!(area_paths(&result), 144.0 - 64.0);
}

#[test]
fn negative_delta_on_open_path_uses_magnitude() {
    init_logger();
    let line = path64![(0, 0), (10, 0)];
    let result = offset(&[line], -2.0, JoinType::Miter, EndType::Butt);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].area(), 40.0);
}

#[test]
fn mixed_groups_single_union() {
    init_logger();
    let mut offsetter = ClipperOffset::new();
    offsetter
        .add_paths(&[square()], JoinType::Miter, EndType::Polygon)
        .add_paths(&[path64![(10, 5), (30, 5)]], JoinType::Miter, EndType::Butt);
    let result = offsetter.execute(1.0).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].bounds(), Rect64::new(-1, -1, 30, 11));
    assert_eq!(result[0].area(), 144.0 + 19.0 * 2.0);
}

#[test]
fn execute_tree_nests_hole() {
    init_logger();
    let outer = Rect64::new(0, 0, 20, 20).as_path();
    let hole = Rect64::new(5, 5, 15, 15).as_path().reversed();
    let mut offsetter = ClipperOffset::new();
    offsetter.add_paths(&[outer, hole], JoinType::Miter, EndType::Polygon);
    let result = offsetter.execute_tree(1.0).unwrap();
    assert_eq!(result.tree.roots().len(), 1);
    let root = result.tree.node(result.tree.roots()[0]);
    assert_eq!(root.children().len(), 1);
    assert!(result.tree.node(root.children()[0]).is_hole());
    assert_eq!(result.tree.area(result.tree.roots()[0]), 484.0 - 64.0);
}

#[test]
fn reverse_solution_option() {
    init_logger();
    let options = OffsetOptions {
        reverse_solution: true,
        ..OffsetOptions::default()
    };
    let result =
        inflate_paths(&[square()], 2.0, JoinType::Miter, EndType::Polygon, &options).unwrap();
    assert_eq!(result[0].area(), -196.0);

    let mut offsetter = ClipperOffset::new();
    offsetter.options_mut().reverse_solution = true;
    offsetter.add_paths(&[square()], JoinType::Miter, EndType::Polygon);
    offsetter.clear();
    assert!(offsetter.options().reverse_solution);
    offsetter.add_paths(&[square()], JoinType::Miter, EndType::Polygon);
    assert_eq!(offsetter.execute(2.0).unwrap()[0].area(), -196.0);
}

#[test]
fn miter_limit_squares_sharp_corner() {
    init_logger();
    // very sharp spike pointing right
    let spike = path64![(0, 0), (100, 5), (0, 10)];
    let limited = offset(&[spike.clone()], 2.0, JoinType::Miter, EndType::Polygon);
    let options = OffsetOptions {
        miter_limit: 100.0,
        ..OffsetOptions::default()
    };
    let unlimited =
        inflate_paths(&[spike], 2.0, JoinType::Miter, EndType::Polygon, &options).unwrap();
    assert!(limited[0].bounds().right < unlimited[0].bounds().right);
    assert!(limited[0].len() > unlimited[0].len());
}

#[test]
fn invalid_arguments() {
    let bad_delta = inflate_paths(
        &[square()],
        f64::NAN,
        JoinType::Round,
        EndType::Polygon,
        &OffsetOptions::default(),
    );
    assert!(matches!(bad_delta, Err(ClipError::InvalidOptions(_))));

    let options = OffsetOptions {
        arc_tolerance: f64::INFINITY,
        ..OffsetOptions::default()
    };
    let bad_options = inflate_paths(&[square()], 1.0, JoinType::Round, EndType::Polygon, &options);
    assert!(matches!(bad_options, Err(ClipError::InvalidOptions(_))));
}
