mod test_utils;

use polyclip::{
    engine::{ClipType, Clipper, FillRule, PolyTree},
    geometry::{area_paths, PathExt, Rect64},
    ops::boolean_op_tree,
};
use test_utils::init_logger;

fn ring(outer: i64, inner: i64, center: i64) -> Vec<polyclip::geometry::Path64> {
    vec![
        Rect64::new(center - outer, center - outer, center + outer, center + outer).as_path(),
        Rect64::new(center - inner, center - inner, center + inner, center + inner)
            .as_path()
            .reversed(),
    ]
}

#[test]
fn nested_rings_levels() {
    init_logger();
    let mut subjects = ring(50, 40, 50);
    subjects.extend(ring(30, 20, 50));
    subjects.push(Rect64::new(45, 45, 55, 55).as_path());

    let result = boolean_op_tree(ClipType::Union, FillRule::NonZero, &subjects, &[], &[]).unwrap();
    let tree = &result.tree;
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.roots().len(), 1);

    let mut levels: Vec<usize> = tree.nodes().iter().map(|n| n.level()).collect();
    levels.sort_unstable();
    assert_eq!(levels, vec![0, 1, 2, 3, 4]);
    for (i, node) in tree.nodes().iter().enumerate() {
        assert_eq!(node.is_hole(), node.polygon().area() < 0.0);
        if let Some(parent) = node.parent() {
            assert_eq!(tree.node(parent).level() + 1, node.level());
            assert!(tree.node(parent).children().contains(&i));
        }
    }

    let root = tree.roots()[0];
    let total = 100.0 * 100.0 - 80.0 * 80.0 + 60.0 * 60.0 - 40.0 * 40.0 + 100.0;
    assert_eq!(tree.area(root), total);
    assert_eq!(area_paths(&tree.to_paths()), total);
}

#[test]
fn side_by_side_outers() {
    init_logger();
    let mut clipper = Clipper::new();
    clipper.add_subject(&[
        Rect64::new(0, 0, 10, 10).as_path(),
        Rect64::new(20, 0, 30, 10).as_path(),
    ]);
    let result = clipper
        .execute_tree(ClipType::Union, FillRule::NonZero)
        .unwrap();
    assert_eq!(result.tree.roots().len(), 2);
    assert!(result
        .tree
        .nodes()
        .iter()
        .all(|n| n.level() == 0 && n.children().is_empty()));
    assert_eq!(result.tree.total_vertex_count(), 8);
}

#[test]
fn tree_round_trips_through_paths() {
    init_logger();
    let subjects = ring(20, 10, 0);
    let tree = PolyTree::from_paths(subjects.clone()).unwrap();
    let rebuilt = PolyTree::from_paths(tree.to_paths()).unwrap();
    assert_eq!(rebuilt.len(), tree.len());
    assert_eq!(rebuilt.area(rebuilt.roots()[0]), tree.area(tree.roots()[0]));
}
