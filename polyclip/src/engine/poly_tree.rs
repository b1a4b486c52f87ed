use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

use crate::{
    engine::FillRule,
    error::{ClipError, Phase, ReserveExt},
    geometry::{Path64, PathExt, Paths64, Point64, PointInPolygonResult},
};

/// Closed path node of a [PolyTree].
#[derive(Debug, Clone, PartialEq)]
pub struct PolyPath {
    polygon: Path64,
    parent: Option<usize>,
    children: Vec<usize>,
    level: usize,
}

impl PolyPath {
    /// Path of this node.
    #[inline]
    pub fn polygon(&self) -> &Path64 {
        &self.polygon
    }

    /// Index of the enclosing node, `None` for top level outer paths.
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indexes of nodes directly enclosed by this node.
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Nesting depth, top level outer paths are at level 0.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Holes sit at odd levels.
    #[inline]
    pub fn is_hole(&self) -> bool {
        self.level % 2 == 1
    }
}

/// Closed paths nested by containment.
///
/// Nodes are stored in a flat arena and addressed by index, [PolyTree::roots] lists the top
/// level outer paths.
///
/// # Examples
///
/// ```
/// # use polyclip::engine::*;
/// # use polyclip::geometry::*;
/// let outer = Rect64::new(0, 0, 20, 20).as_path();
/// let hole = Rect64::new(5, 5, 15, 15).as_path().reversed();
/// let tree = PolyTree::from_paths(vec![hole, outer]).unwrap();
/// assert_eq!(tree.roots().len(), 1);
/// let root = tree.node(tree.roots()[0]);
/// assert_eq!(root.children().len(), 1);
/// assert!(tree.node(root.children()[0]).is_hole());
/// assert_eq!(tree.area(tree.roots()[0]), 300.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyTree {
    nodes: Vec<PolyPath>,
    roots: Vec<usize>,
}

impl PolyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nest `paths` by containment, each path becomes one node.
    ///
    /// A path's parent is the smallest (by absolute area) path that contains it. Paths are
    /// expected not to cross each other (as returned by the boolean engine).
    pub fn from_paths(paths: Paths64) -> Result<Self, ClipError> {
        let n = paths.len();
        if n == 0 {
            return Ok(Self::new());
        }

        let bounds: Vec<_> = paths.iter().map(|p| p.bounds()).collect();
        let abs_areas: Vec<f64> = paths.iter().map(|p| p.area().abs()).collect();

        let index: StaticAABB2DIndex<f64> = {
            let mut b = StaticAABB2DIndexBuilder::new(n);
            for r in bounds.iter() {
                b.add(r.left as f64, r.top as f64, r.right as f64, r.bottom as f64);
            }
            b.build().map_err(|err| {
                log::debug!("failed to build containment index: {}", err);
                ClipError::invariant(Phase::Assembly)
            })?
        };

        let mut parents: Vec<Option<usize>> = Vec::new();
        parents.try_reserve(n).or_exhausted("tree nodes")?;
        let mut query_stack = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            let r = &bounds[i];
            let candidates = index.query_with_stack(
                r.left as f64,
                r.top as f64,
                r.right as f64,
                r.bottom as f64,
                &mut query_stack,
            );

            let mut best: Option<usize> = None;
            for j in candidates {
                if j == i
                    || abs_areas[j] <= abs_areas[i]
                    || !bounds[j].contains_rect(r)
                    || best.is_some_and(|b| abs_areas[b] <= abs_areas[j])
                {
                    continue;
                }
                if path_inside(path, &paths[j]) {
                    best = Some(j);
                }
            }
            parents.push(best);
        }

        // larger paths first so parents are leveled before their children
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| abs_areas[b].total_cmp(&abs_areas[a]));
        let mut levels = vec![0usize; n];
        for &i in order.iter() {
            if let Some(p) = parents[i] {
                levels[i] = levels[p] + 1;
            }
        }

        let mut nodes: Vec<PolyPath> = Vec::new();
        nodes.try_reserve(n).or_exhausted("tree nodes")?;
        for (i, polygon) in paths.into_iter().enumerate() {
            nodes.push(PolyPath {
                polygon,
                parent: parents[i],
                children: Vec::new(),
                level: levels[i],
            });
        }
        let mut roots = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            match *parent {
                Some(p) => nodes[p].children.push(i),
                None => roots.push(i),
            }
        }

        Ok(Self { nodes, roots })
    }

    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn node(&self, index: usize) -> &PolyPath {
        &self.nodes[index]
    }

    /// All nodes in arena order.
    #[inline]
    pub fn nodes(&self) -> &[PolyPath] {
        &self.nodes
    }

    /// Top level outer paths.
    #[inline]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Signed area of the node at `index` including all of its descendants.
    pub fn area(&self, index: usize) -> f64 {
        let node = &self.nodes[index];
        node.polygon.area() + node.children.iter().map(|&c| self.area(c)).sum::<f64>()
    }

    /// Number of vertices over every node.
    pub fn total_vertex_count(&self) -> usize {
        self.nodes.iter().map(|n| n.polygon.len()).sum()
    }

    /// Flatten back into paths, parents before their children.
    pub fn to_paths(&self) -> Paths64 {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            result.push(self.nodes[i].polygon.clone());
            stack.extend(self.nodes[i].children.iter().rev());
        }
        result
    }
}

/// Returns true if `inner` lies inside `outer`, deciding on the first vertex of `inner` not on
/// the boundary of `outer`.
fn path_inside(inner: &[Point64], outer: &[Point64]) -> bool {
    for &pt in inner {
        match outer.point_in_polygon(pt, FillRule::NonZero) {
            PointInPolygonResult::Inside => return true,
            PointInPolygonResult::Outside => return false,
            PointInPolygonResult::OnBoundary => {}
        }
    }
    // every vertex touches the outer boundary, fall back to comparing the mid point of an edge
    inner
        .windows(2)
        .map(|w| {
            let mid = |a: i64, b: i64| ((a as i128 + b as i128) / 2) as i64;
            Point64::new(mid(w[0].x, w[1].x), mid(w[0].y, w[1].y))
        })
        .map(|mid| outer.point_in_polygon(mid, FillRule::NonZero))
        .find(|r| *r != PointInPolygonResult::OnBoundary)
        .is_some_and(|r| r == PointInPolygonResult::Inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect64;

    fn square(left: i64, top: i64, size: i64) -> Path64 {
        Rect64::new(left, top, left + size, top + size).as_path()
    }

    #[test]
    fn empty_tree() {
        let tree = PolyTree::from_paths(Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
        assert!(tree.to_paths().is_empty());
    }

    #[test]
    fn nested_levels() {
        let paths = vec![
            square(10, 10, 10),
            square(0, 0, 100),
            square(5, 5, 30).reversed(),
            square(200, 0, 10),
        ];
        let tree = PolyTree::from_paths(paths).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots(), &[1, 3]);
        assert_eq!(tree.node(2).parent(), Some(1));
        assert_eq!(tree.node(0).parent(), Some(2));
        assert_eq!(tree.node(0).level(), 2);
        assert!(tree.node(2).is_hole());
        assert!(!tree.node(0).is_hole());
        assert_eq!(tree.area(1), 10000.0 - 900.0 + 100.0);
        assert_eq!(tree.total_vertex_count(), 16);

        let flat = tree.to_paths();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0], square(0, 0, 100));
        assert_eq!(flat[1], square(5, 5, 30).reversed());
    }

    #[test]
    fn touching_vertices_still_nest() {
        // hole shares a corner with its outer path
        let outer = square(0, 0, 20);
        let hole = vec![Point64::new(0, 0), Point64::new(5, 10), Point64::new(10, 5)];
        let tree = PolyTree::from_paths(vec![outer, hole]).unwrap();
        assert_eq!(tree.node(1).parent(), Some(0));
    }
}
