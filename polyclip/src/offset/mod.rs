//! Inflating and deflating closed paths and stroking open paths by a signed distance.
mod group;

use crate::{
    engine::{BooleanOptions, BooleanTreeResult, Clipper, ClipType, FillRule},
    error::{guarded, ClipError},
    geometry::{Path64, Paths64},
};
use group::{GroupOffsetter, OffsetGroup};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Corner style where two offset edges meet on the convex side.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// Corner cut square at distance `|delta|` from the vertex.
    Square,
    /// Straight chord across the corner.
    Bevel,
    /// Circular arc approximated within the arc tolerance.
    Round,
    /// Edges extended to meet, squared off past the miter limit.
    Miter,
}

impl JoinType {
    /// Stable integer code (`Square = 0, Bevel = 1, Round = 2, Miter = 3`).
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            JoinType::Square => 0,
            JoinType::Bevel => 1,
            JoinType::Round => 2,
            JoinType::Miter => 3,
        }
    }
}

impl TryFrom<u32> for JoinType {
    type Error = ClipError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(JoinType::Square),
            1 => Ok(JoinType::Bevel),
            2 => Ok(JoinType::Round),
            3 => Ok(JoinType::Miter),
            _ => Err(ClipError::InvalidJoinType(code)),
        }
    }
}

/// How a path is closed or capped when offset.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndType {
    /// Closed polygon, inflated (positive delta) or deflated (negative delta).
    Polygon,
    /// Closed path stroked on both sides.
    Joined,
    /// Open path with square ends flush with the end points.
    Butt,
    /// Open path with square ends extended by `|delta|`.
    Square,
    /// Open path with round ends.
    Round,
}

impl EndType {
    /// Stable integer code (`Polygon = 0, Joined = 1, Butt = 2, Square = 3, Round = 4`).
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            EndType::Polygon => 0,
            EndType::Joined => 1,
            EndType::Butt => 2,
            EndType::Square => 3,
            EndType::Round => 4,
        }
    }

    /// Polygon and Joined paths are treated as closed.
    #[inline]
    pub fn is_closed(self) -> bool {
        matches!(self, EndType::Polygon | EndType::Joined)
    }
}

impl TryFrom<u32> for EndType {
    type Error = ClipError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EndType::Polygon),
            1 => Ok(EndType::Joined),
            2 => Ok(EndType::Butt),
            3 => Ok(EndType::Square),
            4 => Ok(EndType::Round),
            _ => Err(ClipError::InvalidEndType(code)),
        }
    }
}

/// Struct to hold options parameters used when offsetting.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Maximum distance of a miter join vertex from the path vertex as a multiple of `|delta|`,
    /// sharper corners are squared off. Values up to 1 square every convex corner.
    pub miter_limit: f64,
    /// Maximum deviation of round joins and ends from the true arc. Values below 0.01 pick a
    /// tolerance from the offset distance.
    pub arc_tolerance: f64,
    /// Keep collinear vertices in the output.
    pub preserve_collinear: bool,
    /// Flip output orientation so outer paths have negative area.
    pub reverse_solution: bool,
}

impl OffsetOptions {
    pub fn new() -> Self {
        Self {
            miter_limit: 2.0,
            arc_tolerance: 0.25,
            preserve_collinear: false,
            reverse_solution: false,
        }
    }

    /// Returns [ClipError::InvalidOptions] if the miter limit or arc tolerance is not a finite
    /// non negative number.
    pub fn validate(&self) -> Result<(), ClipError> {
        if !self.miter_limit.is_finite() || self.miter_limit < 0.0 {
            return Err(ClipError::InvalidOptions("miter limit must be finite and >= 0"));
        }
        if !self.arc_tolerance.is_finite() || self.arc_tolerance < 0.0 {
            return Err(ClipError::InvalidOptions(
                "arc tolerance must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

impl Default for OffsetOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Offset builder, collects groups of paths sharing a join and end type.
///
/// Every group is offset by the same delta and all resulting loops are merged by one union.
///
/// # Examples
///
/// ```
/// # use polyclip::offset::*;
/// # use polyclip::geometry::*;
/// let mut offsetter = ClipperOffset::new();
/// offsetter.add_paths(
///     &[Rect64::new(0, 0, 10, 10).as_path()],
///     JoinType::Miter,
///     EndType::Polygon,
/// );
/// let result = offsetter.execute(2.0).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].bounds(), Rect64::new(-2, -2, 12, 12));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClipperOffset {
    groups: Vec<OffsetGroup>,
    options: OffsetOptions,
}

impl ClipperOffset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: OffsetOptions) -> Self {
        Self {
            groups: Vec::new(),
            options,
        }
    }

    /// Add a group of paths offset with `join_type` corners and `end_type` ends. Empty input adds
    /// nothing.
    pub fn add_paths(&mut self, paths: &[Path64], join_type: JoinType, end_type: EndType) -> &mut Self {
        if !paths.is_empty() {
            self.groups.push(OffsetGroup::new(paths, join_type, end_type));
        }
        self
    }

    pub fn options(&self) -> OffsetOptions {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut OffsetOptions {
        &mut self.options
    }

    /// Remove all added groups (options are kept).
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    fn check_input(&self, delta: f64) -> Result<(), ClipError> {
        self.options.validate()?;
        if !delta.is_finite() {
            return Err(ClipError::InvalidOptions("delta must be finite"));
        }
        let all = self.groups.iter().flat_map(|g| g.paths.iter()).flatten();
        for pt in all {
            if !pt.in_range() {
                return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y });
            }
        }
        Ok(())
    }

    /// Offset loops of every group before the finishing union, all outer loops positive.
    fn offset_loops(&self, delta: f64) -> Result<Paths64, ClipError> {
        let mut loops = Vec::new();
        for g in self.groups.iter() {
            GroupOffsetter::new(g, delta, &self.options).offset_into(&mut loops)?;
        }
        log::debug!(
            "offset {} groups by {}: {} loops",
            self.groups.len(),
            delta,
            loops.len()
        );
        Ok(loops)
    }

    /// Copy of the input with duplicate points and degenerate paths removed.
    fn canonical_copy(&self) -> Paths64 {
        self.groups
            .iter()
            .flat_map(|g| {
                let min_len = if g.end_type.is_closed() { 3 } else { 2 };
                g.paths.iter().filter(move |p| p.len() >= min_len).cloned()
            })
            .collect()
    }

    fn union_clipper(&self, loops: &[Path64]) -> Clipper {
        let mut clipper = Clipper::with_options(BooleanOptions {
            preserve_collinear: self.options.preserve_collinear,
            reverse_solution: self.options.reverse_solution,
        });
        clipper.add_subject(loops);
        clipper
    }

    /// Offset every group by `delta` (positive inflates closed paths).
    ///
    /// `|delta| < 0.5` returns a copy of the input with duplicate points and degenerate paths
    /// removed.
    pub fn execute(&self, delta: f64) -> Result<Paths64, ClipError> {
        guarded(|| {
            self.check_input(delta)?;
            if delta.abs() < 0.5 {
                return Ok(self.canonical_copy());
            }
            let loops = self.offset_loops(delta)?;
            if loops.is_empty() {
                return Ok(Paths64::new());
            }
            let result = self
                .union_clipper(&loops)
                .execute(ClipType::Union, FillRule::Positive)?;
            Ok(result.closed)
        })
    }

    /// Same as [ClipperOffset::execute] with the output nested into a tree.
    pub fn execute_tree(&self, delta: f64) -> Result<BooleanTreeResult, ClipError> {
        guarded(|| {
            self.check_input(delta)?;
            if delta.abs() < 0.5 {
                let tree = crate::engine::PolyTree::from_paths(self.canonical_copy())?;
                return Ok(BooleanTreeResult {
                    tree,
                    open: Paths64::new(),
                });
            }
            let loops = self.offset_loops(delta)?;
            self.union_clipper(&loops)
                .execute_tree(ClipType::Union, FillRule::Positive)
        })
    }
}

/// Offset `paths` by `delta` with one join and end type.
pub fn inflate_paths(
    paths: &[Path64],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    options: &OffsetOptions,
) -> Result<Paths64, ClipError> {
    let mut offsetter = ClipperOffset::with_options(*options);
    offsetter.add_paths(paths, join_type, end_type);
    offsetter.execute(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PathExt, Point64, Rect64};

    fn square() -> Path64 {
        Rect64::new(0, 0, 10, 10).as_path()
    }

    #[test]
    fn enum_codes_round_trip() {
        for code in 0..4 {
            assert_eq!(JoinType::try_from(code).unwrap().code(), code);
        }
        for code in 0..5 {
            assert_eq!(EndType::try_from(code).unwrap().code(), code);
        }
        assert_eq!(JoinType::try_from(4), Err(ClipError::InvalidJoinType(4)));
        assert_eq!(EndType::try_from(5), Err(ClipError::InvalidEndType(5)));
    }

    #[test]
    fn invalid_options_rejected() {
        let mut opts = OffsetOptions::new();
        opts.arc_tolerance = f64::NAN;
        assert!(matches!(
            inflate_paths(&[square()], 1.0, JoinType::Round, EndType::Polygon, &opts),
            Err(ClipError::InvalidOptions(_))
        ));
        let opts = OffsetOptions::new();
        assert!(matches!(
            inflate_paths(&[square()], f64::INFINITY, JoinType::Round, EndType::Polygon, &opts),
            Err(ClipError::InvalidOptions(_))
        ));
    }

    #[test]
    fn small_delta_returns_canonical_copy() {
        let input = vec![
            vec![
                Point64::new(0, 0),
                Point64::new(10, 0),
                Point64::new(10, 0),
                Point64::new(10, 10),
                Point64::new(0, 10),
            ],
            vec![Point64::new(3, 3), Point64::new(4, 4)],
        ];
        let result =
            inflate_paths(&input, 0.0, JoinType::Miter, EndType::Polygon, &OffsetOptions::new())
                .unwrap();
        assert_eq!(result, vec![square()]);
    }

    #[test]
    fn miter_square_inflate() {
        let result = inflate_paths(
            &[square()],
            2.0,
            JoinType::Miter,
            EndType::Polygon,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bounds(), Rect64::new(-2, -2, 12, 12));
        assert_eq!(result[0].area(), 196.0);
    }

    #[test]
    fn deflate_square() {
        let result = inflate_paths(
            &[square()],
            -2.0,
            JoinType::Miter,
            EndType::Polygon,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bounds(), Rect64::new(2, 2, 8, 8));
        assert_eq!(result[0].area(), 36.0);
    }

    #[test]
    fn deflate_past_inradius_vanishes() {
        let result = inflate_paths(
            &[square()],
            -6.0,
            JoinType::Round,
            EndType::Polygon,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn clockwise_group_grows_with_positive_delta() {
        let result = inflate_paths(
            &[square().reversed()],
            2.0,
            JoinType::Miter,
            EndType::Polygon,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area(), 196.0);
    }

    #[test]
    fn butt_line_is_rectangle() {
        let line = vec![Point64::new(0, 0), Point64::new(10, 0)];
        let result = inflate_paths(
            &[line],
            2.0,
            JoinType::Square,
            EndType::Butt,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bounds(), Rect64::new(0, -2, 10, 2));
        assert_eq!(result[0].area(), 40.0);
    }

    #[test]
    fn square_end_extends_line() {
        let line = vec![Point64::new(0, 0), Point64::new(10, 0)];
        let result = inflate_paths(
            &[line],
            2.0,
            JoinType::Square,
            EndType::Square,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bounds(), Rect64::new(-2, -2, 12, 2));
    }

    #[test]
    fn single_point_square_and_circle() {
        let pt = vec![Point64::new(5, 5)];
        let sq = inflate_paths(
            &[pt.clone()],
            2.5,
            JoinType::Square,
            EndType::Polygon,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(sq.len(), 1);
        assert_eq!(sq[0].bounds(), Rect64::new(2, 2, 8, 8));

        let circle = inflate_paths(
            &[pt],
            100.0,
            JoinType::Round,
            EndType::Round,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(circle.len(), 1);
        let area = circle[0].area();
        let true_area = std::f64::consts::PI * 10000.0;
        assert!(area > 0.98 * true_area && area < 1.01 * true_area);
    }

    #[test]
    fn joined_closed_path_has_hole() {
        let result = inflate_paths(
            &[Rect64::new(0, 0, 20, 20).as_path()],
            2.0,
            JoinType::Miter,
            EndType::Joined,
            &OffsetOptions::new(),
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        let mut areas: Vec<f64> = result.iter().map(|p| p.area()).collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas, vec![-256.0, 576.0]);
    }

    #[test]
    fn multiple_groups_merge() {
        let mut offsetter = ClipperOffset::new();
        offsetter
            .add_paths(&[square()], JoinType::Miter, EndType::Polygon)
            .add_paths(
                &[vec![Point64::new(10, 5), Point64::new(20, 5)]],
                JoinType::Square,
                EndType::Butt,
            );
        let result = offsetter.execute(1.0).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bounds(), Rect64::new(-1, -1, 20, 11));
    }
}
