//! Scanline (Vatti) boolean engine over closed paths and open polylines.
mod internal;
mod poly_tree;

pub use poly_tree::{PolyPath, PolyTree};

use crate::{
    error::{guarded, ClipError},
    geometry::{Path64, Paths64},
};
use internal::SweepEngine;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Predicate classifying a winding number as inside or outside.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FillRule {
    /// Odd winding numbers are inside.
    EvenOdd,
    /// Nonzero winding numbers are inside.
    #[default]
    NonZero,
    /// Positive winding numbers are inside.
    Positive,
    /// Negative winding numbers are inside.
    Negative,
}

impl FillRule {
    /// Returns true if `winding_number` is classified as inside.
    #[inline]
    pub fn is_inside(self, winding_number: i32) -> bool {
        match self {
            FillRule::EvenOdd => winding_number % 2 != 0,
            FillRule::NonZero => winding_number != 0,
            FillRule::Positive => winding_number > 0,
            FillRule::Negative => winding_number < 0,
        }
    }

    /// Stable integer code (`EvenOdd = 0, NonZero = 1, Positive = 2, Negative = 3`).
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            FillRule::EvenOdd => 0,
            FillRule::NonZero => 1,
            FillRule::Positive => 2,
            FillRule::Negative => 3,
        }
    }
}

impl TryFrom<u32> for FillRule {
    type Error = ClipError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FillRule::EvenOdd),
            1 => Ok(FillRule::NonZero),
            2 => Ok(FillRule::Positive),
            3 => Ok(FillRule::Negative),
            _ => Err(ClipError::InvalidFillRule(code)),
        }
    }
}

/// Boolean operation to perform between subject and clip regions.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClipType {
    /// Region inside both subject and clip.
    Intersection,
    /// Region inside subject or clip.
    Union,
    /// Region inside subject but not clip.
    Difference,
    /// Region inside exactly one of subject and clip.
    Xor,
}

impl ClipType {
    /// Stable integer code (`Intersection = 0, Union = 1, Difference = 2, Xor = 3`).
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            ClipType::Intersection => 0,
            ClipType::Union => 1,
            ClipType::Difference => 2,
            ClipType::Xor => 3,
        }
    }
}

impl TryFrom<u32> for ClipType {
    type Error = ClipError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ClipType::Intersection),
            1 => Ok(ClipType::Union),
            2 => Ok(ClipType::Difference),
            3 => Ok(ClipType::Xor),
            _ => Err(ClipError::InvalidClipType(code)),
        }
    }
}

/// Which operand a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PathType {
    Subject,
    Clip,
}

/// Options controlling output of the boolean engine.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanOptions {
    /// Keep collinear vertices in closed output (180 degree spikes and duplicates are always
    /// removed).
    pub preserve_collinear: bool,
    /// Flip output orientation so outer paths have negative area.
    pub reverse_solution: bool,
}

impl BooleanOptions {
    pub fn new() -> Self {
        Self {
            preserve_collinear: true,
            reverse_solution: false,
        }
    }
}

impl Default for BooleanOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a boolean operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanResult {
    /// Closed solution paths, outer paths positive (unless reversed) and holes negative.
    pub closed: Paths64,
    /// Retained pieces of open subject polylines.
    pub open: Paths64,
}

impl BooleanResult {
    #[inline]
    pub fn new(closed: Paths64, open: Paths64) -> Self {
        Self { closed, open }
    }
}

/// Result of a boolean operation with closed output nested into a tree.
#[derive(Debug, Clone, Default)]
pub struct BooleanTreeResult {
    /// Closed solution paths nested by containment.
    pub tree: PolyTree,
    /// Retained pieces of open subject polylines.
    pub open: Paths64,
}

/// Boolean operation builder, collects subject, open subject, and clip paths.
///
/// # Examples
///
/// ```
/// # use polyclip::engine::*;
/// # use polyclip::geometry::*;
/// let mut clipper = Clipper::new();
/// clipper
///     .add_subject(&[Rect64::new(0, 0, 10, 10).as_path()])
///     .add_clip(&[Rect64::new(5, 5, 15, 15).as_path()]);
/// let result = clipper.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
/// assert_eq!(result.closed.len(), 1);
/// assert_eq!(result.closed[0].area(), 25.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Clipper {
    subjects: Paths64,
    open_subjects: Paths64,
    clips: Paths64,
    options: BooleanOptions,
}

impl Clipper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BooleanOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Add closed subject paths.
    pub fn add_subject(&mut self, paths: &[Path64]) -> &mut Self {
        self.subjects.extend_from_slice(paths);
        self
    }

    /// Add open subject polylines.
    pub fn add_open_subject(&mut self, paths: &[Path64]) -> &mut Self {
        self.open_subjects.extend_from_slice(paths);
        self
    }

    /// Add closed clip paths.
    pub fn add_clip(&mut self, paths: &[Path64]) -> &mut Self {
        self.clips.extend_from_slice(paths);
        self
    }

    pub fn preserve_collinear(&mut self, value: bool) -> &mut Self {
        self.options.preserve_collinear = value;
        self
    }

    pub fn reverse_solution(&mut self, value: bool) -> &mut Self {
        self.options.reverse_solution = value;
        self
    }

    pub fn options(&self) -> BooleanOptions {
        self.options
    }

    /// Remove all added paths (options are kept).
    pub fn clear(&mut self) {
        self.subjects.clear();
        self.open_subjects.clear();
        self.clips.clear();
    }

    fn check_coordinates(&self) -> Result<(), ClipError> {
        let all = self
            .subjects
            .iter()
            .chain(self.open_subjects.iter())
            .chain(self.clips.iter())
            .flatten();
        for pt in all {
            if !pt.in_range() {
                return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y });
            }
        }
        Ok(())
    }

    fn run(&self, clip_type: ClipType, fill_rule: FillRule) -> Result<BooleanResult, ClipError> {
        self.check_coordinates()?;
        let mut engine = SweepEngine::new(clip_type, fill_rule, self.options);
        engine.add_paths(&self.subjects, PathType::Subject, false)?;
        engine.add_paths(&self.open_subjects, PathType::Subject, true)?;
        engine.add_paths(&self.clips, PathType::Clip, false)?;
        engine.execute()
    }

    /// Run the operation and return closed and open solution paths.
    pub fn execute(
        &self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<BooleanResult, ClipError> {
        guarded(|| self.run(clip_type, fill_rule))
    }

    /// Run the operation and nest the closed solution into a [PolyTree].
    pub fn execute_tree(
        &self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<BooleanTreeResult, ClipError> {
        guarded(|| {
            let BooleanResult { closed, open } = self.run(clip_type, fill_rule)?;
            let tree = PolyTree::from_paths(closed)?;
            Ok(BooleanTreeResult { tree, open })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_codes_round_trip() {
        for code in 0..4 {
            assert_eq!(FillRule::try_from(code).unwrap().code(), code);
            assert_eq!(ClipType::try_from(code).unwrap().code(), code);
        }
        assert_eq!(FillRule::try_from(4), Err(ClipError::InvalidFillRule(4)));
        assert_eq!(ClipType::try_from(9), Err(ClipError::InvalidClipType(9)));
    }

    #[test]
    fn fill_rule_classification() {
        assert!(FillRule::EvenOdd.is_inside(-3));
        assert!(!FillRule::EvenOdd.is_inside(2));
        assert!(FillRule::NonZero.is_inside(-2));
        assert!(!FillRule::Positive.is_inside(-1));
        assert!(FillRule::Negative.is_inside(-1));
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let mut c = Clipper::new();
        c.add_subject(&[vec![
            crate::geometry::Point64::new(i64::MAX, 0),
            crate::geometry::Point64::new(0, 5),
            crate::geometry::Point64::new(0, 0),
        ]]);
        assert_eq!(
            c.execute(ClipType::Union, FillRule::NonZero),
            Err(ClipError::CoordinateOutOfRange { x: i64::MAX, y: 0 })
        );
    }
}
