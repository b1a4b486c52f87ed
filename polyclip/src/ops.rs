//! One call convenience functions over [Clipper] with default [BooleanOptions].
use crate::{
    engine::{
        BooleanOptions, BooleanResult, BooleanTreeResult, ClipType, Clipper, FillRule,
    },
    error::ClipError,
    geometry::{Path64, Paths64},
};

/// Run `clip_type` over closed `subjects`, open `open_subjects` and closed `clips`.
///
/// # Examples
///
/// ```
/// # use polyclip::ops::*;
/// # use polyclip::engine::*;
/// # use polyclip::geometry::*;
/// let subject = Rect64::new(0, 0, 10, 10).as_path();
/// let line = vec![Point64::new(-5, 5), Point64::new(15, 5)];
/// let result = boolean_op(ClipType::Intersection, FillRule::NonZero, &[], &[line], &[subject])
///     .unwrap();
/// assert!(result.closed.is_empty());
/// assert_eq!(result.open, vec![vec![Point64::new(0, 5), Point64::new(10, 5)]]);
/// ```
pub fn boolean_op(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    open_subjects: &[Path64],
    clips: &[Path64],
) -> Result<BooleanResult, ClipError> {
    boolean_op_with_options(
        clip_type,
        fill_rule,
        subjects,
        open_subjects,
        clips,
        BooleanOptions::default(),
    )
}

/// [boolean_op] with explicit options.
pub fn boolean_op_with_options(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    open_subjects: &[Path64],
    clips: &[Path64],
    options: BooleanOptions,
) -> Result<BooleanResult, ClipError> {
    Clipper::with_options(options)
        .add_subject(subjects)
        .add_open_subject(open_subjects)
        .add_clip(clips)
        .execute(clip_type, fill_rule)
}

/// Like [boolean_op] but with the closed solution nested into a [crate::engine::PolyTree].
pub fn boolean_op_tree(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    open_subjects: &[Path64],
    clips: &[Path64],
) -> Result<BooleanTreeResult, ClipError> {
    Clipper::new()
        .add_subject(subjects)
        .add_open_subject(open_subjects)
        .add_clip(clips)
        .execute_tree(clip_type, fill_rule)
}

fn closed_only(
    clip_type: ClipType,
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, ClipError> {
    Ok(boolean_op(clip_type, fill_rule, subjects, &[], clips)?.closed)
}

/// Union of closed `subjects` and `clips`.
pub fn union(
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, ClipError> {
    closed_only(ClipType::Union, subjects, clips, fill_rule)
}

/// Intersection of closed `subjects` and `clips`.
pub fn intersect(
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, ClipError> {
    closed_only(ClipType::Intersection, subjects, clips, fill_rule)
}

/// Region of closed `subjects` not covered by `clips`.
pub fn difference(
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, ClipError> {
    closed_only(ClipType::Difference, subjects, clips, fill_rule)
}

/// Region covered by exactly one of closed `subjects` and `clips`.
pub fn xor(
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, ClipError> {
    closed_only(ClipType::Xor, subjects, clips, fill_rule)
}
