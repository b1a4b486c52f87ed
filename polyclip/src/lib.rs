//! Integer 2D polygon clipping, offsetting, and rectangle clipping.
//!
//! Paths are sequences of [geometry::Point64] on the 64 bit integer lattice. Outer paths have
//! positive signed area (counter clockwise with y pointing up) and holes negative.
//!
//! - [engine]: scanline sweep computing intersection, union, difference, and xor under the
//!   [engine::FillRule]s, with optional [engine::PolyTree] output.
//! - [offset]: inflating and deflating closed and open paths.
//! - [rect_clip]: fast clipping against an axis aligned rectangle.
//! - [minkowski]: Minkowski sum and difference.
//! - [ops]: one call wrappers.
//!
//! # Examples
//!
//! ```
//! use polyclip::*;
//! let a = path64![(0, 0), (10, 0), (10, 10), (0, 10)];
//! let b = path64![(5, 5), (15, 5), (15, 15), (5, 15)];
//! let result = union(&[a], &[b], FillRule::NonZero).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].area(), 175.0);
//! ```

#[macro_use]
mod macros;

pub mod core;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod minkowski;
pub mod offset;
pub mod ops;
pub mod rect_clip;

pub use static_aabb2d_index;

pub use crate::engine::{
    BooleanOptions, BooleanResult, BooleanTreeResult, ClipType, Clipper, FillRule, PolyPath,
    PolyTree,
};
pub use crate::error::{ClipError, Phase, Status};
pub use crate::geometry::{Path64, PathExt, Paths64, Point64, PointInPolygonResult, Rect64};
pub use crate::minkowski::{minkowski_diff, minkowski_sum};
pub use crate::offset::{inflate_paths, ClipperOffset, EndType, JoinType, OffsetOptions};
pub use crate::ops::{
    boolean_op, boolean_op_tree, boolean_op_with_options, difference, intersect, union, xor,
};
pub use crate::rect_clip::{rect_clip, rect_clip_lines, RectClipper};
