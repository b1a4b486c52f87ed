//! Core/common math functions for integer predicates, segment intersects, and f64 vectors.
mod base_math;
mod line_line_intersect;
mod segment_intersect;
mod vector2;

pub use base_math::*;
pub use line_line_intersect::{line_line_intr, line_line_intr_pt, LineLineIntr};
pub use segment_intersect::{
    get_closest_point_on_segment, get_segment_intersect_pt, segments_intersect,
};
pub use vector2::{vec2, Vector2};
