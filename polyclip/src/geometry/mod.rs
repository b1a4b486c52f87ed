//! Integer geometry value types: points, rectangles, and paths.
mod path;
mod point;
mod rect;

pub use path::*;
pub use point::*;
pub use rect::*;
