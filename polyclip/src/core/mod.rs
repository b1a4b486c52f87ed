//! Core module has common/shared math and traits.

pub mod math;
pub mod traits;
