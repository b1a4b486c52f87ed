//! Core/common traits for use in polyclip.
mod fuzzy_eq;

pub use fuzzy_eq::FuzzyEq;
