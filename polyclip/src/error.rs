//! Error and status types returned by the public entry points.
use std::collections::TryReserveError;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable status codes reported across language boundaries.
///
/// `Success` is always `0`, every failure is nonzero.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Status {
    /// Operation completed.
    Success = 0,
    /// An allocation for an intermediate structure or the output failed.
    ResourceExhausted = 1,
    /// Internal state diverged (failed sweep invariant or caught panic).
    InvariantViolation = 2,
    /// Arguments were rejected before any work was done.
    InvalidInput = 3,
}

impl Status {
    /// Integer code of the status.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Phase of an operation in which an invariant failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Building vertex chains and local minima.
    Initialization,
    /// Running the scanline sweep.
    Sweep,
    /// Building output paths and trees.
    Assembly,
    /// Anywhere else (panic caught at the entry point).
    Unknown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Initialization => "initialization",
            Phase::Sweep => "sweep",
            Phase::Assembly => "assembly",
            Phase::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Errors produced by clipping, offsetting, and rectangle clipping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    /// Reserving memory for an intermediate structure or result failed.
    #[error("resource exhausted while allocating {0}")]
    ResourceExhausted(&'static str),

    /// Numerical or topological state diverged during an operation.
    #[error("internal invariant violated during {phase} phase")]
    InvariantViolation {
        /// Phase that detected the failure.
        phase: Phase,
    },

    /// Unknown fill rule code.
    #[error("invalid fill rule code: {0}")]
    InvalidFillRule(u32),

    /// Unknown clip type code.
    #[error("invalid clip type code: {0}")]
    InvalidClipType(u32),

    /// Unknown join type code.
    #[error("invalid join type code: {0}")]
    InvalidJoinType(u32),

    /// Unknown end type code.
    #[error("invalid end type code: {0}")]
    InvalidEndType(u32),

    /// Offset options or delta rejected.
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),

    /// Rectangle is inverted or not axis aligned.
    #[error("invalid rectangle")]
    InvalidRect,

    /// An input coordinate lies outside the supported range.
    #[error("coordinate ({x}, {y}) outside supported range")]
    CoordinateOutOfRange {
        /// X coordinate of the offending point.
        x: i64,
        /// Y coordinate of the offending point.
        y: i64,
    },

    /// A computed coordinate does not fit a 64 bit integer.
    #[error("computed coordinate overflows 64 bit range")]
    CoordinateOverflow,
}

impl ClipError {
    /// Stable status code category for this error.
    pub fn status(&self) -> Status {
        match self {
            ClipError::ResourceExhausted(_) => Status::ResourceExhausted,
            ClipError::InvariantViolation { .. } => Status::InvariantViolation,
            _ => Status::InvalidInput,
        }
    }

    #[inline]
    pub(crate) fn invariant(phase: Phase) -> Self {
        ClipError::InvariantViolation { phase }
    }
}

/// Helper to turn a failed reservation into [ClipError::ResourceExhausted].
pub(crate) trait ReserveExt {
    fn or_exhausted(self, what: &'static str) -> Result<(), ClipError>;
}

impl ReserveExt for Result<(), TryReserveError> {
    #[inline]
    fn or_exhausted(self, what: &'static str) -> Result<(), ClipError> {
        self.map_err(|_| ClipError::ResourceExhausted(what))
    }
}

/// Runs `f`, translating any panic into [ClipError::InvariantViolation] so nothing unwinds past a
/// public entry point.
pub(crate) fn guarded<T, F>(f: F) -> Result<T, ClipError>
where
    F: FnOnce() -> Result<T, ClipError>,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(_) => {
            log::error!("panic caught at public entry point");
            Err(ClipError::invariant(Phase::Unknown))
        }
    }
}
