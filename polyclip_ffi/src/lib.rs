//! This module contains the C foreign function interface for polyclip.
//!
//! Paths cross the boundary in the flat `i64` wire layout of [wire]. Every function returns an
//! `i32` status:
//! * 0 = success.
//! * 1 = a required pointer argument is null.
//! * 2 = an enum code is not recognized.
//! * 3 = an input wire buffer is malformed.
//! * 10 + [polyclip::Status] = the operation itself failed (11 resource exhausted, 12 invariant
//!   violation or caught panic, 13 invalid input such as an inverted rect).
//!
//! On failure a message is kept for the calling thread, see [polyclip_last_error_msg].
#![allow(non_camel_case_types)]
mod error_handling;
pub mod wire;

use error_handling::{clear_last_error, set_last_error, LAST_ERROR};
use polyclip::{
    BooleanOptions, ClipError, ClipType, Clipper, ClipperOffset, EndType, FillRule, JoinType,
    OffsetOptions, Path64, Paths64, Rect64, Status,
};
use std::{ffi::c_char, panic, ptr, slice};
use wire::{decode_paths, encode_paths};

const NULL_ARGUMENT: i32 = 1;
const BAD_ENUM: i32 = 2;
const MALFORMED_WIRE: i32 = 3;
const KERNEL_BASE: i32 = 10;

/// Helper macro to catch unwind and report an invariant violation if a panic was caught
/// otherwise returns whatever the expression returned.
macro_rules! ffi_catch_unwind {
    ($body: expr) => {
        match panic::catch_unwind(move || $body) {
            Ok(r) => r,
            Err(_) => set_last_error(
                KERNEL_BASE + Status::InvariantViolation.code(),
                "panic caught at the ffi boundary",
            ),
        }
    };
}

/// Status code for a kernel error, also recording its message.
fn report(err: ClipError) -> i32 {
    let code = match err {
        ClipError::InvalidFillRule(_)
        | ClipError::InvalidClipType(_)
        | ClipError::InvalidJoinType(_)
        | ClipError::InvalidEndType(_) => BAD_ENUM,
        _ => KERNEL_BASE + err.status().code(),
    };
    set_last_error(code, err.to_string())
}

/// Read a wire buffer, null reads as no paths.
///
/// # Safety
///
/// `buf` must be null or point to a wire buffer whose first element holds its total length.
unsafe fn read_paths(buf: *const i64) -> Result<Paths64, i32> {
    if buf.is_null() {
        return Ok(Paths64::new());
    }
    let total_len = *buf;
    if total_len < 2 {
        return Err(set_last_error(
            MALFORMED_WIRE,
            format!("wire buffer length {} is below the header size", total_len),
        ));
    }
    let data = slice::from_raw_parts(buf, total_len as usize);
    decode_paths(data).map_err(|err| set_last_error(MALFORMED_WIRE, err.to_string()))
}

/// Encode `paths` and hand ownership of the buffer to the caller through `out`.
///
/// # Safety
///
/// `out` must be non null and point to a valid place in memory to be written.
unsafe fn write_paths(out: *mut *mut i64, paths: &[Path64]) -> i32 {
    match encode_paths(paths) {
        Ok(buf) => {
            out.write(Box::into_raw(buf) as *mut i64);
            0
        }
        Err(err) => set_last_error(
            KERNEL_BASE + Status::ResourceExhausted.code(),
            err.to_string(),
        ),
    }
}

/// FFI representation of [BooleanOptions].
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct polyclip_boolean_o {
    pub preserve_collinear: u8,
    pub reverse_solution: u8,
}

impl polyclip_boolean_o {
    /// Convert FFI boolean options type to internal type.
    pub fn to_internal(&self) -> BooleanOptions {
        BooleanOptions {
            preserve_collinear: self.preserve_collinear != 0,
            reverse_solution: self.reverse_solution != 0,
        }
    }
}

impl Default for polyclip_boolean_o {
    fn default() -> Self {
        let d = BooleanOptions::default();
        Self {
            preserve_collinear: d.preserve_collinear as u8,
            reverse_solution: d.reverse_solution as u8,
        }
    }
}

/// Write default option values to a [polyclip_boolean_o].
///
/// ## Specific Error Codes
/// * 1 = `options` is null.
///
/// # Safety
///
/// `options` must point to a valid place in memory to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_boolean_o_init(options: *mut polyclip_boolean_o) -> i32 {
    ffi_catch_unwind!({
        if options.is_null() {
            return NULL_ARGUMENT;
        }

        options.write(Default::default());
        0
    })
}

/// FFI representation of [OffsetOptions].
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct polyclip_offset_o {
    pub miter_limit: f64,
    pub arc_tolerance: f64,
    pub preserve_collinear: u8,
    pub reverse_solution: u8,
}

impl polyclip_offset_o {
    /// Convert FFI offset options type to internal type.
    pub fn to_internal(&self) -> OffsetOptions {
        OffsetOptions {
            miter_limit: self.miter_limit,
            arc_tolerance: self.arc_tolerance,
            preserve_collinear: self.preserve_collinear != 0,
            reverse_solution: self.reverse_solution != 0,
        }
    }
}

impl Default for polyclip_offset_o {
    fn default() -> Self {
        let d = OffsetOptions::default();
        Self {
            miter_limit: d.miter_limit,
            arc_tolerance: d.arc_tolerance,
            preserve_collinear: d.preserve_collinear as u8,
            reverse_solution: d.reverse_solution as u8,
        }
    }
}

/// Write default option values to a [polyclip_offset_o].
///
/// ## Specific Error Codes
/// * 1 = `options` is null.
///
/// # Safety
///
/// `options` must point to a valid place in memory to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_offset_o_init(options: *mut polyclip_offset_o) -> i32 {
    ffi_catch_unwind!({
        if options.is_null() {
            return NULL_ARGUMENT;
        }

        options.write(Default::default());
        0
    })
}

/// Axis aligned rectangle, `top` is the minimum y.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct polyclip_rect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl polyclip_rect {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        polyclip_rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn to_internal(&self) -> Rect64 {
        Rect64::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Run a boolean operation.
///
/// `clip_type` is the [ClipType] code (0 = intersection, 1 = union, 2 = difference, 3 = xor).
/// `fill_rule` is the [FillRule] code (0 = even odd, 1 = non zero, 2 = positive, 3 = negative).
/// `subjects`, `subjects_open`, and `clips` are wire buffers (may be null for no paths).
/// `options` may be null to use default options.
/// `closed_result` and `open_result` are out parameters receiving wire buffers that must be freed
/// with [polyclip_paths_f].
///
/// ## Specific Error Codes
/// * 1 = `closed_result` or `open_result` is null.
/// * 2 = `clip_type` or `fill_rule` is not a recognized code.
/// * 3 = an input buffer is malformed.
///
/// # Safety
///
/// Input buffers must be null or valid wire buffers. `options` must be null or point to a valid
/// [polyclip_boolean_o]. `closed_result` and `open_result` must point to valid places in memory
/// to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_boolean(
    clip_type: u32,
    fill_rule: u32,
    subjects: *const i64,
    subjects_open: *const i64,
    clips: *const i64,
    options: *const polyclip_boolean_o,
    closed_result: *mut *mut i64,
    open_result: *mut *mut i64,
) -> i32 {
    ffi_catch_unwind!({
        clear_last_error();
        if closed_result.is_null() || open_result.is_null() {
            return NULL_ARGUMENT;
        }
        let clip_type = match ClipType::try_from(clip_type) {
            Ok(c) => c,
            Err(err) => return report(err),
        };
        let fill_rule = match FillRule::try_from(fill_rule) {
            Ok(f) => f,
            Err(err) => return report(err),
        };
        let options = options
            .as_ref()
            .map(|o| o.to_internal())
            .unwrap_or_default();

        let inputs = (
            read_paths(subjects),
            read_paths(subjects_open),
            read_paths(clips),
        );
        let (subjects, subjects_open, clips) = match inputs {
            (Ok(s), Ok(o), Ok(c)) => (s, o, c),
            (Err(code), _, _) | (_, Err(code), _) | (_, _, Err(code)) => return code,
        };

        let result = Clipper::with_options(options)
            .add_subject(&subjects)
            .add_open_subject(&subjects_open)
            .add_clip(&clips)
            .execute(clip_type, fill_rule);
        let result = match result {
            Ok(r) => r,
            Err(err) => return report(err),
        };

        let err = write_paths(closed_result, &result.closed);
        if err != 0 {
            return err;
        }
        let err = write_paths(open_result, &result.open);
        if err != 0 {
            polyclip_paths_f(closed_result.read());
            closed_result.write(ptr::null_mut());
            return err;
        }
        0
    })
}

/// Offset paths.
///
/// `paths` is a wire buffer (may be null for no paths).
/// `join_type` is the [JoinType] code (0 = square, 1 = bevel, 2 = round, 3 = miter).
/// `end_type` is the [EndType] code (0 = polygon, 1 = joined, 2 = butt, 3 = square, 4 = round).
/// `options` may be null to use default options.
/// `result` is an out parameter receiving a wire buffer that must be freed with
/// [polyclip_paths_f].
///
/// ## Specific Error Codes
/// * 1 = `result` is null.
/// * 2 = `join_type` or `end_type` is not a recognized code.
/// * 3 = `paths` is malformed.
///
/// # Safety
///
/// `paths` must be null or a valid wire buffer. `options` must be null or point to a valid
/// [polyclip_offset_o]. `result` must point to a valid place in memory to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_offset(
    paths: *const i64,
    delta: f64,
    join_type: u32,
    end_type: u32,
    options: *const polyclip_offset_o,
    result: *mut *mut i64,
) -> i32 {
    ffi_catch_unwind!({
        clear_last_error();
        if result.is_null() {
            return NULL_ARGUMENT;
        }
        let join_type = match JoinType::try_from(join_type) {
            Ok(j) => j,
            Err(err) => return report(err),
        };
        let end_type = match EndType::try_from(end_type) {
            Ok(e) => e,
            Err(err) => return report(err),
        };
        let options = options
            .as_ref()
            .map(|o| o.to_internal())
            .unwrap_or_default();
        let paths = match read_paths(paths) {
            Ok(p) => p,
            Err(code) => return code,
        };

        let mut offsetter = ClipperOffset::with_options(options);
        offsetter.add_paths(&paths, join_type, end_type);
        match offsetter.execute(delta) {
            Ok(r) => write_paths(result, &r),
            Err(err) => report(err),
        }
    })
}

/// Clip closed paths to a rectangle.
///
/// `paths` is a wire buffer (may be null for no paths).
/// `result` is an out parameter receiving a wire buffer that must be freed with
/// [polyclip_paths_f].
///
/// ## Specific Error Codes
/// * 1 = `result` is null.
/// * 3 = `paths` is malformed.
/// * 13 = `rect` is inverted.
///
/// # Safety
///
/// `paths` must be null or a valid wire buffer. `result` must point to a valid place in memory
/// to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_rect_clip(
    rect: polyclip_rect,
    paths: *const i64,
    result: *mut *mut i64,
) -> i32 {
    ffi_catch_unwind!({
        clear_last_error();
        if result.is_null() {
            return NULL_ARGUMENT;
        }
        let paths = match read_paths(paths) {
            Ok(p) => p,
            Err(code) => return code,
        };
        match polyclip::rect_clip(rect.to_internal(), &paths) {
            Ok(r) => write_paths(result, &r),
            Err(err) => report(err),
        }
    })
}

/// Clip open paths to a rectangle, splitting them where they leave it.
///
/// Arguments and error codes are the same as for [polyclip_rect_clip].
///
/// # Safety
///
/// `paths` must be null or a valid wire buffer. `result` must point to a valid place in memory
/// to be written.
#[no_mangle]
#[must_use]
pub unsafe extern "C" fn polyclip_rect_clip_lines(
    rect: polyclip_rect,
    paths: *const i64,
    result: *mut *mut i64,
) -> i32 {
    ffi_catch_unwind!({
        clear_last_error();
        if result.is_null() {
            return NULL_ARGUMENT;
        }
        let paths = match read_paths(paths) {
            Ok(p) => p,
            Err(code) => return code,
        };
        match polyclip::rect_clip_lines(rect.to_internal(), &paths) {
            Ok(r) => write_paths(result, &r),
            Err(err) => report(err),
        }
    })
}

/// Free a wire buffer returned by this library.
///
/// Nothing happens if `paths` is null.
///
/// # Safety
///
/// `paths` must be null or a buffer returned through a result parameter of this library that has
/// not already been freed.
#[no_mangle]
pub unsafe extern "C" fn polyclip_paths_f(paths: *mut i64) {
    if !paths.is_null() {
        let len = *paths as usize;
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(paths, len)))
    }
}

/// Message of the last failed call on the calling thread, null if the last call succeeded.
///
/// The returned string is owned by the library and stays valid until the next call on the same
/// thread.
#[no_mangle]
pub extern "C" fn polyclip_last_error_msg() -> *const c_char {
    LAST_ERROR.with(|last| {
        last.borrow()
            .as_ref()
            .map_or(ptr::null(), |e| e.error_msg.as_ptr())
    })
}

/// Status code of the last failed call on the calling thread, 0 if the last call succeeded.
#[no_mangle]
pub extern "C" fn polyclip_last_error_code() -> i32 {
    LAST_ERROR.with(|last| last.borrow().as_ref().map_or(0, |e| e.code))
}
