use std::{cell::RefCell, ffi::CString};

/// Holds last error information data.
pub struct LastErrorData {
    /// Human readable error message.
    pub error_msg: CString,
    /// Status code returned alongside the message.
    pub code: i32,
}

impl LastErrorData {
    pub fn new(error_msg: CString, code: i32) -> Self {
        LastErrorData { error_msg, code }
    }
}

// Storage for last error set
thread_local!(pub static LAST_ERROR: RefCell<Option<LastErrorData>> = const { RefCell::new(None) });

/// Set last error information and return `code`.
///
/// Interior nul bytes in `error_msg` are dropped.
pub fn set_last_error<T: Into<Vec<u8>>>(code: i32, error_msg: T) -> i32 {
    let mut bytes: Vec<u8> = error_msg.into();
    bytes.retain(|&b| b != 0);
    let msg = CString::new(bytes).unwrap_or_default();
    log::debug!("ffi call failed with code {}: {:?}", code, msg);

    LAST_ERROR.with(|last_result| {
        *last_result.borrow_mut() = Some(LastErrorData::new(msg, code));
    });
    code
}

/// Forget the last error of the calling thread.
pub fn clear_last_error() {
    LAST_ERROR.with(|last_result| {
        *last_result.borrow_mut() = None;
    });
}
