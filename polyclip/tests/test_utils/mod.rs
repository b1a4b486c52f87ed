#![allow(dead_code)]

mod debug;
mod path_test_properties;

pub use debug::*;
pub use path_test_properties::*;

/// Install a test logger, safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
