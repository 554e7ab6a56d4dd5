#![allow(dead_code)]

#[allow(unused_imports)]
pub use filetail_test_utils::{init_tracing, with_timeout, TempLog};
