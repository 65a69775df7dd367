//! Shared utilities for the conv2d workspace.

pub mod log_setup;
pub mod parallel;
pub mod test_utils;
