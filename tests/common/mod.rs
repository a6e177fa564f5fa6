#![allow(dead_code)]

pub use flowdag_test_utils::{builders, init_tracing};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
