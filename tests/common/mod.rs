//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::path::{Path, PathBuf};

/// Start of every generated recording
pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 8, 9)
        .unwrap()
        .and_hms_opt(21, 0, 0)
        .unwrap()
}

/// `secs` seconds after [`base_time`]
pub fn seconds(secs: i64) -> NaiveDateTime {
    base_time() + TimeDelta::seconds(secs)
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write test file");
    path
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
