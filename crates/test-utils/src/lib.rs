//! Shared test utilities for the Taoyuan data tools workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional test data (the MOI township shapefile is not
//!   checked in)
//! - Station and feature fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_test_file, fixtures};
//! ```

pub mod fixtures;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_moi_towns() {
///     let path = require_test_file!("TOWN_MOI_1140318.shp");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download test data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(121.3001_f64, 121.3_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  \
                 diff: `{:?}` > epsilon `{:?}`",
                left,
                right,
                diff,
                epsilon
            );
        }
    }};
}

/// Macro for approximate equality of a GeoJSON position against (x, y).
///
/// ```ignore
/// use test_utils::assert_position_eq;
///
/// assert_position_eq!(vec![121.3, 24.99], (121.3, 24.99), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_position_eq {
    ($position:expr, ($x:expr, $y:expr), $epsilon:expr) => {{
        let position = &$position;
        assert_eq!(position.len(), 2, "expected a 2D position, got {:?}", position);
        $crate::assert_approx_eq!(position[0], $x, $epsilon);
        $crate::assert_approx_eq!(position[1], $y, $epsilon);
    }};
}
