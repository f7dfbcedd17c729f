//! Test support shared by the workspace crates.
//!
//! Generators for profile text, CDL maps and synthetic grids, fixed
//! fixtures, scratch directories and float assertions. Used only as a
//! dev-dependency.

pub mod fixtures;
pub mod generators;
pub mod scratch;

// Everything is reachable from the crate root
pub use fixtures::*;
pub use generators::*;
pub use scratch::*;

/// Asserts two numbers differ by at most `epsilon`.
///
/// Both sides are compared as `f64`. Two `NaN`s compare equal, so unfilled
/// pressure levels can be checked like any other value; a `NaN` against a
/// number fails.
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(34.5001_f32, 34.5, 1e-3);
/// assert_approx_eq!(f64::NAN, f64::NAN, 0.0);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let both_nan = left.is_nan() && right.is_nan();
        if !both_nan && !((left - right).abs() <= epsilon) {
            panic!(
                "assertion failed: {:?} is not within {:?} of {:?}",
                left, epsilon, right
            );
        }
    }};
}

/// Element-wise [`assert_approx_eq!`] over two slices of equal length.
///
/// ```
/// use test_utils::assert_all_approx_eq;
///
/// assert_all_approx_eq!(&[35.0, f64::NAN], &[35.0001, f64::NAN], 1e-3);
/// ```
#[macro_export]
macro_rules! assert_all_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right) = (&$left, &$right);
        assert_eq!(left.len(), right.len(), "length mismatch");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let (l, r) = (*l as f64, *r as f64);
            if !(l.is_nan() && r.is_nan()) && !((l - r).abs() <= $epsilon as f64) {
                panic!("assertion failed at index {}: {:?} vs {:?}", i, l, r);
            }
        }
    }};
}
