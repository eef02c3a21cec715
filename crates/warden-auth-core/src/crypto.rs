//! Cryptographic utilities for secure operations

use subtle::ConstantTimeEq;

/// Constant-time byte comparison.
///
/// Returns `false` immediately if lengths differ; token length is not secret.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Constant-time string comparison.
#[inline]
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}
