//! Environment variable parsing utilities.
//!
//! Configuration across the workspace is read through these helpers instead of
//! repeating `std::env::var(..).ok().and_then(..)` chains at every call site.
//!
//! # Example
//!
//! ```
//! use sui_kiosk_types::env_utils::{env_var, env_var_or};
//!
//! let max_pages: usize = env_var_or("KIOSK_MAX_PAGES", 1000);
//! let concurrency: Option<usize> = env_var("KIOSK_CONCURRENCY");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}
