//! Fallback combinator for computations that must never fail outwards.
//!
//! The demand model and the forecast ensemble both follow the same rule: try the
//! primary computation, and on failure log the error kind and hand back a
//! documented fallback value.

use core::fmt::Display;

pub trait OrFallback<T> {
    /// Return the success value, or log the error under `context` and
    /// produce the fallback.
    fn or_fallback<F>(self, context: &'static str, fallback: F) -> T
    where
        F: FnOnce() -> T;
}

impl<T, E: Display> OrFallback<T> for Result<T, E> {
    fn or_fallback<F>(self, context: &'static str, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(context, error = %e, "primary computation failed; using fallback");
                fallback()
            }
        }
    }
}
