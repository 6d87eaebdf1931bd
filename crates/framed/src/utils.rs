//! Utility macros used internally by the crate.

/// Early-returns with an error if a condition is not met.
///
/// Similar to `assert!`, but returns an error instead of panicking.
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
