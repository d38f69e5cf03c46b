//! Conditional logging for development builds.
//!
//! The `log!` macro provides informational logging that is compiled out
//! in production (release) builds by default. Errors and warnings should
//! continue using `log::warn!` and `log::error!` directly.
//!
//! Logging is enabled when either:
//! - Building in debug mode (`cfg(debug_assertions)`)
//! - The `console_logging` feature is explicitly enabled

/// Conditionally log through the `log` facade in development builds
///
/// This macro expands to `log::debug!()` in debug builds or when the
/// `console_logging` feature is enabled. In production release builds,
/// it compiles to nothing (zero overhead).
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            ::log::debug!($($arg),+);
        }
    };
}
