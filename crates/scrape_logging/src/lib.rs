#![deny(missing_docs)]
//! Shared logging utilities for the scrape workspace.
//!
//! This crate provides the `scrape_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Callers do not need
//! their own `log` dependency; the facade is re-exported.
//!
//! Every macro accepts an optional `req = <id>;` prefix that tags the line
//! with the scrape request it belongs to:
//!
//! ```
//! scrape_logging::scrape_info!(req = 7; "phase 1 done in {}ms", 12);
//! scrape_logging::scrape_info!("no request context");
//! ```

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_trace {
    (req = $id:expr; $($arg:tt)+) => {{
        $crate::log::trace!("[req {}] {}", $id, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::log::trace!($($arg)+);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_debug {
    (req = $id:expr; $($arg:tt)+) => {{
        $crate::log::debug!("[req {}] {}", $id, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::log::debug!($($arg)+);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_info {
    (req = $id:expr; $($arg:tt)+) => {{
        $crate::log::info!("[req {}] {}", $id, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::log::info!($($arg)+);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_warn {
    (req = $id:expr; $($arg:tt)+) => {{
        $crate::log::warn!("[req {}] {}", $id, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::log::warn!($($arg)+);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_error {
    (req = $id:expr; $($arg:tt)+) => {{
        $crate::log::error!("[req {}] {}", $id, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::log::error!($($arg)+);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so
/// every test may call it.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
