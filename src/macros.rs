//! Small crate-wide convenience macros.

/// `console.log` with `format!` arguments.  Only emitted in debug builds so
/// release bundles stay quiet.
///
/// ```rust,ignore
/// debug_log!("mounted overlay {}", id);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    };
}

/// `console.warn` with `format!` arguments.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        web_sys::console::warn_1(&format!($($arg)*).into())
    };
}

/// `console.error` with `format!` arguments.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        web_sys::console::error_1(&format!($($arg)*).into())
    };
}
