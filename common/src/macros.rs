//! Logging macros shared by every crate in the workspace.
//!
//! These wrap `tracing` events so that library crates never talk to a
//! subscriber directly. The CLI installs a formatter that renders each
//! level with its own symbol; `success!` is an info-level event on a
//! dedicated target so it can be styled apart from plain `info!`.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "egressr::ok", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
