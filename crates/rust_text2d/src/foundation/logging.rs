//! Logging utilities

pub use log::{debug, info, warn, error, trace};

/// Initialize logging with a default level used when `RUST_LOG` is unset
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: log::LevelFilter) {
    if env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init()
        .is_ok()
    {
        log::debug!("Logging initialized at {}", level);
    }
}
