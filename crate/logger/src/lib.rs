pub use log_utils::log_init;

mod log_utils;

/// Filter used when neither `RUST_LOG` nor an explicit default is given.
pub const DEFAULT_LOG_FILTER: &str = "info";
