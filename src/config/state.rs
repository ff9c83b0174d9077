// Application state
// Shared, read-only runtime state derived from configuration

use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Shared application state
///
/// The configuration is fixed at startup. The access-log flag is duplicated
/// into an atomic so the per-request hot path never takes a lock.
pub struct AppState {
    pub config: Config,
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            cached_access_log,
        }
    }
}
