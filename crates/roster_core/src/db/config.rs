//! Connection settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection-level options applied right after opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Turns on `PRAGMA foreign_keys`. Off by default: deleting a parent
    /// row leaves child references dangling instead of failing.
    pub enforce_foreign_keys: bool,
    /// How long a statement waits on a locked database file.
    pub busy_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: false,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DbConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::DbConfig;
    use std::time::Duration;

    #[test]
    fn defaults_leave_foreign_keys_off() {
        let config = DbConfig::default();
        assert!(!config.enforce_foreign_keys);
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }
}
