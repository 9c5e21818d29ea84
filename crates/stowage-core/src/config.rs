// Runtime configuration consumed by the controllers.
//
// File/env loading and merging live in `stowage-config`; these are the
// resolved values the core actually runs with.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::CoreError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5234/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the inventory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    pub base_url: Url,
    /// Per-request timeout, applied to every HTTP call.
    pub timeout: Duration,
}

impl Default for InventoryConfig {
    // The parse of the literal cannot fail at runtime.
    #[allow(clippy::unwrap_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl InventoryConfig {
    pub fn with_base_url(raw: &str) -> Result<Self, CoreError> {
        let base_url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid base URL {raw:?}: {e}"),
        })?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }
}

/// Scanner wiring: which device node to read and how long to wait for
/// the decode stream to settle before reporting a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Device path of the line-mode scanner (e.g. `/dev/hidraw0` or a
    /// serial port). `None` disables scanning entirely.
    pub device: Option<PathBuf>,
    pub settle: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            device: None,
            settle: Self::DEFAULT_SETTLE,
        }
    }
}

impl ScannerConfig {
    pub const DEFAULT_SETTLE: Duration = Duration::from_millis(300);

    pub fn for_device(device: impl Into<PathBuf>) -> Self {
        Self {
            device: Some(device.into()),
            settle: Self::DEFAULT_SETTLE,
        }
    }
}
