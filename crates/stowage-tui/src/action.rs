//! All possible UI actions. Actions are the sole mechanism for state
//! mutation.

use std::sync::Arc;

use stowage_core::{LoadState, Package, PackageInput, ScannerState, User};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient status-line notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Session ────────────────────────────────────────────────────
    LoginAdmin,
    /// Log in as an end user viewing packages for the given surname.
    LoginUser(String),
    Logout,

    // ── Data events (from the stowage-core store) ──────────────────
    PackagesUpdated(Arc<Vec<Arc<Package>>>),
    UsersUpdated(Arc<Vec<Arc<User>>>),
    LoadStateChanged(LoadState),

    // ── Inventory commands ─────────────────────────────────────────
    Refresh,
    SubmitPackage(PackageInput),
    /// A submission completed; the form resets.
    PackageSubmitted,
    /// A submission was rejected; the form keeps its values.
    SubmitFailed(String),
    RegisterUser { name: String, email: String },
    /// Registration completed; the modal closes.
    UserRegistered(String),
    /// Registration was rejected; the modal stays open.
    RegisterFailed(String),
    MarkDelivered(String),

    // ── Scanner ────────────────────────────────────────────────────
    StartScan,
    StopScan,
    ScanStateChanged(ScannerState),
    ScanDecoded(String),
    ScanFailed(String),

    // ── Help / notifications ───────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
}
