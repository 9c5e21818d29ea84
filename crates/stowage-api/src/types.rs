// Wire types for the inventory API.
//
// Field names follow the backend's camelCase JSON. `stowage-core`
// converts these into its own domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Package lifecycle status as serialized on the wire.
///
/// The backend uses the display strings, not internal codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    #[serde(rename = "In Storage")]
    InStorage,
    #[serde(rename = "Delivered")]
    Delivered,
}

/// A stored package as returned by `GET /packages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Tracking identifier — scanned QR/barcode text or manual entry.
    pub id: String,
    pub surname: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Assigned by the backend on creation.
    pub arrival_date: DateTime<Utc>,
    pub status: PackageStatus,
}

/// A registered user as returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Opaque backend status string; not interpreted client-side.
    pub status: String,
}

/// Email-notification metadata attached to a package creation.
///
/// Advisory only — passed through untouched; the backend decides
/// whether and what to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotification {
    pub send_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_message: Option<String>,
}

impl Default for EmailNotification {
    fn default() -> Self {
        Self {
            send_notification: false,
            notification_message: None,
        }
    }
}

/// Request body for `POST /packages`.
///
/// Arrival time is never set by the client; status is always
/// [`PackageStatus::InStorage`] for new packages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub id: String,
    pub surname: String,
    pub weight: f64,
    pub status: PackageStatus,
    pub email_notification: EmailNotification,
}

impl NewPackage {
    /// Build a creation request. Status is fixed to `InStorage`.
    pub fn new(id: impl Into<String>, surname: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            surname: surname.into(),
            weight,
            status: PackageStatus::InStorage,
            email_notification: EmailNotification::default(),
        }
    }

    pub fn with_notification(mut self, notification: EmailNotification) -> Self {
        self.email_notification = notification;
        self
    }
}
