// ── Domain model ──
//
// Owned representations used by the store and controllers. Wire types
// live in `stowage-api`; conversions in `crate::convert`.

use chrono::{DateTime, Utc};
use strum::Display;

/// Lifecycle of a package in the storage facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PackageStatus {
    #[strum(to_string = "In Storage")]
    InStorage,
    #[strum(to_string = "Delivered")]
    Delivered,
}

impl PackageStatus {
    pub fn is_in_storage(self) -> bool {
        matches!(self, Self::InStorage)
    }
}

/// A tracked package.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Tracking identifier (scanned code or manual entry). Primary key.
    pub id: String,
    /// Recipient surname as entered at intake.
    pub surname: String,
    pub weight_kg: f64,
    pub arrival: DateTime<Utc>,
    pub status: PackageStatus,
}

/// A registered recipient account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Surname; matched against package surnames at intake.
    pub name: String,
    pub email: String,
    /// Backend-owned status string, shown but never interpreted.
    pub status: String,
}

/// Session role selected at login. Controls which screen the UI shows
/// and which operations are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Role {
    #[default]
    #[strum(to_string = "Guest")]
    Guest,
    #[strum(to_string = "Administrator")]
    Admin,
    #[strum(to_string = "User")]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_displays_wire_strings() {
        assert_eq!(PackageStatus::InStorage.to_string(), "In Storage");
        assert_eq!(PackageStatus::Delivered.to_string(), "Delivered");
    }

    #[test]
    fn default_role_is_guest() {
        assert_eq!(Role::default(), Role::Guest);
    }
}
