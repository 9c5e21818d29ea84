// Wire ⇄ domain conversions.

use crate::model::{Package, PackageStatus, User};

impl From<stowage_api::PackageStatus> for PackageStatus {
    fn from(status: stowage_api::PackageStatus) -> Self {
        match status {
            stowage_api::PackageStatus::InStorage => Self::InStorage,
            stowage_api::PackageStatus::Delivered => Self::Delivered,
        }
    }
}

impl From<PackageStatus> for stowage_api::PackageStatus {
    fn from(status: PackageStatus) -> Self {
        match status {
            PackageStatus::InStorage => Self::InStorage,
            PackageStatus::Delivered => Self::Delivered,
        }
    }
}

impl From<stowage_api::PackageRecord> for Package {
    fn from(record: stowage_api::PackageRecord) -> Self {
        Self {
            id: record.id,
            surname: record.surname,
            weight_kg: record.weight,
            arrival: record.arrival_date,
            status: record.status.into(),
        }
    }
}

impl From<stowage_api::UserRecord> for User {
    fn from(record: stowage_api::UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            status: record.status,
        }
    }
}
