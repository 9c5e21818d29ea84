// stowage-api: Async Rust client for the Stowage inventory REST API

pub mod client;
pub mod error;
pub mod types;

pub use client::InventoryClient;
pub use error::Error;
pub use types::{EmailNotification, NewPackage, PackageRecord, PackageStatus, UserRecord};
