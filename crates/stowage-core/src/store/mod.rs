// ── Reactive store ──
//
// In-memory source of truth for the UI. The `Inventory` controller
// writes refreshed listings in; screens subscribe via `EntityStream`.

mod collection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Package, User};
use crate::stream::EntityStream;
use collection::Collection;

pub struct Store {
    packages: Collection<Package>,
    users: Collection<User>,

    /// When the last successful full refresh completed.
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            packages: Collection::new(),
            users: Collection::new(),
            last_refresh,
        }
    }

    // ── Writes (controller side) ─────────────────────────────────────

    /// Replace the package collection with a fresh backend listing.
    pub fn replace_packages(&self, listing: Vec<Package>) {
        self.packages
            .replace_all(listing.into_iter().map(|p| (p.id.clone(), p)));
    }

    /// Replace the user collection with a fresh backend listing.
    pub fn replace_users(&self, listing: Vec<User>) {
        self.users
            .replace_all(listing.into_iter().map(|u| (u.id.to_string(), u)));
    }

    pub fn upsert_package(&self, package: Package) {
        self.packages.upsert(package.id.clone(), package);
    }

    pub fn mark_refreshed(&self, at: DateTime<Utc>) {
        self.last_refresh.send_modify(|v| *v = Some(at));
    }

    // ── Reads (UI side) ──────────────────────────────────────────────

    pub fn packages(&self) -> EntityStream<Package> {
        EntityStream::new(self.packages.subscribe())
    }

    pub fn users(&self) -> EntityStream<User> {
        EntityStream::new(self.users.subscribe())
    }

    pub fn package(&self, id: &str) -> Option<Arc<Package>> {
        self.packages.get(id)
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Current user snapshot without a subscription.
    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn packages_snapshot(&self) -> Arc<Vec<Arc<Package>>> {
        self.packages.snapshot()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}
