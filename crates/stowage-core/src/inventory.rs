// ── Inventory controller ──
//
// Owns the API client and the store, and keeps the two in sync: every
// mutation round-trips through the backend and then refetches, so the
// store never drifts from what the server holds.

use std::sync::Arc;

use chrono::Utc;
use stowage_api::{InventoryClient, NewPackage};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::InventoryConfig;
use crate::error::CoreError;
use crate::model::{PackageStatus, User};
use crate::store::Store;

/// Where the initial data load currently stands. Drives the dashboard
/// skeleton: spinner while `Loading`, retry view on `Errored`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Handle to the inventory data layer. Cheap to clone; all clones share
/// one client and one store.
#[derive(Clone)]
pub struct Inventory {
    inner: Arc<Inner>,
}

struct Inner {
    api: InventoryClient,
    store: Store,
    load_state: watch::Sender<LoadState>,
}

impl Inventory {
    pub fn new(config: &InventoryConfig) -> Result<Self, CoreError> {
        let api = InventoryClient::new(config.base_url.as_str(), config.timeout)?;
        Ok(Self::from_client(api))
    }

    /// Wrap an already-built client (tests point this at a mock server).
    pub fn from_client(api: InventoryClient) -> Self {
        let (load_state, _) = watch::channel(LoadState::Idle);
        Self {
            inner: Arc::new(Inner {
                api,
                store: Store::new(),
                load_state,
            }),
        }
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn load_state(&self) -> watch::Receiver<LoadState> {
        self.inner.load_state.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch packages and users in parallel and replace the store.
    ///
    /// Either fetch failing fails the whole refresh; the store keeps
    /// its previous contents so a transient error never blanks the UI.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.inner
            .load_state
            .send_modify(|s| *s = LoadState::Loading);

        let (packages, users) = tokio::join!(
            self.inner.api.list_packages(),
            self.inner.api.list_users(),
        );

        let outcome = (|| {
            let packages = packages?;
            let users = users?;
            self.inner
                .store
                .replace_packages(packages.into_iter().map(Into::into).collect());
            self.inner
                .store
                .replace_users(users.into_iter().map(Into::into).collect());
            self.inner.store.mark_refreshed(Utc::now());
            Ok::<(), stowage_api::Error>(())
        })();

        match outcome {
            Ok(()) => {
                debug!(
                    packages = self.inner.store.package_count(),
                    users = self.inner.store.user_count(),
                    "inventory refreshed"
                );
                self.inner.load_state.send_modify(|s| *s = LoadState::Ready);
                Ok(())
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!("inventory refresh failed: {err}");
                self.inner
                    .load_state
                    .send_modify(|s| *s = LoadState::Errored(err.to_string()));
                Err(err)
            }
        }
    }

    /// Refetch only the package listing.
    pub async fn refresh_packages(&self) -> Result<(), CoreError> {
        let packages = self.inner.api.list_packages().await?;
        self.inner
            .store
            .replace_packages(packages.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Refetch only the user listing.
    pub async fn refresh_users(&self) -> Result<(), CoreError> {
        let users = self.inner.api.list_users().await?;
        self.inner
            .store
            .replace_users(users.into_iter().map(Into::into).collect());
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Register a package, then refetch the listing so the store shows
    /// the backend's authoritative record (arrival date included).
    pub async fn create_package(&self, request: &NewPackage) -> Result<(), CoreError> {
        let created = self.inner.api.create_package(request).await?;
        debug!(id = %created.id, "package registered");
        self.refresh_packages().await
    }

    /// Register a user account, then refetch the user listing.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, CoreError> {
        let created = self.inner.api.create_user(name, email).await?;
        debug!(id = created.id, "user registered");
        self.refresh_users().await?;
        Ok(created.into())
    }

    /// Flip a package to `Delivered` on the backend, then refetch.
    pub async fn mark_delivered(&self, id: &str) -> Result<(), CoreError> {
        self.inner
            .api
            .set_package_status(id, PackageStatus::Delivered.into())
            .await?;
        debug!(%id, "package marked delivered");
        self.refresh_packages().await
    }
}
