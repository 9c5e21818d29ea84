// stowage-core: Reactive data layer and controllers between stowage-api
// and the presentation layer (TUI).

pub mod config;
pub mod convert;
pub mod error;
pub mod inventory;
pub mod model;
pub mod scan;
pub mod store;
pub mod stream;
pub mod submit;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{InventoryConfig, ScannerConfig};
pub use error::CoreError;
pub use inventory::{Inventory, LoadState};
pub use scan::{LineWedge, ScanBackend, ScanEvent, ScanSession, Scanner, ScannerState};
pub use store::Store;
pub use stream::EntityStream;
pub use submit::{
    NotifyOptions, PackageInput, PackageSubmission, RecipientMatch, UserRegistration,
    resolve_recipient,
};
pub use view::{PackageFilter, Summary};

// Re-export model types at the crate root for ergonomics.
pub use model::{Package, PackageStatus, Role, User};
