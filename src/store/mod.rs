//! Versioned storage for light-rig snapshots.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/lrig/              # base directory (or --home / LRIG_HOME)
//! ├── env.json                      # optional root override
//! └── rigA/                         # asset
//!     ├── 1/
//!     │   └── rigA.json             # write-once snapshot record
//!     └── 2/
//!         └── rigA.json
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lrig::store::{AssetStore, SnapshotRecord, LightEntry};
//!
//! let store = AssetStore::open_default()?;
//!
//! let mut record = SnapshotRecord::new(vec![LightEntry::new("key1", "pointLight")]);
//! let version = store.write_snapshot("rigA", &mut record)?;
//!
//! if let Some(record) = store.read_snapshot("rigA", version) {
//!     // Apply to a scene...
//! }
//! ```

mod asset_store;
pub mod codec;
mod schema;

pub use asset_store::AssetStore;
pub use schema::{
    AssetSummary, AttrValue, AttributeMap, DecodeIssue, LightEntry, Scalar, SnapshotRecord,
    VersionInfo,
};
