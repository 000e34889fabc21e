mod blob_store;
mod file_store;

pub use blob_store::{BlobStore, MemoryBlobStore};
pub use file_store::FileBlobStore;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::record::{decode_records, encode_records, StoreRecord};
use crate::store::Store;

/// Key the whole catalog is stored under.
pub const STORES_KEY: &str = "stores";

/// Errors from the durable blob store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the catalog stands relative to the persisted blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceState {
    /// No blob is persisted.
    Empty,
    /// The blob matches the catalog.
    Loaded,
    /// The catalog changed since the last load or save.
    Dirty,
}

/// What to do when the persisted blob cannot be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Surface the error to the caller.
    #[default]
    Strict,
    /// Log it and start from an empty catalog. The blob is left in place until
    /// the next save overwrites it.
    DiscardCorrupt,
}

/// Saves and loads a [`Catalog`] as a single blob under [`STORES_KEY`].
///
/// This is the only writer of the blob. It remembers the catalog revision it
/// last synchronised with so it can report a [`PersistenceState`].
pub struct CatalogPersistence<B> {
    blobs: B,
    synced_revision: Option<u64>,
}

impl<B: BlobStore> CatalogPersistence<B> {
    pub fn new(blobs: B) -> Self {
        Self {
            blobs,
            synced_revision: None,
        }
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Write every store in catalog order. On failure the previous blob is kept.
    pub fn save(&mut self, catalog: &Catalog) -> Result<(), PersistenceError> {
        let records: Vec<StoreRecord> = catalog.iter().map(StoreRecord::from).collect();
        let blob = encode_records(&records)?;
        self.blobs.set(STORES_KEY, &blob)?;
        self.synced_revision = Some(catalog.revision());
        tracing::info!(count = records.len(), bytes = blob.len(), "Saved store catalog");
        Ok(())
    }

    /// Read persisted stores. A missing blob is a cold start, not an error.
    pub fn load(&self) -> Result<Vec<Store>, CatalogError> {
        let records = self.read_records()?.unwrap_or_default();
        let stores = records
            .into_iter()
            .map(Store::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stores)
    }

    /// Load into `catalog`, replacing its contents. Leaves it untouched on failure.
    pub fn hydrate(&mut self, catalog: &mut Catalog) -> Result<(), CatalogError> {
        match self.read_records()? {
            Some(records) => {
                catalog.replace_all(records)?;
                self.synced_revision = Some(catalog.revision());
                tracing::info!(count = catalog.len(), "Loaded store catalog");
            }
            None => {
                catalog.clear();
                self.synced_revision = None;
                tracing::info!("No persisted stores, starting empty");
            }
        }
        Ok(())
    }

    /// Remove the persisted blob. Succeeds when nothing is stored.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.blobs.remove(STORES_KEY)?;
        self.synced_revision = None;
        tracing::info!("Cleared persisted stores");
        Ok(())
    }

    pub fn state(&self, catalog: &Catalog) -> PersistenceState {
        match self.synced_revision {
            None => PersistenceState::Empty,
            Some(rev) if rev == catalog.revision() => PersistenceState::Loaded,
            Some(_) => PersistenceState::Dirty,
        }
    }

    fn read_records(&self) -> Result<Option<Vec<StoreRecord>>, CatalogError> {
        match self.blobs.get(STORES_KEY)? {
            Some(bytes) => Ok(Some(decode_records(&bytes)?)),
            None => Ok(None),
        }
    }
}
