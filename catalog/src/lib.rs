pub mod app;
pub mod catalog;
pub mod error;
pub mod map;
pub mod persistence;
pub mod record;
pub mod render;
pub mod store;

pub use app::{AppError, StoreForm, StoreMap};
pub use catalog::Catalog;
pub use error::{CatalogError, DeserializationError, ValidationError};
pub use map::{LocationError, LocationProvider, MapView, MarkerLayer};
pub use persistence::{
    BlobStore, CatalogPersistence, FileBlobStore, LoadPolicy, MemoryBlobStore, PersistenceError,
    PersistenceState, STORES_KEY,
};
pub use record::StoreRecord;
pub use render::{ListItem, StoreDetail};
pub use store::{Category, Coords, NewStore, Store, StoreId, StoreKind, MAX_TITLE_LEN};
