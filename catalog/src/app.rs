//! Event-driven controller tying the catalog, its persistence and the map.
//!
//! Each public method handles one user or map event to completion. There is
//! no concurrent access, so nothing here locks.

use crate::catalog::Catalog;
use crate::error::{CatalogError, DeserializationError, ValidationError};
use crate::map::{MapView, MarkerLayer};
use crate::persistence::{
    BlobStore, CatalogPersistence, LoadPolicy, PersistenceError, PersistenceState,
};
use crate::render::{self, ListItem};
use crate::store::{Coords, NewStore, Store, StoreId, StoreKind};

/// Zoom level used when none is configured.
pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no map location selected; click the map first")]
    NoLocation,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    /// The in-memory catalog still holds the change; it just won't survive a restart.
    #[error("changes were not saved: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(e) => AppError::Validation(e),
            CatalogError::Deserialization(e) => AppError::Deserialization(e),
            CatalogError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

/// Fields collected by the store form. Coordinates come from the last map click.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreForm {
    pub title: String,
    pub address: String,
    pub kind: StoreKind,
}

pub struct StoreMap<B, M> {
    catalog: Catalog,
    persistence: CatalogPersistence<B>,
    markers: MarkerLayer<M>,
    last_click: Option<Coords>,
    zoom: u8,
}

impl<B: BlobStore, M: MapView> StoreMap<B, M> {
    /// Hydrate the catalog from `blobs` and queue a marker for every store.
    pub fn start(blobs: B, policy: LoadPolicy, zoom: u8) -> Result<Self, AppError> {
        let mut catalog = Catalog::new();
        let mut persistence = CatalogPersistence::new(blobs);

        match persistence.hydrate(&mut catalog) {
            Ok(()) => {}
            Err(CatalogError::Deserialization(e)) if policy == LoadPolicy::DiscardCorrupt => {
                tracing::warn!("Discarding unreadable persisted stores: {}", e);
            }
            Err(e) => return Err(e.into()),
        }

        let mut markers = MarkerLayer::new();
        for store in catalog.iter() {
            markers.place(store);
        }

        Ok(Self {
            catalog,
            persistence,
            markers,
            last_click: None,
            zoom,
        })
    }

    /// The map finished loading; render everything queued so far.
    pub fn map_ready(&mut self, map: M) {
        self.markers.attach(map);
    }

    /// Remember where the user clicked so the next form submission lands there.
    pub fn map_clicked(&mut self, coords: Coords) {
        self.last_click = Some(coords);
    }

    /// Create a store at the last clicked position, show it and persist.
    ///
    /// When saving fails the store is still in the catalog and on the map; the
    /// error is returned so the caller can tell the user.
    pub fn submit(&mut self, form: StoreForm) -> Result<Store, AppError> {
        let coords = self.last_click.ok_or(AppError::NoLocation)?;
        let store = self
            .catalog
            .add(NewStore {
                coords,
                title: form.title,
                address: form.address,
                kind: form.kind,
            })?
            .clone();
        self.last_click = None;
        self.markers.place(&store);
        self.persistence.save(&self.catalog)?;
        Ok(store)
    }

    /// Centre the map on a store. `None` if no store has that id.
    pub fn select(&mut self, id: &StoreId) -> Option<Coords> {
        let coords = self.catalog.find_by_id(id)?.coords();
        if !self.markers.pan_to(coords, self.zoom) {
            tracing::debug!(%id, "Map not ready, selection not shown");
        }
        Some(coords)
    }

    /// Delete every store with `id`, persist, and drop its marker.
    pub fn delete(&mut self, id: &StoreId) -> Result<bool, AppError> {
        if !self.catalog.remove_by_id(id) {
            return Ok(false);
        }
        self.markers.remove(id);
        self.persistence.save(&self.catalog)?;
        Ok(true)
    }

    /// Forget everything: persisted blob, catalog and markers.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.persistence.clear()?;
        self.catalog.clear();
        self.markers.clear();
        self.last_click = None;
        Ok(())
    }

    pub fn list_items(&self) -> Vec<ListItem> {
        self.catalog.iter().map(render::list_item).collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn persistence_state(&self) -> PersistenceState {
        self.persistence.state(&self.catalog)
    }

    pub fn markers(&self) -> &MarkerLayer<M> {
        &self.markers
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}
