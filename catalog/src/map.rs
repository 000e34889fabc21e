//! Seams to the map widget and the device location service.
//!
//! Neither collaborator touches the catalog. The map only receives markers
//! and pan requests, and the location provider only hands back coordinates.

use crate::render;
use crate::store::{Coords, Store, StoreId};
use std::future::Future;

/// Everything the map needs to draw one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: StoreId,
    pub coords: Coords,
    pub popup: String,
    pub style_class: String,
}

impl Marker {
    pub fn for_store(store: &Store) -> Self {
        Self {
            id: store.id().clone(),
            coords: store.coords(),
            popup: render::popup_content(store),
            style_class: render::style_class(store.category()),
        }
    }
}

/// A rendered map that can show markers and move its viewport.
pub trait MapView {
    fn render_marker(&mut self, marker: &Marker);
    fn remove_marker(&mut self, id: &StoreId);
    fn pan_to(&mut self, coords: Coords, zoom: u8);
}

/// Why a position request failed. Terminal for that one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("permission to read the position was denied")]
    PermissionDenied,
    #[error("unable to get your position: {0}")]
    Unavailable(String),
}

/// One-shot source of the user's current position.
pub trait LocationProvider: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Coords, LocationError>> + Send;
}

/// Markers for the map, including the ones requested before it exists.
///
/// Stores hydrated at startup are queued until [`MarkerLayer::attach`] hands
/// over a map, then rendered in order.
pub struct MarkerLayer<M> {
    map: Option<M>,
    pending: Vec<Marker>,
    shown: Vec<StoreId>,
}

impl<M> Default for MarkerLayer<M> {
    fn default() -> Self {
        Self {
            map: None,
            pending: Vec::new(),
            shown: Vec::new(),
        }
    }
}

impl<M: MapView> MarkerLayer<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the store's marker now, or queue it until a map is attached.
    pub fn place(&mut self, store: &Store) {
        let marker = Marker::for_store(store);
        match self.map.as_mut() {
            Some(map) => {
                map.render_marker(&marker);
                self.shown.push(marker.id);
            }
            None => self.pending.push(marker),
        }
    }

    /// Drop a store's marker, whether rendered or still queued.
    pub fn remove(&mut self, id: &StoreId) {
        self.pending.retain(|m| &m.id != id);
        let before = self.shown.len();
        self.shown.retain(|shown| shown != id);
        if self.shown.len() != before {
            if let Some(map) = self.map.as_mut() {
                map.remove_marker(id);
            }
        }
    }

    /// Take ownership of the map and flush every queued marker onto it.
    pub fn attach(&mut self, mut map: M) {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Rendering deferred markers");
        }
        for marker in pending {
            map.render_marker(&marker);
            self.shown.push(marker.id);
        }
        self.map = Some(map);
    }

    /// Returns false when there is no map to move yet.
    pub fn pan_to(&mut self, coords: Coords, zoom: u8) -> bool {
        match self.map.as_mut() {
            Some(map) => {
                map.pan_to(coords, zoom);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        let shown = std::mem::take(&mut self.shown);
        if let Some(map) = self.map.as_mut() {
            for id in &shown {
                map.remove_marker(id);
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    pub fn pending(&self) -> &[Marker] {
        &self.pending
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::{Category, NewStore};

    /// Map that records every call it receives.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingMap {
        pub markers: Vec<Marker>,
        pub removed: Vec<StoreId>,
        pub pans: Vec<(Coords, u8)>,
    }

    impl MapView for RecordingMap {
        fn render_marker(&mut self, marker: &Marker) {
            self.markers.push(marker.clone());
        }

        fn remove_marker(&mut self, id: &StoreId) {
            self.markers.retain(|m| &m.id != id);
            self.removed.push(id.clone());
        }

        fn pan_to(&mut self, coords: Coords, zoom: u8) {
            self.pans.push((coords, zoom));
        }
    }

    fn stores() -> Vec<Store> {
        let mut catalog = Catalog::new();
        for (title, lat) in [("One", 1.0), ("Two", 2.0)] {
            catalog
                .add(NewStore {
                    coords: Coords::new(lat, lat),
                    title: title.to_string(),
                    address: "Road".to_string(),
                    kind: Category::Greengrocery.with_attribute("leeks"),
                })
                .unwrap();
        }
        catalog.all().to_vec()
    }

    #[test]
    fn test_markers_deferred_until_attach() {
        let stores = stores();
        let mut layer = MarkerLayer::<RecordingMap>::new();
        for store in &stores {
            layer.place(store);
        }
        assert_eq!(layer.pending().len(), 2);
        assert!(!layer.pan_to(Coords::new(0.0, 0.0), 13));

        layer.attach(RecordingMap::default());
        assert!(layer.pending().is_empty());
        let map = layer.map().unwrap();
        let ids: Vec<_> = map.markers.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec![stores[0].id().clone(), stores[1].id().clone()]);
        assert_eq!(map.markers[0].style_class, "greengrocery-popup");
    }

    #[test]
    fn test_remove_before_attach_drops_queued_marker() {
        let stores = stores();
        let mut layer = MarkerLayer::<RecordingMap>::new();
        for store in &stores {
            layer.place(store);
        }
        layer.remove(stores[0].id());
        layer.attach(RecordingMap::default());

        let map = layer.map().unwrap();
        assert_eq!(map.markers.len(), 1);
        assert!(map.removed.is_empty());
    }

    #[test]
    fn test_remove_after_attach_removes_in_place() {
        let stores = stores();
        let mut layer = MarkerLayer::new();
        layer.attach(RecordingMap::default());
        for store in &stores {
            layer.place(store);
        }
        layer.remove(stores[1].id());

        let map = layer.map().unwrap();
        assert_eq!(map.removed, vec![stores[1].id().clone()]);
        assert_eq!(map.markers.len(), 1);
    }

    #[test]
    fn test_pan_after_attach() {
        let mut layer = MarkerLayer::new();
        layer.attach(RecordingMap::default());
        assert!(layer.pan_to(Coords::new(5.0, 6.0), 13));
        assert_eq!(layer.map().unwrap().pans, vec![(Coords::new(5.0, 6.0), 13)]);
    }

    struct FixedLocation(Result<Coords, LocationError>);

    impl LocationProvider for FixedLocation {
        async fn current_position(&self) -> Result<Coords, LocationError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_location_provider_outcomes() {
        let ok = FixedLocation(Ok(Coords::new(1.0, 2.0)));
        assert_eq!(ok.current_position().await, Ok(Coords::new(1.0, 2.0)));

        let denied = FixedLocation(Err(LocationError::PermissionDenied));
        assert_eq!(
            denied.current_position().await,
            Err(LocationError::PermissionDenied)
        );
    }
}
