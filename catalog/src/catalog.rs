use crate::error::{DeserializationError, ValidationError};
use crate::record::StoreRecord;
use crate::store::{NewStore, Store, StoreId};

/// Ordered, in-memory collection of stores for the current session.
///
/// Insertion order is display order and persistence order. Every mutation
/// bumps [`Catalog::revision`] so the persistence layer can tell whether the
/// catalog drifted from what was last written.
#[derive(Debug, Default)]
pub struct Catalog {
    stores: Vec<Store>,
    revision: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a candidate and append it. Persisting is left to the caller.
    pub fn add(&mut self, candidate: NewStore) -> Result<&Store, ValidationError> {
        let store = Store::create(candidate)?;
        tracing::debug!(id = %store.id(), category = %store.category(), "Store added");
        self.stores.push(store);
        self.revision += 1;
        let index = self.stores.len() - 1;
        Ok(&self.stores[index])
    }

    /// First store with the given id, if any.
    pub fn find_by_id(&self, id: &StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| s.id() == id)
    }

    /// Remove every store carrying `id`. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: &StoreId) -> bool {
        let before = self.stores.len();
        self.stores.retain(|s| s.id() != id);
        let removed = before - self.stores.len();
        if removed == 0 {
            return false;
        }
        if removed > 1 {
            tracing::warn!(%id, removed, "Removed stores sharing a duplicate id");
        }
        tracing::debug!(%id, "Store removed");
        self.revision += 1;
        true
    }

    pub fn all(&self) -> &[Store] {
        &self.stores
    }

    pub fn iter(&self) -> impl Iterator<Item = &Store> {
        self.stores.iter()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Hydrate from persisted records. All-or-nothing: if any record is
    /// invalid the catalog keeps its previous contents.
    pub fn replace_all(
        &mut self,
        records: impl IntoIterator<Item = StoreRecord>,
    ) -> Result<(), DeserializationError> {
        let stores = records
            .into_iter()
            .map(Store::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.stores = stores;
        self.revision += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        if !self.stores.is_empty() {
            self.stores.clear();
            self.revision += 1;
        }
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Category, Coords};
    use proptest::prelude::*;

    fn market() -> NewStore {
        NewStore {
            coords: Coords::new(40.0, -73.0),
            title: "Market".to_string(),
            address: "5 Main St".to_string(),
            kind: Category::Greengrocery.with_attribute("apples,pears"),
        }
    }

    fn butcher(title: &str) -> NewStore {
        NewStore {
            coords: Coords::new(51.5, -0.12),
            title: title.to_string(),
            address: "1 High St".to_string(),
            kind: Category::Butcher.with_attribute("beef,lamb"),
        }
    }

    fn record_with_id(id: &str) -> StoreRecord {
        StoreRecord {
            id: StoreId::from(id),
            created_at: 1,
            coords: Coords::new(1.0, 2.0),
            title: format!("Store {}", id),
            address: "Somewhere".to_string(),
            category: "butcher".to_string(),
            produce_list: None,
            meat_list: Some("pork".to_string()),
        }
    }

    #[test]
    fn test_add_then_find() {
        let mut catalog = Catalog::new();
        let added = catalog.add(market()).unwrap().clone();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_id(added.id()), Some(&added));
        assert_eq!(added.category().as_str(), "greengrocery");
    }

    #[test]
    fn test_invalid_add_leaves_catalog_unchanged() {
        let mut catalog = Catalog::new();
        catalog.add(market()).unwrap();
        let revision = catalog.revision();

        let err = catalog.add(butcher("")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.revision(), revision);
    }

    #[test]
    fn test_find_missing_is_none() {
        let catalog = Catalog::new();
        assert!(catalog.find_by_id(&StoreId::from("nope")).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut catalog = Catalog::new();
        catalog.add(market()).unwrap();
        let revision = catalog.revision();

        assert!(!catalog.remove_by_id(&StoreId::from("nope")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.revision(), revision);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut catalog = Catalog::new();
        let a = catalog.add(butcher("A")).unwrap().id().clone();
        let b = catalog.add(butcher("B")).unwrap().id().clone();
        let c = catalog.add(butcher("C")).unwrap().id().clone();

        assert!(catalog.remove_by_id(&b));
        let ids: Vec<_> = catalog.iter().map(|s| s.id().clone()).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_remove_drops_all_duplicates() {
        let mut catalog = Catalog::new();
        catalog
            .replace_all(vec![
                record_with_id("dup"),
                record_with_id("keep"),
                record_with_id("dup"),
            ])
            .unwrap();

        let dup = StoreId::from("dup");
        assert_eq!(catalog.find_by_id(&dup).unwrap().title(), "Store dup");
        assert!(catalog.remove_by_id(&dup));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all()[0].id().as_str(), "keep");
    }

    #[test]
    fn test_replace_all_is_atomic() {
        let mut catalog = Catalog::new();
        let existing = catalog.add(market()).unwrap().clone();

        let mut bad = record_with_id("bad");
        bad.category = "fishmonger".to_string();
        let result = catalog.replace_all(vec![record_with_id("ok"), bad]);

        assert!(matches!(
            result,
            Err(DeserializationError::UnknownCategory(_))
        ));
        assert_eq!(catalog.all(), &[existing]);
    }

    #[test]
    fn test_clear() {
        let mut catalog = Catalog::new();
        catalog.add(market()).unwrap();
        catalog.clear();
        assert!(catalog.is_empty());
    }

    fn arb_candidate() -> impl Strategy<Value = NewStore> {
        (
            -90.0f64..90.0,
            -180.0f64..180.0,
            "[a-zA-Z][a-zA-Z ]{0,19}",
            "[a-zA-Z0-9][a-zA-Z0-9 ]{0,40}",
            prop_oneof![Just(Category::Greengrocery), Just(Category::Butcher)],
            "[a-z,]{0,30}",
        )
            .prop_map(|(lat, lng, title, address, category, attr)| NewStore {
                coords: Coords::new(lat, lng),
                title,
                address,
                kind: category.with_attribute(attr),
            })
    }

    proptest! {
        #[test]
        fn prop_added_store_is_findable(candidates in prop::collection::vec(arb_candidate(), 1..10)) {
            let mut catalog = Catalog::new();
            for candidate in candidates {
                let added = catalog.add(candidate.clone()).unwrap().clone();
                prop_assert_eq!(added.title(), candidate.title.as_str());
                prop_assert_eq!(added.kind(), &candidate.kind);
                prop_assert_eq!(catalog.find_by_id(added.id()), Some(&added));
            }
        }

        #[test]
        fn prop_remove_preserves_others(
            candidates in prop::collection::vec(arb_candidate(), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut catalog = Catalog::new();
            for candidate in candidates {
                catalog.add(candidate).unwrap();
            }
            let target = pick.get(catalog.all()).id().clone();
            let expected: Vec<Store> = catalog
                .iter()
                .filter(|s| s.id() != &target)
                .cloned()
                .collect();

            prop_assert!(catalog.remove_by_id(&target));
            prop_assert_eq!(catalog.all(), expected.as_slice());
            prop_assert!(!catalog.remove_by_id(&target));
        }

        #[test]
        fn prop_title_length_limit(len in 1usize..40) {
            let mut catalog = Catalog::new();
            let mut candidate = market();
            candidate.title = "x".repeat(len);
            let result = catalog.add(candidate);
            if len <= 20 {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    ValidationError::TitleTooLong { len, max: 20 }
                );
            }
        }
    }
}
