//! Plain structured form of a [`Store`] as it is written to the blob store.
//!
//! The whole catalog persists as a JSON array of these records, in catalog
//! order:
//!
//! ```json
//! [{"id":"…","createdAt":1700000000000,"coords":[40.0,-73.0],
//!   "title":"Market","address":"5 Main St",
//!   "category":"greengrocery","produceList":"apples,pears"}]
//! ```

use crate::error::DeserializationError;
use crate::store::{Category, Coords, Store, StoreId, StoreKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub id: StoreId,
    pub created_at: u64,
    pub coords: Coords,
    pub title: String,
    pub address: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produce_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meat_list: Option<String>,
}

impl From<&Store> for StoreRecord {
    fn from(store: &Store) -> Self {
        let (produce_list, meat_list) = match store.kind() {
            StoreKind::Greengrocery { produce_list } => (Some(produce_list.clone()), None),
            StoreKind::Butcher { meat_list } => (None, Some(meat_list.clone())),
        };
        Self {
            id: store.id().clone(),
            created_at: store.created_at(),
            coords: store.coords(),
            title: store.title().to_string(),
            address: store.address().to_string(),
            category: store.category().as_str().to_string(),
            produce_list,
            meat_list,
        }
    }
}

impl TryFrom<StoreRecord> for Store {
    type Error = DeserializationError;

    fn try_from(record: StoreRecord) -> Result<Self, Self::Error> {
        let category: Category = record
            .category
            .parse()
            .map_err(|_| DeserializationError::UnknownCategory(record.category.clone()))?;

        let kind = match category {
            Category::Greengrocery => {
                if record.meat_list.is_some() {
                    return Err(mismatched(category, Category::Butcher));
                }
                let produce_list = record.produce_list.ok_or_else(|| missing(category))?;
                StoreKind::Greengrocery { produce_list }
            }
            Category::Butcher => {
                if record.produce_list.is_some() {
                    return Err(mismatched(category, Category::Greengrocery));
                }
                let meat_list = record.meat_list.ok_or_else(|| missing(category))?;
                StoreKind::Butcher { meat_list }
            }
        };

        Ok(Store::restore(
            record.id,
            record.created_at,
            record.coords,
            record.title,
            record.address,
            kind,
        ))
    }
}

fn missing(category: Category) -> DeserializationError {
    DeserializationError::MissingAttribute {
        category: category.as_str(),
        field: category.attribute_field(),
    }
}

fn mismatched(category: Category, foreign: Category) -> DeserializationError {
    DeserializationError::MismatchedAttribute {
        category: category.as_str(),
        field: foreign.attribute_field(),
    }
}

/// Serialize records into a single blob.
pub fn encode_records(records: &[StoreRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(records)
}

/// Parse a blob written by [`encode_records`].
pub fn decode_records(bytes: &[u8]) -> Result<Vec<StoreRecord>, DeserializationError> {
    Ok(serde_json::from_slice(bytes)?)
}
