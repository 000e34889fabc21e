use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Longest title accepted at creation, in characters.
pub const MAX_TITLE_LEN: usize = 20;

/// Identity of a store, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StoreId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for StoreId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A latitude/longitude pair. Persisted as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite, with latitude in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// The closed set of store categories, without their attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Greengrocery,
    Butcher,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Greengrocery, Category::Butcher];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Greengrocery => "greengrocery",
            Category::Butcher => "butcher",
        }
    }

    /// Wire name of the attribute this category carries.
    pub fn attribute_field(self) -> &'static str {
        match self {
            Category::Greengrocery => "produceList",
            Category::Butcher => "meatList",
        }
    }

    /// Pair this category with its attribute value.
    pub fn with_attribute(self, value: impl Into<String>) -> StoreKind {
        match self {
            Category::Greengrocery => StoreKind::Greengrocery {
                produce_list: value.into(),
            },
            Category::Butcher => StoreKind::Butcher {
                meat_list: value.into(),
            },
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown store category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-specific part of a store. The tag always matches the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Greengrocery { produce_list: String },
    Butcher { meat_list: String },
}

impl StoreKind {
    pub fn category(&self) -> Category {
        match self {
            StoreKind::Greengrocery { .. } => Category::Greengrocery,
            StoreKind::Butcher { .. } => Category::Butcher,
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            StoreKind::Greengrocery { produce_list } => produce_list,
            StoreKind::Butcher { meat_list } => meat_list,
        }
    }
}

/// User input for a store that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub coords: Coords,
    pub title: String,
    pub address: String,
    pub kind: StoreKind,
}

impl NewStore {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.address.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        let len = self.title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong {
                len,
                max: MAX_TITLE_LEN,
            });
        }
        // Non-finite values would be persisted as `null`.
        if !self.coords.is_valid() {
            return Err(ValidationError::InvalidCoords {
                lat: self.coords.lat,
                lng: self.coords.lng,
            });
        }
        Ok(())
    }
}

/// A marked point of interest. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    id: StoreId,
    created_at: u64,
    coords: Coords,
    title: String,
    address: String,
    kind: StoreKind,
}

impl Store {
    /// Validate a candidate and stamp it with a fresh id and creation time.
    pub(crate) fn create(candidate: NewStore) -> Result<Self, ValidationError> {
        candidate.validate()?;
        let NewStore {
            coords,
            title,
            address,
            kind,
        } = candidate;
        Ok(Self {
            id: StoreId::generate(),
            created_at: now_millis(),
            coords,
            title,
            address,
            kind,
        })
    }

    /// Rebuild a store from persisted parts without re-running input validation.
    pub(crate) fn restore(
        id: StoreId,
        created_at: u64,
        coords: Coords,
        title: String,
        address: String,
        kind: StoreKind,
    ) -> Self {
        Self {
            id,
            created_at,
            coords,
            title,
            address,
            kind,
        }
    }

    pub fn id(&self) -> &StoreId {
        &self.id
    }

    /// Creation time in unix milliseconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn kind(&self) -> &StoreKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
