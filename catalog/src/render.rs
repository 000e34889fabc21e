//! Presentation of stores for list entries and map popups.
//!
//! Every function here switches on the closed [`StoreKind`] set, so adding a
//! category is one new match arm per function.

use crate::store::{Category, Store, StoreId};
use std::fmt;

pub const ADDRESS_ICON: &str = "🏠";

pub fn icon(category: Category) -> &'static str {
    match category {
        Category::Greengrocery => "🥦",
        Category::Butcher => "🥩",
    }
}

/// CSS-style class used for the marker popup.
pub fn style_class(category: Category) -> String {
    format!("{}-popup", category.as_str())
}

/// Text shown inside a store's map popup.
pub fn popup_content(store: &Store) -> String {
    format!(
        "{}\n{} {}\n{} {}",
        store.title(),
        ADDRESS_ICON,
        store.address(),
        icon(store.category()),
        store.kind().attribute()
    )
}

/// One icon/value row of a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDetail {
    pub icon: &'static str,
    pub value: String,
}

/// A store as it appears in the list next to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: StoreId,
    pub title: String,
    /// `store--<category>` modifier class.
    pub modifier: String,
    pub details: Vec<StoreDetail>,
}

pub fn list_item(store: &Store) -> ListItem {
    ListItem {
        id: store.id().clone(),
        title: store.title().to_string(),
        modifier: format!("store--{}", store.category().as_str()),
        details: vec![
            StoreDetail {
                icon: ADDRESS_ICON,
                value: store.address().to_string(),
            },
            StoreDetail {
                icon: icon(store.category()),
                value: store.kind().attribute().to_string(),
            },
        ],
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  [{}]", self.title, self.id)?;
        for detail in &self.details {
            write!(f, "\n    {} {}", detail.icon, detail.value)?;
        }
        Ok(())
    }
}
