//! Topic is a named group of catalog items
use super::stats::TOPIC_DELIMITER;
use super::CatalogItem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

impl Topic {
    pub fn new(name: &str, items: Vec<CatalogItem>) -> Self {
        Self {
            name: name.to_string(),
            items,
        }
    }

    /// Stable id of the item at `index`, e.g. `"Verbs:3"`.
    pub fn item_id(&self, index: usize) -> String {
        format!("{}{}{}", self.name, TOPIC_DELIMITER, index)
    }

    pub fn has_valid_name(&self) -> bool {
        !self.name.is_empty() && !self.name.contains(TOPIC_DELIMITER)
    }
}
