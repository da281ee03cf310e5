//! The item catalog: every reviewable item, grouped by topic.
//!
//! Item ids have the form `"{topic}:{index}"`, which is what the scheduler's
//! per-topic statistics rely on.

use super::stats::TOPIC_DELIMITER;
use super::{CatalogItem, Topic};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub topics: Vec<Topic>,
}

impl Catalog {
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        let catalog = Self { topics };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Topic names must be usable as the prefix of an item id, and unique so
    /// that every item id is.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !topic.has_valid_name() {
                return Err(Error::InvalidTopicName(topic.name.clone()));
            }
            if !seen.insert(topic.name.as_str()) {
                return Err(Error::DuplicateTopicName(topic.name.clone()));
            }
        }
        Ok(())
    }

    /// All item ids, in catalog order.
    pub fn item_ids(&self) -> Vec<String> {
        self.topics
            .iter()
            .flat_map(|topic| (0..topic.items.len()).map(move |index| topic.item_id(index)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.topics.iter().map(|topic| topic.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item(&self, item_id: &str) -> Option<(&Topic, &CatalogItem)> {
        let (name, index) = item_id.split_once(TOPIC_DELIMITER)?;
        let index: usize = index.parse().ok()?;
        let topic = self.topics.iter().find(|topic| topic.name == name)?;
        topic.items.get(index).map(|item| (topic, item))
    }

    pub fn check_answer(&self, item_id: &str, response: &str) -> Result<bool> {
        self.item(item_id)
            .map(|(_, item)| item.is_correct(response))
            .ok_or_else(|| Error::UnknownItem(item_id.to_string()))
    }

    /// A small built-in Italian catalog, used when no catalog file is configured.
    pub fn sample() -> Self {
        let articles = Topic::new(
            "Articles",
            vec![
                CatalogItem::new("Translate to Italian: the cat (gatto)", "il")
                    .with_explanation("Il gatto → standard masculine singular form."),
                CatalogItem::new("Translate to Italian: the cats (gatti)", "i")
                    .with_explanation("I gatti → plural of il."),
                CatalogItem::new("Translate to Italian: the house (casa)", "la")
                    .with_explanation("La casa → feminine singular form."),
            ],
        );
        let verbs = Topic::new(
            "Verbs",
            vec![
                CatalogItem::new("essere, io: I am", "sono")
                    .with_explanation("io sono → I am (identity)."),
                CatalogItem::new("essere, tu: you are", "sei")
                    .with_explanation("tu sei → you are."),
                CatalogItem::new("stare, noi: we are (doing)", "stiamo")
                    .with_explanation("noi stiamo → we are doing/staying."),
                CatalogItem::new("avere, io: I have", "ho").with_explanation("io ho → I have."),
            ],
        );
        let greetings = Topic::new(
            "Greetings",
            vec![
                CatalogItem::new("You meet someone at 9 AM", "Buongiorno")
                    .with_explanation("Buongiorno is used for 'good morning' or 'good day'."),
                CatalogItem::new("You greet a friend casually", "Ciao")
                    .with_explanation("Ciao means 'hi' or 'bye' in informal settings."),
                CatalogItem::new("You arrive at a dinner at 7 PM", "Buonasera")
                    .with_explanation("Buonasera means 'good evening'."),
            ],
        );
        let colors = Topic::new(
            "Colors",
            vec![
                CatalogItem::new("la macchina (red)", "rossa")
                    .with_explanation("Feminine singular, so 'rosso' becomes 'rossa'."),
                CatalogItem::new("il cappello (blue)", "blu")
                    .with_explanation("'blu' is invariable, stays the same."),
            ],
        );

        Self {
            topics: vec![articles, verbs, greetings, colors],
        }
    }
}
