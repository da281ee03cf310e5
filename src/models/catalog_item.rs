//! A catalog item is a prompt with its expected answer. Only text is used.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub prompt: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl CatalogItem {
    pub fn new(prompt: &str, answer: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            answer: answer.to_string(),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    /// Case-insensitive comparison, ignoring surrounding whitespace.
    pub fn is_correct(&self, response: &str) -> bool {
        response.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}
