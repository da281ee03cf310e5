//! Error type shared by the scheduler, its stores and the catalog.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("item id must be a non-empty string")]
    InvalidItemId,

    #[error("Item not found in catalog: {0}")]
    UnknownItem(String),

    #[error("Invalid topic name {0:?}: must be non-empty and must not contain ':'")]
    InvalidTopicName(String),

    #[error("Duplicate topic name {0:?}: item ids would collide")]
    DuplicateTopicName(String),

    #[error("No items queued for review")]
    QueueEmpty,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
