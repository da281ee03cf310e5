//! Persistence seam between a scheduler and wherever its state lives.

use crate::clock::Clock;
use crate::error::Result;
use crate::models::{Scheduler, Snapshot};
use serde_json::Value;
use tracing::info;

/// Holds one opaque snapshot per user.
pub trait StateStore {
    /// The stored document for `user_id`, or `None` if nothing was saved yet.
    fn load(&self, user_id: &str) -> Result<Option<Value>>;

    fn save(&self, user_id: &str, snapshot: &Snapshot) -> Result<()>;
}

/// Loads `user_id`'s state into `scheduler`. Returns whether anything was stored.
pub fn restore<C: Clock>(
    scheduler: &mut Scheduler<C>,
    store: &dyn StateStore,
    user_id: &str,
) -> Result<bool> {
    match store.load(user_id)? {
        Some(value) => {
            scheduler.import_value(&value);
            info!(user_id, records = scheduler.len(), "restored scheduler state");
            Ok(true)
        }
        None => Ok(false),
    }
}

pub fn persist<C: Clock>(
    scheduler: &Scheduler<C>,
    store: &dyn StateStore,
    user_id: &str,
) -> Result<()> {
    let snapshot = scheduler.export();
    store.save(user_id, &snapshot)?;
    info!(user_id, records = snapshot.records.len(), "persisted scheduler state");
    Ok(())
}
