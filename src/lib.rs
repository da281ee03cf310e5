pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use models::{Catalog, ReviewRecord, ReviewSession, Scheduler, Snapshot};
pub use store::StateStore;
