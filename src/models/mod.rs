pub mod catalog;
pub mod catalog_item;
pub mod review_record;
pub mod review_session;
pub mod scheduler;
pub mod sm2;
pub mod snapshot;
pub mod stats;
pub mod topic;

pub use catalog::Catalog;
pub use catalog_item::CatalogItem;
pub use review_record::ReviewRecord;
pub use review_session::{AnswerOutcome, QueueSummary, ReviewSession};
pub use scheduler::Scheduler;
pub use snapshot::Snapshot;
pub use stats::{AggregateStats, StatsSnapshot, TopicStats};
pub use topic::Topic;
