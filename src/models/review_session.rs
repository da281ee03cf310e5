//! Combined review across every catalog topic.
//! Pulls the most urgent item from the scheduler, checks responses against the
//! catalog and reschedules after each answer.

use super::{Catalog, CatalogItem, Scheduler, Topic};
use crate::clock::Clock;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Result of answering the current item.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerOutcome {
    pub item_id: String,
    pub is_correct: bool,
    pub expected: String,
    pub explanation: Option<String>,
    pub next_review: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueSummary {
    pub queued: usize,
    pub due_now: usize,
}

/// Drives one review sitting over a borrowed scheduler and catalog.
/// The queue is rebuilt after every answer, so a missed item comes back
/// once its short relearning interval has passed.
pub struct ReviewSession<'a, C: Clock> {
    scheduler: &'a mut Scheduler<C>,
    catalog: &'a Catalog,
    item_ids: Vec<String>,
    queue: Vec<String>,
    limit: usize,
}

impl<'a, C: Clock> ReviewSession<'a, C> {
    pub fn new(scheduler: &'a mut Scheduler<C>, catalog: &'a Catalog, limit: usize) -> Result<Self> {
        let mut session = Self {
            scheduler,
            catalog,
            item_ids: catalog.item_ids(),
            queue: Vec::new(),
            limit,
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.queue = self.scheduler.get_due_questions(&self.item_ids, self.limit)?;
        Ok(())
    }

    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    pub fn current_id(&self) -> Option<&str> {
        self.queue.first().map(String::as_str)
    }

    pub fn current(&self) -> Option<(&Topic, &CatalogItem)> {
        self.current_id().and_then(|id| self.catalog.item(id))
    }

    /// Checks `response` for the current item, records it and rebuilds the queue.
    pub fn submit(&mut self, response: &str) -> Result<AnswerOutcome> {
        let item_id = self.current_id().ok_or(Error::QueueEmpty)?.to_string();
        let catalog = self.catalog;
        let (_, item) = catalog
            .item(&item_id)
            .ok_or_else(|| Error::UnknownItem(item_id.clone()))?;
        let is_correct = item.is_correct(response);

        let next_review = self.scheduler.record_answer(&item_id, is_correct)?.next_review;
        self.refresh()?;

        Ok(AnswerOutcome {
            item_id,
            is_correct,
            expected: item.answer.clone(),
            explanation: item.explanation.clone(),
            next_review,
        })
    }

    /// Moves the current item to the back of the queue without answering it.
    pub fn skip(&mut self) {
        if !self.queue.is_empty() {
            self.queue.rotate_left(1);
        }
    }

    pub fn summary(&self) -> QueueSummary {
        let now = self.scheduler.now();
        let due_now = self
            .queue
            .iter()
            .filter(|id| self.scheduler.record(id).is_some_and(|record| record.is_due(now)))
            .count();
        QueueSummary {
            queued: self.queue.len(),
            due_now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.queue.is_empty()
    }
}
