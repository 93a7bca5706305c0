use serde::Serialize;

use crate::logging::StageLogger;

/// Result of handling one item inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Processed(T),
    Skipped { id: String, reason: String },
}

impl<T> ItemOutcome<T> {
    pub fn skipped(id: impl Into<String>, reason: impl ToString) -> Self {
        ItemOutcome::Skipped {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

/// Counts what a stage did with its inputs so skips are never silent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub stage: String,
    pub processed: usize,
    pub skipped: Vec<SkippedItem>,
}

impl BatchReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Default::default()
        }
    }

    /// Tallies the outcome and hands back the value when there is one.
    pub fn record<T>(&mut self, outcome: ItemOutcome<T>) -> Option<T> {
        match outcome {
            ItemOutcome::Processed(value) => {
                self.processed += 1;
                Some(value)
            }
            ItemOutcome::Skipped { id, reason } => {
                self.skipped.push(SkippedItem { id, reason });
                None
            }
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }

    pub fn log_summary(&self, logger: &StageLogger) {
        logger.info(&format!(
            "{}: {} processed, {} skipped",
            self.stage,
            self.processed,
            self.skipped.len()
        ));
        for item in &self.skipped {
            logger.warn(&format!("skipped {}: {}", item.id, item.reason));
        }
    }
}
