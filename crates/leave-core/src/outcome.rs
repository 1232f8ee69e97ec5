//! Structured operation outcomes and the sink that renders them.

use std::sync::Mutex;

use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub title: String,
    pub message: String,
}

impl Outcome {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn failure(err: &CoreError) -> Self {
        Self {
            success: false,
            title: err.title().to_string(),
            message: err.to_string(),
        }
    }
}

/// Receives the outcome of every ledger operation for display.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, outcome: &Outcome);
}

/// Keeps every outcome in memory, newest last.
#[derive(Debug, Default)]
pub struct CollectingSink {
    outcomes: Mutex<Vec<Outcome>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, outcome: &Outcome) {
        if let Ok(mut guard) = self.outcomes.lock() {
            guard.push(outcome.clone());
        }
    }
}
