use std::sync::Mutex;
use tracing::info;

/// Receives human-readable progress notes while a request is assembled.
pub trait ProgressSink {
    fn report(&self, message: &str);
}

/// Forwards progress to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, message: &str) {
        info!(target: "progress", "{}", message);
    }
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, message: &str) {
        // a poisoned lock still holds usable data; reporting must not fail
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}
