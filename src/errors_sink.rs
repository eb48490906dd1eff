//! Collection of reportable decode errors
//!
//! Malformed entries do not fail a page; they are reported here instead so a
//! presentation layer can show them next to the data that did decode.

use std::sync::Mutex;

use crate::error::DecodeError;

/// Receives reportable decode errors
pub trait ErrorSink: Send + Sync {
    /// Record one error
    fn add(&self, error: &DecodeError);
}

/// De-duplicating, insertion-ordered list of error messages
#[derive(Debug, Default)]
pub struct ErrorCollector {
    messages: Mutex<Vec<String>>,
}

impl ErrorCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected messages, oldest first
    pub fn errors(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of distinct messages
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Whether anything was collected
    pub fn has_errors(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Forget all collected messages
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorSink for ErrorCollector {
    fn add(&self, error: &DecodeError) {
        let message = error.to_string();
        let mut messages = self.lock();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }
}
