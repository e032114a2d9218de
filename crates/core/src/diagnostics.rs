//! Diagnostic notifications for the host page pipeline.
//!
//! The host implements [`DiagnosticSink`] to mark the page with the tracking
//! category of each failure; the core never stores these itself.

use std::sync::{Mutex, PoisonError};

use crate::error::ErrorKind;

/// Fire-and-forget notification that a call on the page failed.
pub trait DiagnosticSink: Send + Sync {
    fn on_diagnostic(&self, kind: ErrorKind);
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn on_diagnostic(&self, _kind: ErrorKind) {}
}

/// Sink that logs each notification with its tracking category.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_diagnostic(&self, kind: ErrorKind) {
        tracing::info!(
            kind = kind.as_str(),
            category = kind.tracking_category(),
            "function call diagnostic"
        );
    }
}

/// Sink that keeps notifications in order, for hosts that batch them per page.
#[derive(Debug, Default)]
pub struct CollectingSink {
    kinds: Mutex<Vec<ErrorKind>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.kinds.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Distinct tracking categories, in first-seen order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for kind in self.kinds() {
            let category = kind.tracking_category();
            if !out.contains(&category) {
                out.push(category);
            }
        }
        out
    }
}

impl DiagnosticSink for CollectingSink {
    fn on_diagnostic(&self, kind: ErrorKind) {
        self.kinds.lock().unwrap_or_else(PoisonError::into_inner).push(kind);
    }
}
