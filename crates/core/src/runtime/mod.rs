//! Execution runtime port.
//!
//! The runtime receives a fully validated call request and either returns the
//! string result or raises an error. Every call carries a [`Deadline`] that the
//! runtime should poll during long work.

pub mod builtin;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::CallRequest;

pub use builtin::{BuiltinOp, BuiltinRuntime};

/// Structured error payload from the runtime (a Z5 error object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZError {
    /// Error type ZID, e.g. `Z507`.
    pub error_type: String,
    /// User-facing message.
    pub message: String,
}

impl ZError {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error_type: error_type.into(), message: message.into() }
    }
}

impl fmt::Display for ZError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.error_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Structured(ZError),
    #[error("{0}")]
    Generic(String),
}

/// Port to the system that actually runs functions.
pub trait ExecutionRuntime: Send + Sync {
    fn invoke(&self, request: &CallRequest, deadline: &Deadline) -> Result<String, RuntimeError>;

    fn name(&self) -> &'static str;
}

/// Optional time limit plus a cancellation flag shared with other threads.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    expires_at: Option<Instant>,
    limit: Option<Duration>,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    /// No time limit; can still be cancelled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn after(limit: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + limit),
            limit: Some(limit),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Deadline for a configured limit; a zero limit means no limit.
    pub fn from_limit(limit: Option<Duration>) -> Self {
        limit.filter(|d| !d.is_zero()).map(Self::after).unwrap_or_default()
    }

    /// The configured limit, if any.
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Trip the cancellation flag; visible to every clone of this deadline.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left before expiry; `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Expired or cancelled.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }
}
