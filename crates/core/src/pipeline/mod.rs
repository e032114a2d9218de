//! The function-call pipeline.
//!
//! Resolver → Validator → Builder → Dispatcher → Classifier, strictly in that
//! order. Each stage lives in its own module and can be used on its own; the
//! [`FunctionCallPipeline`] runs them together, walks the [`Stage`] machine
//! once per invocation, and fires the diagnostic notification on failure.

pub mod builder;
pub mod classifier;
pub mod dispatcher;
pub mod resolver;
pub mod validator;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticSink;
use crate::error::{CallError, ErrorKind};
use crate::messages::MessageCatalog;
use crate::registry::RegistryLookup;
use crate::runtime::{Deadline, ExecutionRuntime};

pub use builder::{build, CallRequest};
pub use classifier::{classify, Classified, EscapeMode, RenderableOutput};
pub use dispatcher::dispatch;
pub use resolver::resolve;
pub use validator::{validate, SupportedTypes};

/// Outcome of dispatching one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    Success(String),
    Failure(CallError),
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CallResult::Success(_))
    }
}

impl From<Result<String, CallError>> for CallResult {
    fn from(result: Result<String, CallError>) -> Self {
        match result {
            Ok(text) => CallResult::Success(text),
            Err(err) => CallResult::Failure(err),
        }
    }
}

/// Where an invocation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Resolved,
    Validated,
    Dispatched,
    RenderedSuccess,
    RenderedFailure,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::RenderedSuccess | Stage::RenderedFailure)
    }

    /// Forward-only transitions; any non-terminal stage may fail.
    pub fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Start, Stage::Resolved)
                | (Stage::Resolved, Stage::Validated)
                | (Stage::Validated, Stage::Dispatched)
                | (Stage::Dispatched, Stage::RenderedSuccess)
                | (
                    Stage::Start | Stage::Resolved | Stage::Validated | Stage::Dispatched,
                    Stage::RenderedFailure
                )
        )
    }
}

struct StageTracker {
    stage: Stage,
}

impl StageTracker {
    fn new() -> Self {
        Self { stage: Stage::Start }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid stage transition {:?} -> {:?}",
            self.stage,
            next
        );
        tracing::debug!(from = ?self.stage, to = ?next, "pipeline stage");
        self.stage = next;
    }
}

/// Everything the host needs from one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub output: RenderableOutput,
    /// Terminal stage reached.
    pub stage: Stage,
    pub diagnostic: Option<ErrorKind>,
    /// Fingerprint of the dispatched request, if the run got that far.
    pub fingerprint: Option<String>,
}

/// Ports wired together for running function calls.
pub struct FunctionCallPipeline<'a> {
    pub registry: &'a dyn RegistryLookup,
    pub runtime: &'a dyn ExecutionRuntime,
    pub supported_types: &'a SupportedTypes,
    pub messages: &'a dyn MessageCatalog,
    /// Time limit per call; `None` disables it.
    pub call_timeout: Option<Duration>,
}

impl<'a> FunctionCallPipeline<'a> {
    /// Run one call with a fresh deadline built from `call_timeout`.
    pub fn run(&self, target: &str, args: Vec<String>, sink: &dyn DiagnosticSink) -> Invocation {
        let deadline = Deadline::from_limit(self.call_timeout);
        self.run_with_deadline(target, args, &deadline, sink)
    }

    /// Run one call under a caller-owned deadline, which may be cancelled from
    /// another thread.
    pub fn run_with_deadline(
        &self,
        target: &str,
        args: Vec<String>,
        deadline: &Deadline,
        sink: &dyn DiagnosticSink,
    ) -> Invocation {
        let mut tracker = StageTracker::new();
        let mut fingerprint = None;

        let result =
            CallResult::from(self.execute(target, args, deadline, &mut tracker, &mut fingerprint));
        let classified = classify(&result, self.messages);

        tracker.advance(if result.is_success() {
            Stage::RenderedSuccess
        } else {
            Stage::RenderedFailure
        });

        if let Some(kind) = classified.diagnostic {
            sink.on_diagnostic(kind);
        }

        tracing::info!(
            target_name = target,
            fingerprint = fingerprint.as_deref().unwrap_or("-"),
            outcome = classified.diagnostic.map(ErrorKind::as_str).unwrap_or("success"),
            "function call finished"
        );

        Invocation {
            output: classified.output,
            stage: tracker.stage,
            diagnostic: classified.diagnostic,
            fingerprint,
        }
    }

    fn execute(
        &self,
        target: &str,
        args: Vec<String>,
        deadline: &Deadline,
        tracker: &mut StageTracker,
        fingerprint: &mut Option<String>,
    ) -> Result<String, CallError> {
        let function = resolve(self.registry, target)?;
        tracker.advance(Stage::Resolved);

        validate(&function, self.supported_types)?;
        tracker.advance(Stage::Validated);

        let request = build(&function, args);
        *fingerprint = Some(request.fingerprint());

        let result = dispatch(self.runtime, &request, deadline);
        tracker.advance(Stage::Dispatched);

        match result {
            CallResult::Success(text) => Ok(text),
            CallResult::Failure(err) => Err(err),
        }
    }
}
