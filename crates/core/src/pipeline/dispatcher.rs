use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::CallError;
use crate::pipeline::{CallRequest, CallResult};
use crate::runtime::{Deadline, ExecutionRuntime, RuntimeError};

/// Send a request to the runtime and wait for its single answer.
///
/// One attempt, no retry. Runtime errors and panics become failures; a result
/// that arrives after the deadline is discarded.
pub fn dispatch(
    runtime: &dyn ExecutionRuntime,
    request: &CallRequest,
    deadline: &Deadline,
) -> CallResult {
    let target = request.name.clone();

    if let Some(message) = deadline_message(deadline) {
        return CallResult::Failure(CallError::RuntimeGeneric { target, message });
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| runtime.invoke(request, deadline)));

    // Checked after the call too: late answers are not rendered.
    if let Some(message) = deadline_message(deadline) {
        tracing::warn!(target_zid = %target, runtime = runtime.name(), "discarding late result");
        return CallResult::Failure(CallError::RuntimeGeneric { target, message });
    }

    match outcome {
        Ok(Ok(text)) => CallResult::Success(text),
        Ok(Err(RuntimeError::Structured(zerror))) => {
            tracing::warn!(
                target_zid = %target,
                error_type = %zerror.error_type,
                "function call raised a structured error"
            );
            CallResult::Failure(CallError::RuntimeStructured {
                target,
                error_type: zerror.error_type,
                message: zerror.message,
            })
        }
        Ok(Err(RuntimeError::Generic(message))) => {
            tracing::warn!(target_zid = %target, %message, "function call failed");
            CallResult::Failure(CallError::RuntimeGeneric { target, message })
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(target_zid = %target, %message, "runtime panicked");
            CallResult::Failure(CallError::RuntimeGeneric { target, message })
        }
    }
}

fn deadline_message(deadline: &Deadline) -> Option<String> {
    if deadline.is_cancelled() {
        return Some("The function call was cancelled.".to_string());
    }
    if deadline.is_expired() {
        let limit = deadline.limit().map(|d| d.as_millis()).unwrap_or_default();
        return Some(format!("The function call exceeded its time limit of {} ms.", limit));
    }
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "The function runtime stopped unexpectedly.".to_string()
    }
}
