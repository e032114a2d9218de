mod common;

use std::thread;
use std::time::Duration;

use serde_json::json;
use zcall_core::error::{CallError, ErrorKind};
use zcall_core::model::{FunctionReference, FunctionSignature, ResolvedFunction, TypeRef};
use zcall_core::pipeline::{build, dispatch, CallRequest, CallResult};
use zcall_core::runtime::{Deadline, ExecutionRuntime, RuntimeError, ZError};

use common::CannedRuntime;

fn request(zid: &str, args: &[&str]) -> CallRequest {
    let function = ResolvedFunction {
        name: zid.to_string(),
        reference: FunctionReference::new(zid),
        label: None,
        signature: FunctionSignature { arguments: vec![], return_type: TypeRef::string() },
    };
    build(&function, args.iter().map(|a| a.to_string()).collect())
}

struct PanickingRuntime;

impl ExecutionRuntime for PanickingRuntime {
    fn invoke(&self, _request: &CallRequest, _deadline: &Deadline) -> Result<String, RuntimeError> {
        panic!("boom");
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

struct SlowRuntime(Duration);

impl ExecutionRuntime for SlowRuntime {
    fn invoke(&self, _request: &CallRequest, _deadline: &Deadline) -> Result<String, RuntimeError> {
        thread::sleep(self.0);
        Ok("late".into())
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

#[test]
fn builder_passes_arguments_through_unchanged() {
    let req = request("Z10001", &["  hello ", "", "x"]);
    assert_eq!(req.function.zid, "Z10001");
    assert_eq!(req.arguments, vec!["  hello ", "", "x"]);
}

#[test]
fn request_serializes_as_canonical_function_call() {
    let req = request("Z10001", &["hello", "world"]);
    assert_eq!(
        req.to_zobject(),
        json!({"Z1K1": "Z7", "Z7K1": "Z10001", "Z10001K1": "hello", "Z10001K2": "world"})
    );
}

#[test]
fn fingerprint_is_stable_and_argument_sensitive() {
    let a = request("Z10001", &["hello"]);
    let b = request("Z10001", &["hello"]);
    let c = request("Z10001", &["HELLO"]);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
}

#[test]
fn success_is_passed_through() {
    let runtime = CannedRuntime::ok("HELLO");
    let result = dispatch(&runtime, &request("Z10001", &["hello"]), &Deadline::none());
    assert_eq!(result, CallResult::Success("HELLO".into()));
    assert_eq!(runtime.call_count(), 1);
}

#[test]
fn structured_error_keeps_its_message() {
    let runtime =
        CannedRuntime::err(RuntimeError::Structured(ZError::new("Z507", "Division by zero")));
    let result = dispatch(&runtime, &request("Z10001", &[]), &Deadline::none());
    assert_eq!(
        result,
        CallResult::Failure(CallError::RuntimeStructured {
            target: "Z10001".into(),
            error_type: "Z507".into(),
            message: "Division by zero".into(),
        })
    );
}

#[test]
fn generic_error_falls_back_to_raw_text() {
    let runtime = CannedRuntime::err(RuntimeError::Generic("connection reset".into()));
    let result = dispatch(&runtime, &request("Z10001", &[]), &Deadline::none());
    match result {
        CallResult::Failure(err) => {
            assert_eq!(err.kind(), ErrorKind::RuntimeGeneric);
            assert_eq!(err.message_params(), vec!["connection reset"]);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn runtime_panic_is_contained() {
    let result = dispatch(&PanickingRuntime, &request("Z10001", &[]), &Deadline::none());
    assert_eq!(
        result,
        CallResult::Failure(CallError::RuntimeGeneric {
            target: "Z10001".into(),
            message: "boom".into()
        })
    );
}

#[test]
fn expired_deadline_is_not_dispatched() {
    let runtime = CannedRuntime::ok("never");
    let deadline = Deadline::after(Duration::ZERO);
    let result = dispatch(&runtime, &request("Z10001", &[]), &deadline);
    assert_eq!(runtime.call_count(), 0);
    match result {
        CallResult::Failure(CallError::RuntimeGeneric { message, .. }) => {
            assert!(message.contains("time limit of 0 ms"), "{message}");
        }
        other => panic!("expected timeout failure, got {other:?}"),
    }
}

#[test]
fn cancelled_deadline_is_not_dispatched() {
    let runtime = CannedRuntime::ok("never");
    let deadline = Deadline::none();
    deadline.clone().cancel();
    assert!(deadline.is_cancelled());

    let result = dispatch(&runtime, &request("Z10001", &[]), &deadline);
    assert_eq!(runtime.call_count(), 0);
    match result {
        CallResult::Failure(CallError::RuntimeGeneric { message, .. }) => {
            assert_eq!(message, "The function call was cancelled.");
        }
        other => panic!("expected cancellation failure, got {other:?}"),
    }
}

#[test]
fn late_result_is_discarded() {
    let deadline = Deadline::after(Duration::from_millis(10));
    let result =
        dispatch(&SlowRuntime(Duration::from_millis(60)), &request("Z10001", &[]), &deadline);
    match result {
        CallResult::Failure(CallError::RuntimeGeneric { message, .. }) => {
            assert!(message.contains("10 ms"), "{message}");
        }
        other => panic!("expected timeout failure, got {other:?}"),
    }
}

#[test]
fn unlimited_deadline_reports_no_remaining_time() {
    let deadline = Deadline::from_limit(None);
    assert_eq!(deadline.remaining(), None);
    assert!(!deadline.is_done());

    let limited = Deadline::from_limit(Some(Duration::from_secs(60)));
    assert_eq!(limited.limit(), Some(Duration::from_secs(60)));
    assert!(limited.remaining().is_some());
    assert!(!limited.is_expired());
}

#[test]
fn zero_limit_means_no_limit() {
    let deadline = Deadline::from_limit(Some(Duration::ZERO));
    assert_eq!(deadline.limit(), None);
    assert!(!deadline.is_done());

    let runtime = CannedRuntime::ok("HELLO");
    let result = dispatch(&runtime, &request("Z10001", &["hello"]), &deadline);
    assert_eq!(result, CallResult::Success("HELLO".into()));
}

#[test]
fn failures_name_the_function_as_written() {
    let function = ResolvedFunction {
        name: "z10001".into(),
        reference: FunctionReference::new("Z10001"),
        label: None,
        signature: FunctionSignature { arguments: vec![], return_type: TypeRef::string() },
    };
    let req = build(&function, vec![]);
    assert_eq!(req.to_zobject()["Z7K1"], "Z10001");

    let runtime = CannedRuntime::err(RuntimeError::Generic("boom".into()));
    match dispatch(&runtime, &req, &Deadline::none()) {
        CallResult::Failure(err) => assert_eq!(err.target(), "z10001"),
        other => panic!("expected failure, got {other:?}"),
    }
}
