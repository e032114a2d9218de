#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use zcall_core::pipeline::CallRequest;
use zcall_core::registry::{
    ArgumentDefinition, FunctionDefinition, InMemoryRegistry, RawEntry, RegistryLookup,
};
use zcall_core::runtime::{Deadline, ExecutionRuntime, RuntimeError};

/// Function entry with the given return type and argument types.
pub fn function_entry(zid: &str, return_type: &str, arg_types: &[&str]) -> RawEntry {
    FunctionDefinition {
        zid: zid.to_string(),
        label: Some(format!("label of {zid}")),
        return_type: return_type.to_string(),
        arguments: arg_types
            .iter()
            .map(|t| ArgumentDefinition { key: None, arg_type: t.to_string() })
            .collect(),
        builtin: None,
    }
    .to_entry()
}

/// Function entry with one string argument and a builtin implementation.
pub fn builtin_entry(zid: &str, builtin: &str) -> RawEntry {
    FunctionDefinition {
        zid: zid.to_string(),
        label: None,
        return_type: "Z6".to_string(),
        arguments: vec![ArgumentDefinition { key: None, arg_type: "Z6".to_string() }],
        builtin: Some(builtin.to_string()),
    }
    .to_entry()
}

pub fn registry_with(entries: Vec<RawEntry>) -> InMemoryRegistry {
    let mut registry = InMemoryRegistry::new();
    for entry in entries {
        registry.insert(entry);
    }
    registry
}

/// Runtime that returns a canned answer and counts invocations.
pub struct CannedRuntime {
    pub answer: Result<String, RuntimeError>,
    pub calls: AtomicUsize,
}

impl CannedRuntime {
    pub fn ok(text: &str) -> Self {
        Self { answer: Ok(text.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn err(err: RuntimeError) -> Self {
        Self { answer: Err(err), calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExecutionRuntime for CannedRuntime {
    fn invoke(&self, _request: &CallRequest, _deadline: &Deadline) -> Result<String, RuntimeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

/// Runtime that upper-cases its first argument.
pub struct UppercaseRuntime;

impl ExecutionRuntime for UppercaseRuntime {
    fn invoke(&self, request: &CallRequest, _deadline: &Deadline) -> Result<String, RuntimeError> {
        Ok(request.arguments.first().map(|a| a.to_uppercase()).unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "uppercase"
    }
}

/// Registry that counts lookups.
pub struct CountingRegistry {
    pub inner: InMemoryRegistry,
    pub lookups: AtomicUsize,
}

impl CountingRegistry {
    pub fn new(inner: InMemoryRegistry) -> Self {
        Self { inner, lookups: AtomicUsize::new(0) }
    }
}

impl RegistryLookup for CountingRegistry {
    fn resolve_by_name(&self, name: &str) -> Option<RawEntry> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_by_name(name)
    }
}
