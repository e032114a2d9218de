use std::str::FromStr;

use crate::pipeline::CallRequest;
use crate::registry::RegistryLookup;
use crate::runtime::{Deadline, ExecutionRuntime, RuntimeError, ZError};

/// Error type ZIDs raised by the builtin runtime.
pub const Z_ERROR_NOT_IMPLEMENTED: &str = "Z503";
pub const Z_ERROR_ZID_NOT_FOUND: &str = "Z504";
pub const Z_ERROR_EVALUATION: &str = "Z507";

/// String operations the builtin runtime can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOp {
    Echo,
    Uppercase,
    Lowercase,
    Reverse,
    Trim,
    Length,
    Concat,
}

impl BuiltinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinOp::Echo => "echo",
            BuiltinOp::Uppercase => "uppercase",
            BuiltinOp::Lowercase => "lowercase",
            BuiltinOp::Reverse => "reverse",
            BuiltinOp::Trim => "trim",
            BuiltinOp::Length => "length",
            BuiltinOp::Concat => "concat",
        }
    }

    pub fn all() -> &'static [BuiltinOp] {
        &[
            BuiltinOp::Echo,
            BuiltinOp::Uppercase,
            BuiltinOp::Lowercase,
            BuiltinOp::Reverse,
            BuiltinOp::Trim,
            BuiltinOp::Length,
            BuiltinOp::Concat,
        ]
    }

    /// Apply the operation. `Concat` is variadic; every other op takes one input.
    pub fn apply(self, args: &[String]) -> Result<String, ZError> {
        let single = move || match args {
            [input] => Ok(input.as_str()),
            _ => Err(ZError::new(
                Z_ERROR_EVALUATION,
                format!("{} expects 1 argument, got {}", self.as_str(), args.len()),
            )),
        };
        let out = match self {
            BuiltinOp::Concat => args.concat(),
            BuiltinOp::Echo => single()?.to_string(),
            BuiltinOp::Uppercase => single()?.to_uppercase(),
            BuiltinOp::Lowercase => single()?.to_lowercase(),
            BuiltinOp::Reverse => single()?.chars().rev().collect(),
            BuiltinOp::Trim => single()?.trim().to_string(),
            BuiltinOp::Length => single()?.chars().count().to_string(),
        };
        Ok(out)
    }
}

impl FromStr for BuiltinOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinOp::all()
            .iter()
            .copied()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown builtin '{}'", s))
    }
}

/// In-process runtime that runs the builtin implementation attached to a
/// function definition in the registry.
pub struct BuiltinRuntime<'a> {
    pub registry: &'a dyn RegistryLookup,
}

impl<'a> BuiltinRuntime<'a> {
    pub fn new(registry: &'a dyn RegistryLookup) -> Self {
        Self { registry }
    }
}

impl ExecutionRuntime for BuiltinRuntime<'_> {
    fn invoke(&self, request: &CallRequest, deadline: &Deadline) -> Result<String, RuntimeError> {
        let zid = &request.function.zid;
        let entry = self.registry.resolve_by_name(zid).ok_or_else(|| {
            RuntimeError::Structured(ZError::new(
                Z_ERROR_ZID_NOT_FOUND,
                format!("ZID not found: {}", zid),
            ))
        })?;

        let op = entry
            .builtin_implementations()
            .iter()
            .find_map(|name| name.parse::<BuiltinOp>().ok())
            .ok_or_else(|| {
                RuntimeError::Structured(ZError::new(
                    Z_ERROR_NOT_IMPLEMENTED,
                    format!("No implementation found for {}", zid),
                ))
            })?;

        if deadline.is_done() {
            return Err(RuntimeError::Generic(format!("Evaluation of {} was interrupted", zid)));
        }

        tracing::debug!(zid = %zid, op = op.as_str(), "running builtin");
        op.apply(&request.arguments).map_err(RuntimeError::Structured)
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}
