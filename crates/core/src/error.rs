//! Failure taxonomy for a single function call.
//!
//! Every variant is terminal for the invocation it occurred in and is turned
//! into a rendered error box plus one diagnostic notification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Kind, TypeRef};

/// Field-less projection of [`CallError`], used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidDefinition,
    NotAFunction,
    UnsupportedReturnType,
    UnsupportedArgumentType,
    RuntimeStructured,
    RuntimeGeneric,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidDefinition => "invalid_definition",
            ErrorKind::NotAFunction => "not_a_function",
            ErrorKind::UnsupportedReturnType => "unsupported_return_type",
            ErrorKind::UnsupportedArgumentType => "unsupported_argument_type",
            ErrorKind::RuntimeStructured => "runtime_structured",
            ErrorKind::RuntimeGeneric => "runtime_generic",
        }
    }

    /// Message key of the user-facing error text.
    pub fn message_key(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "wikifunctionsclient-functioncall-error-unknown",
            ErrorKind::InvalidDefinition => "wikifunctionsclient-functioncall-error-invalid-zobject",
            ErrorKind::NotAFunction => "wikifunctionsclient-functioncall-error-nonfunction",
            ErrorKind::UnsupportedReturnType => {
                "wikifunctionsclient-functioncall-error-nonstringoutput"
            }
            ErrorKind::UnsupportedArgumentType => {
                "wikifunctionsclient-functioncall-error-nonstringinput"
            }
            ErrorKind::RuntimeStructured | ErrorKind::RuntimeGeneric => {
                "wikifunctionsclient-functioncall-error"
            }
        }
    }

    /// Host-side tracking category the page is marked with.
    ///
    /// Both runtime failures share one category.
    pub fn tracking_category(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "wikifunctionsclient-functioncall-error-unknown-category",
            ErrorKind::InvalidDefinition => {
                "wikifunctionsclient-functioncall-error-invalid-zobject-category"
            }
            ErrorKind::NotAFunction => "wikifunctionsclient-functioncall-error-nonfunction-category",
            ErrorKind::UnsupportedReturnType => {
                "wikifunctionsclient-functioncall-error-nonstringoutput-category"
            }
            ErrorKind::UnsupportedArgumentType => {
                "wikifunctionsclient-functioncall-error-nonstringinput-category"
            }
            ErrorKind::RuntimeStructured | ErrorKind::RuntimeGeneric => {
                "wikifunctionsclient-functioncall-error-category"
            }
        }
    }
}

/// Why a function call could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("Function {target} does not exist")]
    NotFound { target: String },

    #[error("{target} is not a valid object: {reason}")]
    InvalidDefinition { target: String, reason: String },

    #[error("{target} is a {kind}, not a function")]
    NotAFunction { target: String, kind: Kind },

    #[error("Function {target} returns unsupported type {return_type}")]
    UnsupportedReturnType { target: String, return_type: TypeRef },

    #[error("Function {target} takes argument {argument} of unsupported type {argument_type}")]
    UnsupportedArgumentType { target: String, argument: String, argument_type: TypeRef },

    /// The runtime raised an error with a localizable payload.
    #[error("Function {target} failed with {error_type}: {message}")]
    RuntimeStructured { target: String, error_type: String, message: String },

    /// The runtime failed without a structured payload; `message` is raw text.
    #[error("Function {target} failed: {message}")]
    RuntimeGeneric { target: String, message: String },
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::NotFound { .. } => ErrorKind::NotFound,
            CallError::InvalidDefinition { .. } => ErrorKind::InvalidDefinition,
            CallError::NotAFunction { .. } => ErrorKind::NotAFunction,
            CallError::UnsupportedReturnType { .. } => ErrorKind::UnsupportedReturnType,
            CallError::UnsupportedArgumentType { .. } => ErrorKind::UnsupportedArgumentType,
            CallError::RuntimeStructured { .. } => ErrorKind::RuntimeStructured,
            CallError::RuntimeGeneric { .. } => ErrorKind::RuntimeGeneric,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            CallError::NotFound { target }
            | CallError::InvalidDefinition { target, .. }
            | CallError::NotAFunction { target, .. }
            | CallError::UnsupportedReturnType { target, .. }
            | CallError::UnsupportedArgumentType { target, .. }
            | CallError::RuntimeStructured { target, .. }
            | CallError::RuntimeGeneric { target, .. } => target,
        }
    }

    /// Parameters interpolated into the message template, in `$1..$n` order.
    pub fn message_params(&self) -> Vec<String> {
        match self {
            CallError::NotFound { target }
            | CallError::InvalidDefinition { target, .. }
            | CallError::NotAFunction { target, .. }
            | CallError::UnsupportedReturnType { target, .. } => vec![target.clone()],
            CallError::UnsupportedArgumentType { target, argument, argument_type } => {
                vec![target.clone(), argument.clone(), argument_type.to_string()]
            }
            CallError::RuntimeStructured { message, .. }
            | CallError::RuntimeGeneric { message, .. } => vec![message.clone()],
        }
    }
}
