//! zcall-core
//!
//! Core library for validating and dispatching wikitext function calls.
//!
//! A call names a function stored in an external object registry and passes it
//! string arguments. This crate resolves the name, checks the function's
//! signature against the supported types, builds the call request, dispatches
//! it to an execution runtime, and renders the result or a localized error.
//!
//! The registry, runtime, message catalog and diagnostic sink are ports
//! (traits) so the pipeline runs without the real systems behind them.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod messages;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod runtime;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
