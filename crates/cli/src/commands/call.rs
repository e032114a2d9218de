use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use zcall_core::config::ClientContext;
use zcall_core::diagnostics::CollectingSink;
use zcall_core::error::ErrorKind;
use zcall_core::messages::EnglishCatalog;
use zcall_core::model::ResolvedFunction;
use zcall_core::pipeline::{
    resolve, validate, EscapeMode, FunctionCallPipeline, Invocation, RenderableOutput, Stage,
};
use zcall_core::runtime::BuiltinRuntime;

use crate::canonicalize_or_current;

/// Result of running one function call from the command line.
#[derive(Debug, Serialize)]
pub struct CallReport {
    pub target: String,
    pub arguments: Vec<String>,
    pub output: RenderableOutput,
    pub stage: Stage,
    pub diagnostic: Option<ErrorKind>,
    pub tracking_categories: Vec<String>,
    pub fingerprint: Option<String>,
}

/// Result of resolving and validating a function without calling it.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub target: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<ResolvedFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<ErrorKind>,
}

/// Resolve and validate `target` against the client's supported types.
pub fn check_function_command(root: &str, target: &str, json: bool) -> Result<CheckReport> {
    let ctx = ClientContext::from_root(canonicalize_or_current(root)?)?;
    let supported = ctx.config.supported_types();

    let checked = resolve(&ctx.store, target)
        .and_then(|function| validate(&function, &supported).map(|()| function));
    let report = match checked {
        Ok(function) => CheckReport {
            target: target.to_string(),
            ok: true,
            function: Some(function),
            error: None,
            diagnostic: None,
        },
        Err(err) => CheckReport {
            target: target.to_string(),
            ok: false,
            function: None,
            error: Some(err.to_string()),
            diagnostic: Some(err.kind()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    match (&report.function, &report.error) {
        (Some(function), _) => {
            println!("{} is callable:", function.reference);
            if let Some(label) = &function.label {
                println!("  Label: {}", label);
            }
            println!("  Returns: {}", function.signature.return_type);
            for arg in &function.signature.arguments {
                println!("  - {}: {}", arg.key, arg.declared_type);
            }
        }
        (None, Some(error)) => println!("{} is not callable: {}", target, error),
        (None, None) => {}
    }

    Ok(report)
}

/// Run `target` with `args` through the full pipeline using the builtin runtime.
///
/// `timeout_ms` overrides the configured limit; `0` disables it.
pub fn call_function_command(
    root: &str,
    target: &str,
    args: Vec<String>,
    timeout_ms: Option<u64>,
    json: bool,
) -> Result<CallReport> {
    let ctx = ClientContext::from_root(canonicalize_or_current(root)?)?;
    if !ctx.config.enable_parser_function {
        return Err(anyhow!(
            "Function calls are disabled for this client (enable_parser_function = false)"
        ));
    }

    let supported = ctx.config.supported_types();
    let call_timeout = match timeout_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => ctx.config.call_timeout(),
    };
    let runtime = BuiltinRuntime::new(&ctx.store);
    let pipeline = FunctionCallPipeline {
        registry: &ctx.store,
        runtime: &runtime,
        supported_types: &supported,
        messages: &EnglishCatalog,
        call_timeout,
    };

    let sink = CollectingSink::new();
    let Invocation { output, stage, diagnostic, fingerprint } =
        pipeline.run(target, args.clone(), &sink);

    let report = CallReport {
        target: target.to_string(),
        arguments: args,
        output,
        stage,
        diagnostic,
        tracking_categories: sink.categories().into_iter().map(str::to_string).collect(),
        fingerprint,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    println!("{}", report.output.text);
    if report.output.escape == EscapeMode::Markup {
        for category in &report.tracking_categories {
            eprintln!("Tracking category: {}", category);
        }
    }

    Ok(report)
}
