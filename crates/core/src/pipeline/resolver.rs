use crate::error::CallError;
use crate::model::{normalize_title, FunctionReference, Kind, ResolvedFunction, Z_LANG_EN};
use crate::registry::RegistryLookup;

/// Resolve a raw function name against the registry.
///
/// Errors carry the name as the caller wrote it (surrounding whitespace
/// trimmed), so messages echo the input.
pub fn resolve(registry: &dyn RegistryLookup, name: &str) -> Result<ResolvedFunction, CallError> {
    let name = name.trim();
    let not_found = || CallError::NotFound { target: name.to_string() };

    let zid = normalize_title(name).ok_or_else(not_found)?;
    let entry = registry.resolve_by_name(&zid).ok_or_else(not_found)?;

    let kind = entry.kind().ok_or_else(|| CallError::InvalidDefinition {
        target: name.to_string(),
        reason: "not a persistent object".to_string(),
    })?;
    if kind != Kind::Function {
        return Err(CallError::NotAFunction { target: name.to_string(), kind });
    }

    let signature = entry.signature().map_err(|err| CallError::InvalidDefinition {
        target: name.to_string(),
        reason: err.to_string(),
    })?;

    tracing::debug!(
        target_zid = %zid,
        arguments = signature.arguments.len(),
        return_type = %signature.return_type,
        "resolved function"
    );

    Ok(ResolvedFunction {
        name: name.to_string(),
        reference: FunctionReference::new(entry.zid()),
        label: entry.label(Z_LANG_EN),
        signature,
    })
}
