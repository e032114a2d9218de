use std::collections::BTreeSet;

use crate::error::CallError;
use crate::model::{ResolvedFunction, TypeRef, Z_STRING};

/// Allowlist of types a function may take and return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTypes {
    types: BTreeSet<String>,
}

impl Default for SupportedTypes {
    /// Strings only.
    fn default() -> Self {
        Self::from_iter([Z_STRING.to_string()])
    }
}

impl SupportedTypes {
    /// An empty allowlist; every signature is rejected.
    pub fn none() -> Self {
        Self { types: BTreeSet::new() }
    }

    pub fn allow(&mut self, zid: impl Into<String>) -> &mut Self {
        self.types.insert(zid.into());
        self
    }

    pub fn contains(&self, declared: &TypeRef) -> bool {
        self.types.contains(declared.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

impl FromIterator<String> for SupportedTypes {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { types: iter.into_iter().collect() }
    }
}

/// Check a resolved function's signature against the allowlist.
///
/// The return type is checked first. Among arguments, only the first
/// unsupported one (in declared order) is reported.
pub fn validate(function: &ResolvedFunction, supported: &SupportedTypes) -> Result<(), CallError> {
    let target = &function.name;
    let signature = &function.signature;

    if !supported.contains(&signature.return_type) {
        return Err(CallError::UnsupportedReturnType {
            target: target.clone(),
            return_type: signature.return_type.clone(),
        });
    }

    if let Some(arg) = signature.arguments.iter().find(|arg| !supported.contains(&arg.declared_type))
    {
        return Err(CallError::UnsupportedArgumentType {
            target: target.clone(),
            argument: arg.key.clone(),
            argument_type: arg.declared_type.clone(),
        });
    }

    Ok(())
}
