//! Core data model for function references, signatures, and entry kinds.
//!
//! Z-objects are identified by ZIDs (`Z` followed by digits). The keys below
//! are the handful of type and field identifiers the dispatch core reads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persistent object wrapper.
pub const Z_PERSISTENTOBJECT: &str = "Z2";
pub const Z_PERSISTENTOBJECT_VALUE: &str = "Z2K2";
pub const Z_PERSISTENTOBJECT_LABEL: &str = "Z2K3";
pub const Z_OBJECT_TYPE: &str = "Z1K1";

pub const Z_TYPE: &str = "Z4";
pub const Z_STRING: &str = "Z6";
pub const Z_STRING_VALUE: &str = "Z6K1";
pub const Z_FUNCTIONCALL: &str = "Z7";
pub const Z_FUNCTIONCALL_FUNCTION: &str = "Z7K1";

pub const Z_FUNCTION: &str = "Z8";
pub const Z_FUNCTION_ARGUMENTS: &str = "Z8K1";
pub const Z_FUNCTION_RETURN_TYPE: &str = "Z8K2";
pub const Z_FUNCTION_IMPLEMENTATIONS: &str = "Z8K4";

pub const Z_MULTILINGUALSTRING: &str = "Z12";
pub const Z_MULTILINGUALSTRING_VALUE: &str = "Z12K1";
pub const Z_MONOLINGUALSTRING: &str = "Z11";
pub const Z_MONOLINGUALSTRING_LANGUAGE: &str = "Z11K1";
pub const Z_MONOLINGUALSTRING_VALUE: &str = "Z11K2";

pub const Z_IMPLEMENTATION: &str = "Z14";
pub const Z_IMPLEMENTATION_FUNCTION: &str = "Z14K1";
pub const Z_IMPLEMENTATION_BUILTIN: &str = "Z14K4";

pub const Z_ARGUMENTDECLARATION: &str = "Z17";
pub const Z_ARGUMENTDECLARATION_TYPE: &str = "Z17K1";
pub const Z_ARGUMENTDECLARATION_ID: &str = "Z17K2";

pub const Z_TESTER: &str = "Z20";

/// English, used for labels.
pub const Z_LANG_EN: &str = "Z1002";

/// Identifier of a callable definition in the registry.
///
/// Only the resolver hands these out paired with a signature, see
/// [`ResolvedFunction`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionReference {
    pub zid: String,
}

impl FunctionReference {
    pub fn new(zid: impl Into<String>) -> Self {
        Self { zid: zid.into() }
    }
}

impl fmt::Display for FunctionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.zid)
    }
}

/// A declared type: a plain ZID, or the canonical JSON text of a composite
/// type expression (e.g. a typed list of strings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(zid: impl Into<String>) -> Self {
        Self(zid.into())
    }

    pub fn string() -> Self {
        Self(Z_STRING.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One declared argument of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument key, e.g. `Z10001K1`.
    pub key: String,
    pub declared_type: TypeRef,
}

impl ArgumentSpec {
    pub fn new(key: impl Into<String>, declared_type: TypeRef) -> Self {
        Self { key: key.into(), declared_type }
    }
}

/// Declared return type plus ordered argument declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub arguments: Vec<ArgumentSpec>,
    pub return_type: TypeRef,
}

/// Kind of a registry entry, taken from the type of its inner value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Function,
    Type,
    Implementation,
    Tester,
    String,
    Other(String),
}

impl Kind {
    pub fn from_zid(zid: &str) -> Self {
        match zid {
            Z_FUNCTION => Kind::Function,
            Z_TYPE => Kind::Type,
            Z_IMPLEMENTATION => Kind::Implementation,
            Z_TESTER => Kind::Tester,
            Z_STRING => Kind::String,
            other => Kind::Other(other.to_string()),
        }
    }

    pub fn zid(&self) -> &str {
        match self {
            Kind::Function => Z_FUNCTION,
            Kind::Type => Z_TYPE,
            Kind::Implementation => Z_IMPLEMENTATION,
            Kind::Tester => Z_TESTER,
            Kind::String => Z_STRING,
            Kind::Other(zid) => zid,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.zid())
    }
}

/// A function that exists in the registry together with its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFunction {
    /// The name as the caller wrote it; every error message echoes this.
    pub name: String,
    pub reference: FunctionReference,
    pub label: Option<String>,
    pub signature: FunctionSignature,
}

/// Characters that can never appear in a page title.
const ILLEGAL_TITLE_CHARS: &[char] = &['#', '<', '>', '[', ']', '{', '}', '|'];

/// Normalize a raw name the way page titles are normalized.
///
/// Returns `None` when the name cannot be a title at all.
pub fn normalize_title(raw: &str) -> Option<String> {
    let spaced = raw.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.contains(ILLEGAL_TITLE_CHARS) {
        return None;
    }
    let mut chars = collapsed.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

