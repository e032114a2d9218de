//! Registry port and the raw entries it hands back.
//!
//! The registry is owned by another system; the pipeline only needs to look an
//! entry up by its normalized name and read a few facts off it. `RawEntry`
//! wraps the stored canonical JSON and exposes those facts as typed values.
//!
//! Implementations here:
//! - `InMemoryRegistry`: a map, for tests and embedding.
//! - `ObjectStore` (see `store`): SQLite-backed, used by the CLI host.

pub mod definition;
pub mod store;

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    ArgumentSpec, FunctionSignature, Kind, TypeRef, Z_ARGUMENTDECLARATION,
    Z_ARGUMENTDECLARATION_ID, Z_ARGUMENTDECLARATION_TYPE, Z_FUNCTION_ARGUMENTS,
    Z_FUNCTION_IMPLEMENTATIONS, Z_FUNCTION_RETURN_TYPE, Z_IMPLEMENTATION,
    Z_IMPLEMENTATION_BUILTIN, Z_MONOLINGUALSTRING_LANGUAGE, Z_MONOLINGUALSTRING_VALUE,
    Z_MULTILINGUALSTRING_VALUE, Z_OBJECT_TYPE, Z_PERSISTENTOBJECT, Z_PERSISTENTOBJECT_LABEL,
    Z_PERSISTENTOBJECT_VALUE, Z_STRING, Z_STRING_VALUE,
};

pub use definition::{ArgumentDefinition, FunctionDefinition, RegistryFile};
pub use store::{ObjectStore, StoreError, StoredObject};

/// Lookup port into the external object registry.
pub trait RegistryLookup: Send + Sync {
    /// Return the entry stored under an already-normalized name, if any.
    fn resolve_by_name(&self, name: &str) -> Option<RawEntry>;
}

/// Why a stored entry could not be read as a function definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("not a persistent object")]
    NotPersistent,
    #[error("entry is of kind {0}, not a function")]
    NotAFunction(Kind),
    #[error("missing or malformed key {0}")]
    MissingKey(&'static str),
    #[error("argument {index} is not a valid argument declaration")]
    BadArgument { index: usize },
}

/// A registry entry as stored: its ZID and canonical JSON content.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    zid: String,
    content: Value,
}

impl RawEntry {
    pub fn new(zid: impl Into<String>, content: Value) -> Self {
        Self { zid: zid.into(), content }
    }

    /// Parse an entry from its stored JSON text.
    pub fn from_json(zid: impl Into<String>, json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(zid, serde_json::from_str(json)?))
    }

    pub fn zid(&self) -> &str {
        &self.zid
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// A well-formed entry is a persistent object whose inner value carries a type.
    pub fn is_well_formed(&self) -> bool {
        self.kind().is_some()
    }

    /// Kind of the inner value, or `None` when the entry is not well formed.
    pub fn kind(&self) -> Option<Kind> {
        let inner = self.inner()?;
        match inner.get(Z_OBJECT_TYPE)? {
            Value::String(zid) => Some(Kind::from_zid(zid)),
            // Instances of generic types carry a function call as their type.
            composite @ Value::Object(_) => Some(Kind::Other(composite.to_string())),
            _ => None,
        }
    }

    /// True when the entry is a function whose signature can be read.
    pub fn is_valid_function_definition(&self) -> bool {
        self.signature().is_ok()
    }

    /// Read the declared argument list and return type.
    pub fn signature(&self) -> Result<FunctionSignature, DefinitionError> {
        let inner = self.function_inner()?;

        let return_type = inner
            .get(Z_FUNCTION_RETURN_TYPE)
            .and_then(type_ref)
            .ok_or(DefinitionError::MissingKey(Z_FUNCTION_RETURN_TYPE))?;

        let declarations = inner
            .get(Z_FUNCTION_ARGUMENTS)
            .and_then(list_items)
            .ok_or(DefinitionError::MissingKey(Z_FUNCTION_ARGUMENTS))?;

        let mut arguments = Vec::with_capacity(declarations.len());
        for (index, declaration) in declarations.into_iter().enumerate() {
            let spec = argument_spec(declaration).ok_or(DefinitionError::BadArgument { index })?;
            arguments.push(spec);
        }

        Ok(FunctionSignature { arguments, return_type })
    }

    /// Names of the builtin implementations attached inline to a function.
    ///
    /// Implementations stored as references to other objects are skipped.
    pub fn builtin_implementations(&self) -> Vec<String> {
        let Ok(inner) = self.function_inner() else {
            return Vec::new();
        };
        inner
            .get(Z_FUNCTION_IMPLEMENTATIONS)
            .and_then(list_items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Value::as_object)
            .filter(|imp| imp.get(Z_OBJECT_TYPE).and_then(Value::as_str) == Some(Z_IMPLEMENTATION))
            .filter_map(|imp| imp.get(Z_IMPLEMENTATION_BUILTIN).and_then(string_value))
            .collect()
    }

    /// Label in the given language (a language ZID such as `Z1002`).
    pub fn label(&self, language: &str) -> Option<String> {
        let labels = self
            .content
            .as_object()?
            .get(Z_PERSISTENTOBJECT_LABEL)?
            .as_object()?
            .get(Z_MULTILINGUALSTRING_VALUE)
            .and_then(list_items)?;
        labels.into_iter().filter_map(Value::as_object).find_map(|mono| {
            let lang = mono.get(Z_MONOLINGUALSTRING_LANGUAGE).and_then(string_value)?;
            if lang == language {
                mono.get(Z_MONOLINGUALSTRING_VALUE).and_then(string_value)
            } else {
                None
            }
        })
    }

    fn inner(&self) -> Option<&Map<String, Value>> {
        let outer = self.content.as_object()?;
        if outer.get(Z_OBJECT_TYPE).and_then(Value::as_str) != Some(Z_PERSISTENTOBJECT) {
            return None;
        }
        outer.get(Z_PERSISTENTOBJECT_VALUE)?.as_object()
    }

    fn function_inner(&self) -> Result<&Map<String, Value>, DefinitionError> {
        let inner = self.inner().ok_or(DefinitionError::NotPersistent)?;
        match self.kind() {
            Some(Kind::Function) => Ok(inner),
            Some(kind) => Err(DefinitionError::NotAFunction(kind)),
            None => Err(DefinitionError::NotPersistent),
        }
    }
}

/// Items of a canonical typed list, without the leading item-type marker.
fn list_items(value: &Value) -> Option<Vec<&Value>> {
    let items = value.as_array()?;
    let skip = usize::from(matches!(items.first(), Some(Value::String(_))));
    Some(items.iter().skip(skip).collect())
}

/// A string either in canonical form (`"abc"`) or as an explicit Z6 object.
fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) if map.get(Z_OBJECT_TYPE).and_then(Value::as_str) == Some(Z_STRING) => {
            map.get(Z_STRING_VALUE).and_then(Value::as_str).map(str::to_string)
        }
        _ => None,
    }
}

fn type_ref(value: &Value) -> Option<TypeRef> {
    match value {
        Value::String(zid) if !zid.is_empty() => Some(TypeRef::new(zid.clone())),
        Value::Object(_) => Some(TypeRef::new(value.to_string())),
        _ => None,
    }
}

fn argument_spec(value: &Value) -> Option<ArgumentSpec> {
    let declaration = value.as_object()?;
    if declaration.get(Z_OBJECT_TYPE).and_then(Value::as_str) != Some(Z_ARGUMENTDECLARATION) {
        return None;
    }
    let declared_type = declaration.get(Z_ARGUMENTDECLARATION_TYPE).and_then(type_ref)?;
    let key = declaration.get(Z_ARGUMENTDECLARATION_ID).and_then(string_value)?;
    Some(ArgumentSpec::new(key, declared_type))
}

/// Registry kept in memory, keyed by ZID.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    entries: HashMap<String, RawEntry>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn insert(&mut self, entry: RawEntry) -> &mut Self {
        self.entries.insert(entry.zid().to_string(), entry);
        self
    }

    /// Build a registry from the definitions in a registry file.
    pub fn from_file(file: &RegistryFile) -> Self {
        let mut registry = Self::new();
        for entry in file.entries() {
            registry.insert(entry);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegistryLookup for InMemoryRegistry {
    fn resolve_by_name(&self, name: &str) -> Option<RawEntry> {
        self.entries.get(name).cloned()
    }
}

