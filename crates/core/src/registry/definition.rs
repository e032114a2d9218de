use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{
    Z_ARGUMENTDECLARATION, Z_FUNCTION, Z_IMPLEMENTATION, Z_LANG_EN, Z_MONOLINGUALSTRING,
    Z_MULTILINGUALSTRING, Z_PERSISTENTOBJECT, Z_STRING,
};
use crate::registry::RawEntry;

fn default_type() -> String {
    Z_STRING.to_string()
}

/// Declared argument in a friendly function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    /// Argument key; defaults to `<zid>K<n>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub arg_type: String,
}

/// Function definition in a registry file, converted to a Z2/Z8 object on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub zid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_type")]
    pub return_type: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,
    /// Name of a builtin implementation (see `runtime::builtin`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin: Option<String>,
}

impl FunctionDefinition {
    pub fn validate(&self) -> Result<()> {
        if !is_zid(&self.zid) {
            return Err(anyhow!("Function definition has invalid ZID '{}'", self.zid));
        }
        for (index, arg) in self.arguments.iter().enumerate() {
            if arg.arg_type.trim().is_empty() {
                return Err(anyhow!(
                    "Function {} argument {} must declare a type",
                    self.zid,
                    index + 1
                ));
            }
        }
        Ok(())
    }

    /// Canonical persistent-object form of this definition.
    pub fn to_zobject(&self) -> Value {
        let mut declarations = vec![json!(Z_ARGUMENTDECLARATION)];
        for (index, arg) in self.arguments.iter().enumerate() {
            let key = arg.key.clone().unwrap_or_else(|| format!("{}K{}", self.zid, index + 1));
            declarations.push(json!({
                "Z1K1": Z_ARGUMENTDECLARATION,
                "Z17K1": arg.arg_type,
                "Z17K2": key,
            }));
        }

        let mut implementations = vec![json!(Z_IMPLEMENTATION)];
        if let Some(builtin) = &self.builtin {
            implementations.push(json!({
                "Z1K1": Z_IMPLEMENTATION,
                "Z14K1": self.zid,
                "Z14K4": builtin,
            }));
        }

        let mut labels = vec![json!(Z_MONOLINGUALSTRING)];
        if let Some(label) = &self.label {
            labels.push(json!({
                "Z1K1": Z_MONOLINGUALSTRING,
                "Z11K1": Z_LANG_EN,
                "Z11K2": label,
            }));
        }

        json!({
            "Z1K1": Z_PERSISTENTOBJECT,
            "Z2K1": { "Z1K1": Z_STRING, "Z6K1": self.zid },
            "Z2K2": {
                "Z1K1": Z_FUNCTION,
                "Z8K1": declarations,
                "Z8K2": self.return_type,
                "Z8K4": implementations,
            },
            "Z2K3": { "Z1K1": Z_MULTILINGUALSTRING, "Z12K1": labels },
        })
    }

    pub fn to_entry(&self) -> RawEntry {
        RawEntry::new(self.zid.clone(), self.to_zobject())
    }
}

/// A file of definitions to seed a registry with.
///
/// `functions` use the friendly form above; `objects` are raw canonical
/// Z-objects keyed by ZID and are stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
    #[serde(default)]
    pub objects: BTreeMap<String, Value>,
}

impl RegistryFile {
    /// Load a registry file (YAML, or JSON when the extension is `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read registry file at {}", path.display()))?;
        let file: RegistryFile = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_slice(&bytes).context("Failed to parse registry file JSON")?
        } else {
            serde_yaml::from_slice(&bytes).context("Failed to parse registry file YAML")?
        };
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> Result<()> {
        for function in &self.functions {
            function.validate()?;
        }
        for zid in self.objects.keys() {
            if !is_zid(zid) {
                return Err(anyhow!("Registry object has invalid ZID '{}'", zid));
            }
        }
        Ok(())
    }

    /// All entries in the file; raw objects come after friendly functions so
    /// they win on a ZID clash.
    pub fn entries(&self) -> Vec<RawEntry> {
        let mut out: Vec<RawEntry> =
            self.functions.iter().map(FunctionDefinition::to_entry).collect();
        out.extend(
            self.objects.iter().map(|(zid, content)| RawEntry::new(zid.clone(), content.clone())),
        );
        out
    }
}

/// `Z` followed by one or more digits.
pub fn is_zid(candidate: &str) -> bool {
    candidate
        .strip_prefix('Z')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
