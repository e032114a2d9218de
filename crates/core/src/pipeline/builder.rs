use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::model::{
    FunctionReference, ResolvedFunction, Z_FUNCTIONCALL, Z_FUNCTIONCALL_FUNCTION, Z_OBJECT_TYPE,
};

/// A validated function plus positional argument values, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Name the call was written with, echoed in failure messages.
    pub name: String,
    pub function: FunctionReference,
    pub arguments: Vec<String>,
}

impl CallRequest {
    /// Canonical Z7 function-call object; arguments are keyed `<zid>K<n>`.
    pub fn to_zobject(&self) -> Value {
        let zid = &self.function.zid;
        let mut call = Map::new();
        call.insert(Z_OBJECT_TYPE.to_string(), Value::String(Z_FUNCTIONCALL.to_string()));
        call.insert(Z_FUNCTIONCALL_FUNCTION.to_string(), Value::String(zid.clone()));
        for (index, value) in self.arguments.iter().enumerate() {
            call.insert(format!("{}K{}", zid, index + 1), Value::String(value.clone()));
        }
        Value::Object(call)
    }

    /// Canonical JSON text of the call.
    pub fn serialized(&self) -> String {
        self.to_zobject().to_string()
    }

    /// SHA-256 of the canonical JSON, used to correlate log lines for one call.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.serialized().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Package a resolved function and its arguments. Arguments pass through as-is;
/// the runtime decides what to do with missing or extra ones.
pub fn build(function: &ResolvedFunction, arguments: Vec<String>) -> CallRequest {
    CallRequest { name: function.name.clone(), function: function.reference.clone(), arguments }
}
