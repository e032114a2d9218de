use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use zcall_core::config::{open_object_store, ClientLayout};
use zcall_core::registry::{RegistryFile, StoredObject};

use crate::canonicalize_or_current;

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub file: String,
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// Load a registry file (YAML or JSON) and upsert every definition into the store.
pub fn import_registry_command(root: &str, file: &str) -> Result<ImportSummary> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);
    let (_config, store_path, store) = open_object_store(&layout)?;

    let registry_file = RegistryFile::load(Path::new(file))?;
    let entries = registry_file.entries();

    let mut changed = 0;
    for entry in &entries {
        if store
            .upsert(entry)
            .with_context(|| format!("Failed to store object {}", entry.zid()))?
        {
            changed += 1;
        }
    }

    let summary = ImportSummary {
        file: file.to_string(),
        total: entries.len(),
        changed,
        unchanged: entries.len() - changed,
    };
    tracing::info!(file, total = summary.total, changed, "imported registry file");

    println!("Imported registry file:");
    println!("  File: {}", summary.file);
    println!("  Objects: {} ({} changed, {} unchanged)", summary.total, changed, summary.unchanged);
    println!("  Store: {}", store_path.display());

    Ok(summary)
}

/// List all objects in the store.
pub fn list_objects_command(root: &str, json: bool) -> Result<Vec<StoredObject>> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);
    let (_config, _store_path, store) = open_object_store(&layout)?;

    let objects = store.list().context("Failed to list stored objects")?;

    if json {
        let serialized = serde_json::to_string_pretty(&objects)
            .context("Failed to serialize objects to JSON")?;
        println!("{}", serialized);
        return Ok(objects);
    }

    println!("Objects ({}):", objects.len());
    if objects.is_empty() {
        println!("  (none)");
        return Ok(objects);
    }
    for object in &objects {
        let kind = object.kind.as_deref().unwrap_or("invalid");
        match &object.label {
            Some(label) => println!("  - {} [{}] - {}", object.zid, kind, label),
            None => println!("  - {} [{}]", object.zid, kind),
        }
    }

    Ok(objects)
}
