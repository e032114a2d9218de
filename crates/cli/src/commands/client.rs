use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;
use zcall_core::config::{open_object_store, ClientConfig, ClientLayout};
use zcall_core::registry::ObjectStore;

use crate::{canonicalize_or_current, infer_client_name};

#[derive(Serialize)]
pub struct ClientInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub store_path: String,
    pub enable_parser_function: bool,
    pub supported_types: Vec<String>,
    pub call_timeout_ms: Option<u64>,
    pub object_count: usize,
    pub function_count: usize,
}

/// Initialize a new client at `root`.
pub fn init_client_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);

    // Derive client name if not provided.
    let client_name = match name {
        Some(n) => n,
        None => infer_client_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;

    let config = ClientConfig::new(&client_name, layout.store_path_relative_string());
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write client config: {}", layout.config_path.display())
    })?;

    // Create the store immediately so follow-on commands can rely on its presence.
    ObjectStore::open(&layout.store_path).with_context(|| {
        format!("Failed to initialize object store at {}", layout.store_path.display())
    })?;

    println!("Initialized zcall client:");
    println!("  Name: {}", client_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Store path (relative): {}", config.store.path);

    Ok(())
}

/// Show configuration and store summary for an existing client.
pub fn client_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);

    let (config, store_path, store) = open_object_store(&layout)?;
    let objects = store.list().context("Failed to list stored objects")?;
    let function_count =
        objects.iter().filter(|o| o.kind.as_deref() == Some(zcall_core::model::Z_FUNCTION)).count();

    let snapshot = ClientInfoSnapshot {
        name: config.name.clone(),
        root: layout.root.display().to_string(),
        config_file: layout.config_path.display().to_string(),
        config_version: config.config_version.clone(),
        store_path: store_path.display().to_string(),
        enable_parser_function: config.enable_parser_function,
        supported_types: config.supported_types.clone(),
        call_timeout_ms: config.call_timeout_ms,
        object_count: objects.len(),
        function_count,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("zcall Client Info");
    println!("=================");
    println!("Name: {}", snapshot.name);
    println!("Root: {}", snapshot.root);
    println!("Config file: {}", snapshot.config_file);
    println!("Config version: {}", snapshot.config_version);
    println!("Store: {}", snapshot.store_path);
    println!(
        "Parser function: {}",
        if snapshot.enable_parser_function { "enabled" } else { "disabled" }
    );
    println!("Supported types: {}", snapshot.supported_types.join(", "));
    match snapshot.call_timeout_ms {
        Some(ms) => println!("Call timeout: {} ms", ms),
        None => println!("Call timeout: none"),
    }
    println!("Objects: {} ({} functions)", snapshot.object_count, snapshot.function_count);

    Ok(())
}
