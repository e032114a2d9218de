use anyhow::Result;
use clap::{Parser, Subcommand};
use zcall::commands::{
    call_function_command, check_function_command, client_info_command, import_registry_command,
    init_client_command, list_builtins_command, list_objects_command,
};

/// Validate and dispatch wikitext function calls.
///
/// This CLI is a thin host around `zcall-core` (exposed in code as `zcall_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other hosts.
#[derive(Parser, Debug)]
#[command(
    name = "zcall",
    version,
    about = "Validate and dispatch wikitext function calls",
    long_about = None
)]
struct Cli {
    /// Log pipeline stages to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a client root.
    ///
    /// This will:
    /// - Create a `.zcall` metadata directory.
    /// - Write `.zcall/config.json` with default settings.
    /// - Create the object store at `.zcall/objects.db`.
    Init {
        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional client name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show configuration and store summary for a client.
    Info {
        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Import function definitions and raw objects from a YAML or JSON file.
    Import {
        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Registry file to import (`.json` is read as JSON, anything else as YAML).
        #[arg(long)]
        file: String,
    },

    /// List objects in the client's store.
    List {
        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List builtin implementations available to stored functions.
    Builtins {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Resolve and validate a function without calling it.
    Check {
        /// Function name (ZID), e.g. `Z10001`.
        target: String,

        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Call a function with positional string arguments.
    Call {
        /// Function name (ZID), e.g. `Z10001`.
        target: String,

        /// Positional arguments, passed through unchanged.
        args: Vec<String>,

        /// Client root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Override the configured time limit in milliseconds (0 disables it).
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Emit JSON instead of the rendered text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    zcall::init_logging(cli.verbose);

    match cli.command {
        Command::Init { root, name } => init_client_command(&root, name)?,
        Command::Info { root, json } => client_info_command(&root, json)?,
        Command::Import { root, file } => {
            import_registry_command(&root, &file)?;
        }
        Command::List { root, json } => {
            list_objects_command(&root, json)?;
        }
        Command::Builtins { json } => list_builtins_command(json)?,
        Command::Check { target, root, json } => {
            check_function_command(&root, &target, json)?;
        }
        Command::Call { target, args, root, timeout_ms, json } => {
            call_function_command(&root, &target, args, timeout_ms, json)?;
        }
    }

    Ok(())
}
