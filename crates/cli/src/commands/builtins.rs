use anyhow::Result;
use serde::Serialize;
use zcall_core::runtime::BuiltinOp;

#[derive(Debug, Serialize)]
pub struct BuiltinInfo {
    pub name: String,
    pub description: String,
}

/// List the builtin implementations functions can reference.
pub fn list_builtins_command(json: bool) -> Result<()> {
    let entries: Vec<BuiltinInfo> = BuiltinOp::all()
        .iter()
        .map(|op| {
            let description = match op {
                BuiltinOp::Echo => "Returns its input unchanged",
                BuiltinOp::Uppercase => "Upper-cases its input",
                BuiltinOp::Lowercase => "Lower-cases its input",
                BuiltinOp::Reverse => "Reverses its input by character",
                BuiltinOp::Trim => "Strips surrounding whitespace",
                BuiltinOp::Length => "Counts the characters of its input",
                BuiltinOp::Concat => "Joins all inputs in order",
            };
            BuiltinInfo { name: op.as_str().to_string(), description: description.to_string() }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Builtins:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }

    Ok(())
}
