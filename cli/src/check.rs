#![deny(missing_docs)]

//! # Check Command
//!
//! Runs the full pipeline (load, resolve, plan, walk operations) and reports a
//! one line summary, or the first failure.

use crate::error::CliResult;
use crate::loader::load_document;
use oaslink_core::generate_context;
use std::path::PathBuf;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(env = "OASLINK_SPEC")]
    pub spec: PathBuf,
}

/// Validates the document and summarizes what a generator would see.
pub fn execute(args: &CheckArgs) -> CliResult<String> {
    let document = load_document(&args.spec)?;
    let context = generate_context(&document)?;
    let operations = context.operations()?;

    let plan = context.exported_component_schemas_map();
    let aliases = plan.iter().filter(|(_, e)| e.is_alias()).count();

    tracing::info!(operations = operations.len(), "document checked");
    Ok(format!(
        "{}: {} operations, {} exported schemas ({} aliases)",
        args.spec.display(),
        operations.len(),
        plan.len() - aliases,
        aliases
    ))
}
