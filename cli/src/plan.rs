#![deny(missing_docs)]

//! # Plan Command
//!
//! Prints the export plan of every component schema: its export name and, for
//! aliases, the canonical component it collapses onto.

use crate::error::{CliError, CliResult};
use crate::loader::load_document;
use oaslink_core::{generate_context, ExportedComponentSchemas};
use std::path::PathBuf;

/// Output rendering of the plan.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `Component -> Export` row per entry.
    Text,
    /// Pretty printed JSON array.
    Json,
}

/// Arguments for the plan command.
#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(env = "OASLINK_SPEC")]
    pub spec: PathBuf,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Builds the context for the document and renders its export plan.
pub fn execute(args: &PlanArgs) -> CliResult<String> {
    let document = load_document(&args.spec)?;
    let context = generate_context(&document)?;
    render(context.exported_component_schemas_map(), args.format)
}

/// Renders a plan in the requested format.
pub fn render(plan: &ExportedComponentSchemas<'_>, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&plan.entries())
            .map_err(|e| CliError::General(e.to_string())),
        OutputFormat::Text => {
            let rows: Vec<String> = plan
                .entries()
                .into_iter()
                .map(|entry| match entry.alias_of {
                    Some(target) => format!(
                        "{} -> {} (alias of {})",
                        entry.component, entry.export_name, target
                    ),
                    None => format!("{} -> {}", entry.component, entry.export_name),
                })
                .collect();
            Ok(rows.join("\n"))
        }
    }
}
