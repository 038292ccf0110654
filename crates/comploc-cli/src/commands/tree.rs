//! Implementation of the `comploc tree` command.
//!
//! Prints the sub-compositions of one root in the order `run` duplicates
//! them: children first, the root itself last.

use serde::Serialize;

use comploc_adapters::JsonDocumentStore;
use comploc_core::{
    application::{
        ports::DocumentHost,
        services::{discover, order},
    },
    domain::GraphError,
};

use crate::{
    cli::TreeArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct TreeSummary {
    root: String,
    order: Vec<String>,
}

pub fn execute(args: TreeArgs, output: OutputManager) -> CliResult<()> {
    let store = JsonDocumentStore::new(&args.document);
    if !store.path().exists() {
        return Err(CliError::FileNotFound {
            path: args.document.clone(),
        });
    }
    let document = store.load().with_cli_context(|| "loading document")?;

    let root = document
        .find_container(&args.root)
        .with_cli_context(|| "looking up root")?
        .ok_or_else(|| {
            CliError::Core(
                GraphError::RootNotFound {
                    name: args.root.clone(),
                }
                .into(),
            )
        })?;
    let discovered = discover(&document, root).with_cli_context(|| "walking root")?;
    let subtree = order(&document, &discovered).with_cli_context(|| "ordering root")?;

    let mut names = Vec::with_capacity(subtree.len() + 1);
    for id in subtree.iter().copied().chain([root]) {
        names.push(document.container_name(id).with_cli_context(|| "naming container")?);
    }

    if output.is_json() {
        return output.json(&TreeSummary {
            root: args.root,
            order: names,
        });
    }

    output.header(&format!("Duplication order for '{}':", args.root))?;
    for (index, name) in names.iter().enumerate() {
        output.print(&format!("  {:>3}. {name}", index + 1))?;
    }
    Ok(())
}
