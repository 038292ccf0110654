//! Implementation of the `comploc locales` command.

use crate::{
    cli::LocalesArgs,
    commands::run::load_manifest,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: LocalesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifest = load_manifest(&args.manifest, args.delimiter, &config)?;

    if output.is_json() {
        return output.json(&manifest.locales());
    }

    // One per line so the list pipes cleanly into other tools.
    for locale in manifest.locales() {
        output.print(locale)?;
    }
    Ok(())
}
