//! Implementation of the `comploc run` command.
//!
//! Responsibility: load the manifest and document, call the core localize
//! service, write the document, and display the report. No business logic
//! lives here.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

use comploc_adapters::{JsonDocumentStore, LocalAssets};
use comploc_core::{
    application::{LocalizeService, RunPlan},
    domain::{Manifest, ManifestOptions, Report},
};

use crate::{
    cli::{RunArgs, global::GlobalArgs},
    config::{AppConfig, delimiter_byte},
    error::{CliError, CliResult, IntoCli, read_input},
    output::OutputManager,
};

/// JSON form of a finished run.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    document: &'a Path,
    generated_at: String,
    #[serde(flatten)]
    report: &'a Report,
}

/// JSON form of a dry run.
#[derive(Debug, Serialize)]
struct PlanSummary {
    locales: Vec<String>,
    roots: Vec<PlannedRoot>,
    duplicates_per_locale: usize,
}

#[derive(Debug, Serialize)]
struct PlannedRoot {
    name: String,
    sub_containers: usize,
}

/// Execute the `comploc run` command.
///
/// Dispatch sequence:
/// 1. Parse the manifest and apply the locale filter
/// 2. Load the document
/// 3. Dry run: plan, print, stop
/// 4. Confirm in-place overwrite unless `--yes` or `--output`
/// 5. Run the engine, then save the document
/// 6. Print the report
#[instrument(skip_all, fields(document = %args.document.display()))]
pub fn execute(
    args: RunArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Manifest
    let manifest = load_manifest(&args.manifest, args.delimiter, &config)?
        .with_locales(&args.locales)
        .map_err(|e| CliError::Core(e.into()))?;

    debug!(
        locales = ?manifest.locales(),
        rows = manifest.rows().len(),
        "Manifest parsed"
    );

    // 2. Document and adapters
    let store = JsonDocumentStore::new(&args.document);
    if !store.path().exists() {
        return Err(CliError::FileNotFound {
            path: args.document.clone(),
        });
    }
    let document = store.load().with_cli_context(|| "loading document")?;
    let assets = LocalAssets::new(asset_base(&args));
    let service = LocalizeService::new(
        Box::new(document.clone()),
        Box::new(assets),
        config.replication.clone(),
    );

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        let plan = service.plan(&manifest).map_err(CliError::Core)?;
        return show_plan(&plan, &output);
    }

    // 4. Confirm in-place overwrite
    let target = args.output.clone().unwrap_or_else(|| args.document.clone());
    if args.output.is_none() && !args.yes {
        if !output.can_prompt() {
            return Err(CliError::ConfirmationRequired { path: target });
        }
        let prompt = format!("Overwrite {} with the localized document?", target.display());
        if !output.confirm(&prompt)? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Run + save
    info!(locales = manifest.locales().len(), "Localization started");
    let spinner = output.spinner(&format!(
        "Localizing {} locale(s)...",
        manifest.locales().len()
    ));
    let result = service.run(&manifest);
    spinner.finish_and_clear();
    let report = result.map_err(CliError::Core)?;

    JsonDocumentStore::save_to(&document, &target).map_err(CliError::Core)?;
    info!(path = %target.display(), "Document written");

    // 6. Report
    if output.is_json() {
        return output.json(&RunSummary {
            document: &target,
            generated_at: Utc::now().to_rfc3339(),
            report: &report,
        });
    }
    show_report(&report, &target, &global, &output)
}

/// Read and parse a manifest; the flag delimiter beats the config one.
pub fn load_manifest(
    path: &Path,
    delimiter: Option<char>,
    config: &AppConfig,
) -> CliResult<Manifest> {
    let raw = read_input(path)?;
    let delimiter = delimiter_byte(delimiter.unwrap_or(config.manifest.delimiter)).map_err(
        |e| CliError::InvalidInput {
            message: e.to_string(),
            source: None,
        },
    )?;
    Manifest::parse_with(&raw, ManifestOptions { delimiter }).map_err(|e| CliError::Core(e.into()))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Relative asset paths resolve against `--assets`, else the document's
/// directory.
fn asset_base(args: &RunArgs) -> PathBuf {
    args.assets.clone().unwrap_or_else(|| {
        args.document
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn show_plan(plan: &RunPlan, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return output.json(&PlanSummary {
            locales: plan.locales.clone(),
            roots: plan
                .roots
                .iter()
                .map(|r| PlannedRoot {
                    name: r.name.clone(),
                    sub_containers: r.subtree.len(),
                })
                .collect(),
            duplicates_per_locale: plan.duplicates_per_locale(),
        });
    }

    output.info(&format!(
        "Dry run: would localize {} root(s) into {} locale(s): {}",
        plan.roots.len(),
        plan.locales.len(),
        plan.locales.join(", ")
    ))?;
    for root in &plan.roots {
        output.info(&format!(
            "  {:<20} {} sub-composition(s)",
            root.name,
            root.subtree.len()
        ))?;
    }
    output.info(&format!(
        "  {} duplicate(s) per locale",
        plan.duplicates_per_locale()
    ))?;
    Ok(())
}

fn show_report(
    report: &Report,
    target: &Path,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<()> {
    output.success(&format!(
        "Localized {} locale(s) into {}",
        report.locales(),
        target.display()
    ))?;
    output.print(&format!(
        "  applied: {}  skipped: {}  failed: {}",
        report.applied(),
        report.skipped(),
        report.failed()
    ))?;

    if !report.is_clean() {
        output.warning(&format!("{} substitution(s) failed:", report.failed()))?;
        for error in report.errors() {
            output.print(&format!("  - {error}"))?;
        }
        if report.unlisted_failures() > 0 {
            output.print(&format!("  ... and {} more", report.unlisted_failures()))?;
        }
        if !global.is_verbose() {
            output.info("Re-run with -v for per-locale details")?;
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_args(document: &str) -> RunArgs {
        RunArgs {
            document: PathBuf::from(document),
            manifest: PathBuf::from("m.csv"),
            output: None,
            locales: vec![],
            assets: None,
            delimiter: None,
            yes: false,
            dry_run: false,
        }
    }

    #[test]
    fn assets_default_to_document_directory() {
        assert_eq!(asset_base(&run_args("work/promo.json")), PathBuf::from("work"));
        assert_eq!(asset_base(&run_args("promo.json")), PathBuf::from("."));
    }

    #[test]
    fn explicit_assets_win() {
        let mut args = run_args("work/promo.json");
        args.assets = Some(PathBuf::from("/footage"));
        assert_eq!(asset_base(&args), PathBuf::from("/footage"));
    }

    #[test]
    fn flag_delimiter_beats_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "rootName;leafName;en\nMain;Title;Hi, you\n").unwrap();

        let manifest = load_manifest(&path, Some(';'), &AppConfig::default()).unwrap();
        assert_eq!(manifest.rows()[0].value("en"), Some("Hi, you"));
    }

    #[test]
    fn manifest_without_locales_is_user_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "rootName,leafName,kind\n").unwrap();

        let err = load_manifest(&path, None, &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
