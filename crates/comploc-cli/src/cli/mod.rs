//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "comploc",
    bin_name = "comploc",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Localize composition trees from a CSV manifest",
    long_about = "comploc duplicates every composition named in a manifest once per \
                  locale, relinks the duplicated sub-compositions, and writes each \
                  locale's text and asset values into its own copy.",
    after_help = "EXAMPLES:\n\
        \x20 comploc run --document promo.json --manifest strings.csv\n\
        \x20 comploc run -d promo.json -m strings.csv --locale fr --output promo_fr.json\n\
        \x20 comploc locales strings.csv\n\
        \x20 comploc tree --document promo.json --root Main",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Duplicate and localize the manifest's compositions.
    #[command(
        visible_alias = "r",
        about = "Localize a document from a manifest",
        after_help = "EXAMPLES:\n\
            \x20 comploc run -d promo.json -m strings.csv --yes\n\
            \x20 comploc run -d promo.json -m strings.csv -o out.json --assets ./footage\n\
            \x20 comploc run -d promo.json -m strings.tsv --delimiter '\\t' --dry-run"
    )]
    Run(RunArgs),

    /// List the locale columns of a manifest.
    #[command(
        about = "List manifest locales",
        after_help = "EXAMPLES:\n\
            \x20 comploc locales strings.csv\n\
            \x20 comploc locales strings.csv --format json"
    )]
    Locales(LocalesArgs),

    /// Show the sub-compositions of a root in duplication order.
    #[command(
        about = "Show a root's sub-compositions",
        after_help = "EXAMPLES:\n\
            \x20 comploc tree --document promo.json --root Main"
    )]
    Tree(TreeArgs),

    /// Initialise a comploc configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 comploc init                       # default location\n\
            \x20 comploc --config ./comploc.toml init\n\
            \x20 comploc init --force               # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 comploc completions bash > ~/.local/share/bash-completion/completions/comploc\n\
            \x20 comploc completions zsh  > ~/.zfunc/_comploc\n\
            \x20 comploc completions fish > ~/.config/fish/completions/comploc.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the comploc configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 comploc config get replication.separator\n\
            \x20 comploc config list\n\
            \x20 comploc config path"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// Whether the command needs an explicit `--config` file to exist.
    ///
    /// `init` creates the file, `config path` only prints it and
    /// completions never look at it.
    pub fn reads_config(&self) -> bool {
        !matches!(
            self,
            Self::Init(_) | Self::Completions(_) | Self::Config(ConfigCommands::Path)
        )
    }
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `comploc run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON document holding the compositions.
    #[arg(
        short = 'd',
        long = "document",
        value_name = "FILE",
        help = "Document to localize"
    )]
    pub document: PathBuf,

    /// Delimited manifest (rootName, leafName, kind, one column per locale).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Manifest file"
    )]
    pub manifest: PathBuf,

    /// Where to write the localized document (default: in place).
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the result here instead of overwriting the document"
    )]
    pub output: Option<PathBuf>,

    /// Restrict the run to these locales (repeatable).
    #[arg(
        short = 'l',
        long = "locale",
        value_name = "LOCALE",
        help = "Only run this locale (repeatable)"
    )]
    pub locales: Vec<String>,

    /// Base directory for relative asset paths.
    #[arg(
        short = 'a',
        long = "assets",
        value_name = "DIR",
        help = "Asset directory (default: the document's directory)"
    )]
    pub assets: Option<PathBuf>,

    /// Manifest field delimiter.
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        value_parser = parse_delimiter,
        help = "Manifest delimiter (default from config, usually ',')"
    )]
    pub delimiter: Option<char>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Overwrite the document without asking"
    )]
    pub yes: bool,

    /// Plan the run without touching the document.
    #[arg(long = "dry-run", help = "Show what would be duplicated without writing")]
    pub dry_run: bool,
}

// ── locales ───────────────────────────────────────────────────────────────────

/// Arguments for `comploc locales`.
#[derive(Debug, Args)]
pub struct LocalesArgs {
    /// Manifest file.
    #[arg(value_name = "MANIFEST", help = "Manifest file")]
    pub manifest: PathBuf,

    /// Manifest field delimiter.
    #[arg(long = "delimiter", value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
}

// ── tree ──────────────────────────────────────────────────────────────────────

/// Arguments for `comploc tree`.
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// JSON document holding the compositions.
    #[arg(short = 'd', long = "document", value_name = "FILE")]
    pub document: PathBuf,

    /// Name of the root composition.
    #[arg(short = 'r', long = "root", value_name = "NAME")]
    pub root: String,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `comploc init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `comploc completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `comploc config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `replication.separator`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// Accepts one ASCII character, or the escapes `\t` and `tab`.
fn parse_delimiter(raw: &str) -> Result<char, String> {
    let c = match raw {
        "\\t" | "tab" => '\t',
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("expected a single character, got '{raw}'")),
            }
        }
    };
    if c.is_ascii() && c != '"' {
        Ok(c)
    } else {
        Err(format!("'{c}' cannot be used as a delimiter"))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::global::OutputFormat;
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_command() {
        let cli = Cli::parse_from([
            "comploc",
            "run",
            "--document",
            "doc.json",
            "--manifest",
            "m.csv",
            "-l",
            "en",
            "-l",
            "fr",
            "--yes",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected Run command");
        };
        assert_eq!(args.locales, vec!["en", "fr"]);
        assert!(args.yes);
        assert!(args.output.is_none());
    }

    #[test]
    fn format_is_global() {
        let cli = Cli::parse_from(["comploc", "locales", "m.csv", "--format", "json"]);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }

    #[test]
    fn delimiter_accepts_tab_escape() {
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert_eq!(parse_delimiter(";"), Ok(';'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["comploc", "--quiet", "--verbose", "locales", "m.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn only_reading_commands_require_the_config_file() {
        let parse = |args: &[&str]| Cli::parse_from(args).command.reads_config();
        assert!(!parse(&["comploc", "--config", "new.toml", "init"]));
        assert!(!parse(&["comploc", "--config", "new.toml", "config", "path"]));
        assert!(!parse(&["comploc", "completions", "bash"]));
        assert!(parse(&["comploc", "--config", "new.toml", "config", "list"]));
        assert!(parse(&["comploc", "locales", "m.csv"]));
    }

    #[test]
    fn run_requires_document_and_manifest() {
        assert!(Cli::try_parse_from(["comploc", "run", "--document", "doc.json"]).is_err());
    }
}
