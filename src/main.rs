//! namaste-map: NAMASTE to ICD-11 semantic mapping tool
//!
//! Maps traditional-medicine terminology codes onto ICD-11 MMS and TM2
//! entries by embedding similarity.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use namaste_map::{
    cli,
    config::{
        generate_example_config, search_dirs, AppConfig, MapPaths, MergePaths, ProviderKind,
        ReferenceInput, CONFIG_FILE_NAMES,
    },
    pipeline::exit_code_for,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "namaste-map")]
#[command(version)]
#[command(about = "Map NAMASTE codes onto ICD-11 (MMS + TM2) by semantic similarity", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Mapping written
    1  Unexpected failure (e.g. output could not be written)
    2  Input or configuration error
    3  Embedding or matching error

EXAMPLES:
    # Merge the two ICD-11 modules, then map against the merged table
    namaste-map merge --mms icd11_mms.csv --tm2 icd11_tm2.csv -o icd11_merged.csv
    namaste-map map --source namaste.csv --reference icd11_merged.csv -o mapping.csv

    # One step, with a confidence summary
    namaste-map map --source namaste.csv --mms icd11_mms.csv --tm2 icd11_tm2.csv \\
        -o mapping.csv --summary summary.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `map` subcommand
#[derive(Parser)]
struct MapArgs {
    /// NAMASTE source table (CSV with code, display, synonyms)
    #[arg(long)]
    source: PathBuf,

    /// Pre-merged ICD-11 reference table with a module column
    #[arg(long, conflicts_with_all = ["mms", "tm2"], required_unless_present_all = ["mms", "tm2"])]
    reference: Option<PathBuf>,

    /// ICD-11 MMS table (merged with --tm2 on the fly)
    #[arg(long, requires = "tm2")]
    mms: Option<PathBuf>,

    /// ICD-11 TM2 table (merged with --mms on the fly)
    #[arg(long, requires = "mms")]
    tm2: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Output format
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Embedding provider
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Vector dimension of the hashing provider
    #[arg(long)]
    dimension: Option<usize>,

    /// Model name of the fastembed provider
    #[arg(long)]
    model: Option<String>,

    /// Texts per embedding call
    #[arg(long)]
    batch_size: Option<usize>,

    /// Match on a single thread
    #[arg(long)]
    no_parallel: bool,

    /// Treat an empty source table as an error
    #[arg(long)]
    fail_on_empty_source: bool,

    /// Also write a JSON confidence summary
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Arguments for the `merge` subcommand
#[derive(Parser)]
struct MergeArgs {
    /// ICD-11 MMS table
    #[arg(long)]
    mms: PathBuf,

    /// ICD-11 TM2 table
    #[arg(long)]
    tm2: PathBuf,

    /// Unified reference table output (CSV)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Map every NAMASTE entry to its best ICD-11 entry
    Map(MapArgs),

    /// Merge the MMS and TM2 tables into one reference table
    Merge(MergeArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .namaste-map.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; RUST_LOG overrides the flags
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Map(args) => {
            let (mut config, _) = cli::load_config(cli.config.as_deref())?;
            apply_map_overrides(&mut config, &args);
            let reference = match (args.reference, args.mms, args.tm2) {
                (Some(path), _, _) => ReferenceInput::Merged(path),
                (None, Some(mms), Some(tm2)) => ReferenceInput::Split { mms, tm2 },
                _ => anyhow::bail!("either --reference or both --mms and --tm2 are required"),
            };
            let paths = MapPaths {
                source: args.source,
                reference,
                output: args.output,
                summary: args.summary,
            };
            cli::run_map(config, paths)
        }

        Commands::Merge(args) => {
            let (config, _) = cli::load_config(cli.config.as_deref())?;
            cli::run_merge(
                config,
                MergePaths {
                    mms: args.mms,
                    tm2: args.tm2,
                    output: args.output,
                },
            )
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "namaste-map", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = namaste_map::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = cli::load_config(cli.config.as_deref())?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for path in search_dirs() {
                    eprintln!("  {}", path.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match namaste_map::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".namaste-map.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

/// CLI flags win over config file values.
fn apply_map_overrides(config: &mut AppConfig, args: &MapArgs) {
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(provider) = args.provider {
        config.embedding.provider = provider;
    }
    if let Some(dimension) = args.dimension {
        config.embedding.dimension = dimension;
    }
    if let Some(model) = &args.model {
        config.embedding.model.clone_from(model);
    }
    if let Some(batch_size) = args.batch_size {
        config.embedding.batch_size = batch_size;
    }
    if args.no_parallel {
        config.matching.parallel = false;
    }
    if args.fail_on_empty_source {
        config.matching.allow_empty_source = false;
    }
}
