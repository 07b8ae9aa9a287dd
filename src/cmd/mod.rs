mod draw;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sqldraw::diagram::SchemaJson;
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqldraw")]
#[command(version)]
#[command(about = "Draw a relational database schema as a D2 diagram", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Introspect a database and draw its tables and inferred relationships
    Draw {
        /// Database URN: postgres://, cockroach:// or duckdb://PATH (or a .duckdb/.db file)
        #[arg(long, env = "SQLDRAW_DB")]
        db: Option<String>,

        /// Relationship override file (JSON, or YAML by extension).
        /// Defaults to schema.json when present; pass "" to disable
        #[arg(short, long)]
        metadata: Option<String>,

        /// Output file, or - for stdout (default: graph.<format>)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: d2, svg, png, pdf, json (inferred from --output if not specified)
        #[arg(short, long)]
        format: Option<String>,

        /// Layout direction: up, down, left, right
        #[arg(long, default_value = "down")]
        direction: String,

        /// d2 layout engine used when rendering
        #[arg(long, default_value = "elk")]
        layout: String,

        /// d2 executable used when rendering
        #[arg(long, default_value = "d2")]
        d2_bin: String,

        /// Only draw specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Group tables into containers: NAME[:LABEL]=PATTERN[,PATTERN...] (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Name of the single group used when no --group is given
        #[arg(long, default_value = "schema")]
        name: String,

        /// Show progress while tables are described
        #[arg(short, long)]
        progress: bool,

        /// Verbose logging (RUST_LOG overrides)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the JSON Schema of the `--format json` output
    JsonSchema,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Draw {
            db,
            metadata,
            output,
            format,
            direction,
            layout,
            d2_bin,
            tables,
            exclude,
            groups,
            name,
            progress,
            verbose,
        } => {
            init_logging(verbose);

            let Some(db) = db.filter(|d| !d.trim().is_empty()) else {
                let mut command = Cli::command();
                if let Some(draw) = command.find_subcommand_mut("draw") {
                    draw.print_help()?;
                }
                return Ok(());
            };

            draw::run(
                db, metadata, output, format, direction, layout, d2_bin, tables, exclude, groups,
                name, progress,
            )
        }
        Commands::JsonSchema => {
            let schema = schemars::schema_for!(SchemaJson);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sqldraw", &mut io::stdout());
            Ok(())
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG takes precedence over `--verbose`
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "sqldraw=debug" } else { "sqldraw=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
