use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use eemap_cli::output::OutputFormat;
use eemap_lib::{RouteStrategy, Stage};

mod commands;

use commands::partition::PartitionKind;
use commands::route::RouteCommandArgs;
use commands::MapContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "EVE Echoes starmap routing and partition utilities")]
struct Cli {
    /// Path to the map database (defaults to $EEMAP_DATABASE, then db/ee_map.db).
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Directory for cached pipeline stages (defaults to $EEMAP_CACHE_DIR, then
    /// the platform cache directory).
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest and safest paths between two system names.
    Route {
        /// Starting system name.
        #[arg(long = "from")]
        from: String,
        /// Destination system name.
        #[arg(long = "to")]
        to: String,
        /// Report a single path metric (shortest, safest or highsec).
        #[arg(long)]
        strategy: Option<RouteStrategy>,
        /// Print the map of the constellations on both paths as JSON.
        #[arg(long, conflicts_with = "strategy")]
        map: bool,
    },
    /// Show the systems of one region.
    Region {
        name: String,
        /// Print the region map as JSON.
        #[arg(long)]
        map: bool,
    },
    /// Show the systems of one constellation.
    Constellation {
        name: String,
        /// Print the constellation map as JSON.
        #[arg(long)]
        map: bool,
    },
    /// List every region.
    Regions,
    /// List every constellation.
    Constellations,
    /// Print whole-map statistics and diagnostics.
    Stats,
    /// Rebuild cached stages starting at the given stage.
    Rebuild {
        /// First stage to recompute (raw, enriched or standard).
        #[arg(long, default_value = "raw")]
        from: Stage,
        /// Delete every cached stage before rebuilding.
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = MapContext::resolve(cli.database.as_deref(), cli.cache_dir.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Route {
            from,
            to,
            strategy,
            map,
        } => commands::route::handle_route_command(
            &context,
            format,
            &RouteCommandArgs {
                from,
                to,
                strategy,
                map,
            },
        ),
        Command::Region { name, map } => commands::partition::handle_partition_command(
            &context,
            format,
            PartitionKind::Region,
            &name,
            map,
        ),
        Command::Constellation { name, map } => commands::partition::handle_partition_command(
            &context,
            format,
            PartitionKind::Constellation,
            &name,
            map,
        ),
        Command::Regions => {
            commands::partition::handle_list_command(&context, format, PartitionKind::Region)
        }
        Command::Constellations => commands::partition::handle_list_command(
            &context,
            format,
            PartitionKind::Constellation,
        ),
        Command::Stats => commands::stats::handle_stats_command(&context, format),
        Command::Rebuild { from, clear } => {
            commands::rebuild::handle_rebuild_command(&context, format, from, clear)
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
