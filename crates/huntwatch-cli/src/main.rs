mod commands;
mod config;
mod hex;
mod names;
mod render;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use huntwatch_core::{
    CachedNames, NameResolver, NoNames, OffsetTable, TelemetryReader, builtin_offsets,
    load_offsets,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::snapshot::Entity;
use crate::config::{DEFAULT_CONFIG_PATH, FileConfig, Overrides, Settings};
use crate::names::SqliteNames;

#[derive(Parser)]
#[command(name = "huntwatch")]
#[command(about = "Read-only telemetry for Monster Hunter: World", long_about = None)]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Offset table JSON (defaults to the built-in table)
    #[arg(short, long, global = true)]
    offsets: Option<PathBuf>,

    /// Game executable name
    #[arg(long, global = true)]
    process: Option<String>,

    /// Snapshot cache window in milliseconds
    #[arg(long, global = true)]
    cache_ms: Option<u64>,

    /// SQLite database with localized names
    #[arg(long, global = true, env = "HUNTWATCH_NAMES_DB")]
    names_db: Option<PathBuf>,

    /// Name languages in lookup order
    #[arg(long = "lang", global = true, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and report the attached process
    Status,

    /// Print one snapshot (or one entity) as JSON
    Snapshot {
        /// Bypass the snapshot cache
        #[arg(long)]
        fresh: bool,

        /// Print only this entity
        #[arg(short, long, value_enum)]
        entity: Option<Entity>,
    },

    /// Poll snapshots and print one JSON line each
    Watch {
        /// Poll interval in milliseconds
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,

        /// Stop after this many polls
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Human-readable hunter summary
    Summary,

    /// Offset table maintenance
    Offsets {
        #[command(subcommand)]
        command: OffsetsCommand,
    },

    /// Resolve one pointer chain and hexdump the bytes it points at
    Probe {
        /// Chain name (player, weapon, monsters, quest_timer, ...)
        chain: String,

        /// Bytes to read
        #[arg(short, long, default_value = "64")]
        size: usize,

        /// Replace the chain's static base (hex)
        #[arg(long, value_parser = hex::parse_hex_address)]
        base: Option<u64>,
    },
}

#[derive(Subcommand)]
enum OffsetsCommand {
    /// Write the built-in offset table as JSON
    Dump {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate an offset table file
    Check {
        path: PathBuf,

        /// Required table version
        #[arg(long)]
        expect_version: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "huntwatch=debug"
    } else {
        "huntwatch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::resolve(
        FileConfig::load_or_default(&cli.config),
        Overrides {
            process_name: cli.process,
            cache_ms: cli.cache_ms,
            offsets: cli.offsets,
            names_db: cli.names_db,
            languages: cli.languages,
        },
    );

    match cli.command {
        Commands::Offsets { command } => match command {
            OffsetsCommand::Dump { output } => commands::offsets::dump(output.as_deref()),
            OffsetsCommand::Check {
                path,
                expect_version,
            } => commands::offsets::check(&path, expect_version.as_deref()),
        },
        Commands::Status => commands::status::run(&build_reader(&settings)),
        Commands::Snapshot { fresh, entity } => {
            commands::snapshot::run(&build_reader(&settings), &open_names(&settings), entity, fresh)
        }
        Commands::Watch { interval_ms, count } => commands::watch::run(
            &build_reader(&settings),
            &open_names(&settings),
            Duration::from_millis(interval_ms),
            count,
        ),
        Commands::Summary => {
            commands::summary::run(&build_reader(&settings), &open_names(&settings))
        }
        Commands::Probe { chain, size, base } => commands::probe::run(
            load_offset_table(&settings),
            settings.reader_config(),
            &chain,
            size,
            base,
        ),
    }
}

fn build_reader(settings: &Settings) -> TelemetryReader {
    TelemetryReader::with_config(load_offset_table(settings), settings.reader_config())
}

fn load_offset_table(settings: &Settings) -> OffsetTable {
    let Some(path) = &settings.offsets else {
        return builtin_offsets();
    };
    match load_offsets(path) {
        Ok(table) => {
            info!("Loaded offsets version {} from {}", table.version, path.display());
            table
        }
        Err(e) => {
            warn!(
                "Failed to load offsets from {}: {}, using built-in table",
                path.display(),
                e
            );
            builtin_offsets()
        }
    }
}

fn open_names(settings: &Settings) -> Box<dyn NameResolver> {
    let Some(path) = &settings.names_db else {
        return Box::new(NoNames);
    };
    match SqliteNames::open(path, settings.languages.clone()) {
        Ok(names) => {
            info!("Using names from {}", path.display());
            Box::new(CachedNames::new(names))
        }
        Err(e) => {
            warn!("Failed to open names database {}: {}", path.display(), e);
            Box::new(NoNames)
        }
    }
}
