use std::path::PathBuf;

use clap::{Parser, Subcommand};
use opskit_core::OpskitConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "opskit",
    about = "opskit — scaling decisions, log error summaries, and object events",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: ./opskit.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide scale up / scale down / hold for every group in a utilization file.
    ///
    /// The input is a JSON array of {group_name, value, number_of_servers}
    /// records. Only the trailing window of each `value` list is used.
    Scale {
        /// Utilization input file (default: [scaling].input or cpu_utilisation.json)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Summarize ERROR lines in a server log by error type and store the result.
    Summarize {
        /// Log file (default: [logs].path or server.log)
        #[arg(short, long)]
        log: Option<PathBuf>,
        /// Database file (default: [logs].database or server.redb)
        #[arg(short, long)]
        db: Option<PathBuf>,
        /// Output format: text or json
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Print the summary without storing it.
        #[arg(long)]
        no_save: bool,
    },
    /// List error summaries stored by previous `summarize` runs.
    Summaries {
        #[arg(short, long)]
        db: Option<PathBuf>,
        /// Aggregate counts per error type instead of listing rows.
        #[arg(long)]
        totals: bool,
    },
    /// Report the content type of the object named in a bucket notification.
    ObjectEvent {
        /// Notification JSON file
        #[arg(short, long)]
        event: PathBuf,
        /// Directory holding one sub-directory per bucket (default: [storage].root or .)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Write an opskit.toml scaffold.
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opskit=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let load_config = || OpskitConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Scale { input, format } => {
            let config = load_config()?;
            let input = input.unwrap_or_else(|| config.scaling_input());
            commands::scale::scale(&config, &input, &format)
        }
        Commands::Summarize { log, db, format, no_save } => {
            let config = load_config()?;
            let log = log.unwrap_or_else(|| config.log_path());
            let db = (!no_save).then(|| db.unwrap_or_else(|| config.database_path()));
            commands::summarize::summarize(&log, db.as_deref(), &format)
        }
        Commands::Summaries { db, totals } => {
            let db = match db {
                Some(db) => db,
                None => load_config()?.database_path(),
            };
            commands::summarize::list(&db, totals)
        }
        Commands::ObjectEvent { event, root } => {
            let root = match root {
                Some(root) => root,
                None => load_config()?.storage_root(),
            };
            commands::object_event::object_event(&event, root)
        }
        Commands::Init { path } => commands::init::init(&path),
    }
}
