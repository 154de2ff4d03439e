use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hashdata::store::Ledger;
use hashdata::{Module, ObjectKey, ServiceConfig, RPC_READ_DATA};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hashdata", version, about = "Fetch-or-confirm versioned content")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the content root.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Override the ledger database path.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one read_data call. Reads the payload from stdin when omitted.
    ReadData { payload: Option<String> },
    /// Print the ledger row for a key.
    Show {
        #[arg(long = "type", default_value = "")]
        object_type: String,
        #[arg(long, default_value = "")]
        version: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(root) = cli.data_root {
        config.data_root = root;
    }
    if let Some(database) = cli.database {
        config.database = database;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let handler = config
        .open_handler()
        .with_context(|| format!("cannot open ledger {}", config.database.display()))?;

    match cli.command {
        Command::ReadData { payload } => {
            let payload = match payload {
                Some(p) => p,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };

            let module = Module::init(handler);
            let response = module.dispatch(RPC_READ_DATA, &payload).await.map_err(|e| {
                anyhow::anyhow!("{} (code {}, {})", e, e.code(), e.kind())
            })?;
            println!("{response}");
        }
        Command::Show {
            object_type,
            version,
        } => {
            let key = ObjectKey::with_defaults(object_type, version);
            let record = handler
                .ledger()
                .get(&key)
                .await?
                .with_context(|| format!("{key} has not been recorded"))?;

            let row = serde_json::json!({
                "id": record.id,
                "type": record.key.object_type,
                "version": record.key.version,
                "hash": record.hash.to_hex(),
                "content": record.content.as_str(),
                "recorded_at": record.recorded_at,
            });
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
    }

    Ok(())
}
