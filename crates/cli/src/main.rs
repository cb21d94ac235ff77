use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ktl_reports_mcp::{
    McpLogEntry, ReportBridge, ReportsConfig, ReportsHttpServer, load_config, load_config_from_path, serve_stdio, validate_config,
};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

/// Expose the ktl report catalog to MCP agents.
#[derive(Debug, Parser)]
#[command(name = "ktl-reports", version, about)]
struct Cli {
    /// Configuration file (JSON, or YAML by extension). Defaults to $KTL_REPORTS_CONFIG or the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Facade root; the pipeline engine always runs here.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Directory containing the report directories.
    #[arg(long, global = true)]
    catalog_root: Option<PathBuf>,

    /// Prefix marking report directories.
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Pipeline engine program. Replaces the configured program and its leading arguments.
    #[arg(long, global = true)]
    engine: Option<String>,

    /// Leading argument for --engine. Repeatable.
    #[arg(long = "engine-arg", global = true, requires = "engine", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the MCP server.
    Serve {
        #[arg(long, value_enum, default_value_t = Transport::Stdio)]
        transport: Transport,
        /// Loopback socket address for the HTTP transport. Overrides httpServer.bindAddress.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print the report listing.
    List,
    /// Print a report's description.
    Describe { name: String },
    /// Generate a report and print it with its provenance tag.
    Run { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let bridge = Arc::new(config.build_bridge().context("failed to initialize report bridge")?);
    debug!(
        catalog = %bridge.catalog().root().display(),
        prefix = bridge.catalog().prefix(),
        "report catalog configured"
    );

    match cli.command {
        Command::Serve { transport, .. } => serve(bridge, &config, transport).await,
        Command::List => {
            println!("{}", bridge.list_reports());
            Ok(())
        }
        Command::Describe { name } => {
            print!("{}", bridge.describe_report(&name).await?);
            Ok(())
        }
        Command::Run { name } => {
            print!("{}", bridge.report(&name).await?);
            Ok(())
        }
    }
}

// stdout belongs to the MCP stdio transport, so logs go to stderr.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> Result<ReportsConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path).with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => load_config().context("failed to load configuration")?,
    };

    if let Some(root) = &cli.root {
        config.root = Some(root.clone());
    }
    if let Some(catalog_root) = &cli.catalog_root {
        config.catalog_root = catalog_root.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(engine) = &cli.engine {
        config.engine.program = engine.clone();
        config.engine.args = cli.engine_args.clone();
    }
    if let Command::Serve { bind: Some(bind), .. } = &cli.command {
        config.http_server.bind_address = *bind;
    }

    validate_config(&config).context("invalid configuration")?;
    Ok(config)
}

async fn serve(bridge: Arc<ReportBridge>, config: &ReportsConfig, transport: Transport) -> Result<()> {
    let log_sender = spawn_log_forwarder();
    match transport {
        Transport::Stdio => serve_stdio(bridge, Some(log_sender)).await,
        Transport::Http => {
            let server = ReportsHttpServer::bind(bridge, &config.http_server).await?.with_log_sender(log_sender);
            info!(address = %server.local_addr()?, "MCP HTTP server ready; press Ctrl-C to stop");
            server
                .serve_until(async {
                    if let Err(error) = tokio::signal::ctrl_c().await {
                        warn!(%error, "failed to listen for Ctrl-C; shutting down");
                    }
                })
                .await
        }
    }
}

/// Tool-call payloads are verbose; they only surface at `debug`.
fn spawn_log_forwarder() -> UnboundedSender<McpLogEntry> {
    let (log_sender, mut log_receiver) = unbounded_channel::<McpLogEntry>();
    tokio::spawn(async move {
        while let Some(entry) = log_receiver.recv().await {
            let payload = entry.payload.map(|payload| payload.to_string()).unwrap_or_default();
            debug!(message = %entry.message, %payload, "tool call payload");
        }
    });
    log_sender
}
