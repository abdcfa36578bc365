use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scout_report::api::{build_router, state::AppState};
use scout_report::config::AppConfig;
use scout_report::parse_duration;
use scout_report::provider::{FetchPlan, GridClient, SeriesSource};
use scout_report::report::{DataSource, ReportService};

#[derive(Parser)]
#[command(name = "scout-report")]
#[command(about = "Opponent scouting reports for esports teams")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single report and print it as JSON
    Generate {
        /// Team to scout
        #[arg(long)]
        team: String,

        /// Number of recent matches to analyze
        #[arg(long)]
        last_n: Option<usize>,

        /// Fetch live series data instead of fixtures
        #[arg(long)]
        live: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Provider response cache TTL (e.g., "5m", "300s")
        #[arg(long)]
        cache_ttl: Option<String>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Live source from config, or `None` when the client cannot be built.
fn live_source(config: &AppConfig) -> Option<Arc<dyn SeriesSource>> {
    match GridClient::new(&config.provider) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Live data unavailable: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("loading {}", cli.config))?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting scout-report v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate {
            team,
            last_n,
            live,
        } => {
            config.validate()?;
            let last_n = last_n.unwrap_or(config.report.default_last_n);
            if !config.report.accepts(last_n) {
                bail!(
                    "--last-n must be between {} and {}",
                    config.report.min_last_n,
                    config.report.max_last_n
                );
            }

            let (source, data_source) = if live {
                (live_source(&config), DataSource::Live)
            } else {
                (None, DataSource::Demo)
            };
            let service = ReportService::new(source, FetchPlan::from(&config.provider));
            let report = service.generate(&team, last_n, data_source).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve {
            host,
            port,
            cache_ttl,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(raw) = cache_ttl {
                let Some(ttl) = parse_duration(&raw) else {
                    bail!("invalid --cache-ttl: {}", raw);
                };
                config.provider.cache_ttl_seconds = ttl.as_secs();
            }
            config.validate()?;

            let service =
                ReportService::new(live_source(&config), FetchPlan::from(&config.provider));
            let state = AppState::new(service, config.report.clone())
                .with_cors_origin(config.server.cors_origin.clone());
            let app = build_router(state);

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
