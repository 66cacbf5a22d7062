use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use map_scout::analyze::{MatchAnalyzer, QueryLength};
use map_scout::api::{build_router, cors_layer, state::AppState};
use map_scout::config::AppConfig;
use map_scout::fetch::FaceitClient;
use map_scout::parse_duration;

#[derive(Parser)]
#[command(name = "map-scout")]
#[command(about = "Map pick/ban advice for FACEIT CS2 matches")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// FACEIT request timeout (e.g., "30s", "2m")
    #[arg(long)]
    timeout: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Analyze a single match and print the ranked maps
    Analyze {
        /// FACEIT match room URL
        url: String,

        /// Use the all-time window instead of recent matches
        #[arg(long)]
        all_time: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting map-scout v{}", env!("CARGO_PKG_VERSION"));

    if let Some(timeout) = cli.timeout.as_deref() {
        let Some(duration) = parse_duration(timeout).filter(|d| d.as_secs() > 0) else {
            bail!("Invalid --timeout: {}", timeout);
        };
        config.faceit.timeout_seconds = duration.as_secs();
    }

    let client = FaceitClient::new(&config.faceit)?;
    let analyzer = MatchAnalyzer::new(
        Arc::new(client),
        config.analysis.clone(),
        config.faceit.concurrency(),
    );

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                analyzer,
                static_dir: config.server.static_dir.clone(),
            };
            let mut app = build_router(state).layer(
                cors_layer(&config.server.cors_origin)
                    .with_context(|| format!("invalid cors_origin {:?}", config.server.cors_origin))?,
            );
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::Analyze {
            url,
            all_time,
            json,
        } => {
            let query_length = if all_time {
                QueryLength::AllTime
            } else {
                QueryLength::Recent
            };
            let analysis = analyzer.analyze(&url, query_length).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!(
                    "\n=== Match {} (last {} matches per player) ===",
                    analysis.match_id, analysis.match_limit
                );
                for team in [&analysis.roster_1, &analysis.roster_2] {
                    println!("\n{} ({})", team.name, team.players.join(", "));
                    for entry in &team.ranked_maps {
                        let record = team.tally.get(entry.map);
                        println!(
                            "  {:<12} {:>3}-{:<3} {:+.2}",
                            entry.map.as_str(),
                            record.wins,
                            record.losses,
                            entry.differential
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
