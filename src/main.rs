use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_cell::auth::AuthPolicy;
use placement_cell::config::AppConfig;
use placement_cell::error::AppError;
use placement_cell::events::{event_router, EventService};
use placement_cell::jobs::{job_router, JobService};
use placement_cell::placements::{import_roster, placement_router, PlacementService};
use placement_cell::stats::stats_router;
use placement_cell::storage::memory::{
    InMemoryEventStore, InMemoryJobStore, InMemoryPlacementStore,
};
use placement_cell::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Placement Cell",
    about = "Run the campus placement cell service and its roster tooling",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Offline roster utilities
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Parse a roster CSV and report what an import would do
    Validate(RosterValidateArgs),
}

#[derive(Args, Debug)]
struct RosterValidateArgs {
    /// Path to the registrar's roster export
    #[arg(long)]
    csv: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Roster {
            command: RosterCommand::Validate(args),
        } => run_roster_validate(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let auth = AuthPolicy::from_config(&config.auth);
    if !auth.is_configured() {
        warn!("APP_ADMIN_TOKEN is not set; mutating endpoints will answer 401");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let placement_store = Arc::new(InMemoryPlacementStore::default());
    let job_store = Arc::new(InMemoryJobStore::default());
    let event_store = Arc::new(InMemoryEventStore::default());

    let placement_service = Arc::new(PlacementService::new(placement_store.clone()));
    let job_service = Arc::new(JobService::new(job_store.clone()));
    let event_service = Arc::new(EventService::new(event_store.clone()));

    let app = Router::new()
        .merge(placement_router(placement_service, auth.clone()))
        .merge(job_router(job_service, auth.clone()))
        .merge(event_router(event_service, auth))
        .merge(stats_router(placement_store, job_store))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement cell service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_roster_validate(args: RosterValidateArgs) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.csv)?;
    let service = PlacementService::new(Arc::new(InMemoryPlacementStore::default()));
    let summary = import_roster(&service, file)?;

    println!("Roster check for {}", args.csv.display());
    println!("Rows that would import: {}", summary.imported);

    if summary.skipped.is_empty() {
        println!("Skipped rows: none");
    } else {
        println!("Skipped rows:");
        for skip in &summary.skipped {
            if skip.roll_number.is_empty() {
                println!("- line {}: {}", skip.line, skip.reason);
            } else {
                println!("- line {} ({}): {}", skip.line, skip.roll_number, skip.reason);
            }
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
