use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use realty_hub::config::{AppConfig, JsonPreferenceStore, PreferenceStore};
use realty_hub::content::{content_router, ContentLibrary};
use realty_hub::error::AppError;
use realty_hub::leads::router::leads_router;
use realty_hub::leads::{LeadIntakeService, RecordingSink};
use realty_hub::listings::router::{listings_router, ListingsState};
use realty_hub::listings::InMemoryCatalog;
use realty_hub::mortgage::{estimate, MortgageInputs, MortgageQuoteView};
use realty_hub::telemetry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Realty Hub",
    about = "Run the agency listings, mortgage, and lead-capture service from the command line",
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
    /// Mortgage calculator utilities
    Mortgage {
        #[command(subcommand)]
        command: MortgageCommand,
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
    /// Hydrate the catalog from a listings CSV export instead of the seed
    #[arg(long)]
    listings_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum MortgageCommand {
    /// Print an amortization estimate for the given loan parameters
    Estimate(MortgageEstimateArgs),
}

#[derive(Args, Debug)]
struct MortgageEstimateArgs {
    /// Property price in whole currency units
    #[arg(long)]
    price: f64,
    /// Down payment in whole currency units
    #[arg(long)]
    down_payment: f64,
    /// Loan term in years
    #[arg(long)]
    term_years: f64,
    /// Annual interest rate, percent
    #[arg(long)]
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct MortgageEstimateRequest {
    price: f64,
    down_payment: f64,
    term_years: f64,
    annual_rate_percent: f64,
}

#[derive(Debug, Serialize)]
struct MortgageEstimateResponse {
    inputs: MortgageInputs,
    quote: MortgageQuoteView,
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
        Command::Mortgage {
            command: MortgageCommand::Estimate(args),
        } => run_mortgage_estimate(args),
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

    let preference_store = JsonPreferenceStore::new(&config.preferences_path);
    let preferences = preference_store.load()?.unwrap_or_default();

    let catalog = match args.listings_csv.take() {
        Some(path) => {
            let catalog = InMemoryCatalog::from_csv_path(&path)?;
            info!(count = catalog.property_count(), ?path, "catalog hydrated from csv");
            catalog
        }
        None => InMemoryCatalog::seed(),
    };

    let listings_state = Arc::new(ListingsState::new(Arc::new(catalog), preferences));
    // leads land in the in-process sink until a CRM adapter is wired in
    let lead_service = Arc::new(LeadIntakeService::new(Arc::new(RecordingSink::default())));
    let content_library = Arc::new(ContentLibrary::standard());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/mortgage/estimate", post(mortgage_estimate_endpoint))
        .with_state(state)
        .merge(listings_router(listings_state))
        .merge(leads_router(lead_service))
        .merge(content_router(content_library))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "realty hub ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_mortgage_estimate(args: MortgageEstimateArgs) -> Result<(), AppError> {
    let inputs = MortgageInputs {
        price: args.price,
        down_payment: args.down_payment,
        term_years: args.term_years,
        annual_rate_percent: args.rate,
    };

    match estimate(&inputs) {
        Some(quote) => {
            let view = quote.rounded();
            println!("Loan amount:     {}", view.loan_amount);
            println!("Monthly payment: {}", view.monthly_payment);
            println!("Total payment:   {}", view.total_payment);
            println!("Overpayment:     {}", view.overpayment);
        }
        None => {
            println!(
                "No quote: the inputs do not form a loan \
                 (check price > down payment, term > 0, rate > 0)"
            );
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
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

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn mortgage_estimate_endpoint(
    Json(payload): Json<MortgageEstimateRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let inputs = MortgageInputs {
        price: payload.price,
        down_payment: payload.down_payment,
        term_years: payload.term_years,
        annual_rate_percent: payload.annual_rate_percent,
    };

    match estimate(&inputs) {
        Some(quote) => {
            let response = MortgageEstimateResponse {
                inputs,
                quote: quote.rounded(),
            };
            (StatusCode::OK, Json(json!(response)))
        }
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "inputs do not form a loan: require price > down payment, term > 0, rate > 0",
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mortgage_endpoint_returns_rounded_quote() {
        let request = MortgageEstimateRequest {
            price: 5_000_000.0,
            down_payment: 1_000_000.0,
            term_years: 20.0,
            annual_rate_percent: 12.0,
        };

        let (status, Json(body)) = mortgage_estimate_endpoint(Json(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quote"]["monthly_payment"], 44_043);
        assert_eq!(body["quote"]["total_payment"], 10_570_427);
    }

    #[tokio::test]
    async fn mortgage_endpoint_rejects_degenerate_inputs() {
        let request = MortgageEstimateRequest {
            price: 1_000_000.0,
            down_payment: 1_000_000.0,
            term_years: 20.0,
            annual_rate_percent: 12.0,
        };

        let (status, Json(body)) = mortgage_estimate_endpoint(Json(request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().expect("error string").contains("loan"));
    }
}
