//! HTTP API.
//!
//! Everything under `/api` except `/api/auth/*` requires a bearer token issued
//! by the auth provider. Stored receipts are served as static files under
//! `/receipts`.

use crate::{
    auth::AuthProvider,
    config::settings::Settings,
    errors::{Error, Result},
    repository::LedgerRepository,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use std::{path::Path, sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Profit analytics and dashboard
pub mod analytics;
/// Sign-in, sign-up and current user
pub mod auth;
/// Expense category lookup list
pub mod categories;
/// Event CRUD
pub mod events;
/// Expense CRUD and receipt attachment
pub mod expenses;
/// Bearer-token middleware
pub mod middleware;
/// Per-event reports and exports
pub mod reports;
/// Standalone receipt upload
pub mod upload;


/// Multipart framing allowance on top of the largest accepted receipt.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Data access
    pub repo: Arc<dyn LedgerRepository>,
    /// Hosted auth provider
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// Bundles the repository and auth provider.
    pub fn new(repo: Arc<dyn LedgerRepository>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { repo, auth }
    }
}

/// Builds the full application router.
pub fn router(state: AppState, receipts_dir: &Path, max_receipt_bytes: usize) -> Router {
    let protected = Router::new()
        .route("/me", get(auth::me))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            put(expenses::update_expense).delete(expenses::delete_expense),
        )
        .route("/expenses/{id}/receipt", post(expenses::attach_receipt))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/upload-receipt", post(upload::upload_receipt))
        .route("/analytics/events", get(analytics::event_profits))
        .route("/analytics/periods", get(analytics::period_profits))
        .route("/analytics/summary", get(analytics::summary))
        .route("/dashboard", get(analytics::dashboard))
        .route("/reports/events/{id}", get(reports::profit_loss))
        .route("/reports/events/{id}/expenses.csv", get(reports::expenses_csv))
        .route("/reports/events/{id}/report.json", get(reports::report_json))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_user));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/signup", post(auth::signup))
        .merge(protected);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .nest("/api", api)
        .nest_service("/receipts", ServeDir::new(receipts_dir))
        .layer(DefaultBodyLimit::max(
            max_receipt_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds to the configured address and serves until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(settings: &Settings, state: AppState) -> Result<()> {
    let app = router(state, &settings.receipts_dir, settings.receipt_max_bytes);

    let listener = TcpListener::bind(&settings.bind_address)
        .await
        .map_err(|e| Error::Config {
            message: format!("Cannot bind {}: {e}", settings.bind_address),
        })?;
    info!("Server running on {}", settings.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
