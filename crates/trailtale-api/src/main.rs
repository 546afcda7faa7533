//! Trailtale hunt server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use trailtale_api::config::AppConfig;
use trailtale_api::error::AppError;
use trailtale_api::routes;
use trailtale_api::state::AppState;
use trailtale_core::clock::{Clock, SystemClock};
use trailtale_core::rng::{DeterministicRng, ThreadRngSource};
use trailtale_narrative::client::ChatStoryteller;
use trailtale_narrative::coordinator::{GenerationWorker, generation_channel};
use trailtale_session::application::controller::SessionController;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Trailtale hunt server");

    // Read configuration from environment and the hunt file.
    let config = AppConfig::from_env()?;

    // Build the storyteller client, controller, and generation worker.
    let storyteller = Arc::new(
        ChatStoryteller::new(config.storyteller.clone())
            .map_err(|e| AppError::Config(format!("cannot build storyteller client: {e}")))?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(ThreadRngSource));
    let (jobs, job_queue) = generation_channel();
    let controller = Arc::new(
        SessionController::new(config.hunt.clone(), Arc::clone(&clock), rng, jobs)
            .map_err(|e| AppError::Config(e.to_string()))?,
    );
    tokio::spawn(GenerationWorker::new(controller.session(), storyteller, clock, job_queue).run());

    // Build application state and router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app_state = AppState::new(controller);
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::hunt::router())
        .merge(routes::admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
