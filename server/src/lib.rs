//! Documentation of the past-exam archive service.
//!
//!
//!
//! # General Infrastructure
//! - One Rust service behind the frontend, serving JSON for every page
//! - The same route set runs in two modes, switched by `ARCHIVE_MODE`
//! - `mock`: embedded demo dataset, in-process, no credentials needed
//! - `remote`: row queries against the managed backend, per-user session
//!   tokens, row-level policies enforced there
//! - Pages take their parent selection as a query parameter; reaching a
//!   page without it bounces to the top of the hierarchy rather than
//!   rendering a broken view
//!
//!
//!
//! # Notes
//!
//! ## Why one adapter seam
//! Pages are written once against the `Backend` trait and the variant is
//! picked at startup, so demo and live cannot drift apart in ordering or
//! filtering. The integration tests hold both variants to the same
//! answers over the same seed.
//!
//! ## Sessions
//! The service keeps no session state of its own. The frontend holds the
//! auth session and sends the access token as a bearer header; remote
//! row queries ride on that token, so the backend's row-level rules see
//! the real caller.
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run the demo service.
//! ```sh
//! ARCHIVE_MODE=mock cargo run -p kakomon
//! ```
//!
//! Run against the managed backend (service key mounted as a secret).
//! ```sh
//! ARCHIVE_MODE=remote BACKEND_URL=... cargo run -p kakomon
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod error;
pub mod generate;
pub mod routes;
pub mod state;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/study/faculties", get(routes::faculties_handler))
        .route("/study/departments", get(routes::departments_handler))
        .route("/study/subjects", get(routes::subjects_handler))
        .route("/study/professors", get(routes::professors_handler))
        .route("/study/professor/{id}", get(routes::professor_handler))
        .route("/exams/view", get(routes::exams_handler))
        .route("/exams/{id}", get(routes::exam_handler))
        .route("/share", post(routes::share_handler))
        .route("/questions", post(routes::question_handler))
        .route(
            "/settings/api-key",
            get(routes::api_key_handler).put(routes::update_api_key_handler),
        )
        .route("/api/generate-similar", post(generate::generate_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
