//! Development backend server.
//!
//! # Responsibilities
//! - Build the axum router for the marketplace API under `/api`
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Serve until the shutdown coordinator fires

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::backend::handlers;
use crate::backend::state::BackendState;
use crate::config::BackendConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// HTTP server for the development backend.
pub struct BackendServer {
    router: Router,
    state: BackendState,
}

impl BackendServer {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_state(config, BackendState::new())
    }

    pub fn with_state(config: &BackendConfig, state: BackendState) -> Self {
        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BackendConfig, state: BackendState) -> Router {
        Router::new()
            .route("/api/{role}/register", post(handlers::register))
            .route("/api/{role}/login", post(handlers::login))
            .route(
                "/api/{role}/profile",
                get(handlers::get_profile).put(handlers::update_profile),
            )
            .route(
                "/api/{role}/upload-profile-picture",
                post(handlers::upload_profile_picture),
            )
            .route("/api/upload", post(handlers::upload_file))
            .route("/uploads/{name}", get(handlers::serve_file))
            .route("/health", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(record_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    pub fn state(&self) -> &BackendState {
        &self.state
    }

    /// Serve on `listener` until `signal` completes.
    pub async fn run<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Development backend starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("Development backend stopped");
        Ok(())
    }
}

async fn record_metrics(request: Request<Body>, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(request).await;
    metrics::record_backend_request(&route, response.status().as_u16());
    response
}

/// A backend running on a background task.
pub struct RunningBackend {
    pub addr: SocketAddr,
    pub state: BackendState,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningBackend {
    /// API base URL, e.g. `http://127.0.0.1:5000/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Trigger shutdown and wait for the server task.
    pub async fn stop(self) -> std::io::Result<()> {
        self.shutdown.trigger();
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Bind `config.bind_address` and serve in the background.
pub async fn spawn(config: &BackendConfig) -> std::io::Result<RunningBackend> {
    let listener = TcpListener::bind(&config.bind_address).await?;
    let addr = listener.local_addr()?;
    let server = BackendServer::new(config);
    let state = server.state().clone();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.wait()));
    Ok(RunningBackend {
        addr,
        state,
        shutdown,
        handle,
    })
}
