//! # ethdid API Server
//!
//! HTTP front end for ENS → ATProto DID lookups and publishing.
//!
//! ## Endpoints
//!
//! - `GET /atproto-did/:domain` - Resolve the DID an ENS name serves
//! - `POST /atproto-did/:domain` - Publish a DID record for an ENS name
//! - `GET /health` - Liveness check
//!
//! Business failures (no record, conflict, ...) are returned as HTTP 200
//! with `success: false` and an `errorType`. Only a malformed DID on POST
//! (400) and a failed pin (500) change the status code.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ethdid_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([127, 0, 0, 1], 8000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use dto::{CreateDidRequest, HealthResponse, LookupResponse, PublishResponse};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Router;
use ethdid_core::error::Result;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// API server for ethdid.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_state(AppState::new(&config)?))
    }

    /// Creates a server around prepared state.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        with_layers(create_router(self.state.clone()))
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            %addr,
            publishing = self.state.resolver.can_publish(),
            "ethdid API server listening"
        );

        axum::serve(listener, self.router()).await
    }
}

/// Wraps `router` with CORS (any origin), request tracing, and panic
/// recovery.
pub fn with_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    ApiError::internal("Internal server error").into_response()
}
