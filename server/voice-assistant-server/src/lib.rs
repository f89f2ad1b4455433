//! Voice Assistant Server - HTTP surface for the RustCare voice assistant
//!
//! Exposes the voice conversation manager over a small JSON API used by the
//! patient portal widget.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

// Re-export commonly used types
pub use error::*;
pub use server::{ServerConfig, VoiceAssistantServer};

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: VoiceAssistantServer) -> Router {
    let cors = middleware::create_cors_layer(&server.config.allowed_origins);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
