//! Busline API Server
//!
//! Production server for the user-role administration APIs:
//! - Users admin API: list, make-driver, make-admin, remove-role
//! - Health probes for orchestration
//! - Swagger UI with auto-collected OpenAPI paths
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BL_API_PORT` | `8080` | HTTP API port |
//! | `BL_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `BL_MONGO_DB` | `busline` | MongoDB database name |
//! | `BL_DIRECTORY_URL` | `https://api.clerk.com` | Identity directory base URL |
//! | `BL_DIRECTORY_SECRET_KEY` | - | Directory backend API secret key |
//! | `BL_ALLOWED_ORIGINS` | - | Comma-separated CORS origins (any if unset) |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use axum::Router;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use bl_identity::{
    health_router, users_router, ClerkConfig, ClerkDirectory, HealthState, RoleSyncService,
    UserRepository, UsersState,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn cors_layer() -> CorsLayer {
    match std::env::var("BL_ALLOWED_ORIGINS") {
        Ok(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    bl_common::logging::init_logging("bl-api-server");

    info!("Starting Busline API Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("BL_API_PORT", 8080);
    let mongo_url = env_or("BL_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("BL_MONGO_DB", "busline");
    let directory_url = env_or("BL_DIRECTORY_URL", bl_identity::directory::clerk::DEFAULT_BASE_URL);
    let directory_key = env_or("BL_DIRECTORY_SECRET_KEY", "");

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Wire the directory adapter, repository, and sync service
    let directory = Arc::new(ClerkDirectory::new(
        ClerkConfig::new(directory_key).with_base_url(directory_url),
    ));
    let user_repo = Arc::new(UserRepository::new(&db));
    let sync = Arc::new(RoleSyncService::new(directory, user_repo));

    let users_state = UsersState { sync };
    let health_state = HealthState::new(Some(db), Some(env!("CARGO_PKG_VERSION").to_string()));

    // Build the API router with auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/users", users_router(users_state))
        .split_for_parts();

    openapi.info.title = "Busline API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description =
        Some("User role administration backed by the identity directory".to_string());

    let app = Router::new()
        .merge(router)
        .nest("/health", health_router(health_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let listener = TcpListener::bind(&api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Busline API Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
