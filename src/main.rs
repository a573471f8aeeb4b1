mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::database::{self, FatalSignal};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::heatmap::store::{FixtureStore, HeatmapStore, PgHeatmapStore};
use crate::features::heatmap::{self, HeatmapService};
use crate::features::map::color_scale::ColorScale;
use crate::features::map::map_shape::load_map_shape;
use crate::features::map::{self, MapViewService};
use axum::{middleware::from_fn, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}, environment={:?}",
        worker_threads,
        std::process::id(),
        config.app.environment
    );
    tracing::info!("Configuration loaded successfully");

    let fatal = FatalSignal::new();

    // Pick the data source: Postgres when configured, fixtures for local development
    let (store, pool): (Arc<dyn HeatmapStore>, Option<PgPool>) = match &config.database.url {
        Some(url) => {
            let pool = database::create_pool(&config.database, url).await?;
            tracing::info!("Database connection pool created");

            match database::check_connection(&pool).await {
                Ok(now) => tracing::info!("Database connection verified, server time {}", now),
                Err(e) => tracing::warn!("Database connection check failed: {}", e),
            }

            (
                Arc::new(PgHeatmapStore::new(pool.clone(), fatal.clone())),
                Some(pool),
            )
        }
        None => {
            tracing::warn!("Serving built-in development data instead of a database");
            (Arc::new(FixtureStore::development()), None)
        }
    };

    let heatmap_service = Arc::new(HeatmapService::new(store));
    tracing::info!("Heatmap service initialized");

    // The map outline is read once and shared for the lifetime of the process
    let shape = Arc::new(load_map_shape(&config.map.shape_path).await);
    let scale = ColorScale::with_domain(config.map.scale_min, config.map.scale_max)?;
    let map_service = Arc::new(MapViewService::new(
        Arc::clone(&heatmap_service),
        shape,
        scale,
        config.map.title.clone(),
    ));
    tracing::info!("Map view service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let mut public_routes = Router::new()
        .merge(heatmap::routes(Arc::clone(&heatmap_service)))
        .merge(map::routes(map_service));

    if config.app.environment.is_production() {
        tracing::info!("Diagnostics endpoint disabled in production");
    } else {
        public_routes = public_routes.merge(heatmap::debug_routes(Arc::clone(&heatmap_service)));
        tracing::info!("Diagnostics endpoint mounted at /api/debug");
    }

    let app = Router::new()
        .merge(swagger)
        .merge(public_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal.clone()))
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connection pool closed");
    }

    if fatal.is_tripped() {
        anyhow::bail!("Stopped after a fatal database pool error");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or once the database pool has failed for good
async fn shutdown_signal(fatal: FatalSignal) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown requested"),
        _ = fatal.tripped() => tracing::error!("Shutting down after fatal database error"),
    }
}
