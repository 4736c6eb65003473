mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::reports::{
    routes as reports_routes, InMemoryReportStore, LifecycleService, ReportService, ReportStore,
};
use crate::features::stations::{routes as stations_routes, StationDirectory, StationLocator};
use crate::features::users::{routes as users_routes, UserContactService};
use crate::modules::notifications::{LogSender, Notifier, PreferenceNotifier};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
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

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded (reward {}%, challan due in {} days)",
        config.reward.percentage,
        config.challan.due_days
    );

    // Station directory
    let station_directory = match &config.stations.stations_file {
        Some(path) => StationDirectory::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load police stations: {}", e))?,
        None => {
            tracing::info!("STATIONS_FILE not set, using the built-in station directory");
            StationDirectory::builtin()
        }
    };
    tracing::info!(
        "Station directory initialized with {} stations",
        station_directory.len()
    );
    let station_locator: Arc<dyn StationLocator> = Arc::new(station_directory);

    // Contacts and notifications
    let user_contact_service = Arc::new(UserContactService::new());
    let notifier: Arc<dyn Notifier> = Arc::new(
        PreferenceNotifier::new(
            user_contact_service.clone(),
            Arc::new(LogSender::new(config.notifications.app_name.clone())),
            &config.notifications,
        )
        .map_err(|e| anyhow::anyhow!("Failed to initialize notifier: {}", e))?,
    );
    tracing::info!("Notifier initialized (log sender)");

    // Reports
    let report_store: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::new());
    let lifecycle_service = Arc::new(LifecycleService::new(
        Arc::clone(&report_store),
        Arc::clone(&notifier),
        Arc::clone(&station_locator),
        &config.reward,
        &config.challan,
        &config.stations,
    ));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&report_store),
        config.challan.fines.clone(),
    ));
    tracing::info!("Report services initialized");

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

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(reports_routes::routes(
            Arc::clone(&lifecycle_service),
            Arc::clone(&report_service),
            config.stations.search_radius_meters,
        ))
        .merge(stations_routes::routes(
            Arc::clone(&station_locator),
            config.stations.search_radius_meters,
        ))
        .merge(users_routes::routes(Arc::clone(&user_contact_service)))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
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

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
