use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use leakwatch_core::core::config::Config;
use leakwatch_core::core::openapi::{ApiDoc, SwaggerInfoModifier};
use leakwatch_core::core::{database, middleware};
use leakwatch_core::features::admin::{routes as admin_routes, AdminService};
use leakwatch_core::features::auth::{routes as auth_routes, AuthService, SessionCleanupWorker};
use leakwatch_core::features::engagement::{
    routes as engagement_routes, AchievementService, NotificationService, TipService,
};
use leakwatch_core::features::offline_reports::{
    routes as offline_reports_routes, OfflineReportService,
};
use leakwatch_core::features::reports::{routes as reports_routes, PgReportRepository, ReportService};
use leakwatch_core::features::teams::{routes as teams_routes, AssignmentService, TeamService};
use leakwatch_core::features::zones::{routes as zones_routes, ZoneService};
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

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Auth (credential login + server-side sessions)
    let auth_service = Arc::new(AuthService::new(pool.clone(), config.session.clone()));
    let cleanup_worker =
        SessionCleanupWorker::new(Arc::clone(&auth_service), config.session.cleanup_interval);
    tokio::spawn(async move {
        cleanup_worker.run().await;
    });
    tracing::info!("Auth service initialized, session cleanup worker spawned");

    let notification_service = Arc::new(NotificationService::new(pool.clone()));
    let achievement_service = Arc::new(AchievementService::new(pool.clone()));
    let tip_service = Arc::new(TipService::new(pool.clone()));
    tracing::info!("Engagement services initialized");

    let report_service = Arc::new(
        ReportService::new(Arc::new(PgReportRepository::new(pool.clone())))
            .with_notifications(notification_service.clone()),
    );
    let offline_report_service = Arc::new(OfflineReportService::new(pool.clone()));
    tracing::info!("Report services initialized");

    let zone_service = Arc::new(ZoneService::new(pool.clone()));
    let team_service = Arc::new(TeamService::new(pool.clone()));
    let assignment_service = Arc::new(AssignmentService::new(pool.clone()));
    let admin_service = Arc::new(AdminService::new(pool.clone()));
    if let Some(username) = &config.bootstrap.super_admin_username {
        if admin_service.seed_super_admin(username).await? {
            tracing::info!("Super admin ensured for {}", username);
        } else {
            tracing::warn!(
                "SUPER_ADMIN_USERNAME {} is not registered yet, no super admin seeded",
                username
            );
        }
    }
    tracing::info!("Admin services initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

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

    // Back-office routes, all nested once under /api/admin
    let admin_area = admin_routes::routes(Arc::clone(&admin_service))
        .merge(zones_routes::routes(zone_service))
        .merge(teams_routes::routes(team_service, assignment_service));

    // Protected routes (require a session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(reports_routes::protected_routes(Arc::clone(&report_service)))
        .merge(engagement_routes::protected_routes(
            achievement_service,
            notification_service,
        ))
        .merge(offline_reports_routes::protected_routes(Arc::clone(
            &offline_report_service,
        )))
        .nest("/api/admin", admin_area)
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Anonymous submissions allowed, session attached when present
    let optional_auth_routes = Router::new()
        .merge(reports_routes::optional_auth_routes(Arc::clone(
            &report_service,
        )))
        .merge(offline_reports_routes::optional_auth_routes(
            offline_report_service,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::optional_auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(reports_routes::public_routes(report_service))
        .merge(engagement_routes::public_routes(tip_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(optional_auth_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
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

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

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
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database::close_pool(&pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
