use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_user_auth, trace_id};
use crate::routes::{activities, attendance, auth, health, points};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Authentication routes (public; they issue the tokens)
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh));

    // Protected routes (require JWT authentication); role and unit checks
    // happen per handler.
    let protected_routes = Router::new()
        .route(
            "/api/activities",
            post(activities::create_activity).get(activities::list_activities),
        )
        .route(
            "/api/activities/:activity_id",
            get(activities::get_activity).put(activities::update_activity),
        )
        .route(
            "/api/activities/:activity_id/register",
            post(activities::register_for_activity),
        )
        .route(
            "/api/activities/:activity_id/checkin",
            post(activities::self_check_in),
        )
        .route(
            "/api/activities/:activity_id/report-absent",
            post(attendance::report_absent),
        )
        .route(
            "/api/activities/:activity_id/attendance",
            get(attendance::get_attendance),
        )
        .route(
            "/api/activities/:activity_id/attendance/:participant_id",
            put(attendance::update_attendance),
        )
        .route(
            "/api/activities/:activity_id/batch-checkin",
            post(attendance::batch_check_in),
        )
        .route("/api/users/me/points", get(points::my_points_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
