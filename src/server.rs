use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{elevated, protected, public};
use crate::middleware::jwt_auth_middleware;

/// Assemble the full router; also used directly by integration tests
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API (bearer token required)
        .merge(protected_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    Router::new()
        .route("/jobs", get(public::jobs::list))
        .route("/ranks", get(public::ranks::list))
        .route("/leaderboard", get(public::leaderboard::list))
        .route("/parties", get(public::parties::list))
        .route("/parties/:id", get(public::parties::get))
        .route("/parties/:id/members", get(public::parties::members))
        // Validates its invite code before credentials, so it stays
        // outside the auth middleware
        .route("/admin/invite", post(public::invite::promote))
}

fn protected_routes() -> Router {
    use axum::routing::{delete, patch};

    Router::new()
        .route(
            "/api/profile",
            get(protected::profile::get).patch(protected::profile::update),
        )
        .route(
            "/api/user/stats",
            get(protected::stats::get).patch(protected::stats::update),
        )
        .route("/api/dashboard/summary", get(protected::dashboard::summary))
        .route(
            "/api/jobs/:id/applications",
            get(protected::applications::list).post(protected::applications::apply),
        )
        .route(
            "/api/jobs/:id/applications/:app_id",
            patch(protected::applications::transition),
        )
        .route("/api/parties", post(protected::parties::create))
        .route(
            "/api/parties/:id",
            patch(protected::parties::update).delete(protected::parties::delete),
        )
        .route("/api/parties/:id/members", post(protected::parties::join))
        .route(
            "/api/parties/:id/members/:member_id",
            delete(protected::parties::remove_member),
        )
        .route_layer(from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use axum::routing::{delete, patch};

    Router::new()
        .route(
            "/api/admin/jobs",
            get(elevated::jobs::list).post(elevated::jobs::create),
        )
        .route(
            "/api/admin/jobs/:id",
            patch(elevated::jobs::update).delete(elevated::jobs::delete),
        )
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "QuestBoard API",
            "version": version,
            "description": "Quest/job marketplace backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "jobs": "/jobs (public browse), /api/jobs/:id/applications (protected)",
                "ranks": "/ranks (public)",
                "leaderboard": "/leaderboard (public)",
                "parties": "/parties[/:id[/members]] (public read), /api/parties/* (protected)",
                "profile": "/api/profile (protected)",
                "stats": "/api/user/stats (protected)",
                "dashboard": "/api/dashboard/summary (protected)",
                "admin": "/api/admin/jobs[/:id] (admin role), /admin/invite (code-gated)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

/// Bind and serve until shutdown
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 QuestBoard API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}
