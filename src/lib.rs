use axum::{middleware::from_fn, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod tenancy;
pub mod validation;

/// Build the full application router.
pub fn app() -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_auth_routes())
        // Protected API behind the identity resolver
        .merge(protected_routes().route_layer(from_fn(middleware::auth_middleware)))
        // Global middleware
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

fn public_auth_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn protected_routes() -> Router {
    use handlers::{auth, events, musicians, songs};

    Router::new()
        // Session
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        // Event CRUD
        .route("/eventos", get(events::index).post(events::store))
        .route(
            "/eventos/:id",
            get(events::show).put(events::update).delete(events::destroy),
        )
        // Musician sub-resource
        .route(
            "/eventos/:eventId/musicos",
            get(musicians::index).post(musicians::store),
        )
        .route(
            "/eventos/:eventId/musicos/:musicoId",
            get(musicians::show)
                .put(musicians::update)
                .delete(musicians::destroy),
        )
        // Song sub-resource + setlist reorder
        .route(
            "/eventos/:eventId/musicas",
            get(songs::index).post(songs::store),
        )
        .route("/eventos/:eventId/musicas/reorder", post(songs::reorder))
        .route(
            "/eventos/:eventId/musicas/:musicaId",
            get(songs::show).put(songs::update).delete(songs::destroy),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Bandstand API",
        "version": version,
        "description": "Multi-tenant backend for bands managing events, setlists and musician rosters",
        "endpoints": {
            "auth": "/register, /login (public); /logout, /me (protected)",
            "eventos": "/eventos[/:id] (protected)",
            "musicos": "/eventos/:eventId/musicos[/:musicoId] (protected)",
            "musicas": "/eventos/:eventId/musicas[/:musicaId], /eventos/:eventId/musicas/reorder (protected)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::Database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
