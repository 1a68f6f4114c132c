use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_*, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard=info,tower_http=info".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting postboard in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("POSTBOARD_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("postboard listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(user_routes())
        .merge(login_routes())
        // Protected (bearer token required)
        .merge(post_routes())
        .merge(vote_routes())
        .merge(session_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

fn user_routes() -> Router {
    use handlers::public::users;

    Router::new()
        .route("/users", post(users::create))
        .route("/users/:id", get(users::show))
}

fn login_routes() -> Router {
    use handlers::public::auth;

    Router::new().route("/login", post(auth::login))
}

fn post_routes() -> Router {
    use handlers::protected::posts;

    Router::new()
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/:id",
            get(posts::show).put(posts::update).delete(posts::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn vote_routes() -> Router {
    use handlers::protected::votes;

    Router::new()
        .route("/vote", post(votes::vote))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn session_routes() -> Router {
    use handlers::protected::session;

    Router::new()
        .route("/whoami", get(session::whoami))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "postboard",
            "version": version,
            "description": "Posts and votes REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "POST /users (public)",
                "users": "GET /users/:id (public)",
                "login": "POST /login (public - token acquisition)",
                "posts": "/posts[/:id] (protected)",
                "vote": "POST /vote (protected)",
                "whoami": "GET /whoami (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
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
