//! Placement Portal Backend
//!
//! REST backend for a college placement portal, with SQLite persistence and
//! Tantivy full-text search over the question bank.

mod api;
mod auth;
mod config;
mod context;
mod db;
mod eligibility;
mod errors;
mod filter;
mod models;
mod search;
mod session;
mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use context::CollegeContext;
use db::Repository;
use search::QuestionIndex;
use session::SessionManager;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<QuestionIndex>,
    pub college: Arc<CollegeContext>,
    pub sessions: Arc<SessionManager>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open storage and load the college context.
    pub async fn init(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = db::init_database(&config.db_path).await?;
        let repo = Arc::new(Repository::new(pool));

        let college = Arc::new(CollegeContext::load(repo.clone()).await?);
        let college_id = college.get().await.id;

        let search = Arc::new(QuestionIndex::open(&config.index_path)?);
        let questions = repo.list_questions(&college_id).await?;
        search.rebuild(&questions).await?;

        let sessions = Arc::new(SessionManager::new(
            repo.clone(),
            config.session_ttl_hours,
            config.password_rounds,
        ));
        sessions.purge_expired().await?;

        Ok(Self {
            repo,
            search,
            college,
            sessions,
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!("Starting Placement Portal Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (PLACEMENT_API_PSK). Client key check is disabled!");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::init(config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // College
        .route("/college", get(api::get_college).put(api::update_college))
        // Accounts and sessions
        .route("/auth/signup", post(api::signup))
        .route("/auth/admins", post(api::register_admin))
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout))
        .route("/auth/session", get(api::current_session))
        // Dashboards
        .route("/dashboard", get(api::student_dashboard))
        .route("/admin/stats", get(api::admin_stats))
        // Companies
        .route("/companies", get(api::list_companies).post(api::create_company))
        .route(
            "/companies/{id}",
            get(api::get_company).delete(api::delete_company),
        )
        .route("/companies/{id}/status", put(api::update_company_status))
        // Question bank
        .route("/questions", get(api::list_questions).post(api::create_question))
        .route("/questions/search", get(api::search_questions))
        .route("/questions/{id}", delete(api::delete_question))
        // Students
        .route("/students", get(api::list_students))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
