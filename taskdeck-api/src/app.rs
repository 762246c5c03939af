/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /v1/                                 # Authenticated API
///     ├── /projects                        # Dashboard: list, create
///     ├── /projects/:id                    # Get, delete
///     ├── /projects/:id/members            # List, add
///     ├── /projects/:id/board              # Board view (partitioned columns)
///     ├── /boards/:id/tasks                # Create task (appends at end)
///     ├── /tasks/:id                       # Detail, patch, delete
///     ├── /tasks/:id/move                  # Drag-drop move
///     ├── /tasks/:id/assignees/:user_id    # Assign / unassign
///     ├── /tasks/:id/comments              # List, create
///     └── /comments/:id                    # Edit, delete (author only)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Token validation (on /v1 only)

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::{
    jwt,
    middleware::{AuthContext, AuthError},
};
use taskdeck_shared::models::user::User;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Everything under /v1 requires a valid session token
    let v1_routes = Router::new()
        .route("/projects", get(routes::projects::list_projects))
        .route("/projects", post(routes::projects::create_project))
        .route("/projects/:id", get(routes::projects::get_project))
        .route("/projects/:id", delete(routes::projects::delete_project))
        .route("/projects/:id/members", get(routes::members::list_members))
        .route("/projects/:id/members", post(routes::members::add_member))
        .route("/projects/:id/board", get(routes::board::get_board_view))
        .route("/boards/:id/tasks", post(routes::board::create_task))
        .route("/tasks/:id", get(routes::tasks::get_task))
        .route("/tasks/:id", patch(routes::tasks::update_task))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .route("/tasks/:id/move", post(routes::tasks::move_task))
        .route(
            "/tasks/:id/assignees/:user_id",
            put(routes::assignments::assign_user),
        )
        .route(
            "/tasks/:id/assignees/:user_id",
            delete(routes::assignments::unassign_user),
        )
        .route("/tasks/:id/comments", get(routes::comments::list_comments))
        .route("/tasks/:id/comments", post(routes::comments::create_comment))
        .route("/comments/:id", patch(routes::comments::update_comment))
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Token validation middleware layer
///
/// Validates the bearer token issued by the external identity provider,
/// upserts the local identity mirror row from its claims, and injects an
/// [`AuthContext`] into request extensions.
async fn token_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(
        token,
        &state.config.jwt.secret,
        &state.config.jwt.issuer,
    )?;

    // Keep the identity mirror fresh so membership/assignment/comment rows
    // always have a referent.
    User::upsert(&state.db, claims.sub, &claims.email, claims.name.as_deref()).await?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
