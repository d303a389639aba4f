//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, CommentService, PostService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::SeaOrmRepositoryProvider;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::middleware::{
    auth_middleware, post_owner_middleware, AuthState, OwnershipState,
};

use super::modules::{auth, comments, health, metrics, posts, request_id};

/// Everything the HTTP layer needs, built once at startup.
///
/// Handlers and gates extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig, hash_cost: u32) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&repos),
                jwt_config.clone(),
                hash_cost,
            )),
            post_service: Arc::new(PostService::new(Arc::clone(&repos))),
            comment_service: Arc::new(CommentService::new(Arc::clone(&repos))),
            db,
            repos,
            jwt_config,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
        }
    }
}

impl FromRef<AppState> for OwnershipState {
    fn from_ref(s: &AppState) -> Self {
        OwnershipState {
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            auth_service: Arc::clone(&s.auth_service),
        }
    }
}

impl FromRef<AppState> for posts::PostHandlerState {
    fn from_ref(s: &AppState) -> Self {
        posts::PostHandlerState {
            post_service: Arc::clone(&s.post_service),
        }
    }
}

impl FromRef<AppState> for comments::CommentHandlerState {
    fn from_ref(s: &AppState) -> Self {
        comments::CommentHandlerState {
            comment_service: Arc::clone(&s.comment_service),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Security scheme modifier for Swagger
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::get_current_user,
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        comments::create_comment,
        comments::list_comments_for_post,
    ),
    components(
        schemas(
            ErrorBody,
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            posts::PostResponse,
            posts::CreatePostRequest,
            posts::UpdatePostRequest,
            posts::DeletedPostResponse,
            comments::CommentResponse,
            comments::CreateCommentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Registration, login (JWT) and the current user"),
        (name = "Posts", description = "Blog posts; only the author may update or delete"),
        (name = "Comments", description = "Comments on posts"),
    ),
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "REST API for a blog with token authentication and ownership checks",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus recorder is installed.
pub fn create_api_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);
    let owner_layer = middleware::from_fn_with_state(state.clone(), post_owner_middleware);

    // Public routes
    let public_routes = Router::<AppState>::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/posts", get(posts::list_posts))
        .route("/api/v1/posts/{id}", get(posts::get_post))
        .route(
            "/api/v1/comments/post/{post_id}",
            get(comments::list_comments_for_post),
        );

    // Authenticated routes
    let protected_routes = Router::<AppState>::new()
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/posts", post(posts::create_post))
        .route("/api/v1/comments", post(comments::create_comment))
        .route_layer(auth_layer.clone());

    // Owner-only routes: the Authentication Gate is the outer layer, so it
    // runs before the Ownership Gate.
    let owner_routes = Router::<AppState>::new()
        .route(
            "/api/v1/posts/{id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route_layer(owner_layer)
        .route_layer(auth_layer);

    let mut router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(owner_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Outermost first: request id, metrics, trace, CORS.
    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
