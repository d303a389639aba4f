//! Authentication and ownership middleware for Axum
//!
//! The Authentication Gate turns a `Authorization: Bearer <token>` header into
//! an [`AuthenticatedUser`] stored in the request extensions. The Ownership
//! Gate runs after it on routes that mutate a post and admits only the post's
//! owner.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::{parse_resource_id, ApiError};

const BEARER_SCHEME: &str = "Bearer";

/// State for the Authentication Gate
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// State for the Ownership Gate
#[derive(Clone)]
pub struct OwnershipState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Identity of the caller, attached by [`auth_middleware`].
///
/// Handlers take it as a parameter; extracting it on a route without the
/// Authentication Gate fails with `Unauthenticated`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Split `"Bearer <token>"` into its token.
fn extract_bearer(auth_header: &str) -> Result<&str, ApiError> {
    match auth_header.split_once(' ') {
        Some((BEARER_SCHEME, token)) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::MalformedCredential),
    }
}

/// Resolve the caller from request headers.
pub fn authenticate(
    headers: &HeaderMap,
    jwt_config: &JwtConfig,
) -> Result<AuthenticatedUser, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::MissingCredential)?
        .to_str()
        .map_err(|_| ApiError::MalformedCredential)?;

    let token = extract_bearer(auth_header)?;

    let claims = verify_token(token, jwt_config).map_err(|reason| {
        warn!(reason = %reason, "Bearer token rejected");
        ApiError::InvalidCredential
    })?;

    if claims.user_id <= 0 {
        warn!(user_id = claims.user_id, "Token carries no usable user id");
        return Err(ApiError::InvalidCredential);
    }

    Ok(AuthenticatedUser::from_claims(claims))
}

/// Authentication Gate
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), &auth_state.jwt_config)?;
    debug!(user_id = user.user_id, "Request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Ownership Gate for `/posts/{id}`. Must be layered inside
/// [`auth_middleware`].
pub async fn post_owner_middleware(
    State(state): State<OwnershipState>,
    Path(raw_id): Path<String>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let post_id = parse_resource_id(&raw_id)?;

    let Some(caller_id) = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.user_id)
    else {
        warn!(post_id, "Ownership check reached without an authenticated caller");
        return Err(ApiError::Unauthenticated);
    };

    let post = state
        .repos
        .posts()
        .find_by_id(post_id)
        .await?
        .ok_or(ApiError::ResourceNotFound("Post"))?;

    if !post.is_owned_by(caller_id) {
        warn!(
            post_id,
            user_id = caller_id,
            owner_id = post.user_id,
            "Caller does not own the post"
        );
        return Err(ApiError::NotOwner);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::{get, put};
    use axum::Router;
    use tower::ServiceExt;

    use crate::domain::{NewPost, NewUser};
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    fn jwt() -> JwtConfig {
        JwtConfig::new("gate-secret")
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        format!("{}:{}", user.user_id, user.username)
    }

    fn auth_app() -> Router {
        Router::new()
            .route("/protected", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                AuthState { jwt_config: jwt() },
                auth_middleware,
            ))
            .route("/open", get(whoami))
    }

    async fn send(app: Router, method: &str, uri: &str, auth: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn code_of(resp: Response) -> i64 {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["code"].as_i64().unwrap()
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc").unwrap(), "abc");
        assert!(extract_bearer("Token abc").is_err());
        assert!(extract_bearer("Bearer").is_err());
        assert!(extract_bearer("Bearer ").is_err());
        assert!(extract_bearer("bearer abc").is_err());
        assert!(extract_bearer("abc").is_err());
    }

    #[tokio::test]
    async fn test_valid_token_is_admitted() {
        let token = create_token(5, "alice", &jwt()).unwrap();
        let resp = send(auth_app(), "GET", "/protected", Some(&format!("Bearer {token}"))).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"5:alice");
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let resp = send(auth_app(), "GET", "/protected", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(code_of(resp).await, 2003);
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_400() {
        let resp = send(auth_app(), "GET", "/protected", Some("Token abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(code_of(resp).await, 2004);
    }

    #[tokio::test]
    async fn test_bad_token_is_401() {
        let resp = send(auth_app(), "GET", "/protected", Some("Bearer not.a.token")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(code_of(resp).await, 2005);

        let foreign = create_token(5, "alice", &JwtConfig::new("other-secret")).unwrap();
        let resp = send(auth_app(), "GET", "/protected", Some(&format!("Bearer {foreign}"))).await;
        assert_eq!(code_of(resp).await, 2005);
    }

    #[tokio::test]
    async fn test_zero_user_id_is_rejected() {
        let token = create_token(0, "ghost", &jwt()).unwrap();
        let resp = send(auth_app(), "GET", "/protected", Some(&format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(code_of(resp).await, 2005);
    }

    #[tokio::test]
    async fn test_extractor_without_gate_is_unauthenticated() {
        let resp = send(auth_app(), "GET", "/open", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(code_of(resp).await, 2006);
    }

    struct OwnerFixture {
        app: Router,
        owner_token: String,
        other_token: String,
        post_id: i32,
    }

    async fn owner_fixture() -> OwnerFixture {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = repos
                .users()
                .create(NewUser {
                    username: name.into(),
                    email: format!("{name}@x.com"),
                    password_hash: "digest".into(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let post = repos
            .posts()
            .create(NewPost {
                user_id: ids[0],
                title: "t".into(),
                content: "c".into(),
            })
            .await
            .unwrap();

        let app = Router::new()
            .route("/posts/{id}", put(|| async { "updated" }))
            .route_layer(middleware::from_fn_with_state(
                OwnershipState { repos },
                post_owner_middleware,
            ))
            .route_layer(middleware::from_fn_with_state(
                AuthState { jwt_config: jwt() },
                auth_middleware,
            ));

        OwnerFixture {
            app,
            owner_token: format!("Bearer {}", create_token(ids[0], "alice", &jwt()).unwrap()),
            other_token: format!("Bearer {}", create_token(ids[1], "bob", &jwt()).unwrap()),
            post_id: post.id,
        }
    }

    #[tokio::test]
    async fn test_owner_passes() {
        let f = owner_fixture().await;
        let uri = format!("/posts/{}", f.post_id);
        let resp = send(f.app, "PUT", &uri, Some(&f.owner_token)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_owner_is_403() {
        let f = owner_fixture().await;
        let uri = format!("/posts/{}", f.post_id);
        let resp = send(f.app, "PUT", &uri, Some(&f.other_token)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(code_of(resp).await, 3003);
    }

    #[tokio::test]
    async fn test_unknown_post_is_404() {
        let f = owner_fixture().await;
        let resp = send(f.app, "PUT", "/posts/999", Some(&f.owner_token)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(code_of(resp).await, 3002);
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        let f = owner_fixture().await;
        for uri in ["/posts/abc", "/posts/0", "/posts/-1"] {
            let resp = send(f.app.clone(), "PUT", uri, Some(&f.owner_token)).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(code_of(resp).await, 3001);
        }
    }

    #[tokio::test]
    async fn test_ownership_gate_without_auth_gate_is_401() {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let app = Router::new()
            .route("/posts/{id}", put(|| async { "updated" }))
            .route_layer(middleware::from_fn_with_state(
                OwnershipState { repos },
                post_owner_middleware,
            ));

        let resp = send(app, "PUT", "/posts/1", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(code_of(resp).await, 2006);
    }
}
