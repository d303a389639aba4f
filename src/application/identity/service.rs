//! Registration and login use cases
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{
    hash_password_blocking, verify_password_blocking, PasswordError,
};

/// Fields required to register. Validated at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    hash_cost: u32,
    /// Digest checked against when the username is unknown, so both login
    /// failures cost one bcrypt verification.
    decoy_digest: OnceCell<String>,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, hash_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            hash_cost,
            decoy_digest: OnceCell::new(),
        }
    }

    /// Hash the password and persist a new identity.
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        let password_hash = hash_password_blocking(registration.password, self.hash_cost)
            .await
            .map_err(|e| match e {
                PasswordError::TooLong => DomainError::Validation(e.to_string()),
                other => DomainError::Hashing(other.to_string()),
            })?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Authenticate by username + password and issue a token.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_username(username).await? else {
            debug!(username = %username, "Login rejected: unknown username");
            self.verify_against_decoy(password).await;
            return Err(DomainError::InvalidCredentials);
        };

        let valid =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await;
        if !valid {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = create_token(user.id, &user.username, &self.jwt_config)
            .map_err(|e| DomainError::Signing(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_secs(),
            user,
        })
    }

    async fn verify_against_decoy(&self, password: &str) {
        let decoy = self
            .decoy_digest
            .get_or_try_init(|| hash_password_blocking("decoy-password".into(), self.hash_cost))
            .await;
        match decoy {
            Ok(digest) => {
                verify_password_blocking(password.to_string(), digest.clone()).await;
            }
            Err(e) => warn!(error = %e, "Could not prepare decoy digest"),
        }
    }

    /// Resolve the identity behind an authenticated request.
    pub async fn current_user(&self, user_id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::crypto::password::MIN_HASH_COST;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn service() -> AuthService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        AuthService::new(repos, JwtConfig::new("test-secret"), MIN_HASH_COST)
    }

    fn alice() -> Registration {
        Registration {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "pw123".into(),
        }
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let service = service().await;
        let user = service.register(alice()).await.unwrap();

        assert!(user.id > 0);
        assert_ne!(user.password_hash, "pw123");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn register_twice_is_duplicate() {
        let service = service().await;
        service.register(alice()).await.unwrap();

        let err = service.register(alice()).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn login_issues_a_verifiable_token() {
        let service = service().await;
        let user = service.register(alice()).await.unwrap();

        let result = service.login("alice", "pw123").await.unwrap();
        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.expires_in, 24 * 3600);
        assert_eq!(result.user.id, user.id);

        let claims = verify_token(&result.token, &JwtConfig::new("test-secret")).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.username, "alice");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let service = service().await;
        service.register(alice()).await.unwrap();

        let unknown = service.login("mallory", "pw123").await.unwrap_err();
        let wrong = service.login("alice", "nope").await.unwrap_err();

        assert!(matches!(unknown, DomainError::InvalidCredentials));
        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn unknown_user_still_runs_a_verification() {
        let service = service().await;
        assert!(!service.decoy_digest.initialized());

        let err = service.login("mallory", "pw123").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
        let digest = service.decoy_digest.get().unwrap();
        assert_eq!(digest.split('$').nth(2), Some("04"));
    }

    #[tokio::test]
    async fn password_over_bcrypt_limit_is_rejected() {
        let service = service().await;
        let mut registration = alice();
        registration.password = "a".repeat(73);

        let err = service.register(registration).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn passwords_sharing_a_long_prefix_do_not_match() {
        let service = service().await;
        let mut registration = alice();
        registration.password = format!("{}correct", "a".repeat(65));
        service.register(registration.clone()).await.unwrap();

        let longer = format!("{}-suffix", registration.password);
        assert!(matches!(
            service.login("alice", &longer).await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(service.login("alice", &registration.password).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_cost_surfaces_as_hashing_error() {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let service = AuthService::new(repos, JwtConfig::new("test-secret"), 99);

        let err = service.register(alice()).await.unwrap_err();
        assert!(matches!(err, DomainError::Hashing(_)));
    }

    #[tokio::test]
    async fn empty_secret_surfaces_as_signing_error() {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let service = AuthService::new(repos, JwtConfig::new(""), MIN_HASH_COST);
        service.register(alice()).await.unwrap();

        let err = service.login("alice", "pw123").await.unwrap_err();
        assert!(matches!(err, DomainError::Signing(_)));
    }

    #[tokio::test]
    async fn current_user_lookup() {
        let service = service().await;
        let user = service.register(alice()).await.unwrap();

        assert_eq!(service.current_user(user.id).await.unwrap().username, "alice");
        assert!(matches!(
            service.current_user(user.id + 1).await,
            Err(DomainError::NotFound { entity: "User", .. })
        ));
    }
}
