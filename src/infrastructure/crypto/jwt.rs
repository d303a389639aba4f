//! JWT token handling
//!
//! Tokens are HMAC-signed and stateless: nothing is persisted server-side and
//! a token stops being accepted once `now >= exp`.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Algorithm used for every token this service issues.
pub const ISSUED_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default token lifetime.
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;
/// Longest accepted token lifetime (ten years).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
const HMAC_FAMILY_NAMES: [&str; 3] = ["HS256", "HS384", "HS512"];

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }

    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.lifetime_hours().saturating_mul(3600)
    }

    fn lifetime_hours(&self) -> i64 {
        self.expiration_hours.min(MAX_EXPIRATION_HOURS)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Id of the authenticated user
    pub user_id: i32,
    /// Username at the time of login
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenClaims {
    /// Create new claims for a user, expiring `config.expiration_hours` from now
    pub fn new(user_id: i32, username: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.lifetime_hours());

        Self {
            user_id,
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// A token is valid only while `now < exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

/// Why a presented token was rejected.
///
/// The reason is logged but never shown to the client; every variant maps to
/// the same 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token declares a non-HMAC signing algorithm")]
    AlgorithmMismatch,
}

/// Token issuance failure
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("failed to sign token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Create a signed token for a user
pub fn create_token(
    user_id: i32,
    username: &str,
    config: &JwtConfig,
) -> Result<String, SigningError> {
    if config.secret.is_empty() {
        return Err(SigningError::EmptySecret);
    }

    let claims = TokenClaims::new(user_id, username, config);

    Ok(encode(
        &Header::new(ISSUED_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Verify a token's algorithm, signature and expiry, and return its claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    check_declared_algorithm(token)?;

    let mut validation = Validation::new(ISSUED_ALGORITHM);
    validation.algorithms = HMAC_FAMILY.to_vec();
    // Expiry is checked below with a strict comparison and no leeway.
    validation.validate_exp = false;

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(classify)?;

    if token_data.claims.is_expired() {
        return Err(TokenError::Expired);
    }

    Ok(token_data.claims)
}

#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Reject tokens whose header names anything outside the HMAC family,
/// including `none`, before any key material is involved.
fn check_declared_algorithm(token: &str) -> Result<(), TokenError> {
    let segment = token
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(TokenError::Malformed)?;

    let raw = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: DeclaredHeader =
        serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    if HMAC_FAMILY_NAMES.contains(&header.alg.as_str()) {
        Ok(())
    } else {
        Err(TokenError::AlgorithmMismatch)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::AlgorithmMismatch
        }
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret")
    }

    fn encode_raw(header: &str, payload: &serde_json::Value, signature: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            signature
        )
    }

    fn sign_with(claims: &TokenClaims, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config();
        let token = create_token(42, "alice", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_custom_expiration() {
        let config = config().with_expiration_hours(2);
        let token = create_token(1, "bob", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
        assert_eq!(config.expires_in_secs(), 7200);
    }

    #[test]
    fn test_oversized_expiration_is_capped() {
        let config = config().with_expiration_hours(1_000_000_000_000);
        let token = create_token(1, "bob", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_EXPIRATION_HOURS * 3600);
        assert_eq!(config.expires_in_secs(), MAX_EXPIRATION_HOURS * 3600);
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let config = JwtConfig::new("");
        let err = create_token(1, "alice", &config).unwrap_err();
        assert!(matches!(err, SigningError::EmptySecret));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let token = create_token(7, "alice", &JwtConfig::new("one-secret")).unwrap();
        let err = verify_token(&token, &JwtConfig::new("another-secret")).unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let config = config();
        let token = create_token(7, "alice", &config).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = serde_json::json!({
            "user_id": 1,
            "username": "admin",
            "exp": Utc::now().timestamp() + 3600,
            "iat": Utc::now().timestamp(),
        });
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged_payload.to_string()),
            parts[2]
        );

        assert_eq!(verify_token(&forged, &config), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_non_hmac_algorithm_is_rejected() {
        let config = config();
        let token = create_token(7, "alice", &config).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let rs256_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let substituted = format!("{}.{}.{}", rs256_header, parts[1], parts[2]);

        assert_eq!(
            verify_token(&substituted, &config),
            Err(TokenError::AlgorithmMismatch)
        );
    }

    #[test]
    fn test_alg_none_is_rejected() {
        let payload = serde_json::json!({
            "user_id": 7,
            "username": "alice",
            "exp": Utc::now().timestamp() + 3600,
            "iat": Utc::now().timestamp(),
        });
        let token = encode_raw(r#"{"alg":"none","typ":"JWT"}"#, &payload, "");

        assert_eq!(
            verify_token(&token, &config()),
            Err(TokenError::AlgorithmMismatch)
        );
    }

    #[test]
    fn test_other_hmac_variants_are_accepted() {
        let config = config();
        let claims = TokenClaims::new(9, "carol", &config);
        let token = sign_with(&claims, Algorithm::HS512, &config.secret);

        assert_eq!(verify_token(&token, &config).unwrap(), claims);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id: 7,
            username: "alice".into(),
            exp: now - 60,
            iat: now - 3600,
        };
        let token = sign_with(&claims, ISSUED_ALGORITHM, &config.secret);

        assert_eq!(verify_token(&token, &config), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_at_expiry_instant_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id: 7,
            username: "alice".into(),
            exp: now,
            iat: now - 3600,
        };
        let token = sign_with(&claims, ISSUED_ALGORITHM, &config.secret);

        assert_eq!(verify_token(&token, &config), Err(TokenError::Expired));
        assert!(claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now - 1));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let config = config();
        assert_eq!(verify_token("invalid-token", &config), Err(TokenError::Malformed));
        assert_eq!(verify_token("", &config), Err(TokenError::Malformed));
        assert_eq!(verify_token("a.b.c", &config), Err(TokenError::Malformed));
    }

    #[test]
    fn test_missing_claims_are_malformed() {
        let config = config();
        let payload = serde_json::json!({ "username": "alice" });
        let token = encode(
            &Header::new(ISSUED_ALGORITHM),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, &config), Err(TokenError::Malformed));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("test-secret"));
    }
}
