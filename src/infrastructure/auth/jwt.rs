//! HS256 JWT signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Default token lifetime when the caller does not pick one
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (username); absent in foreign tokens, which are rejected later
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: Some(subject.into()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Lifetime used when `generate` is called without an explicit TTL
    pub default_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, default_ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            default_ttl_minutes,
        }
    }
}

/// Token minting and verification
pub trait JwtGenerator: Send + Sync + Debug {
    /// Sign a token for `subject`; `None` uses the configured default TTL
    fn generate(&self, subject: &str, ttl: Option<Duration>) -> Result<String, DomainError>;

    /// Verify signature and expiry and return the claims.
    ///
    /// Every failure is `Unauthenticated`; the cause is not distinguished.
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    fn default_ttl(&self) -> Duration;
}

/// JWT service using a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("default_ttl_minutes", &self.config.default_ttl_minutes)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, subject: &str, ttl: Option<Duration>) -> Result<String, DomainError> {
        let claims = JwtClaims::new(subject, ttl.unwrap_or_else(|| self.default_ttl()));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                DomainError::Unauthenticated
            })
    }

    fn default_ttl(&self) -> Duration {
        Duration::minutes(self.config.default_ttl_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET, DEFAULT_TOKEN_TTL_MINUTES))
    }

    fn sign(claims: &impl Serialize, algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_service();

        let token = service.generate("alice", None).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.subject(), Some("alice"));
        assert!(claims.exp > Utc::now().timestamp());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_explicit_ttl() {
        let service = create_service();

        let token = service.generate("alice", Some(Duration::minutes(30))).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_malformed_token() {
        let service = create_service();

        let err = service.validate("not.a.jwt").unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtService::new(JwtConfig::new("another-secret", 15));
        let token = other.generate("alice", None).unwrap();

        let err = create_service().validate(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn test_expired_token_rejected_with_valid_signature() {
        let past = Utc::now() - Duration::seconds(5);
        let claims = JwtClaims {
            sub: Some("alice".to_string()),
            iat: (past - Duration::minutes(15)).timestamp(),
            exp: past.timestamp(),
        };

        let err = create_service()
            .validate(&sign(&claims, Algorithm::HS256))
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn test_token_without_exp_rejected() {
        let claims = serde_json::json!({ "sub": "alice", "iat": Utc::now().timestamp() });

        let err = create_service()
            .validate(&sign(&claims, Algorithm::HS256))
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = JwtClaims::new("alice", Duration::minutes(5));

        let err = create_service()
            .validate(&sign(&claims, Algorithm::HS512))
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn test_missing_subject_still_decodes() {
        let claims = serde_json::json!({
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
        });

        let decoded = create_service()
            .validate(&sign(&claims, Algorithm::HS256))
            .unwrap();
        assert_eq!(decoded.subject(), None);
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", create_service());
        assert!(!debug.contains(SECRET));
    }
}
