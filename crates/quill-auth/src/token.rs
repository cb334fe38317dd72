use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use quill_types::api::Claims;

/// Tokens expire exactly this many seconds after issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, unexpected algorithm, malformed structure or expired.
    #[error("invalid token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 bearer tokens bound to a single secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue_at(subject_id, Utc::now())
    }

    pub fn issue_at(&self, subject_id: i64, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Returns the subject id. Every failure collapses to `TokenError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}
