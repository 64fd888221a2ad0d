//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. Expiry is checked
//! against a caller-supplied clock rather than the system clock so that the
//! whole lifecycle can be exercised deterministically.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::errors::{AuthError, TokenError};
use super::models::Claims;
use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;
/// HMAC-SHA256 output length in bytes.
const SIGNATURE_LEN: usize = 32;

/// Issues and validates signed tokens. Owns the signing key; never sees
/// passwords.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_secret(config.secret.as_bytes(), config.ttl())
    }

    pub fn with_secret(secret: &[u8], default_ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is enforced in `validate` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        }
    }

    /// Lifetime applied to tokens handed out at login.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject`, valid from `now` until `now + ttl`.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>, ttl: Duration) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat,
            exp: iat + ttl.num_seconds(),
        };
        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check a token and return its subject.
    ///
    /// Order: structure and signature, claims decoding, subject presence,
    /// expiry. The first failing step decides the error.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::InvalidSignature);
        }
        check_structure(token)?;

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        let subject = match claims.sub {
            Some(sub) if !sub.trim().is_empty() => sub,
            _ => return Err(TokenError::MissingSubject),
        };

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(subject)
    }
}

/// Three non-empty base64url segments with a full-length MAC.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::Malformed);
    }
    for segment in &segments[..2] {
        URL_SAFE_NO_PAD.decode(segment).map_err(|_| TokenError::Malformed)?;
    }
    let signature = URL_SAFE_NO_PAD
        .decode(segments[2])
        .map_err(|_| TokenError::Malformed)?;
    if signature.len() != SIGNATURE_LEN {
        return Err(TokenError::Malformed);
    }
    Ok(())
}
