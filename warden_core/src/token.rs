//! Signed access and refresh tokens.
//!
//! Tokens are HS256 JSON Web Tokens. The subject is the [`UserId`] of the
//! user the token was issued to. The username is carried along for logging,
//! but callers must re-resolve the user by ID before trusting anything else.

use std::borrow::Cow;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampSeconds;
use thiserror::Error;

use crate::id::UserId;


/// Value of the `iss` claim on every token we sign. Tokens with any other issuer are rejected.
pub const TOKEN_ISSUER: &str = "warden";



/// What a token may be used for.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Authenticates API requests.
    Access,

    /// Can only be exchanged for a new access token.
    Refresh,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}



/// Claims of a single token.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct TokenClaims {
    pub iss: String,

    /// ID of the user the token was issued to.
    pub sub: UserId,

    /// Username at the time of issuing.
    pub username: String,

    #[serde_as(as = "TimestampSeconds<i64>")]
    pub iat: DateTime<Utc>,

    #[serde_as(as = "TimestampSeconds<i64>")]
    pub exp: DateTime<Utc>,

    pub kind: TokenKind,
}

impl TokenClaims {
    /// Builds the claims of a token valid from `issued_at` (truncated to whole seconds)
    /// for `lifetime`.
    pub fn new<U>(
        kind: TokenKind,
        user_id: UserId,
        username: U,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self
    where
        U: Into<String>,
    {
        let issued_at = issued_at.trunc_subsecs(0);

        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id,
            username: username.into(),
            iat: issued_at,
            exp: issued_at + lifetime,
            kind,
        }
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Whether the token is expired at `moment`. Expiry is exclusive:
    /// a token is no longer valid at the exact second of `exp`.
    pub fn is_expired_at(&self, moment: DateTime<Utc>) -> bool {
        self.exp <= moment
    }
}



#[derive(Debug, Error)]
#[error("failed to sign token")]
pub struct TokenEncodeError {
    #[from]
    #[source]
    error: jsonwebtoken::errors::Error,
}

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    /// Signature and claims are fine, but the token is past its expiry.
    #[error("token issued to user {user_id} has expired")]
    Expired { user_id: UserId },

    /// A valid token, but not of the kind the caller asked for.
    #[error("expected {} token, got {} token", .expected.name(), .found.name())]
    UnexpectedKind {
        user_id: UserId,
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("token is invalid: {reason}")]
    Invalid { reason: Cow<'static, str> },
}



/// Signs and verifies tokens with a shared secret.
pub struct TokenManager {
    encoding_key: EncodingKey,

    decoding_key: DecodingKey,

    validation: Validation,
}

impl TokenManager {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["iss", "sub", "exp"]);

        // Expiry is checked in `decode_at` so that expired tokens
        // can be told apart from forged ones.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenEncodeError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }

    /// Verifies a token of the `expected` kind against the current time.
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenDecodeError> {
        self.decode_at(token, expected, Utc::now())
    }

    pub fn decode_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenDecodeError> {
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| TokenDecodeError::Invalid {
                reason: match error.kind() {
                    ErrorKind::InvalidIssuer => Cow::from("unknown issuer"),
                    ErrorKind::InvalidSignature => Cow::from("bad signature"),
                    _ => Cow::from(error.to_string()),
                },
            })?
            .claims;

        if claims.iat > now {
            return Err(TokenDecodeError::Invalid {
                reason: Cow::from("issued in the future"),
            });
        }

        if claims.is_expired_at(now) {
            return Err(TokenDecodeError::Expired {
                user_id: claims.user_id(),
            });
        }

        if claims.kind != expected {
            return Err(TokenDecodeError::UnexpectedKind {
                user_id: claims.user_id(),
                expected,
                found: claims.kind,
            });
        }

        Ok(claims)
    }
}



#[cfg(test)]
mod test {
    use super::*;

    fn access_claims(issued_at: DateTime<Utc>, lifetime: Duration) -> TokenClaims {
        TokenClaims::new(
            TokenKind::Access,
            UserId::generate(),
            "janez",
            issued_at,
            lifetime,
        )
    }

    #[test]
    fn signed_claims_decode_unchanged() {
        let manager = TokenManager::new("secret");
        let claims = access_claims(Utc::now(), Duration::seconds(60));

        let token = manager.encode(&claims).unwrap();
        let decoded_claims = manager.decode(&token, TokenKind::Access).unwrap();

        assert_eq!(decoded_claims, claims);
        assert_eq!(decoded_claims.username, "janez");
        assert_eq!(decoded_claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn token_is_expired_exactly_at_its_expiry() {
        let manager = TokenManager::new("secret");
        let claims = access_claims(Utc::now() - Duration::seconds(10), Duration::seconds(5));
        let token = manager.encode(&claims).unwrap();

        assert!(matches!(
            manager.decode_at(&token, TokenKind::Access, claims.exp),
            Err(TokenDecodeError::Expired { user_id }) if user_id == claims.user_id()
        ));
        assert!(manager
            .decode_at(&token, TokenKind::Access, claims.exp - Duration::seconds(1))
            .is_ok());
    }

    #[test]
    fn kind_mismatch_is_reported_after_signature_check() {
        let manager = TokenManager::new("secret");
        let claims = TokenClaims::new(
            TokenKind::Refresh,
            UserId::generate(),
            "janez",
            Utc::now(),
            Duration::hours(1),
        );
        let token = manager.encode(&claims).unwrap();

        assert!(matches!(
            manager.decode(&token, TokenKind::Access),
            Err(TokenDecodeError::UnexpectedKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
                ..
            })
        ));
    }

    #[test]
    fn foreign_secret_and_future_tokens_are_invalid() {
        let manager = TokenManager::new("secret");
        let foreign_manager = TokenManager::new("another secret");

        let foreign_token = foreign_manager
            .encode(&access_claims(Utc::now(), Duration::hours(1)))
            .unwrap();
        assert!(matches!(
            manager.decode(&foreign_token, TokenKind::Access),
            Err(TokenDecodeError::Invalid { .. })
        ));

        let future_token = manager
            .encode(&access_claims(Utc::now() + Duration::hours(1), Duration::hours(1)))
            .unwrap();
        assert!(matches!(
            manager.decode(&future_token, TokenKind::Access),
            Err(TokenDecodeError::Invalid { .. })
        ));
    }
}
