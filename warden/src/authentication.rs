//! Authentication-related code.

use actix_utils::future;
use actix_utils::future::Ready;
use actix_web::dev::Payload;
use actix_web::http::header::{self, HeaderName};
use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};
use tracing::{debug, error, info};
use warden_core::id::UserId;
use warden_core::token::{TokenClaims, TokenDecodeError, TokenKind};
use warden_database::registry::RegistryResult;
use warden_database::store::UserModel;

use crate::state::ApplicationStateInner;


/// Older clients send the bare token in this header instead of `Authorization: Bearer <token>`.
pub const LEGACY_AUTHENTICATION_TOKEN_HEADER: HeaderName =
    HeaderName::from_static("authentication-token");



/// User authentication extractor.
///
/// **Holding this struct doesn't automatically mean the user is authenticated!**
///
/// # Usage with Actix
/// To easily extract authentication data on an endpoint function,
/// [`UserAuthenticationExtractor`] is actually an [Actix extractor](https://actix.rs/docs/extractors).
///
/// To use it, simply add a `authentication: `[`UserAuthenticationExtractor`] parameter
/// to your endpoint function parameters. Then, inside the handler body, use the
/// [`require_user_authentication`] macro, which resolves the token's owner into an
/// [`AuthenticatedUser`], early-returning from the function with a `401 Unauthorized`
/// if the caller did not provide authentication.
///
/// The token is read from the `Authorization: Bearer <token>` header,
/// or from the legacy `Authentication-Token: <token>` header.
/// Invalid tokens are rejected with `400 Bad Request` and expired ones with `403 Forbidden`
/// before the endpoint function even runs.
///
///
/// [`require_user_authentication`]: crate::require_user_authentication
pub enum UserAuthenticationExtractor {
    /// No user authentication provided.
    Unauthenticated,

    /// Valid access token provided as authentication.
    Authenticated { token: TokenClaims },
}

impl UserAuthenticationExtractor {
    /// Resolves the user the access token was issued to.
    ///
    /// Returns `None` if no token was provided,
    /// or if the token's user has been removed since it was issued.
    ///
    /// This operation performs an identity store lookup.
    pub async fn authenticated_user(
        &self,
        state: &ApplicationStateInner,
    ) -> RegistryResult<Option<AuthenticatedUser>> {
        let token = match self {
            UserAuthenticationExtractor::Unauthenticated => return Ok(None),
            UserAuthenticationExtractor::Authenticated { token } => token,
        };

        let Some(user) = state.users.get_user_by_id(token.user_id()).await? else {
            debug!(
                user_id = %token.user_id(),
                "Access token belongs to a user that no longer exists."
            );

            return Ok(None);
        };

        Ok(Some(AuthenticatedUser {
            token: token.clone(),
            user,
        }))
    }
}

/// Extracts the raw token string from the request headers, if any.
///
/// An `Authorization` header with a scheme other than `Bearer` carries no token
/// and is treated as if it were absent.
fn extract_token_string(req: &HttpRequest) -> Result<Option<&str>, actix_web::Error> {
    if let Some(authorization_header_value) = req.headers().get(header::AUTHORIZATION) {
        let header_value = authorization_header_value
            .to_str()
            .map_err(|_| actix_web::error::ParseError::Header)?;

        if let Some(token_string) = header_value.strip_prefix("Bearer ") {
            return Ok(Some(token_string.trim()));
        }

        debug!("Ignoring non-bearer Authorization header.");
    }

    if let Some(legacy_header_value) = req.headers().get(LEGACY_AUTHENTICATION_TOKEN_HEADER) {
        let header_value = legacy_header_value
            .to_str()
            .map_err(|_| actix_web::error::ParseError::Header)?;

        return Ok(Some(header_value.trim()));
    }

    Ok(None)
}

impl FromRequest for UserAuthenticationExtractor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    #[inline]
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token_string = match extract_token_string(req) {
            Ok(Some(token_string)) => token_string,
            Ok(None) => return future::ok(Self::Unauthenticated),
            Err(error) => return future::err(error),
        };

        let token_manager = match req.app_data::<Data<ApplicationStateInner>>() {
            Some(app_state) => app_state.token_manager(),
            None => {
                error!("BUG: No AppState injected, all `UserAuthenticationExtractor`s will fail!");

                return future::err(
                    actix_web::error::InternalError::new(
                        "Missing AppState.",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into(),
                );
            }
        };


        let token = match token_manager.decode(token_string, TokenKind::Access) {
            Ok(token) => token,
            Err(TokenDecodeError::Expired { user_id }) => {
                debug!(
                    user_id = %user_id,
                    "User tried authenticating with expired token."
                );

                return future::err(actix_web::error::ErrorForbidden(
                    "Authentication token expired.",
                ));
            }
            Err(TokenDecodeError::UnexpectedKind { user_id, found, .. }) => {
                info!(
                    user_id = %user_id,
                    token_kind = found.name(),
                    "User tried authenticating with a non-access token."
                );

                return future::err(actix_web::error::ErrorBadRequest(
                    "Not an access token.",
                ));
            }
            Err(TokenDecodeError::Invalid { reason }) => {
                info!(
                    reason = %reason,
                    "User tried authenticating with invalid token."
                );

                return future::err(actix_web::error::ErrorBadRequest(
                    "Invalid token.",
                ));
            }
        };

        future::ok(Self::Authenticated { token })
    }
}



/// An authenticated user with a valid access token,
/// resolved against the identity store for the duration of one request.
pub struct AuthenticatedUser {
    token: TokenClaims,

    user: UserModel,
}

impl AuthenticatedUser {
    /// Returns the ID of the user who owns the token.
    pub fn user_id(&self) -> UserId {
        self.token.user_id()
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Returns `true` if the user held the given role at the start of this request.
    pub fn has_role(&self, role_name: &str) -> bool {
        self.user.has_role_named(role_name)
    }
}
