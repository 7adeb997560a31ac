use actix_web::post;
use chrono::Utc;
use tracing::{debug, info};
use warden_core::api_models::{
    LoginErrorReason,
    UserLoginRefreshRequest,
    UserLoginRefreshResponse,
    UserLoginRequest,
    UserLoginResponse,
};
use warden_core::token::{TokenClaims, TokenDecodeError, TokenKind};

use crate::api::errors::{EndpointResponseBuilder, EndpointResult};
use crate::api::macros::ContextlessResponder;
use crate::api::{JsonOrForm, RequestBody};
use crate::state::ApplicationState;



/// Login
///
/// This endpoint is the login method: it validates the credentials (username and password) and
/// gives the user an access token they can use in future requests to authenticate themselves.
///
/// In addition to the access token, a refresh token is provided to the user so they can request
/// a new access token when it expires. The refresh token is valid for longer than the access token,
/// but only the access token can be used to authenticate.
///
/// For login refreshing, see the `POST /api/v1/login/refresh` endpoint.
#[post("")]
pub async fn login(
    state: ApplicationState,
    login_info: JsonOrForm<UserLoginRequest>,
) -> EndpointResult {
    let login_info = login_info.into_body();


    // Validate user login credentials.
    let Some(logged_in_user) = state
        .users
        .verify_credentials(&login_info.username, &login_info.password)
        .await?
    else {
        debug!(
            username = %login_info.username,
            "Refusing login with invalid credentials."
        );

        return EndpointResponseBuilder::forbidden()
            .with_error_reason(LoginErrorReason::invalid_login_credentials())
            .build();
    };


    // Generate access and refresh token.
    let logged_in_at = Utc::now();

    let access_token_claims = TokenClaims::new(
        TokenKind::Access,
        logged_in_user.id,
        &logged_in_user.username,
        logged_in_at,
        state.configuration.json_web_token.access_token_lifetime,
    );

    let refresh_token_claims = TokenClaims::new(
        TokenKind::Refresh,
        logged_in_user.id,
        &logged_in_user.username,
        logged_in_at,
        state.configuration.json_web_token.refresh_token_lifetime,
    );


    let access_token = state.token_manager().encode(&access_token_claims)?;
    let refresh_token = state.token_manager().encode(&refresh_token_claims)?;


    info!(
        user_id = %logged_in_user.id,
        username = %logged_in_user.username,
        "User has logged in."
    );

    Ok(UserLoginResponse {
        access_token,
        refresh_token,
    }
    .into_response())
}



/// Refresh a login
///
/// The user must provide a refresh token given to them on an initial call to `POST /api/v1/login`.
/// "Refreshing a login" does not invalidate the refresh token.
///
/// The result of this is a new access token. Use when your initial access token expires.
#[post("/refresh")]
pub async fn refresh_login(
    state: ApplicationState,
    refresh_info: JsonOrForm<UserLoginRefreshRequest>,
) -> EndpointResult {
    let refresh_info = refresh_info.into_body();


    // Parse and validate provided refresh token.
    let refresh_token_claims = match state
        .token_manager()
        .decode(&refresh_info.refresh_token, TokenKind::Refresh)
    {
        Ok(token_claims) => token_claims,
        Err(TokenDecodeError::Expired { user_id }) => {
            debug!(
                user_id = %user_id,
                "Refusing to refresh expired token."
            );

            return EndpointResponseBuilder::bad_request()
                .with_error_reason(LoginErrorReason::expired_refresh_token())
                .build();
        }
        Err(TokenDecodeError::UnexpectedKind { user_id, .. }) => {
            debug!(
                user_id = %user_id,
                "Refusing to refresh with a non-refresh token."
            );

            return EndpointResponseBuilder::bad_request()
                .with_error_reason(LoginErrorReason::not_a_refresh_token())
                .build();
        }
        Err(TokenDecodeError::Invalid { reason }) => {
            debug!(
                reason = %reason,
                "Refusing to refresh invalid token."
            );

            return EndpointResponseBuilder::bad_request()
                .with_error_reason(LoginErrorReason::invalid_refresh_json_web_token())
                .build();
        }
    };


    // Refresh token is valid, create new access token.
    let access_token_claims = TokenClaims::new(
        TokenKind::Access,
        refresh_token_claims.user_id(),
        refresh_token_claims.username,
        Utc::now(),
        state.configuration.json_web_token.access_token_lifetime,
    );

    let access_token = state.token_manager().encode(&access_token_claims)?;


    debug!(
        user_id = %access_token_claims.user_id(),
        "User has successfully refreshed access token."
    );

    Ok(UserLoginRefreshResponse { access_token }.into_response())
}
