use serde::{Deserialize, Serialize};



/// User login information.
#[derive(Deserialize, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct UserLoginRequest {
    /// Username to log in as.
    pub username: String,

    /// Password.
    pub password: String,
}



/// Response on successful user login.
///
/// Contains two tokens:
/// - the `access_token` that should be sent along with future requests and
/// - the `refresh_token` that can be used on `POST /api/v1/login/refresh` to
///   receive a new (fresh) access token.
#[derive(Serialize, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
pub struct UserLoginResponse {
    /// JWT access token.
    /// Provide in subsequent requests in the `Authorization` header as `Bearer your_token_here`.
    pub access_token: String,

    /// JWT refresh token.
    pub refresh_token: String,
}



/// Information with which to refresh a user's login, generating a new access token.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct UserLoginRefreshRequest {
    /// Refresh token to use to generate an access token.
    ///
    /// Token must not have expired to work.
    pub refresh_token: String,
}



/// Response on successful login refresh.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
pub struct UserLoginRefreshResponse {
    /// Newly-generated access token to use in future requests.
    pub access_token: String,
}
