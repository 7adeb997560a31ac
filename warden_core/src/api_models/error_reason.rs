use std::borrow::Cow;

use serde::{Deserialize, Serialize};



/// An [`ErrorReason`]-related trait providing a quick static description for a given error reason.
pub trait ErrorReasonName {
    fn reason_description(&self) -> &'static str;
}



/// Pertains to all endpoints under `/login`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "login-error-type")]
#[non_exhaustive]
pub enum LoginErrorReason {
    /// Unknown username or wrong password. The two are deliberately indistinguishable.
    #[serde(rename = "invalid-login-credentials")]
    InvalidLoginCredentials,

    #[serde(rename = "expired-refresh-token")]
    ExpiredRefreshToken,

    /// Not in the sense that is has expired or that it is *not* a refresh token,
    /// but in the sense that the given JWT couldn't be parsed or decoded.
    #[serde(rename = "invalid-refresh-json-web-token")]
    InvalidRefreshJsonWebToken,

    /// Expected a refresh token, but got an access JWT instead.
    #[serde(rename = "not-a-refresh-token")]
    NotARefreshToken,
}

impl LoginErrorReason {
    pub const fn invalid_login_credentials() -> Self {
        Self::InvalidLoginCredentials
    }

    pub const fn expired_refresh_token() -> Self {
        Self::ExpiredRefreshToken
    }

    pub const fn invalid_refresh_json_web_token() -> Self {
        Self::InvalidRefreshJsonWebToken
    }

    pub const fn not_a_refresh_token() -> Self {
        Self::NotARefreshToken
    }
}

impl ErrorReasonName for LoginErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::InvalidLoginCredentials => "invalid login credentials",
            Self::ExpiredRefreshToken => "expired refresh token",
            Self::InvalidRefreshJsonWebToken => "invalid refresh JWT",
            Self::NotARefreshToken => "not a refresh token",
        }
    }
}




/// Pertains to all endpoints under `/roles`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "roles-error-type")]
#[non_exhaustive]
pub enum RolesErrorReason {
    #[serde(rename = "role-not-found")]
    RoleNotFound,

    #[serde(rename = "empty-role-name")]
    EmptyRoleName,
}

impl RolesErrorReason {
    pub const fn role_not_found() -> Self {
        Self::RoleNotFound
    }

    pub const fn empty_role_name() -> Self {
        Self::EmptyRoleName
    }
}

impl ErrorReasonName for RolesErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::RoleNotFound => "role not found",
            Self::EmptyRoleName => "role name must not be empty",
        }
    }
}




/// Pertains to all endpoints under `/users`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "users-error-type")]
#[non_exhaustive]
pub enum UsersErrorReason {
    #[serde(rename = "user-not-found")]
    UserNotFound,

    /*
     * Creation / modification errors
     */
    #[serde(rename = "empty-username")]
    EmptyUsername,

    #[serde(rename = "empty-password")]
    EmptyPassword,
}

impl UsersErrorReason {
    pub const fn user_not_found() -> Self {
        Self::UserNotFound
    }

    pub const fn empty_username() -> Self {
        Self::EmptyUsername
    }

    pub const fn empty_password() -> Self {
        Self::EmptyPassword
    }
}

impl ErrorReasonName for UsersErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::UserNotFound => "user not found",
            Self::EmptyUsername => "username must not be empty",
            Self::EmptyPassword => "password must not be empty",
        }
    }
}



/// Reasons for a request body to not be accepted by the server.
///
/// See also: [`ErrorReason::invalid_request_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidRequestBodyReason {
    /// Indicates that the provided body could not be parsed at all
    /// (e.g. a JSON syntax error or an unsupported content type).
    #[serde(rename = "unreadable")]
    Unreadable,

    /// Indicates that the provided body was well-formed,
    /// but its data did not match the expected scheme / format
    /// (deserialization error).
    #[serde(rename = "invalid-data")]
    InvalidData,

    /// Indicates that the provided body was too large.
    #[serde(rename = "too-large")]
    TooLarge,
}



#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "type", content = "data")]
pub enum ErrorReason {
    /// Indicates that authentication is required on the endpoint,
    /// but the caller did not provide an access token.
    #[serde(rename = "missing-authentication")]
    MissingAuthentication,

    /// Indicates that a role is required to access an endpoint,
    /// and the caller does not have it.
    #[serde(rename = "missing-role")]
    MissingRole { role_name: String },

    /// Indicates that the request body could not be accepted (see [`InvalidRequestBodyReason`]).
    #[serde(rename = "invalid-request-body")]
    InvalidRequestBody { reason: InvalidRequestBodyReason },

    /// Pertains to all endpoints under:
    /// - `/login`
    #[serde(rename = "login")]
    Login(LoginErrorReason),

    /// Pertains to all endpoints under:
    /// - `/roles`
    #[serde(rename = "roles")]
    Roles(RolesErrorReason),

    /// Pertains to all endpoints under:
    /// - `/users`
    #[serde(rename = "users")]
    Users(UsersErrorReason),

    #[serde(rename = "other")]
    Other { reason: Cow<'static, str> },
}

impl ErrorReason {
    pub const fn missing_authentication() -> Self {
        Self::MissingAuthentication
    }

    pub fn missing_role<S>(role_name: S) -> Self
    where
        S: Into<String>,
    {
        Self::MissingRole {
            role_name: role_name.into(),
        }
    }

    pub const fn invalid_request_body(reason: InvalidRequestBodyReason) -> Self {
        Self::InvalidRequestBody { reason }
    }
}

impl ErrorReasonName for ErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::MissingAuthentication => "missing authentication",
            Self::MissingRole { .. } => "missing role",
            Self::InvalidRequestBody { .. } => "invalid request body",
            Self::Login(login_error_reason) => login_error_reason.reason_description(),
            Self::Roles(roles_error_reason) => roles_error_reason.reason_description(),
            Self::Users(users_error_reason) => users_error_reason.reason_description(),
            Self::Other { .. } => "other reason",
        }
    }
}

impl From<LoginErrorReason> for ErrorReason {
    fn from(value: LoginErrorReason) -> Self {
        Self::Login(value)
    }
}

impl From<RolesErrorReason> for ErrorReason {
    fn from(value: RolesErrorReason) -> Self {
        Self::Roles(value)
    }
}

impl From<UsersErrorReason> for ErrorReason {
    fn from(value: UsersErrorReason) -> Self {
        Self::Users(value)
    }
}




/// A JSON-serializable model containing a single field named `reason` ([`ErrorReason`]).
///
/// This type is used when responding with strongly-typed error reasons,
/// **do not use directly in endpoint code**, use the endpoint response builder
/// and its `with_error_reason` method instead.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(serde::Deserialize)
)]
pub struct ResponseWithErrorReason {
    pub reason: ErrorReason,
}

impl ResponseWithErrorReason {
    #[inline]
    pub fn new(reason: ErrorReason) -> Self {
        Self { reason }
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_reasons_serialize_with_both_tags() {
        let reason = ErrorReason::from(UsersErrorReason::user_not_found());

        let serialized = serde_json::to_value(ResponseWithErrorReason::new(reason)).unwrap();

        assert_eq!(
            serialized,
            serde_json::json!({
                "reason": {
                    "type": "users",
                    "data": { "users-error-type": "user-not-found" }
                }
            })
        );
    }

    #[test]
    fn missing_role_carries_the_role_name() {
        let serialized = serde_json::to_value(ErrorReason::missing_role("admin")).unwrap();

        assert_eq!(
            serialized,
            serde_json::json!({
                "type": "missing-role",
                "data": { "role_name": "admin" }
            })
        );
    }
}
