//! Provides ways of handling errors in API endpoint functions
//! and ways to have those errors automatically turned into correct
//! HTTP error responses when returned as `Err(error)` from those functions.

use std::borrow::{Borrow, Cow};
use std::fmt::{Display, Formatter};

use actix_http::header::{HeaderName, HeaderValue};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use warden_core::api_models::{
    ErrorReason,
    ErrorReasonName,
    InvalidRequestBodyReason,
    ResponseWithErrorReason,
    RolesErrorReason,
    UsersErrorReason,
};
use warden_core::token::TokenEncodeError;
use warden_database::registry::{InvalidInputReason, RegistryError};
use warden_database::StoreError;



/// General-purpose Warden API error type.
///
/// Use this type alongside an [`EndpointResult`] return type in your actix endpoint handlers
/// to allow you to easily
/// [`?`](https://doc.rust-lang.org/book/ch09-02-recoverable-errors-with-result.html#a-shortcut-for-propagating-errors-the--operator)-return
/// errors and automatically convert them into HTTP 4xx and 5xx errors!
/// For more details on how this works, consult the
/// [Actix documentation on errors](https://actix.rs/docs/errors) and the
/// `impl `[`ResponseError`]` for `[`EndpointError`] block.
///
/// Client errors carry a typed [`ErrorReason`] in the response body.
/// Server errors are logged, but their details never leak through the API.
///
///
/// # Authentication example
/// What follows is a full authentication example, requiring the caller to
/// be authenticated and to hold the built-in administrator role.
///
/// ```
/// use actix_web::post;
/// use warden::{require_role, require_user_authentication};
/// use warden::authentication::UserAuthenticationExtractor;
/// use warden::state::ApplicationState;
/// use warden::api::errors::EndpointResult;
/// use warden_core::roles::ADMINISTRATOR_ROLE_NAME;
///
/// #[post("/some/path")]
/// async fn example_auth(
///     state: ApplicationState,
///     authentication: UserAuthenticationExtractor,
/// ) -> EndpointResult {
///     let authenticated_user = require_user_authentication!(state, authentication);
///     require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);
///
///     // ... the rest of the function ...
///     # todo!();
/// }
/// ```
#[derive(Debug, Error)]
pub enum EndpointError {
    /*
     * Client errors.
     */
    /// The caller did not provide an access token
    /// (or the user it was issued to no longer exists).
    MissingAuthentication,

    /// The caller is authenticated, but lacks the given role.
    MissingRole { role_name: Cow<'static, str> },

    /// The request body could not be read or deserialized,
    /// either as JSON or as an URL-encoded form.
    InvalidRequestBody { reason: InvalidRequestBodyReason },

    /// A registry refused the provided input (e.g. an empty username).
    InvalidInput { reason: InvalidInputReason },

    /*
     * Server errors.
     *
     * Reasons are not shown externally.
     */
    /// Internal error, constructed from a boxed [`Error`][std::error::Error].
    /// Triggers a `500 Internal Server Error` (**error doesn't leak through the API**).
    InternalGenericError {
        #[from]
        #[source]
        error: Box<dyn std::error::Error>,
    },

    /// Internal error, constructed from a [`StoreError`].
    /// Triggers a `500 Internal Server Error` (**error doesn't leak through the API**).
    InternalStoreError {
        #[source]
        error: StoreError,
    },
}

impl EndpointError {
    pub fn missing_role<S>(role_name: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::MissingRole {
            role_name: role_name.into(),
        }
    }

    pub const fn invalid_request_body(reason: InvalidRequestBodyReason) -> Self {
        Self::InvalidRequestBody { reason }
    }

    pub fn internal_error<E>(error: E) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::InternalGenericError {
            error: Box::new(error),
        }
    }

    fn invalid_input_error_reason(reason: &InvalidInputReason) -> ErrorReason {
        match reason {
            InvalidInputReason::EmptyRoleName => RolesErrorReason::empty_role_name().into(),
            InvalidInputReason::EmptyUsername => UsersErrorReason::empty_username().into(),
            InvalidInputReason::EmptyPassword => UsersErrorReason::empty_password().into(),
            InvalidInputReason::ProtectedRole { .. } => ErrorReason::Other {
                reason: Cow::Owned(reason.to_string()),
            },
        }
    }
}

impl Display for EndpointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAuthentication => write!(f, "Missing authentication."),
            Self::MissingRole { role_name } => {
                write!(f, "Missing role: {role_name}.")
            }
            Self::InvalidRequestBody { reason } => match reason {
                InvalidRequestBodyReason::Unreadable => {
                    write!(f, "Invalid request body: unreadable.")
                }
                InvalidRequestBodyReason::InvalidData => {
                    write!(f, "Invalid request body: invalid data.")
                }
                InvalidRequestBodyReason::TooLarge => {
                    write!(f, "Invalid request body: too large.")
                }
            },
            Self::InvalidInput { reason } => write!(f, "Invalid input: {reason}."),
            Self::InternalGenericError { error } => {
                write!(f, "Internal server error (generic): {error:?}")
            }
            Self::InternalStoreError { error } => {
                write!(
                    f,
                    "Internal server error (identity store error): {error}."
                )
            }
        }
    }
}

impl ResponseError for EndpointError {
    /// In reality, because we implemented error_response below,
    /// this function will never be called (status codes from error_response will be used).
    /// (see [`ResponseError::status_code`]).
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthentication => StatusCode::UNAUTHORIZED,
            Self::MissingRole { .. } => StatusCode::FORBIDDEN,
            Self::InvalidRequestBody { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::InternalGenericError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InternalStoreError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let fallibly_built_response = match self {
            Self::MissingAuthentication => EndpointResponseBuilder::unauthorized()
                .with_error_reason(ErrorReason::missing_authentication())
                .build(),
            Self::MissingRole { role_name } => EndpointResponseBuilder::forbidden()
                .with_error_reason(ErrorReason::missing_role(role_name.as_ref()))
                .build(),
            Self::InvalidRequestBody { reason } => EndpointResponseBuilder::bad_request()
                .with_error_reason(ErrorReason::invalid_request_body(*reason))
                .build(),
            Self::InvalidInput { reason } => {
                let error_reason = Self::invalid_input_error_reason(reason);

                debug!(
                    reason = error_reason.reason_description(),
                    "Rejecting invalid input."
                );

                EndpointResponseBuilder::bad_request()
                    .with_error_reason(error_reason)
                    .build()
            }
            Self::InternalGenericError { .. }
            | Self::InternalStoreError { .. } => {
                error!(error = %self, "Responding with an internal server error.");

                EndpointResponseBuilder::internal_server_error().build()
            }
        };


        fallibly_built_response.unwrap_or_else(|_| HttpResponse::InternalServerError().finish())
    }
}


impl From<StoreError> for EndpointError {
    fn from(value: StoreError) -> Self {
        Self::InternalStoreError { error: value }
    }
}

impl From<RegistryError> for EndpointError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::InvalidInput { reason } => Self::InvalidInput { reason },
            RegistryError::StoreError { error } => Self::from(error),
            RegistryError::HasherError { error } => Self::InternalGenericError {
                error: Box::new(error),
            },
        }
    }
}

impl From<TokenEncodeError> for EndpointError {
    fn from(value: TokenEncodeError) -> Self {
        Self::InternalGenericError {
            error: Box::new(value),
        }
    }
}




pub struct EndpointResponseBuilder {
    status_code: StatusCode,

    body: Option<Result<Vec<u8>, serde_json::Error>>,

    additional_headers: Vec<(HeaderName, HeaderValue)>,
}

impl EndpointResponseBuilder {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            body: None,
            additional_headers: Vec::with_capacity(1),
        }
    }

    #[inline]
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    #[inline]
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST)
    }

    #[inline]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED)
    }

    #[inline]
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN)
    }

    #[inline]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    #[inline]
    pub fn conflict() -> Self {
        Self::new(StatusCode::CONFLICT)
    }

    #[inline]
    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn with_json_body<D, S>(mut self, data: D) -> Self
    where
        S: Serialize,
        D: Borrow<S>,
    {
        let body = serde_json::to_vec(data.borrow());

        self.additional_headers.push((
            header::CONTENT_TYPE,
            HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
        ));

        Self {
            status_code: self.status_code,
            body: Some(body),
            additional_headers: self.additional_headers,
        }
    }

    /// Sets the body to a [`ResponseWithErrorReason`] containing the given reason.
    pub fn with_error_reason<R>(self, reason: R) -> Self
    where
        R: Into<ErrorReason>,
    {
        self.with_json_body(ResponseWithErrorReason::new(reason.into()))
    }

    pub fn build(self) -> Result<HttpResponse<BoxBody>, EndpointError> {
        let optional_body = match self.body {
            Some(body_or_error) => match body_or_error {
                Ok(body) => Some(body),
                Err(serialization_error) => {
                    return Err(EndpointError::internal_error(serialization_error))
                }
            },
            None => None,
        };


        let mut response_builder = HttpResponse::build(self.status_code);

        for (header_name, header_value) in self.additional_headers {
            response_builder.insert_header((header_name, header_value));
        }


        match optional_body {
            Some(body) => response_builder
                .message_body(body.boxed())
                // Never fails, `Vec<u8>` bodies have `type Error = Infallible`.
                .map_err(EndpointError::internal_error),
            None => response_builder
                .message_body(().boxed())
                // Never fails, `()` bodies have `type Error = Infallible`.
                .map_err(EndpointError::internal_error),
        }
    }
}




/// Short for [`Result`]`<`[`HttpResponse`]`, `[`EndpointError`]`>`, intended to be used in most
/// places in handlers of the Warden API.
///
/// The generic parameter (`Body`) specifies which body type is used inside [`HttpResponse`]
/// and defaults to [`BoxBody`], which is what [`EndpointResponseBuilder`]
/// uses and will likely be the most common body type.
///
/// See documentation for [`EndpointError`] for more info.
pub type EndpointResult<Body = BoxBody> = Result<HttpResponse<Body>, EndpointError>;



#[cfg(test)]
mod test {
    use actix_web::body;

    use super::*;

    async fn response_body_as_json(response: HttpResponse<BoxBody>) -> serde_json::Value {
        let body_bytes = body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[actix_web::test]
    async fn missing_role_responds_with_forbidden_and_reason() {
        let response = EndpointError::missing_role("admin").error_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response_body_as_json(response).await,
            serde_json::json!({
                "reason": { "type": "missing-role", "data": { "role_name": "admin" } }
            })
        );
    }

    #[actix_web::test]
    async fn invalid_input_maps_to_typed_reason() {
        let error = EndpointError::from(RegistryError::invalid_input(
            InvalidInputReason::EmptyPassword,
        ));

        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_body_as_json(response).await,
            serde_json::json!({
                "reason": { "type": "users", "data": { "users-error-type": "empty-password" } }
            })
        );
    }

    #[actix_web::test]
    async fn store_errors_do_not_leak() {
        let error = EndpointError::from(StoreError::database_inconsistency(
            "user references a missing role",
        ));

        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = body::to_bytes(response.into_body()).await.unwrap();
        assert!(body_bytes.is_empty());
    }
}
