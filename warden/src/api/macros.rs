use actix_web::body::MessageBody;
use actix_web::HttpResponse;


/// Simple responder trait (similar to [`actix_web::Responder`]).
///
/// The main difference is that our `into_response` method does not require
/// a reference to [`HttpRequest`][actix_web::HttpRequest],
/// i.e. the response must be built without a request when using this trait.
///
/// It also lets us implement responses for API models that live in other crates
/// (see [`impl_json_response_builder`][crate::impl_json_response_builder]).
pub trait ContextlessResponder {
    type Body: MessageBody + 'static;

    /// Serializes `self` as JSON and return a `HTTP 200 OK` response
    /// with a JSON-encoded body.
    fn into_response(self) -> HttpResponse<Self::Body>;
}


/// Implements [`ContextlessResponder`] for the given type,
/// which must already implement [`Serialize`][serde::Serialize].
///
///
/// # Example
/// ```
/// use actix_web::get;
/// use serde::Serialize;
/// use warden::impl_json_response_builder;
/// use warden::api::errors::EndpointResult;
/// use warden::api::macros::ContextlessResponder;
///
/// #[derive(Serialize)]
/// struct SomeResponse {
///     value: i32,
/// }
///
/// impl_json_response_builder!(SomeResponse);
///
///
/// #[get("/some/path")]
/// async fn example_handler() -> EndpointResult {
///     Ok(SomeResponse { value: 42 }.into_response())
/// }
/// ```
#[macro_export]
macro_rules! impl_json_response_builder {
    ($struct:ty) => {
        impl $crate::api::macros::ContextlessResponder for $struct {
            type Body = actix_web::body::BoxBody;

            fn into_response(self) -> actix_web::HttpResponse<Self::Body> {
                actix_web::HttpResponse::Ok().json(&self)
            }
        }
    };
}


/// Takes an [`ApplicationState`][crate::state::ApplicationState]
/// and a [`UserAuthenticationExtractor`][crate::authentication::UserAuthenticationExtractor]
/// and resolves the user the access token was issued to.
///
/// The resulting expression is an
/// [`AuthenticatedUser`][crate::authentication::AuthenticatedUser].
///
///
/// # Early-return values
/// If the caller did not provide an access token, or the user it was issued to
/// no longer exists, the macro early-returns an
/// `Err(`[`EndpointError::MissingAuthentication`][crate::api::errors::EndpointError::MissingAuthentication]`)`,
/// which results in a `401 Unauthorized`.
///
/// Identity store errors are propagated as internal errors (`500 Internal Server Error`).
#[macro_export]
macro_rules! require_user_authentication {
    ($state:expr, $authentication_extractor:expr) => {
        match $authentication_extractor.authenticated_user(&$state).await? {
            Some(authenticated_user) => authenticated_user,
            None => {
                return Err($crate::api::errors::EndpointError::MissingAuthentication);
            }
        }
    };
}


/// Early-returns an
/// `Err(`[`EndpointError::MissingRole`][crate::api::errors::EndpointError::MissingRole]`)`
/// (`403 Forbidden`) if the given
/// [`AuthenticatedUser`][crate::authentication::AuthenticatedUser]
/// does not hold the role with the given name.
#[macro_export]
macro_rules! require_role {
    ($authenticated_user:expr, $role_name:expr) => {
        if !$authenticated_user.has_role($role_name) {
            return Err($crate::api::errors::EndpointError::missing_role(
                $role_name,
            ));
        }
    };
}
