//! HTTP API of the Warden server.

use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::{web, Either, Scope};
use warden_core::api_models::InvalidRequestBodyReason;

use self::errors::EndpointError;
use self::v1::v1_api_router;

pub mod errors;
pub mod macros;
pub mod traits;
pub mod v1;


/// Maximum accepted size of a JSON or form request body.
pub const MAXIMUM_REQUEST_BODY_SIZE: usize = 1024 * 64;


/// Request body extractor that accepts both a JSON body
/// and an `application/x-www-form-urlencoded` form.
///
/// Use [`RequestBody::into_body`] to get to the deserialized value.
pub type JsonOrForm<T> = Either<web::Json<T>, web::Form<T>>;

pub trait RequestBody<T> {
    fn into_body(self) -> T;
}

impl<T> RequestBody<T> for JsonOrForm<T> {
    fn into_body(self) -> T {
        match self {
            Either::Left(json_body) => json_body.into_inner(),
            Either::Right(form_body) => form_body.into_inner(),
        }
    }
}


fn json_error_reason(error: &JsonPayloadError) -> InvalidRequestBodyReason {
    match error {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            InvalidRequestBodyReason::TooLarge
        }
        JsonPayloadError::Deserialize(deserialization_error)
            if deserialization_error.is_data() =>
        {
            InvalidRequestBodyReason::InvalidData
        }
        _ => InvalidRequestBodyReason::Unreadable,
    }
}

fn form_error_reason(error: &UrlencodedError) -> InvalidRequestBodyReason {
    match error {
        UrlencodedError::Overflow { .. } => InvalidRequestBodyReason::TooLarge,
        UrlencodedError::Parse { .. } => InvalidRequestBodyReason::InvalidData,
        _ => InvalidRequestBodyReason::Unreadable,
    }
}

/// JSON extractor configuration that turns body errors into
/// [`EndpointError::InvalidRequestBody`] responses.
pub fn json_extractor_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAXIMUM_REQUEST_BODY_SIZE)
        .error_handler(|error, _| {
            EndpointError::invalid_request_body(json_error_reason(&error)).into()
        })
}

/// Form extractor configuration that turns body errors into
/// [`EndpointError::InvalidRequestBody`] responses.
pub fn form_extractor_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(MAXIMUM_REQUEST_BODY_SIZE)
        .error_handler(|error, _| {
            EndpointError::invalid_request_body(form_error_reason(&error)).into()
        })
}



#[rustfmt::skip]
pub fn api_router() -> Scope {
    web::scope("/api")
        .service(v1_api_router())
}
