pub use actix_http::Method;
pub use actix_http::StatusCode;
pub use warden_core::api_models::*;

pub use super::sample_users::*;
pub use super::server::{initialize_test_server, TestServer};
pub use super::TestResponse;
