use std::fmt::Debug;

use actix_http::header::{HeaderMap, HeaderName};
use actix_http::StatusCode;
use actix_web::web::Bytes;
use serde::Deserialize;
use warden_core::api_models::{ErrorReason, ResponseWithErrorReason};


pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
}

impl TestResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body_bytes: Bytes) -> Self {
        Self {
            status,
            headers,
            body_bytes,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn assert_status_equals(&self, status_code: StatusCode) {
        assert_eq!(
            self.status,
            status_code,
            "unexpected status code, response body: {}",
            String::from_utf8_lossy(&self.body_bytes)
        );
    }

    pub fn assert_header_exists<N>(&self, header_name: N)
    where
        N: Into<HeaderName>,
    {
        let header_name: HeaderName = header_name.into();

        self.headers.get(&header_name).unwrap_or_else(|| {
            panic!(
                "header {} does not exist on response",
                header_name.as_str()
            )
        });
    }

    pub fn json_body<'de, D>(&'de self) -> D
    where
        D: Deserialize<'de>,
    {
        serde_json::from_slice::<D>(&self.body_bytes).expect("failed to deserialize body as JSON")
    }

    pub fn assert_json_body_matches<'de, D>(&'de self, expected_content: D)
    where
        D: Deserialize<'de> + PartialEq + Debug,
    {
        let data = self.json_body::<D>();

        assert_eq!(data, expected_content);
    }

    pub fn assert_error_reason_matches<R>(&self, expected_reason: R)
    where
        R: Into<ErrorReason>,
    {
        let response = self.json_body::<ResponseWithErrorReason>();

        assert_eq!(response.reason, expected_reason.into());
    }
}
