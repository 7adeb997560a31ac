use std::sync::Arc;

use actix_http::header::{self, HeaderValue};
use actix_http::Method;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use serde::Serialize;
use warden::api::{api_router, form_extractor_config, json_extractor_config};
use warden::state::{ApplicationState, ApplicationStateInner};
use warden_configuration::Configuration;
use warden_database::store::InMemoryIdentityStore;

use crate::TestResponse;


pub const TEST_ADMINISTRATOR_USERNAME: &str = "admin@example.com";
pub const TEST_ADMINISTRATOR_PASSWORD: &str = "administrator password";

/// Server configuration used by all tests.
///
/// Password hashing is made as cheap as argon2 allows, otherwise the tests would crawl.
const TEST_CONFIGURATION: &str = r#"
    [http]
    host = "127.0.0.1"
    port = 8866

    [logging]
    console_output_level_filter = "warn"
    log_file_output_level_filter = "warn"
    log_file_output_directory = "./logs"

    [json_web_token]
    secret = "warden test secret"

    [password_hashing]
    memory_cost_kib = 1024
    iterations = 1
    parallelism = 1

    [administrator]
    username = "admin@example.com"
    password = "administrator password"
"#;


pub fn test_configuration() -> Configuration {
    Configuration::load_from_str(
        TEST_CONFIGURATION,
        std::env::temp_dir().join("warden-test/configuration.toml"),
    )
    .expect("failed to load test configuration")
}


/// Sets up the application the same way the server binary does,
/// minus the CORS and request tracing middleware.
fn build_app(
    state: ApplicationState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(actix_web::middleware::NormalizePath::trim())
        .app_data(json_extractor_config())
        .app_data(form_extractor_config())
        .app_data(state)
        .service(api_router())
}



/// An in-process Warden server backed by a fresh in-memory identity store.
pub struct TestServer {
    state: ApplicationState,
}

impl TestServer {
    pub fn state(&self) -> &ApplicationStateInner {
        &self.state
    }

    pub fn request<U>(&self, method: Method, endpoint: U) -> TestRequestBuilder<'_>
    where
        U: AsRef<str>,
    {
        TestRequestBuilder {
            server: self,
            request: TestRequest::default()
                .method(method)
                .uri(endpoint.as_ref()),
        }
    }
}

/// Initializes a new [`TestServer`] with the built-in roles
/// and the administrator account already seeded.
pub async fn initialize_test_server() -> TestServer {
    let state = ApplicationStateInner::with_identity_store(
        test_configuration(),
        Arc::new(InMemoryIdentityStore::new()),
    )
    .await
    .expect("failed to initialize application state");

    TestServer {
        state: web::Data::new(state),
    }
}



pub struct TestRequestBuilder<'s> {
    server: &'s TestServer,

    request: TestRequest,
}

impl<'s> TestRequestBuilder<'s> {
    pub fn with_authentication_token<S>(mut self, token: S) -> Self
    where
        S: AsRef<str>,
    {
        self.request = self.request.insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", token.as_ref()),
        ));
        self
    }

    pub fn with_header<S>(mut self, header_name: &'static str, value: S) -> Self
    where
        S: AsRef<str>,
    {
        self.request = self.request.insert_header((
            header_name,
            HeaderValue::from_str(value.as_ref()).expect("invalid header value"),
        ));
        self
    }

    pub fn with_json_body<V>(mut self, value: V) -> Self
    where
        V: Serialize,
    {
        self.request = self.request.set_json(value);
        self
    }

    pub fn with_form_body<V>(mut self, value: V) -> Self
    where
        V: Serialize,
    {
        self.request = self.request.set_form(value);
        self
    }

    pub async fn send(self) -> TestResponse {
        let app = test::init_service(build_app(self.server.state.clone())).await;

        let response = test::call_service(&app, self.request.to_request()).await;

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = test::read_body(response).await;

        TestResponse::new(status, headers, body_bytes)
    }
}
