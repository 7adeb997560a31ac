use actix_http::{Method, StatusCode};
use warden_core::api_models::{
    StatusResponse,
    UserCreationRequest,
    UserLoginRequest,
    UserLoginResponse,
};

use crate::server::{TestServer, TEST_ADMINISTRATOR_PASSWORD, TEST_ADMINISTRATOR_USERNAME};


/// A sample user intended for testing the backend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleUser {
    /// The administrator account seeded on startup. Holds the built-in `admin` role.
    Administrator,
    Janez,
    Meta,
}

impl SampleUser {
    pub fn username(&self) -> &'static str {
        match self {
            SampleUser::Administrator => TEST_ADMINISTRATOR_USERNAME,
            SampleUser::Janez => "janez",
            SampleUser::Meta => "meta",
        }
    }

    pub fn password(&self) -> &'static str {
        match self {
            SampleUser::Administrator => TEST_ADMINISTRATOR_PASSWORD,
            SampleUser::Janez => "janezovo geslo",
            SampleUser::Meta => "metino geslo",
        }
    }

    pub fn into_creation_request_model(self) -> UserCreationRequest {
        UserCreationRequest {
            username: self.username().to_string(),
            password: self.password().to_string(),
        }
    }

    pub fn into_login_request_model(self) -> UserLoginRequest {
        UserLoginRequest {
            username: self.username().to_string(),
            password: self.password().to_string(),
        }
    }

    /// Adds the given [`SampleUser`] through the API, authenticating as the administrator.
    pub async fn add(&self, server: &TestServer) {
        let administrator_token = SampleUser::Administrator.login(server).await;

        let response = server
            .request(Method::POST, "/api/v1/users/add")
            .with_authentication_token(administrator_token)
            .with_json_body(self.into_creation_request_model())
            .send()
            .await;

        response.assert_status_equals(StatusCode::OK);
        response.assert_json_body_matches(StatusResponse::user_added(self.username()));
    }

    /// Logs in and returns both tokens.
    pub async fn login_with_tokens(&self, server: &TestServer) -> UserLoginResponse {
        let response = server
            .request(Method::POST, "/api/v1/login")
            .with_json_body(self.into_login_request_model())
            .send()
            .await;

        response.assert_status_equals(StatusCode::OK);

        response.json_body::<UserLoginResponse>()
    }

    /// Returns the access token.
    pub async fn login(&self, server: &TestServer) -> String {
        self.login_with_tokens(server).await.access_token
    }
}
