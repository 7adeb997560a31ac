use chrono::{Duration, Utc};
use warden_core::token::{TokenClaims, TokenKind};
use warden_test::prelude::*;


#[actix_web::test]
async fn ping_needs_no_authentication() {
    let server = initialize_test_server().await;

    let response = server.request(Method::GET, "/api/v1/ping").send().await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(serde_json::json!({ "ok": true }));
}

#[actix_web::test]
async fn login_with_invalid_credentials_is_forbidden() {
    let server = initialize_test_server().await;

    let response = server
        .request(Method::POST, "/api/v1/login")
        .with_json_body(UserLoginRequest {
            username: SampleUser::Administrator.username().to_string(),
            password: "not the password".to_string(),
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::FORBIDDEN);
    response.assert_error_reason_matches(LoginErrorReason::invalid_login_credentials());


    let unknown_user_response = server
        .request(Method::POST, "/api/v1/login")
        .with_form_body([("username", "nobody"), ("password", "pw")])
        .send()
        .await;

    unknown_user_response.assert_status_equals(StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn every_role_and_user_route_requires_authentication() {
    let server = initialize_test_server().await;

    let routes = [
        (Method::GET, "/api/v1/roles"),
        (Method::POST, "/api/v1/roles/add"),
        (Method::POST, "/api/v1/roles/edit/admin"),
        (Method::GET, "/api/v1/users"),
        (Method::POST, "/api/v1/users/add"),
        (Method::GET, "/api/v1/users/admin@example.com"),
        (Method::POST, "/api/v1/users/admin@example.com/edit"),
        (Method::POST, "/api/v1/users/admin@example.com/remove"),
    ];

    for (method, route) in routes {
        let response = server
            .request(method, route)
            .with_json_body(serde_json::json!({
                "name": "R1",
                "description": "",
                "username": "u1",
                "password": "pw1"
            }))
            .send()
            .await;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{route} did not require authentication"
        );
    }

    assert!(server
        .state()
        .users
        .get_user(SampleUser::Administrator.username())
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn invalid_and_expired_tokens_are_rejected() {
    let server = initialize_test_server().await;

    let invalid_token_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token("definitely.not.a-token")
        .send()
        .await;

    invalid_token_response.assert_status_equals(StatusCode::BAD_REQUEST);


    let administrator = server
        .state()
        .users
        .get_user(SampleUser::Administrator.username())
        .await
        .unwrap()
        .unwrap();

    let expired_token = server
        .state()
        .token_manager()
        .encode(&TokenClaims::new(
            TokenKind::Access,
            administrator.id,
            &administrator.username,
            Utc::now() - Duration::hours(3),
            Duration::hours(1),
        ))
        .unwrap();

    let expired_token_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(expired_token)
        .send()
        .await;

    expired_token_response.assert_status_equals(StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn legacy_token_header_is_accepted() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let response = server
        .request(Method::GET, "/api/v1/roles")
        .with_header("Authentication-Token", &administrator_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
}

#[actix_web::test]
async fn non_bearer_authorization_counts_as_missing_authentication() {
    let server = initialize_test_server().await;

    let basic_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_header("Authorization", "Basic YWRtaW46YWRtaW4=")
        .send()
        .await;

    basic_response.assert_status_equals(StatusCode::UNAUTHORIZED);


    let administrator_token = SampleUser::Administrator.login(&server).await;

    let basic_with_legacy_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_header("Authorization", "Basic YWRtaW46YWRtaW4=")
        .with_header("Authentication-Token", &administrator_token)
        .send()
        .await;

    basic_with_legacy_response.assert_status_equals(StatusCode::OK);
}

#[actix_web::test]
async fn refresh_tokens_issue_access_tokens_but_do_not_authenticate() {
    let server = initialize_test_server().await;
    let tokens = SampleUser::Administrator.login_with_tokens(&server).await;


    let refresh_as_access_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(&tokens.refresh_token)
        .send()
        .await;

    refresh_as_access_response.assert_status_equals(StatusCode::BAD_REQUEST);


    let access_as_refresh_response = server
        .request(Method::POST, "/api/v1/login/refresh")
        .with_json_body(UserLoginRefreshRequest {
            refresh_token: tokens.access_token.clone(),
        })
        .send()
        .await;

    access_as_refresh_response.assert_status_equals(StatusCode::BAD_REQUEST);
    access_as_refresh_response.assert_error_reason_matches(LoginErrorReason::not_a_refresh_token());


    let refresh_response = server
        .request(Method::POST, "/api/v1/login/refresh")
        .with_json_body(UserLoginRefreshRequest {
            refresh_token: tokens.refresh_token,
        })
        .send()
        .await;

    refresh_response.assert_status_equals(StatusCode::OK);

    let refreshed_access_token = refresh_response
        .json_body::<UserLoginRefreshResponse>()
        .access_token;


    let response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(refreshed_access_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
}

#[actix_web::test]
async fn tokens_of_removed_users_stop_working() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;
    let janez_token = SampleUser::Janez.login(&server).await;

    server
        .request(Method::POST, "/api/v1/users/janez/remove")
        .with_authentication_token(&administrator_token)
        .send()
        .await
        .assert_status_equals(StatusCode::OK);


    let response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(&janez_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::UNAUTHORIZED);
}
