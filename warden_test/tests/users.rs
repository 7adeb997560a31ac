use warden_test::prelude::*;


fn role_info(name: &str, description: &str) -> RoleInfo {
    RoleInfo {
        name: name.to_string(),
        description: description.to_string(),
    }
}

const ADMINISTRATOR_ROLE_DESCRIPTION: &str =
    "Administrator with full access to user and role management.";


async fn add_role(server: &TestServer, token: &str, role_name: &str) {
    server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(token)
        .with_json_body(RoleCreationRequest {
            name: role_name.to_string(),
            description: None,
        })
        .send()
        .await
        .assert_status_equals(StatusCode::OK);
}



#[actix_web::test]
async fn adding_an_existing_user_conflicts_and_keeps_first_password() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/users/add")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserCreationRequest {
            username: SampleUser::Janez.username().to_string(),
            password: "a different password".to_string(),
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::CONFLICT);
    response.assert_json_body_matches(StatusResponse::user_exists());


    // The original password must still work.
    SampleUser::Janez.login(&server).await;
}

#[actix_web::test]
async fn adding_a_user_with_an_empty_password_is_rejected() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/users/add")
        .with_authentication_token(&administrator_token)
        .with_form_body([("username", "u1"), ("password", "")])
        .send()
        .await;

    response.assert_status_equals(StatusCode::BAD_REQUEST);
    response.assert_error_reason_matches(UsersErrorReason::empty_password());
}

#[actix_web::test]
async fn editing_the_password_replaces_the_credential() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            password: Some("pw2".to_string()),
            ..Default::default()
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);


    let old_password_response = server
        .request(Method::POST, "/api/v1/login")
        .with_json_body(SampleUser::Janez.into_login_request_model())
        .send()
        .await;

    old_password_response.assert_status_equals(StatusCode::FORBIDDEN);
    old_password_response.assert_error_reason_matches(LoginErrorReason::invalid_login_credentials());


    let new_password_response = server
        .request(Method::POST, "/api/v1/login")
        .with_json_body(UserLoginRequest {
            username: "janez".to_string(),
            password: "pw2".to_string(),
        })
        .send()
        .await;

    new_password_response.assert_status_equals(StatusCode::OK);
}

#[actix_web::test]
async fn editing_roles_replaces_the_whole_role_list_in_submitted_order() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;
    add_role(&server, &administrator_token, "R1").await;
    add_role(&server, &administrator_token, "R2").await;


    let first_response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            roles: Some(vec!["R2".to_string()]),
            ..Default::default()
        })
        .send()
        .await;

    first_response.assert_status_equals(StatusCode::OK);


    let second_response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            roles: Some(vec!["admin".to_string(), "R1".to_string()]),
            ..Default::default()
        })
        .send()
        .await;

    second_response.assert_status_equals(StatusCode::OK);
    second_response.assert_json_body_matches(UserInfo {
        username: "janez".to_string(),
        roles: vec![
            role_info("admin", ADMINISTRATOR_ROLE_DESCRIPTION),
            role_info("R1", ""),
        ],
    });
}

#[actix_web::test]
async fn indexed_role_form_fields_are_ordered_by_index() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;
    add_role(&server, &administrator_token, "R1").await;
    add_role(&server, &administrator_token, "R2").await;


    let response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_form_body([("role-10", "R1"), ("role-2", "R2"), ("role-0", "admin")])
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(UserInfo {
        username: "janez".to_string(),
        roles: vec![
            role_info("admin", ADMINISTRATOR_ROLE_DESCRIPTION),
            role_info("R2", ""),
            role_info("R1", ""),
        ],
    });
}

#[actix_web::test]
async fn unrelated_non_string_edit_fields_are_ignored() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;


    let response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(serde_json::json!({
            "password": "pw2",
            "active": true,
            "attempts": 3,
        }))
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(UserInfo {
        username: "janez".to_string(),
        roles: Vec::new(),
    });


    server
        .request(Method::POST, "/api/v1/login")
        .with_json_body(UserLoginRequest {
            username: "janez".to_string(),
            password: "pw2".to_string(),
        })
        .send()
        .await
        .assert_status_equals(StatusCode::OK);
}

#[actix_web::test]
async fn unknown_role_names_are_dropped() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;
    add_role(&server, &administrator_token, "R1").await;


    let response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            roles: Some(vec!["ghost".to_string(), "R1".to_string()]),
            ..Default::default()
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(UserInfo {
        username: "janez".to_string(),
        roles: vec![role_info("R1", "")],
    });
}

#[actix_web::test]
async fn editing_a_missing_user_responds_with_not_found() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/users/nobody/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            password: Some("pw".to_string()),
            ..Default::default()
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::NOT_FOUND);
    response.assert_error_reason_matches(UsersErrorReason::user_not_found());
}

#[actix_web::test]
async fn removing_a_user_keeps_its_roles() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    SampleUser::Janez.add(&server).await;
    add_role(&server, &administrator_token, "R1").await;

    server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&administrator_token)
        .with_json_body(UserEditRequest {
            roles: Some(vec!["R1".to_string()]),
            ..Default::default()
        })
        .send()
        .await
        .assert_status_equals(StatusCode::OK);


    let response = server
        .request(Method::POST, "/api/v1/users/janez/remove")
        .with_authentication_token(&administrator_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(StatusResponse::user_removed());


    let get_response = server
        .request(Method::GET, "/api/v1/users/janez")
        .with_authentication_token(&administrator_token)
        .send()
        .await;

    get_response.assert_status_equals(StatusCode::NOT_FOUND);


    let roles_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(&administrator_token)
        .send()
        .await;

    roles_response.assert_json_body_matches(vec!["admin".to_string(), "R1".to_string()]);


    let second_removal_response = server
        .request(Method::POST, "/api/v1/users/janez/remove")
        .with_authentication_token(&administrator_token)
        .send()
        .await;

    second_removal_response.assert_status_equals(StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn users_are_listed_in_creation_order() {
    let server = initialize_test_server().await;

    SampleUser::Janez.add(&server).await;
    SampleUser::Meta.add(&server).await;

    let meta_token = SampleUser::Meta.login(&server).await;


    let response = server
        .request(Method::GET, "/api/v1/users")
        .with_authentication_token(&meta_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);

    let usernames = response
        .json_body::<UserListResponse>()
        .users
        .into_iter()
        .map(|user| user.username)
        .collect::<Vec<_>>();

    assert_eq!(
        usernames,
        vec![
            SampleUser::Administrator.username().to_string(),
            "janez".to_string(),
            "meta".to_string(),
        ]
    );
}

#[actix_web::test]
async fn non_administrators_can_not_modify_users() {
    let server = initialize_test_server().await;

    SampleUser::Janez.add(&server).await;
    SampleUser::Meta.add(&server).await;
    let janez_token = SampleUser::Janez.login(&server).await;


    let add_response = server
        .request(Method::POST, "/api/v1/users/add")
        .with_authentication_token(&janez_token)
        .with_json_body(UserCreationRequest {
            username: "u1".to_string(),
            password: "pw1".to_string(),
        })
        .send()
        .await;

    add_response.assert_status_equals(StatusCode::FORBIDDEN);


    let edit_response = server
        .request(Method::POST, "/api/v1/users/janez/edit")
        .with_authentication_token(&janez_token)
        .with_json_body(UserEditRequest {
            roles: Some(vec!["admin".to_string()]),
            ..Default::default()
        })
        .send()
        .await;

    edit_response.assert_status_equals(StatusCode::FORBIDDEN);


    let remove_response = server
        .request(Method::POST, "/api/v1/users/meta/remove")
        .with_authentication_token(&janez_token)
        .send()
        .await;

    remove_response.assert_status_equals(StatusCode::FORBIDDEN);
    remove_response.assert_error_reason_matches(ErrorReason::missing_role("admin"));
}
