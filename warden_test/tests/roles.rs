use warden_test::prelude::*;


#[actix_web::test]
async fn listing_roles_requires_authentication() {
    let server = initialize_test_server().await;

    let response = server.request(Method::GET, "/api/v1/roles").send().await;

    response.assert_status_equals(StatusCode::UNAUTHORIZED);
    response.assert_error_reason_matches(ErrorReason::missing_authentication());
}

#[actix_web::test]
async fn added_roles_are_listed_after_builtin_roles_in_creation_order() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    for role_name in ["R1", "R2"] {
        let response = server
            .request(Method::POST, "/api/v1/roles/add")
            .with_authentication_token(&administrator_token)
            .with_json_body(RoleCreationRequest {
                name: role_name.to_string(),
                description: None,
            })
            .send()
            .await;

        response.assert_status_equals(StatusCode::OK);
        response.assert_json_body_matches(StatusResponse::role_added(role_name));
    }


    let response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(&administrator_token)
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(vec![
        "admin".to_string(),
        "R1".to_string(),
        "R2".to_string(),
    ]);
}

#[actix_web::test]
async fn adding_an_existing_role_conflicts_and_keeps_description() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let first_response = server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleCreationRequest {
            name: "editor".to_string(),
            description: Some("Edits things.".to_string()),
        })
        .send()
        .await;

    first_response.assert_status_equals(StatusCode::OK);


    let second_response = server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleCreationRequest {
            name: "editor".to_string(),
            description: Some("Something else entirely.".to_string()),
        })
        .send()
        .await;

    second_response.assert_status_equals(StatusCode::CONFLICT);
    second_response.assert_json_body_matches(StatusResponse::role_exists());


    let role = server
        .state()
        .roles
        .get_role("editor")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(role.description, "Edits things.");
}

#[actix_web::test]
async fn roles_can_be_added_with_a_form() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&administrator_token)
        .with_form_body([("name", "moderator"), ("description", "Moderates.")])
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(StatusResponse::role_added("moderator"));
}

#[actix_web::test]
async fn adding_a_role_with_an_empty_name_is_rejected() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    let response = server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleCreationRequest {
            name: String::new(),
            description: None,
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::BAD_REQUEST);
    response.assert_error_reason_matches(RolesErrorReason::empty_role_name());
}

#[actix_web::test]
async fn editing_a_role_replaces_only_its_description() {
    let server = initialize_test_server().await;
    let administrator_token = SampleUser::Administrator.login(&server).await;

    server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleCreationRequest {
            name: "R1".to_string(),
            description: None,
        })
        .send()
        .await
        .assert_status_equals(StatusCode::OK);


    let response = server
        .request(Method::POST, "/api/v1/roles/edit/R1")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleDescriptionUpdateRequest {
            description: "First role.".to_string(),
        })
        .send()
        .await;

    response.assert_status_equals(StatusCode::OK);
    response.assert_json_body_matches(RoleInfo {
        name: "R1".to_string(),
        description: "First role.".to_string(),
    });


    let missing_role_response = server
        .request(Method::POST, "/api/v1/roles/edit/R404")
        .with_authentication_token(&administrator_token)
        .with_json_body(RoleDescriptionUpdateRequest {
            description: "Does not matter.".to_string(),
        })
        .send()
        .await;

    missing_role_response.assert_status_equals(StatusCode::NOT_FOUND);
    missing_role_response.assert_error_reason_matches(RolesErrorReason::role_not_found());
}

#[actix_web::test]
async fn non_administrators_can_list_but_not_add_roles() {
    let server = initialize_test_server().await;

    SampleUser::Janez.add(&server).await;
    let janez_token = SampleUser::Janez.login(&server).await;


    let list_response = server
        .request(Method::GET, "/api/v1/roles")
        .with_authentication_token(&janez_token)
        .send()
        .await;

    list_response.assert_status_equals(StatusCode::OK);


    let add_response = server
        .request(Method::POST, "/api/v1/roles/add")
        .with_authentication_token(&janez_token)
        .with_json_body(RoleCreationRequest {
            name: "R1".to_string(),
            description: None,
        })
        .send()
        .await;

    add_response.assert_status_equals(StatusCode::FORBIDDEN);
    add_response.assert_error_reason_matches(ErrorReason::missing_role("admin"));

    assert!(server
        .state()
        .roles
        .get_role("R1")
        .await
        .unwrap()
        .is_none());
}
