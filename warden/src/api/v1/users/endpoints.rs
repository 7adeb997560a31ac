use actix_web::{get, post, web};
use tracing::info;
use warden_core::api_models::{
    StatusResponse,
    UserCreationRequest,
    UserEditRequest,
    UsersErrorReason,
};
use warden_core::roles::ADMINISTRATOR_ROLE_NAME;
use warden_database::registry::{
    UserCreationResult,
    UserEdit,
    UserRemovalResult,
    UserUpdateResult,
};

use crate::api::errors::{EndpointResponseBuilder, EndpointResult};
use crate::api::macros::ContextlessResponder;
use crate::api::traits::IntoApiModel;
use crate::api::{JsonOrForm, RequestBody};
use crate::authentication::UserAuthenticationExtractor;
use crate::state::ApplicationState;
use crate::{require_role, require_user_authentication};



/// List all users
///
/// Responds with all users and their roles, in the order the users were created.
///
/// # Authentication
/// This endpoint requires authentication.
#[get("")]
pub async fn get_all_users(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
) -> EndpointResult {
    require_user_authentication!(state, authentication);


    let users = state.users.list_users().await?;

    Ok(users.into_api_model().into_response())
}



/// Add a user
///
/// Creates a new user with the given username and password and no roles.
///
/// Usernames are unique: if a user with the given username already exists,
/// nothing is changed (not even the password) and the endpoint responds with `409 Conflict`.
///
/// # Authentication
/// This endpoint requires authentication and the built-in `admin` role.
#[post("/add")]
pub async fn add_user(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    request_body: JsonOrForm<UserCreationRequest>,
) -> EndpointResult {
    let authenticated_user = require_user_authentication!(state, authentication);
    require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);

    let request_body = request_body.into_body();


    let creation_result = state
        .users
        .add_user(&request_body.username, &request_body.password)
        .await?;

    match creation_result {
        UserCreationResult::Created(user) => {
            info!(
                username = %user.username,
                created_by = %authenticated_user.username(),
                "User added."
            );

            EndpointResponseBuilder::ok()
                .with_json_body(StatusResponse::user_added(&user.username))
                .build()
        }
        UserCreationResult::AlreadyExists => EndpointResponseBuilder::conflict()
            .with_json_body(StatusResponse::user_exists())
            .build(),
    }
}



/// Get a user
///
/// Responds with the user's username and roles (in the order they were assigned in).
///
/// # Authentication
/// This endpoint requires authentication.
#[get("/{username}")]
pub async fn get_specific_user(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    require_user_authentication!(state, authentication);

    let username = parameters.into_inner().0;


    let Some(user) = state.users.get_user(&username).await? else {
        return EndpointResponseBuilder::not_found()
            .with_error_reason(UsersErrorReason::user_not_found())
            .build();
    };

    Ok(user.into_api_model().into_response())
}



/// Edit a user
///
/// Partially updates a user: fields that are not present are left untouched.
///
/// - `password` replaces the user's password.
/// - `roles` (a list of role names) replaces the user's entire role list, keeping the submitted order.
///   Form submissions can instead use indexed `role-0`, `role-1`, ... fields,
///   which are ordered by their index. Names of roles that don't exist are ignored.
///
/// Responds with the updated user.
///
/// # Authentication
/// This endpoint requires authentication and the built-in `admin` role.
#[post("/{username}/edit")]
pub async fn edit_user(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    parameters: web::Path<(String,)>,
    request_body: JsonOrForm<UserEditRequest>,
) -> EndpointResult {
    let authenticated_user = require_user_authentication!(state, authentication);
    require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);

    let username = parameters.into_inner().0;
    let request_body = request_body.into_body();


    let user_edit = UserEdit {
        role_names: request_body.submitted_role_names(),
        new_password: request_body.password,
    };

    let update_result = state.users.edit_user(&username, user_edit).await?;

    match update_result {
        UserUpdateResult::Updated(user) => {
            info!(
                username = %user.username,
                edited_by = %authenticated_user.username(),
                "User edited."
            );

            Ok(user.into_api_model().into_response())
        }
        UserUpdateResult::NotFound => EndpointResponseBuilder::not_found()
            .with_error_reason(UsersErrorReason::user_not_found())
            .build(),
    }
}



/// Remove a user
///
/// Removes the user. Roles the user had are left untouched.
///
/// # Authentication
/// This endpoint requires authentication and the built-in `admin` role.
#[post("/{username}/remove")]
pub async fn remove_user(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    let authenticated_user = require_user_authentication!(state, authentication);
    require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);

    let username = parameters.into_inner().0;


    match state.users.remove_user(&username).await? {
        UserRemovalResult::Removed => {
            info!(
                username = %username,
                removed_by = %authenticated_user.username(),
                "User removed."
            );

            EndpointResponseBuilder::ok()
                .with_json_body(StatusResponse::user_removed())
                .build()
        }
        UserRemovalResult::NotFound => EndpointResponseBuilder::not_found()
            .with_error_reason(UsersErrorReason::user_not_found())
            .build(),
    }
}
