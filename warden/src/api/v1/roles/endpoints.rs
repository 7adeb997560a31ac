use actix_web::{get, post, web};
use tracing::info;
use warden_core::api_models::{
    RoleCreationRequest,
    RoleDescriptionUpdateRequest,
    RoleNamesResponse,
    RolesErrorReason,
    StatusResponse,
};
use warden_core::roles::ADMINISTRATOR_ROLE_NAME;
use warden_database::registry::{RoleCreationResult, RoleUpdateResult};

use crate::api::errors::{EndpointResponseBuilder, EndpointResult};
use crate::api::macros::ContextlessResponder;
use crate::api::traits::IntoApiModel;
use crate::api::{JsonOrForm, RequestBody};
use crate::authentication::UserAuthenticationExtractor;
use crate::state::ApplicationState;
use crate::{require_role, require_user_authentication};



/// List all roles
///
/// Responds with the names of all roles, in the order they were created
/// (which puts the built-in roles first).
///
/// # Authentication
/// This endpoint requires authentication.
#[get("")]
pub async fn get_all_role_names(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
) -> EndpointResult {
    require_user_authentication!(state, authentication);


    let role_names = state.roles.list_role_names().await?;

    Ok(RoleNamesResponse { role_names }.into_response())
}



/// Add a role
///
/// Creates a new role with the given name and (optional) description.
///
/// Role names are unique: if a role with the given name already exists,
/// nothing is changed and the endpoint responds with `409 Conflict`.
///
/// # Authentication
/// This endpoint requires authentication and the built-in `admin` role.
#[post("/add")]
pub async fn add_role(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    request_body: JsonOrForm<RoleCreationRequest>,
) -> EndpointResult {
    let authenticated_user = require_user_authentication!(state, authentication);
    require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);

    let request_body = request_body.into_body();


    let creation_result = state
        .roles
        .add_role(&request_body.name, request_body.description)
        .await?;

    match creation_result {
        RoleCreationResult::Created(role) => {
            info!(
                role_name = %role.name,
                created_by = %authenticated_user.user_id(),
                "Role added."
            );

            EndpointResponseBuilder::ok()
                .with_json_body(StatusResponse::role_added(&role.name))
                .build()
        }
        RoleCreationResult::AlreadyExists => EndpointResponseBuilder::conflict()
            .with_json_body(StatusResponse::role_exists())
            .build(),
    }
}



/// Edit a role
///
/// Replaces the description of an existing role (roles can not be renamed).
/// Responds with the updated role.
///
/// # Authentication
/// This endpoint requires authentication and the built-in `admin` role.
#[post("/edit/{role_name}")]
pub async fn edit_role(
    state: ApplicationState,
    authentication: UserAuthenticationExtractor,
    parameters: web::Path<(String,)>,
    request_body: JsonOrForm<RoleDescriptionUpdateRequest>,
) -> EndpointResult {
    let authenticated_user = require_user_authentication!(state, authentication);
    require_role!(authenticated_user, ADMINISTRATOR_ROLE_NAME);

    let role_name = parameters.into_inner().0;
    let request_body = request_body.into_body();


    let update_result = state
        .roles
        .edit_role(&role_name, request_body.description)
        .await?;

    match update_result {
        RoleUpdateResult::Updated(role) => Ok(role.into_api_model().into_response()),
        RoleUpdateResult::NotFound => EndpointResponseBuilder::not_found()
            .with_error_reason(RolesErrorReason::role_not_found())
            .build(),
    }
}
