use warden_core::api_models::{RoleInfo, RoleNamesResponse};
use warden_database::store::RoleModel;

use crate::api::traits::IntoApiModel;
use crate::impl_json_response_builder;


impl_json_response_builder!(RoleInfo);
impl_json_response_builder!(RoleNamesResponse);


impl IntoApiModel for RoleModel {
    type ApiModel = RoleInfo;

    fn into_api_model(self) -> Self::ApiModel {
        RoleInfo {
            name: self.name,
            description: self.description,
        }
    }
}
