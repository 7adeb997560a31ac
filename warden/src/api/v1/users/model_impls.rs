use itertools::Itertools;
use warden_core::api_models::{UserInfo, UserListResponse};
use warden_database::store::UserModel;

use crate::api::traits::IntoApiModel;
use crate::impl_json_response_builder;


impl_json_response_builder!(UserInfo);
impl_json_response_builder!(UserListResponse);


impl IntoApiModel for UserModel {
    type ApiModel = UserInfo;

    fn into_api_model(self) -> Self::ApiModel {
        UserInfo {
            username: self.username,
            roles: self
                .roles
                .into_iter()
                .map(IntoApiModel::into_api_model)
                .collect_vec(),
        }
    }
}

impl IntoApiModel for Vec<UserModel> {
    type ApiModel = UserListResponse;

    fn into_api_model(self) -> Self::ApiModel {
        UserListResponse {
            users: self
                .into_iter()
                .map(IntoApiModel::into_api_model)
                .collect_vec(),
        }
    }
}
