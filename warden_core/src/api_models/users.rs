use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RoleInfo;


/// Prefix of the indexed role fields (`role-0`, `role-1`, ...)
/// accepted by [`UserEditRequest`].
pub const INDEXED_ROLE_FIELD_PREFIX: &str = "role-";



/// Request to create a new user.
#[derive(Deserialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct UserCreationRequest {
    /// Unique username.
    pub username: String,

    /// Plaintext password. Only its hash is ever stored.
    pub password: String,
}



/// Partial update of a user.
///
/// Every field is optional. The role list can be submitted either as
/// a `roles` array or as indexed fields (`role-0`, `role-1`, ...),
/// the latter being what HTML forms submit. See [`Self::submitted_role_names`].
#[derive(Deserialize, PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct UserEditRequest {
    /// New password, if it should be changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// New full role list, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Any other fields, including the indexed role fields.
    /// Only string-valued `role-N` entries are ever read from here.
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

impl UserEditRequest {
    /// Returns the submitted role list, if any.
    ///
    /// An explicit `roles` array takes precedence. Otherwise the indexed
    /// `role-N` fields are collected and ordered by their numeric index
    /// (so `role-10` comes after `role-9`). Fields with the prefix but without
    /// a numeric index or without a string value are ignored.
    ///
    /// Returns `None` when neither form is present, meaning the roles
    /// should be left untouched.
    pub fn submitted_role_names(&self) -> Option<Vec<String>> {
        if let Some(roles) = &self.roles {
            return Some(roles.clone());
        }

        let mut indexed_role_names = self
            .other_fields
            .iter()
            .filter_map(|(field_name, value)| {
                let index = field_name
                    .strip_prefix(INDEXED_ROLE_FIELD_PREFIX)?
                    .parse::<usize>()
                    .ok()?;

                Some((index, value.as_str()?))
            })
            .collect::<Vec<_>>();

        if indexed_role_names.is_empty() {
            return None;
        }

        indexed_role_names.sort_by_key(|(index, _)| *index);

        Some(
            indexed_role_names
                .into_iter()
                .map(|(_, role_name)| role_name.to_owned())
                .collect(),
        )
    }
}



/// Information about a single user.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
pub struct UserInfo {
    pub username: String,

    /// Roles of the user, in the order they were assigned in.
    pub roles: Vec<RoleInfo>,
}



/// List of all users, in the order they were created in.
///
/// Serialized as a bare JSON array of [`UserInfo`]s.
#[derive(Serialize, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
#[serde(transparent)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
}
