use serde::{Deserialize, Serialize};



/// Request to create a new role.
#[derive(Deserialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct RoleCreationRequest {
    /// Unique (case-sensitive) name of the role.
    pub name: String,

    /// Role description. Empty if not provided.
    #[serde(default)]
    pub description: Option<String>,
}



/// Request to replace the description of an existing role.
///
/// The role is addressed by its current name in the request path;
/// roles can not be renamed.
#[derive(Deserialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
pub struct RoleDescriptionUpdateRequest {
    /// New role description.
    pub description: String,
}



/// Information about a single role.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
pub struct RoleInfo {
    pub name: String,

    pub description: String,
}



/// Names of all roles, in the order they were created in.
///
/// Serialized as a bare JSON array, e.g. `["admin", "editor"]`.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
#[serde(transparent)]
pub struct RoleNamesResponse {
    pub role_names: Vec<String>,
}
