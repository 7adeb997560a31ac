use serde::Serialize;


/// A plain status message, e.g. `{ "status": "user removed" }`.
///
/// Used by endpoints whose outcome is fully described by one sentence,
/// including the "already exists" outcomes of the creation endpoints.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(serde::Deserialize)
)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new<S>(status: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            status: status.into(),
        }
    }

    pub fn role_added(role_name: &str) -> Self {
        Self::new(format!("role added {}", role_name))
    }

    pub fn role_exists() -> Self {
        Self::new("role exists")
    }

    pub fn user_added(username: &str) -> Self {
        Self::new(format!("user added {}", username))
    }

    pub fn user_exists() -> Self {
        Self::new("user exists")
    }

    pub fn user_removed() -> Self {
        Self::new("user removed")
    }
}
