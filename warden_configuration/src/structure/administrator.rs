use serde::Deserialize;

use crate::traits::TryResolve;
use crate::AdministratorConfigurationError;


pub(crate) type UnresolvedAdministratorConfiguration = AdministratorConfiguration;

/// The built-in administrator account, created on startup if it doesn't exist yet.
///
/// The password is only used when creating the account;
/// changing it here does not change the password of an existing administrator.
#[derive(Deserialize, Clone)]
pub struct AdministratorConfiguration {
    pub username: String,

    pub password: String,
}

impl std::fmt::Debug for AdministratorConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdministratorConfiguration")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl TryResolve for UnresolvedAdministratorConfiguration {
    type Resolved = AdministratorConfiguration;
    type Error = AdministratorConfigurationError;

    fn try_resolve(self) -> Result<Self::Resolved, Self::Error> {
        if self.username.is_empty() {
            return Err(AdministratorConfigurationError::EmptyUsername);
        }

        if self.password.is_empty() {
            return Err(AdministratorConfigurationError::EmptyPassword);
        }

        Ok(self)
    }
}
