use std::sync::Arc;

use tracing::{info, warn};
use warden_core::id::UserId;
use warden_core::password_hasher::ArgonHasher;
use warden_core::roles::ADMINISTRATOR_ROLE_NAME;

use super::{InvalidInputReason, RegistryError, RegistryResult, RoleRegistry};
use crate::store::{
    DeleteOutcome,
    IdentityStore,
    InsertOutcome,
    NewUser,
    UpdateOutcome,
    UserModel,
    UserUpdate,
};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UserCreationResult {
    Created(UserModel),
    AlreadyExists,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UserUpdateResult {
    Updated(UserModel),
    NotFound,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UserRemovalResult {
    Removed,
    NotFound,
}


/// A partial user update. `None` fields are left untouched.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UserEdit {
    pub new_password: Option<String>,

    /// Replaces the user's entire role list, in this order.
    /// Names of roles that don't exist are skipped.
    pub role_names: Option<Vec<String>>,
}



/// Enforces username uniqueness and mediates all user changes.
#[derive(Clone)]
pub struct UserRegistry {
    store: Arc<dyn IdentityStore>,

    roles: RoleRegistry,

    hasher: Arc<ArgonHasher>,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn IdentityStore>, hasher: Arc<ArgonHasher>) -> Self {
        Self {
            roles: RoleRegistry::new(store.clone()),
            store,
            hasher,
        }
    }

    /// Makes sure the administrator account exists and holds the built-in
    /// administrator role.
    ///
    /// A missing account is created with the given password. An existing account
    /// keeps its password and roles, but gets the administrator role appended
    /// if it had lost it.
    ///
    /// Expects the built-in roles to already be seeded
    /// (see [`RoleRegistry::seed_builtin_roles`]).
    pub async fn seed_administrator(&self, username: &str, password: &str) -> RegistryResult<()> {
        let (administrator, newly_created) = match self.add_user(username, password).await? {
            UserCreationResult::Created(administrator) => (administrator, true),
            UserCreationResult::AlreadyExists => match self.get_user(username).await? {
                Some(administrator) => (administrator, false),
                None => {
                    warn!(
                        username,
                        "Administrator account was removed while it was being seeded."
                    );
                    return Ok(());
                }
            },
        };

        if administrator.has_role_named(ADMINISTRATOR_ROLE_NAME) {
            return Ok(());
        }

        let mut role_names = administrator
            .roles
            .iter()
            .map(|role| role.name.clone())
            .collect::<Vec<_>>();
        role_names.push(ADMINISTRATOR_ROLE_NAME.to_string());

        let update_result = self
            .edit_user(
                username,
                UserEdit {
                    new_password: None,
                    role_names: Some(role_names),
                },
            )
            .await?;

        match update_result {
            UserUpdateResult::Updated(administrator) if newly_created => {
                info!(
                    username = %administrator.username,
                    "Seeded administrator account."
                );
            }
            UserUpdateResult::Updated(administrator) => {
                warn!(
                    username = %administrator.username,
                    "Administrator account was missing the administrator role, restored it."
                );
            }
            UserUpdateResult::NotFound => {
                warn!(
                    username,
                    "Administrator account was removed while it was being seeded."
                );
            }
        }

        Ok(())
    }

    fn ensure_valid_username(username: &str) -> RegistryResult<()> {
        if username.is_empty() {
            return Err(RegistryError::invalid_input(
                InvalidInputReason::EmptyUsername,
            ));
        }

        Ok(())
    }

    fn ensure_valid_password(password: &str) -> RegistryResult<()> {
        if password.is_empty() {
            return Err(RegistryError::invalid_input(
                InvalidInputReason::EmptyPassword,
            ));
        }

        Ok(())
    }

    /// Creates a new user without any roles. Adding an existing username
    /// changes nothing (not even the password) and reports
    /// [`UserCreationResult::AlreadyExists`].
    pub async fn add_user(&self, username: &str, password: &str) -> RegistryResult<UserCreationResult> {
        Self::ensure_valid_username(username)?;
        Self::ensure_valid_password(password)?;

        let hashed_password = self.hasher.hash_password(password)?;

        let insert_outcome = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                hashed_password,
            })
            .await?;

        Ok(match insert_outcome {
            InsertOutcome::Inserted(user) => {
                info!(user_id = %user.id, username = %user.username, "Created new user.");
                UserCreationResult::Created(user)
            }
            InsertOutcome::AlreadyExists => UserCreationResult::AlreadyExists,
        })
    }

    /// Applies a partial update to a user.
    ///
    /// The new password is hashed and the role names are resolved up front,
    /// and both are then applied to the store in one atomic step.
    pub async fn edit_user(&self, username: &str, edit: UserEdit) -> RegistryResult<UserUpdateResult> {
        let hashed_password = match edit.new_password {
            Some(new_password) => {
                Self::ensure_valid_password(&new_password)?;
                Some(self.hasher.hash_password(&new_password)?)
            }
            None => None,
        };

        let role_ids = match edit.role_names {
            Some(role_names) => Some(
                self.roles
                    .resolve_roles(&role_names)
                    .await?
                    .into_iter()
                    .map(|role| role.id)
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let password_changed = hashed_password.is_some();
        let roles_changed = role_ids.is_some();

        let update_outcome = self
            .store
            .update_user(
                username,
                UserUpdate {
                    hashed_password,
                    role_ids,
                },
            )
            .await?;

        Ok(match update_outcome {
            UpdateOutcome::Updated(user) => {
                info!(
                    user_id = %user.id,
                    username = %user.username,
                    password_changed,
                    roles_changed,
                    "Updated user."
                );
                UserUpdateResult::Updated(user)
            }
            UpdateOutcome::NotFound => UserUpdateResult::NotFound,
        })
    }

    /// Removes a user. The roles it had are left untouched.
    pub async fn remove_user(&self, username: &str) -> RegistryResult<UserRemovalResult> {
        Ok(match self.store.delete_user(username).await? {
            DeleteOutcome::Deleted => {
                info!(username, "Removed user.");
                UserRemovalResult::Removed
            }
            DeleteOutcome::NotFound => UserRemovalResult::NotFound,
        })
    }

    pub async fn get_user(&self, username: &str) -> RegistryResult<Option<UserModel>> {
        Ok(self.store.user_by_username(username).await?)
    }

    pub async fn get_user_by_id(&self, user_id: UserId) -> RegistryResult<Option<UserModel>> {
        Ok(self.store.user_by_id(user_id).await?)
    }

    /// Returns all users in creation order.
    pub async fn list_users(&self) -> RegistryResult<Vec<UserModel>> {
        Ok(self.store.all_users().await?)
    }

    /// Returns the user if the username exists and the password matches its stored hash.
    ///
    /// An unknown username and a wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> RegistryResult<Option<UserModel>> {
        let Some(user) = self.store.user_by_username(username).await? else {
            return Ok(None);
        };

        let password_matches = self
            .hasher
            .verify_password_against_hash(password, &user.hashed_password)?;

        Ok(password_matches.then_some(user))
    }
}
