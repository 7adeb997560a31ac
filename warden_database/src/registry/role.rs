use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use warden_core::roles::BuiltinRole;

use super::{InvalidInputReason, RegistryError, RegistryResult};
use crate::store::{DeleteOutcome, IdentityStore, InsertOutcome, NewRole, RoleModel, UpdateOutcome};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoleCreationResult {
    Created(RoleModel),
    AlreadyExists,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoleUpdateResult {
    Updated(RoleModel),
    NotFound,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoleRemovalResult {
    Removed,
    NotFound,
}



/// Enforces role name uniqueness and mediates all role changes.
#[derive(Clone)]
pub struct RoleRegistry {
    store: Arc<dyn IdentityStore>,
}

impl RoleRegistry {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Creates all [built-in roles][BuiltinRole] that don't exist yet.
    pub async fn seed_builtin_roles(&self) -> RegistryResult<()> {
        for builtin_role in BuiltinRole::ALL {
            let creation_result = self
                .add_role(
                    builtin_role.name(),
                    Some(builtin_role.default_description().to_string()),
                )
                .await?;

            if let RoleCreationResult::Created(_) = creation_result {
                info!(role_name = builtin_role.name(), "Seeded built-in role.");
            }
        }

        Ok(())
    }

    /// Creates a new role. Adding an existing name changes nothing
    /// (not even the description) and reports [`RoleCreationResult::AlreadyExists`].
    pub async fn add_role(
        &self,
        role_name: &str,
        description: Option<String>,
    ) -> RegistryResult<RoleCreationResult> {
        if role_name.is_empty() {
            return Err(RegistryError::invalid_input(
                InvalidInputReason::EmptyRoleName,
            ));
        }

        let insert_outcome = self
            .store
            .insert_role(NewRole {
                name: role_name.to_string(),
                description: description.unwrap_or_default(),
            })
            .await?;

        Ok(match insert_outcome {
            InsertOutcome::Inserted(role) => {
                info!(role_id = %role.id, role_name = %role.name, "Created new role.");
                RoleCreationResult::Created(role)
            }
            InsertOutcome::AlreadyExists => RoleCreationResult::AlreadyExists,
        })
    }

    /// Replaces the description of an existing role. Roles can not be renamed.
    pub async fn edit_role(
        &self,
        role_name: &str,
        new_description: String,
    ) -> RegistryResult<RoleUpdateResult> {
        let update_outcome = self
            .store
            .update_role_description(role_name, new_description)
            .await?;

        Ok(match update_outcome {
            UpdateOutcome::Updated(role) => {
                info!(role_name = %role.name, "Updated role description.");
                RoleUpdateResult::Updated(role)
            }
            UpdateOutcome::NotFound => RoleUpdateResult::NotFound,
        })
    }

    pub async fn get_role(&self, role_name: &str) -> RegistryResult<Option<RoleModel>> {
        Ok(self.store.role_by_name(role_name).await?)
    }

    /// Returns the names of all roles in creation order (built-in roles first).
    pub async fn list_role_names(&self) -> RegistryResult<Vec<String>> {
        let roles = self.store.all_roles().await?;

        Ok(roles.into_iter().map(|role| role.name).collect())
    }

    /// Removes a role, also taking it away from every user that had it.
    /// Built-in roles can not be removed.
    pub async fn remove_role(&self, role_name: &str) -> RegistryResult<RoleRemovalResult> {
        if BuiltinRole::from_name(role_name).is_some() {
            return Err(RegistryError::invalid_input(
                InvalidInputReason::ProtectedRole {
                    role_name: role_name.to_string(),
                },
            ));
        }

        Ok(match self.store.delete_role(role_name).await? {
            DeleteOutcome::Deleted => {
                info!(role_name, "Removed role.");
                RoleRemovalResult::Removed
            }
            DeleteOutcome::NotFound => RoleRemovalResult::NotFound,
        })
    }

    /// Resolves role names into roles.
    ///
    /// The output keeps the order of the input, including any repeated names.
    /// Names of roles that don't exist are silently skipped.
    pub async fn resolve_roles(&self, role_names: &[String]) -> RegistryResult<Vec<RoleModel>> {
        let all_roles = self.store.all_roles().await?;

        let roles_by_name = all_roles
            .iter()
            .map(|role| (role.name.as_str(), role))
            .collect::<HashMap<_, _>>();

        Ok(role_names
            .iter()
            .filter_map(|role_name| roles_by_name.get(role_name.as_str()))
            .map(|role| (*role).clone())
            .collect())
    }
}



#[cfg(test)]
mod test {
    use warden_core::roles::ADMINISTRATOR_ROLE_NAME;

    use super::*;
    use crate::store::InMemoryIdentityStore;

    async fn seeded_registry() -> RoleRegistry {
        let registry = RoleRegistry::new(Arc::new(InMemoryIdentityStore::new()));
        registry.seed_builtin_roles().await.unwrap();

        registry
    }

    #[tokio::test]
    async fn second_add_reports_existing_role_and_keeps_description() {
        let registry = seeded_registry().await;

        let first_result = registry
            .add_role("editor", Some("Edits things.".to_string()))
            .await
            .unwrap();
        assert!(matches!(
            first_result,
            RoleCreationResult::Created(_)
        ));

        let second_result = registry
            .add_role("editor", Some("Something else.".to_string()))
            .await
            .unwrap();
        assert_eq!(second_result, RoleCreationResult::AlreadyExists);

        let role = registry.get_role("editor").await.unwrap().unwrap();
        assert_eq!(role.description, "Edits things.");
    }

    #[tokio::test]
    async fn role_names_are_listed_in_creation_order() {
        let registry = seeded_registry().await;

        registry.add_role("R1", None).await.unwrap();
        registry.add_role("R2", None).await.unwrap();

        assert_eq!(
            registry.list_role_names().await.unwrap(),
            vec![ADMINISTRATOR_ROLE_NAME, "R1", "R2"]
        );
    }

    #[tokio::test]
    async fn seeding_twice_is_harmless() {
        let registry = seeded_registry().await;
        registry.seed_builtin_roles().await.unwrap();

        assert_eq!(
            registry.list_role_names().await.unwrap(),
            vec![ADMINISTRATOR_ROLE_NAME]
        );
    }

    #[tokio::test]
    async fn edit_changes_only_the_description() {
        let registry = seeded_registry().await;

        registry.add_role("R1", None).await.unwrap();

        let RoleUpdateResult::Updated(role) = registry
            .edit_role("R1", "New description.".to_string())
            .await
            .unwrap()
        else {
            panic!("expected role to be updated");
        };

        assert_eq!(role.name, "R1");
        assert_eq!(role.description, "New description.");

        assert_eq!(
            registry
                .edit_role("missing", "Whatever.".to_string())
                .await
                .unwrap(),
            RoleUpdateResult::NotFound
        );
    }

    #[tokio::test]
    async fn empty_role_name_is_invalid_input() {
        let registry = seeded_registry().await;

        assert!(matches!(
            registry.add_role("", None).await,
            Err(RegistryError::InvalidInput {
                reason: InvalidInputReason::EmptyRoleName
            })
        ));
    }

    #[tokio::test]
    async fn resolution_keeps_order_and_repeats_and_skips_unknown_names() {
        let registry = seeded_registry().await;

        registry.add_role("R1", None).await.unwrap();

        let resolved_roles = registry
            .resolve_roles(&[
                "R1".to_string(),
                "does-not-exist".to_string(),
                ADMINISTRATOR_ROLE_NAME.to_string(),
                "R1".to_string(),
            ])
            .await
            .unwrap();

        let resolved_names = resolved_roles
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(
            resolved_names,
            vec!["R1", ADMINISTRATOR_ROLE_NAME, "R1"]
        );
    }

    #[tokio::test]
    async fn builtin_roles_can_not_be_removed() {
        let registry = seeded_registry().await;

        assert!(matches!(
            registry.remove_role(ADMINISTRATOR_ROLE_NAME).await,
            Err(RegistryError::InvalidInput {
                reason: InvalidInputReason::ProtectedRole { .. }
            })
        ));

        registry.add_role("R1", None).await.unwrap();
        assert_eq!(
            registry.remove_role("R1").await.unwrap(),
            RoleRemovalResult::Removed
        );
        assert_eq!(
            registry.remove_role("R1").await.unwrap(),
            RoleRemovalResult::NotFound
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_of_one_name_create_exactly_one_role() {
        const CONCURRENT_CALLERS: usize = 32;

        let registry = seeded_registry().await;

        let handles = (0..CONCURRENT_CALLERS)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.add_role("contested", None).await })
            })
            .collect::<Vec<_>>();

        let mut created_count = 0;
        let mut already_exists_count = 0;

        for handle in handles {
            match handle.await.unwrap().unwrap() {
                RoleCreationResult::Created(_) => created_count += 1,
                RoleCreationResult::AlreadyExists => already_exists_count += 1,
            }
        }

        assert_eq!(created_count, 1);
        assert_eq!(already_exists_count, CONCURRENT_CALLERS - 1);

        let contested_role_count = registry
            .list_role_names()
            .await
            .unwrap()
            .into_iter()
            .filter(|role_name| role_name == "contested")
            .count();
        assert_eq!(contested_role_count, 1);
    }
}
