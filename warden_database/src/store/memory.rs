use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use warden_core::id::{RoleId, UserId};

use super::{
    DeleteOutcome,
    IdentityStore,
    InsertOutcome,
    NewRole,
    NewUser,
    RoleModel,
    UpdateOutcome,
    UserModel,
    UserUpdate,
};
use crate::StoreResult;


struct StoredUser {
    id: UserId,
    username: String,
    hashed_password: String,
    role_ids: Vec<RoleId>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}


#[derive(Default)]
struct MemoryState {
    /// In creation order.
    roles: Vec<RoleModel>,

    /// In creation order.
    users: Vec<StoredUser>,

    last_role_id: i32,
}

impl MemoryState {
    fn role_by_id(&self, role_id: RoleId) -> Option<&RoleModel> {
        self.roles.iter().find(|role| role.id == role_id)
    }

    fn materialize_user(&self, user: &StoredUser) -> UserModel {
        UserModel {
            id: user.id,
            username: user.username.clone(),
            hashed_password: user.hashed_password.clone(),
            roles: user
                .role_ids
                .iter()
                .filter_map(|role_id| self.role_by_id(*role_id))
                .cloned()
                .collect(),
            created_at: user.created_at,
            last_modified_at: user.last_modified_at,
        }
    }
}



/// An [`IdentityStore`] that lives entirely in process memory.
///
/// All state sits behind a single [`RwLock`], so every check-then-insert sequence
/// happens under one write guard. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    state: RwLock<MemoryState>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}


#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn role_by_name(&self, role_name: &str) -> StoreResult<Option<RoleModel>> {
        let state = self.state.read().await;

        Ok(state
            .roles
            .iter()
            .find(|role| role.name == role_name)
            .cloned())
    }

    async fn all_roles(&self) -> StoreResult<Vec<RoleModel>> {
        let state = self.state.read().await;

        Ok(state.roles.clone())
    }

    async fn insert_role(&self, new_role: NewRole) -> StoreResult<InsertOutcome<RoleModel>> {
        let mut state = self.state.write().await;

        if state.roles.iter().any(|role| role.name == new_role.name) {
            return Ok(InsertOutcome::AlreadyExists);
        }

        state.last_role_id += 1;

        let role = RoleModel {
            id: RoleId::new(state.last_role_id),
            name: new_role.name,
            description: new_role.description,
            created_at: Utc::now(),
        };

        state.roles.push(role.clone());

        debug!(role_id = %role.id, role_name = %role.name, "Inserted role.");

        Ok(InsertOutcome::Inserted(role))
    }

    async fn update_role_description(
        &self,
        role_name: &str,
        new_description: String,
    ) -> StoreResult<UpdateOutcome<RoleModel>> {
        let mut state = self.state.write().await;

        let Some(role) = state.roles.iter_mut().find(|role| role.name == role_name) else {
            return Ok(UpdateOutcome::NotFound);
        };

        role.description = new_description;

        Ok(UpdateOutcome::Updated(role.clone()))
    }

    async fn delete_role(&self, role_name: &str) -> StoreResult<DeleteOutcome> {
        let mut state = self.state.write().await;

        let Some(role_index) = state.roles.iter().position(|role| role.name == role_name) else {
            return Ok(DeleteOutcome::NotFound);
        };

        let removed_role = state.roles.remove(role_index);

        for user in state.users.iter_mut() {
            user.role_ids.retain(|role_id| *role_id != removed_role.id);
        }

        Ok(DeleteOutcome::Deleted)
    }


    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserModel>> {
        let state = self.state.read().await;

        Ok(state
            .users
            .iter()
            .find(|user| user.username == username)
            .map(|user| state.materialize_user(user)))
    }

    async fn user_by_id(&self, user_id: UserId) -> StoreResult<Option<UserModel>> {
        let state = self.state.read().await;

        Ok(state
            .users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| state.materialize_user(user)))
    }

    async fn all_users(&self) -> StoreResult<Vec<UserModel>> {
        let state = self.state.read().await;

        Ok(state
            .users
            .iter()
            .map(|user| state.materialize_user(user))
            .collect())
    }

    async fn insert_user(&self, new_user: NewUser) -> StoreResult<InsertOutcome<UserModel>> {
        let mut state = self.state.write().await;

        if state
            .users
            .iter()
            .any(|user| user.username == new_user.username)
        {
            return Ok(InsertOutcome::AlreadyExists);
        }

        let creation_time = Utc::now();

        let user = StoredUser {
            id: UserId::generate(),
            username: new_user.username,
            hashed_password: new_user.hashed_password,
            role_ids: Vec::new(),
            created_at: creation_time,
            last_modified_at: creation_time,
        };

        debug!(user_id = %user.id, username = %user.username, "Inserted user.");

        let user_model = state.materialize_user(&user);
        state.users.push(user);

        Ok(InsertOutcome::Inserted(user_model))
    }

    async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> StoreResult<UpdateOutcome<UserModel>> {
        let mut state = self.state.write().await;

        let role_ids = update.role_ids.map(|role_ids| {
            role_ids
                .into_iter()
                .filter(|role_id| state.role_by_id(*role_id).is_some())
                .collect::<Vec<_>>()
        });

        let Some(user_index) = state.users.iter().position(|user| user.username == username)
        else {
            return Ok(UpdateOutcome::NotFound);
        };

        let user = &mut state.users[user_index];

        if let Some(hashed_password) = update.hashed_password {
            user.hashed_password = hashed_password;
        }

        if let Some(role_ids) = role_ids {
            user.role_ids = role_ids;
        }

        user.last_modified_at = Utc::now();

        Ok(UpdateOutcome::Updated(
            state.materialize_user(&state.users[user_index]),
        ))
    }

    async fn delete_user(&self, username: &str) -> StoreResult<DeleteOutcome> {
        let mut state = self.state.write().await;

        let Some(user_index) = state.users.iter().position(|user| user.username == username)
        else {
            return Ok(DeleteOutcome::NotFound);
        };

        state.users.remove(user_index);

        Ok(DeleteOutcome::Deleted)
    }
}
