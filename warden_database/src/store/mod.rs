use async_trait::async_trait;
use warden_core::id::UserId;

mod memory;
mod models;
mod postgres;

pub use memory::*;
pub use models::*;
pub use postgres::*;

use crate::StoreResult;


/// Persistent storage of users and roles.
///
/// Implementations must enforce name uniqueness themselves: two concurrent inserts
/// of the same role name (or username) must result in exactly one
/// [`InsertOutcome::Inserted`], the other one observing [`InsertOutcome::AlreadyExists`].
/// Every method is atomic with respect to every other method.
///
/// Roles are always listed in creation order, as are users.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn role_by_name(&self, role_name: &str) -> StoreResult<Option<RoleModel>>;

    async fn all_roles(&self) -> StoreResult<Vec<RoleModel>>;

    async fn insert_role(&self, new_role: NewRole) -> StoreResult<InsertOutcome<RoleModel>>;

    async fn update_role_description(
        &self,
        role_name: &str,
        new_description: String,
    ) -> StoreResult<UpdateOutcome<RoleModel>>;

    /// Deleting a role also removes it from every user that had it.
    async fn delete_role(&self, role_name: &str) -> StoreResult<DeleteOutcome>;


    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserModel>>;

    async fn user_by_id(&self, user_id: UserId) -> StoreResult<Option<UserModel>>;

    async fn all_users(&self) -> StoreResult<Vec<UserModel>>;

    /// Inserts a user without any roles.
    async fn insert_user(&self, new_user: NewUser) -> StoreResult<InsertOutcome<UserModel>>;

    async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> StoreResult<UpdateOutcome<UserModel>>;

    async fn delete_user(&self, username: &str) -> StoreResult<DeleteOutcome>;
}
