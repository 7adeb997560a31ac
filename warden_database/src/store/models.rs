use chrono::{DateTime, Utc};
use warden_core::id::{RoleId, UserId};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RoleModel {
    /// Handed out in creation order.
    pub id: RoleId,

    pub name: String,

    pub description: String,

    pub created_at: DateTime<Utc>,
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UserModel {
    /// UUIDv7
    pub id: UserId,

    pub username: String,

    /// Argon2id PHC string.
    pub hashed_password: String,

    /// Roles in the order they were assigned in. May contain repeats.
    pub roles: Vec<RoleModel>,

    pub created_at: DateTime<Utc>,

    pub last_modified_at: DateTime<Utc>,
}

impl UserModel {
    pub fn has_role_named(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role.name == role_name)
    }
}



#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewRole {
    pub name: String,

    pub description: String,
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewUser {
    pub username: String,

    pub hashed_password: String,
}


/// A set of changes to apply to a user in one atomic step.
/// `None` fields are left untouched.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UserUpdate {
    pub hashed_password: Option<String>,

    /// Replaces the entire role list, in this order.
    /// IDs of roles that no longer exist are skipped.
    pub role_ids: Option<Vec<RoleId>>,
}



#[derive(Clone, PartialEq, Eq, Debug)]
pub enum InsertOutcome<M> {
    Inserted(M),
    AlreadyExists,
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UpdateOutcome<M> {
    Updated(M),
    NotFound,
}


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}
