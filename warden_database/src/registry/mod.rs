//! Role and user registries.
//!
//! The registries are the only place where users and roles are mutated.
//! They validate input, hash passwords and resolve role names before handing a
//! single atomic change to the [`IdentityStore`][crate::store::IdentityStore],
//! and report expected outcomes (e.g. "already exists" or "not found")
//! as ordinary result values.

use thiserror::Error;
use warden_core::password_hasher::ArgonHasherError;

mod role;
mod user;

pub use role::*;
pub use user::*;

use crate::StoreError;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInputReason {
    #[error("role name must not be empty")]
    EmptyRoleName,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("built-in role \"{}\" can not be removed", .role_name)]
    ProtectedRole { role_name: String },
}


#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid input: {}", .reason)]
    InvalidInput { reason: InvalidInputReason },

    #[error("identity store error")]
    StoreError {
        #[from]
        #[source]
        error: StoreError,
    },

    #[error("password hasher error")]
    HasherError {
        #[from]
        #[source]
        error: ArgonHasherError,
    },
}

impl RegistryError {
    pub const fn invalid_input(reason: InvalidInputReason) -> Self {
        Self::InvalidInput { reason }
    }
}


pub type RegistryResult<R> = Result<R, RegistryError>;
