//! Persistence of users and roles.
//!
//! [`store`] contains the [`IdentityStore`][store::IdentityStore] trait and its
//! in-memory and PostgreSQL implementations, while [`registry`] contains the
//! role and user registries: the only code that should ever mutate the store.

use std::borrow::Cow;

use thiserror::Error;

pub mod registry;
pub mod store;



#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlx error")]
    SqlxError {
        #[from]
        #[source]
        error: sqlx::Error,
    },

    #[error("failed to apply database migrations")]
    MigrationError {
        #[from]
        #[source]
        error: sqlx::migrate::MigrateError,
    },

    #[error("database inconsistency: {}", .problem)]
    DatabaseInconsistencyError { problem: Cow<'static, str> },
}

impl StoreError {
    pub fn database_inconsistency<R>(problem: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self::DatabaseInconsistencyError {
            problem: problem.into(),
        }
    }
}


pub type StoreResult<R, E = StoreError> = Result<R, E>;
