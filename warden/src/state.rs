//! Application-wide state (shared between endpoint functions).

use std::sync::Arc;

use actix_web::web::Data;
use thiserror::Error;
use tracing::info;
use warden_configuration::Configuration;
use warden_core::password_hasher::{ArgonHasher, ArgonHasherError};
use warden_core::token::TokenManager;
use warden_database::registry::{RegistryError, RoleRegistry, UserRegistry};
use warden_database::store::{IdentityStore, InMemoryIdentityStore, PostgresIdentityStore};
use warden_database::StoreError;

use crate::establish_database_connection_pool;



#[derive(Debug, Error)]
pub enum ApplicationStateError {
    #[error("failed to initialize password hasher")]
    FailedToInitializePasswordHasher {
        #[from]
        #[source]
        error: ArgonHasherError,
    },

    #[error("unable to connect to database")]
    UnableToConnectToDatabase {
        #[from]
        #[source]
        error: sqlx::Error,
    },

    #[error("failed to prepare the database")]
    UnableToPrepareDatabase {
        #[from]
        #[source]
        error: StoreError,
    },

    #[error("failed to seed built-in roles and the administrator account")]
    UnableToSeedBuiltins {
        #[from]
        #[source]
        error: RegistryError,
    },
}



/// Central application state.
///
/// Use [`ApplicationState`] instead as it already wraps this struct
/// in [`actix_web::web::Data`]!
///
/// If you need mutable state, opt for internal mutability as the struct
/// is internally essentially wrapped in an `Arc` by actix.
/// For more information about mutable state, see
/// <https://actix.rs/docs/application#shared-mutable-state>.
pub struct ApplicationStateInner {
    /// The configuration that this server was loaded with.
    pub configuration: Configuration,

    /// Role registry (the only way to create or modify roles).
    pub roles: RoleRegistry,

    /// User registry (the only way to create or modify users).
    pub users: UserRegistry,

    /// Authentication token manager (JSON Web Token).
    pub token_manager: TokenManager,
}

impl ApplicationStateInner {
    /// Initializes the state with the identity store the configuration asks for:
    /// PostgreSQL if the `database` table is present (applying any pending migrations),
    /// or an in-memory one otherwise.
    pub async fn new(configuration: Configuration) -> Result<Self, ApplicationStateError> {
        let identity_store: Arc<dyn IdentityStore> = match &configuration.database {
            Some(database_configuration) => {
                let database_pool =
                    establish_database_connection_pool(database_configuration).await?;

                let postgres_store = PostgresIdentityStore::new(database_pool);
                postgres_store.migrate().await?;

                info!(
                    host = %database_configuration.host,
                    database_name = %database_configuration.database_name,
                    "Using PostgreSQL identity store."
                );

                Arc::new(postgres_store)
            }
            None => {
                info!("No database configured, users and roles will only be kept in memory.");

                Arc::new(InMemoryIdentityStore::new())
            }
        };

        Self::with_identity_store(configuration, identity_store).await
    }

    /// Initializes the state on top of an existing identity store,
    /// seeding the built-in roles and the administrator account (if missing).
    pub async fn with_identity_store(
        configuration: Configuration,
        identity_store: Arc<dyn IdentityStore>,
    ) -> Result<Self, ApplicationStateError> {
        let hasher = ArgonHasher::new(configuration.password_hashing.hashing_parameters())?;

        let roles = RoleRegistry::new(identity_store.clone());
        let users = UserRegistry::new(identity_store, Arc::new(hasher));

        roles.seed_builtin_roles().await?;
        users
            .seed_administrator(
                &configuration.administrator.username,
                &configuration.administrator.password,
            )
            .await?;

        let token_manager = TokenManager::new(&configuration.json_web_token.secret);

        Ok(Self {
            configuration,
            roles,
            users,
            token_manager,
        })
    }

    #[inline]
    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }
}


/// Central application state, wrapped in an actix [`Data`] wrapper.
///
/// This enables usage in endpoint functions.
/// See <https://actix.rs/docs/application#state> for more information.
pub type ApplicationState = Data<ApplicationStateInner>;
