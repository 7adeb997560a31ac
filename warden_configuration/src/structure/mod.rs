use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

mod administrator;
mod database;
mod http;
mod json_web_token;
mod logging;
mod password_hashing;

pub use administrator::*;
pub use database::*;
pub use http::*;
pub use json_web_token::*;
pub use logging::*;
pub use password_hashing::*;

use crate::traits::{Resolve, TryResolve, TryResolveWithContext};
use crate::utilities::get_default_configuration_file_path;
use crate::{ConfigurationLoadingError, ConfigurationResolutionError};



#[derive(Deserialize, Debug)]
pub(crate) struct UnresolvedConfiguration {
    /// Logging-related configuration.
    logging: UnresolvedLoggingConfiguration,

    /// Configuration related to the HTTP server.
    http: UnresolvedHttpConfiguration,

    /// Json Web Token-related configuration.
    json_web_token: UnresolvedJsonWebTokenConfiguration,

    /// Password hashing cost parameters.
    #[serde(default)]
    password_hashing: UnresolvedPasswordHashingConfiguration,

    /// The built-in administrator account.
    administrator: UnresolvedAdministratorConfiguration,

    /// Configuration related to the database.
    /// When missing, users and roles are kept in memory only.
    database: Option<UnresolvedDatabaseConfiguration>,
}


/// The entire Warden configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the file path this [`Configuration`] instance was loaded from.
    pub configuration_file_path: PathBuf,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,

    /// Configuration related to the HTTP server.
    pub http: HttpConfiguration,

    /// Json Web Token-related configuration.
    pub json_web_token: JsonWebTokenConfiguration,

    /// Password hashing cost parameters.
    pub password_hashing: PasswordHashingConfiguration,

    /// The built-in administrator account.
    pub administrator: AdministratorConfiguration,

    /// Configuration related to the database, if any.
    pub database: Option<DatabaseConfiguration>,
}



pub(crate) struct ConfigurationResolutionContext {
    configuration_file_path: PathBuf,
}


impl TryResolveWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = ConfigurationResolutionContext;
    type Error = ConfigurationResolutionError;

    fn try_resolve_with_context(
        self,
        context: Self::Context,
    ) -> Result<Self::Resolved, Self::Error> {
        let configuration_directory = context
            .configuration_file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let logging = self
            .logging
            .try_resolve_with_context(configuration_directory)?;
        let http = self.http.resolve();
        let json_web_token = self.json_web_token.try_resolve()?;
        let password_hashing = self.password_hashing.resolve();
        let administrator = self.administrator.try_resolve()?;
        let database = self.database.map(Resolve::resolve);

        Ok(Configuration {
            configuration_file_path: context.configuration_file_path,
            logging,
            http,
            json_web_token,
            password_hashing,
            administrator,
            database,
        })
    }
}


impl Configuration {
    /// Parse and resolve the configuration from a TOML string.
    ///
    /// `configuration_file_path` is used only to resolve relative paths
    /// and doesn't need to exist.
    pub fn load_from_str<P: AsRef<Path>>(
        configuration_string: &str,
        configuration_file_path: P,
    ) -> Result<Self, ConfigurationLoadingError> {
        // Parse the string into the [`UnresolvedConfiguration`] structure and then resolve it.
        let unresolved_configuration =
            toml::from_str::<UnresolvedConfiguration>(configuration_string)
                .map_err(|error| ConfigurationLoadingError::ParsingError { error })?;

        let resolved_configuration =
            unresolved_configuration.try_resolve_with_context(ConfigurationResolutionContext {
                configuration_file_path: configuration_file_path.as_ref().to_path_buf(),
            })?;

        Ok(resolved_configuration)
    }

    /// Load the configuration from a specific file path.
    pub fn load_from_path<P: AsRef<Path>>(
        configuration_file_path: P,
    ) -> Result<Self, ConfigurationLoadingError> {
        let configuration_file_path = configuration_file_path.as_ref();

        // Read the configuration file into memory as a string.
        let configuration_string = fs::read_to_string(configuration_file_path).map_err(|error| {
            ConfigurationLoadingError::UnableToReadConfigurationFile {
                path: configuration_file_path.to_path_buf(),
                error,
            }
        })?;

        // The file was just read, so canonicalization can only fail in truly odd situations.
        let configuration_file_path = dunce::canonicalize(configuration_file_path)
            .unwrap_or_else(|_| configuration_file_path.to_path_buf());

        Self::load_from_str(&configuration_string, configuration_file_path)
    }

    /// Load the configuration from the default path (`./data/configuration.toml`).
    pub fn load_from_default_path() -> Result<Self, ConfigurationLoadingError> {
        Configuration::load_from_path(get_default_configuration_file_path()?)
    }
}
