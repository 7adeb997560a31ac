use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;


#[derive(Debug, Error)]
pub enum ArgonHasherError {
    #[error("invalid argon2 parameters: {}", .error)]
    InvalidParameters { error: argon2::Error },

    #[error("argon2 error: {}", .error)]
    Argon2Error { error: argon2::password_hash::Error },
}


/// Cost parameters for argon2id.
///
/// The defaults are the ones recommended by the `argon2` crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PasswordHashingParameters {
    /// Memory cost in KiB.
    pub memory_cost_kib: u32,

    /// Number of passes.
    pub iterations: u32,

    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordHashingParameters {
    fn default() -> Self {
        Self {
            memory_cost_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}



/// Password hasher (argon2id).
///
/// Every password is hashed with a freshly generated salt, and the result
/// is a self-describing PHC string (algorithm, parameters, salt and hash),
/// so verification never needs anything but the stored string.
pub struct ArgonHasher {
    argon_hasher: Argon2<'static>,
}

impl ArgonHasher {
    pub fn new(parameters: PasswordHashingParameters) -> Result<Self, ArgonHasherError> {
        let params = argon2::Params::new(
            parameters.memory_cost_kib,
            parameters.iterations,
            parameters.parallelism,
            None,
        )
        .map_err(|error| ArgonHasherError::InvalidParameters { error })?;

        let argon_hasher = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        );

        Ok(Self { argon_hasher })
    }

    /// Hashes the password, returning the PHC string to store.
    pub fn hash_password(&self, password: &str) -> Result<String, ArgonHasherError> {
        let salt_string = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon_hasher
            .hash_password(password.as_bytes(), &salt_string)
            .map_err(|error| ArgonHasherError::Argon2Error { error })?;

        Ok(password_hash.to_string())
    }

    pub fn verify_password_against_hash(
        &self,
        password: &str,
        hashed_password: &str,
    ) -> Result<bool, ArgonHasherError> {
        let hashed_password = PasswordHash::new(hashed_password)
            .map_err(|error| ArgonHasherError::Argon2Error { error })?;

        Ok(self
            .argon_hasher
            .verify_password(password.as_bytes(), &hashed_password)
            .is_ok())
    }
}
