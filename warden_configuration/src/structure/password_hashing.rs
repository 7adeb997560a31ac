use serde::Deserialize;
use warden_core::password_hasher::PasswordHashingParameters;

use crate::traits::Resolve;


/// Every field falls back to the argon2 crate's recommended value when omitted.
#[derive(Deserialize, Debug, Clone, Default)]
pub(super) struct UnresolvedPasswordHashingConfiguration {
    memory_cost_kib: Option<u32>,

    iterations: Option<u32>,

    parallelism: Option<u32>,
}


/// Argon2id cost parameters. Their validity is checked
/// when the hasher is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashingConfiguration {
    pub memory_cost_kib: u32,

    pub iterations: u32,

    pub parallelism: u32,
}

impl Resolve for UnresolvedPasswordHashingConfiguration {
    type Resolved = PasswordHashingConfiguration;

    fn resolve(self) -> Self::Resolved {
        let defaults = PasswordHashingParameters::default();

        Self::Resolved {
            memory_cost_kib: self.memory_cost_kib.unwrap_or(defaults.memory_cost_kib),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            parallelism: self.parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

impl PasswordHashingConfiguration {
    pub fn hashing_parameters(&self) -> PasswordHashingParameters {
        PasswordHashingParameters {
            memory_cost_kib: self.memory_cost_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}
