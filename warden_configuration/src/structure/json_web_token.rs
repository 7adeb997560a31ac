use chrono::Duration;
use serde::Deserialize;

use crate::traits::TryResolve;
use crate::JsonWebTokenConfigurationError;


const fn default_access_token_lifetime_seconds() -> i64 {
    // 2 hours
    60 * 60 * 2
}

const fn default_refresh_token_lifetime_seconds() -> i64 {
    // 7 days
    60 * 60 * 24 * 7
}


#[derive(Deserialize, Debug, Clone)]
pub(super) struct UnresolvedJsonWebTokenConfiguration {
    secret: String,

    #[serde(default = "default_access_token_lifetime_seconds")]
    access_token_lifetime_seconds: i64,

    #[serde(default = "default_refresh_token_lifetime_seconds")]
    refresh_token_lifetime_seconds: i64,
}


/// JSON Web Token-related configuration.
#[derive(Debug, Clone)]
pub struct JsonWebTokenConfiguration {
    /// Secret the tokens are signed (HS256) with.
    pub secret: String,

    pub access_token_lifetime: Duration,

    pub refresh_token_lifetime: Duration,
}

impl TryResolve for UnresolvedJsonWebTokenConfiguration {
    type Resolved = JsonWebTokenConfiguration;
    type Error = JsonWebTokenConfigurationError;

    fn try_resolve(self) -> Result<Self::Resolved, Self::Error> {
        if self.secret.is_empty() {
            return Err(JsonWebTokenConfigurationError::EmptySecret);
        }

        if self.access_token_lifetime_seconds <= 0 {
            return Err(JsonWebTokenConfigurationError::NonPositiveLifetime {
                field: "access_token_lifetime_seconds",
                value: self.access_token_lifetime_seconds,
            });
        }

        if self.refresh_token_lifetime_seconds <= 0 {
            return Err(JsonWebTokenConfigurationError::NonPositiveLifetime {
                field: "refresh_token_lifetime_seconds",
                value: self.refresh_token_lifetime_seconds,
            });
        }

        Ok(Self::Resolved {
            secret: self.secret,
            access_token_lifetime: Duration::seconds(self.access_token_lifetime_seconds),
            refresh_token_lifetime: Duration::seconds(self.refresh_token_lifetime_seconds),
        })
    }
}
