//! Request and response models of the public API.
//!
//! With the `serde_impls_for_client_on_models` feature enabled, response models
//! also implement `Deserialize` and request models implement `Serialize`.

mod error_reason;
mod login;
mod roles;
mod status;
mod users;

pub use error_reason::*;
pub use login::*;
pub use roles::*;
pub use status::*;
pub use users::*;
