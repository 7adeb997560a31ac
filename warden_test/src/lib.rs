//! In-process test harness for the Warden HTTP API.
//!
//! Each [`TestServer`] runs on top of its own in-memory identity store,
//! so tests never share state and need no database.

pub mod prelude;
mod response;
pub mod sample_users;
mod server;

pub use response::*;
pub use server::*;
