//! Types shared between the `warden` server, its identity store and its tests:
//! strongly-typed IDs, the built-in roles, password hashing, JSON Web Tokens
//! and the request/response models of the public API.

pub mod api_models;
pub mod id;
pub mod password_hasher;
pub mod roles;
pub mod token;
