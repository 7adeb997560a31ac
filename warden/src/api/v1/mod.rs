//! # Development note
//!
//! We use "" instead of "/" in many places (e.g. `#[get("")`, etc.)
//! because this allows the user to request e.g. `GET /api/v1/users` OR `GET /api/v1/users/` and
//! get the correct endpoint both times.
//!
//! For more information, see `actix_web::middleware::NormalizePath` (trim mode).

pub mod login;
pub mod ping;
pub mod roles;
pub mod users;

use actix_web::{web, Scope};


#[rustfmt::skip]
pub fn v1_api_router() -> Scope {
    web::scope("/v1")
        .service(ping::ping)
        .service(login::login_router())
        .service(roles::roles_router())
        .service(users::users_router())
}
