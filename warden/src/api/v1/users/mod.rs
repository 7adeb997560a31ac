mod endpoints;
mod model_impls;

use actix_web::{web, Scope};
pub use endpoints::*;



#[rustfmt::skip]
pub fn users_router() -> Scope {
    web::scope("/users")
        .service(get_all_users)
        .service(add_user)
        .service(get_specific_user)
        .service(edit_user)
        .service(remove_user)
}
