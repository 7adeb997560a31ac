mod endpoints;
mod model_impls;

use actix_web::{web, Scope};
pub use endpoints::*;



#[rustfmt::skip]
pub fn roles_router() -> Scope {
    web::scope("/roles")
        .service(get_all_role_names)
        .service(add_role)
        .service(edit_role)
}
