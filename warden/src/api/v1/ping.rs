use actix_web::get;
use serde::Serialize;

use crate::api::errors::EndpointResult;
use crate::api::macros::ContextlessResponder;
use crate::impl_json_response_builder;



#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct PingResponse {
    pub ok: bool,
}

impl_json_response_builder!(PingResponse);


/// Liveness check. Requires no authentication.
#[get("/ping")]
pub async fn ping() -> EndpointResult {
    Ok(PingResponse { ok: true }.into_response())
}
