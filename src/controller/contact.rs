use actix_web::{post, web, HttpResponse, Responder};

use crate::error::ContactResult;
use crate::submission::{ContactRequest, SubmissionHandler};

/// Contact form submission endpoint
#[tracing::instrument(
    name = "Receive a contact request",
    skip(handler, body),
    fields(name = ?body.name, email = ?body.email)
)]
#[post("/contact")]
async fn create(
    handler: web::Data<SubmissionHandler>,
    body: web::Json<ContactRequest>,
) -> ContactResult<impl Responder> {
    let ack = handler.submit(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ack))
}

/// Register the contact endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create);
}
