use std::net::TcpListener;

use actix_cors::Cors;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::contact;
use crate::error::ContactError;
use crate::submission::{Acknowledgment, SubmissionHandler};

/// Liveness probe
#[tracing::instrument(name = "Health check")]
#[get("/")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(Acknowledgment::success("Backend is working"))
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, handler: SubmissionHandler) -> anyhow::Result<Server> {
    // Wrap application data
    let handler = web::Data::new(handler);

    // Start the server
    let server = HttpServer::new(move || {
        // Unparseable bodies still get an acknowledgment
        let json_config = web::JsonConfig::default()
            .error_handler(|error, _req| ContactError::InvalidPayload(error).into());

        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(json_config)
            .app_data(handler.clone())
            .service(health_check)
            .configure(contact::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
