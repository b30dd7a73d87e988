use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use contact_backend::app;
use contact_backend::notification::{Notifier, OperatorNotifier};
use contact_backend::repo::ContactRepo;
use contact_backend::settings::Settings;
use contact_backend::submission::SubmissionHandler;
use contact_backend::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load()?;

    let pool = settings.database.lazy_pool()?;
    // Keep serving if the database is unreachable, the store migrates on first use
    match ContactRepo::migrate(&pool).await {
        Ok(()) => tracing::info!("Database connected"),
        Err(error) => tracing::error!(error.cause_chain = ?error, "Database error"),
    }

    let notifier: Option<Arc<dyn Notifier>> = match &settings.email {
        Some(email) => email
            .client()?
            .map(|client| Arc::new(OperatorNotifier::new(client)) as Arc<dyn Notifier>),
        None => None,
    };
    if notifier.is_none() {
        tracing::warn!("Email credentials not configured, notifications disabled");
    }

    let handler = SubmissionHandler::new(Arc::new(pool), notifier);

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    app::run(listener, handler)?.await.context("Failed to run app")
}
