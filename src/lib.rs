/// Basic application code
pub mod app;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Operator notifications for new submissions
pub mod notification;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Contact form submission flow
pub mod submission;
/// Application telemetry for tracing and logging
pub mod telemetry;
