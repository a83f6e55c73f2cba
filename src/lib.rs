/// REST clients for outside services
pub mod client;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Contact form state, validation and controller
pub mod form;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
/// Line-oriented terminal front end
pub mod terminal;
