//! # voicelink-observability
//!
//! Structured Logging via tracing-subscriber, konfigurierbar ueber
//! Umgebungsvariablen.

pub mod logging;

pub use logging::logging_initialisieren;
