//! Fehlertypen fuer das Store-Crate

use thiserror::Error;

/// Result-Alias fuer Store-Operationen
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store-Fehlertypen
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Link nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Ungueltiges Record-Format: {0}")]
    UngueltigesFormat(String),

    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interner Store-Fehler: {0}")]
    Intern(String),
}

impl StoreError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::UngueltigesFormat(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}
