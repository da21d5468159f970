//! Fehlertypen fuer die Engine
//!
//! Nur Zustands-Abfragen externer Dienste propagieren Fehler; der
//! einzelne Mutationsversuch wird an der Aufrufstelle geloggt und
//! verschluckt (best-effort, nie fatal).

use thiserror::Error;
use voicelink_core::VoicelinkError;
use voicelink_directory::DirectoryError;
use voicelink_store::StoreError;

/// Result-Alias fuer Engine-Operationen
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Engine-Fehlertypen
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Store-Fehler: {0}")]
    Store(#[from] StoreError),

    #[error("Verzeichnisdienst-Fehler: {0}")]
    Verzeichnis(#[from] DirectoryError),
}

impl From<EngineError> for VoicelinkError {
    fn from(fehler: EngineError) -> Self {
        match fehler {
            EngineError::Store(e) => VoicelinkError::Store(e.to_string()),
            EngineError::Verzeichnis(e) => VoicelinkError::Verzeichnis(e.to_string()),
        }
    }
}
