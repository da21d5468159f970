//! Fehlertypen fuer das Directory-Crate

use thiserror::Error;

/// Result-Alias fuer Verzeichnisdienst-Operationen
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Verzeichnisdienst-Fehlertypen
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Guild nicht gefunden: {0}")]
    GuildNichtGefunden(String),

    #[error("Mitglied nicht gefunden: {0}")]
    MitgliedNichtGefunden(String),

    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    #[error("Dienst-Fehler: {0}")]
    Dienst(String),
}

impl DirectoryError {
    /// Gibt true zurueck wenn ein erneuter Versuch bei einer spaeteren
    /// Transition Erfolg haben koennte
    pub fn ist_transient(&self) -> bool {
        matches!(self, Self::Dienst(_))
    }
}
