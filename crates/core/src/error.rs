//! Fehlertypen fuer Voicelink
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Voicelink
pub type Result<T> = std::result::Result<T, VoicelinkError>;

/// Alle moeglichen Fehler im Voicelink-System
#[derive(Debug, Error)]
pub enum VoicelinkError {
    // --- Regel-Store ---
    #[error("Store-Fehler: {0}")]
    Store(String),

    #[error("Link nicht gefunden: {0}")]
    LinkNichtGefunden(String),

    #[error("Ungueltiges Link-Datenformat: {0}")]
    UngueltigesFormat(String),

    // --- Verzeichnisdienst ---
    #[error("Verzeichnisdienst-Fehler: {0}")]
    Verzeichnis(String),

    #[error("Mitglied nicht gefunden: {0}")]
    MitgliedNichtGefunden(String),

    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl VoicelinkError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler von einem externen Dienst stammt
    /// und eine spaetere Transition den Zustand wieder konvergieren kann
    pub fn ist_transient(&self) -> bool {
        matches!(self, Self::Verzeichnis(_) | Self::Store(_))
    }
}
