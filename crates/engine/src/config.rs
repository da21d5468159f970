//! Engine-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass die Engine ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

/// Konfiguration der Konvergenz-Engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Laengen-Obergrenze fuer Anzeigenamen der Plattform.
    /// Ein Suffix der sie sprengen wuerde entfaellt komplett.
    pub anzeige_name_limit: usize,
    /// Uebergaenge von Bot-Accounts ignorieren
    pub bots_ignorieren: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anzeige_name_limit: 32,
            bots_ignorieren: true,
        }
    }
}

impl EngineConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.anzeige_name_limit, 32);
        assert!(cfg.bots_ignorieren);
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            anzeige_name_limit = 24
        "#;
        let cfg: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.anzeige_name_limit, 24);
        // Nicht angegebene Felder behalten Standardwerte
        assert!(cfg.bots_ignorieren);
    }
}
