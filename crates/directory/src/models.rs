//! Datenobjekte des Verzeichnisdienstes

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use voicelink_core::types::RoleId;

/// Stammdaten einer Rolle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollenInfo {
    pub id: RoleId,
    /// Position in der Rollen-Hierarchie (hoeher = maechtiger)
    pub rang: u32,
    /// Verwaltete Rollen (Integrationen) sind nie manuell zuweisbar
    pub verwaltet: bool,
}

impl RollenInfo {
    pub fn neu(id: RoleId, rang: u32) -> Self {
        Self {
            id,
            rang,
            verwaltet: false,
        }
    }

    /// Prueft ob der Aufrufer mit gegebenem Top-Rang diese Rolle
    /// vergeben/entziehen darf
    pub fn zuweisbar(&self, aufrufer_rang: u32) -> bool {
        !self.verwaltet && self.rang < aufrufer_rang
    }
}

/// Momentaufnahme des Profils eines Mitglieds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitgliedProfil {
    pub rollen: BTreeSet<RoleId>,
    pub anzeige_name: String,
    /// Rang der hoechsten Rolle des Mitglieds
    pub top_rolle_rang: u32,
    pub ist_owner: bool,
}

/// Faehigkeiten des aufrufenden Dienstkontos in einer Guild
///
/// Rollen- und Nickname-Bearbeitung sind unabhaengig voneinander
/// gewaehrbar; der Mutations-Planer entscheidet anhand beider Flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerCaps {
    pub kann_rollen_bearbeiten: bool,
    pub kann_nicknames_bearbeiten: bool,
    /// Rang der hoechsten Rolle des Aufrufers
    pub top_rolle_rang: u32,
}

impl CallerCaps {
    /// Prueft ob der Aufrufer den Namen des Mitglieds aendern darf:
    /// Owner-Namen sind unantastbar, und der Aufrufer muss strikt
    /// ueber dem Mitglied stehen
    pub fn darf_name_aendern(&self, profil: &MitgliedProfil) -> bool {
        !profil.ist_owner && profil.top_rolle_rang < self.top_rolle_rang
    }
}

/// Eine einzelne Profil-Mutation
///
/// Rollen und Nickname sind unabhaengig optional; ein Update mit beiden
/// Feldern wird als EIN kombinierter Aufruf ausgefuehrt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MitgliedUpdate {
    pub rollen: Option<BTreeSet<RoleId>>,
    pub nickname: Option<String>,
    /// Begruendung fuer das Audit-Log des Verzeichnisdienstes
    pub grund: &'static str,
}

impl MitgliedUpdate {
    pub fn ist_leer(&self) -> bool {
        self.rollen.is_none() && self.nickname.is_none()
    }
}
