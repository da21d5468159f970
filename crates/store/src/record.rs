//! Snapshot-Record-Format des Link-Stores (aktuelles Format 3)
//!
//! Das Format stammt aus dem historisch gewachsenen JSON-Layout des
//! Stores: pro Guild eine Map von Link-Art auf eine Kanal-Map, deren
//! Werte die eigentlichen Records sind. Rollen-IDs sind als Strings
//! abgelegt. Aeltere Formate (0 bis 2) werden von `migration` beim
//! Import einmalig auf dieses Format gehoben.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voicelink_core::types::{CategoryId, ChannelId, RoleId};

use crate::models::{Link, LinkKind, LinkScope};

/// Aktuelle Record-Format-Version
pub const RECORD_FORMAT: u8 = 3;

/// Record eines kanal- oder kategorie-gebundenen Links (Format 3)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanalRecord {
    pub roles: Vec<String>,
    pub suffix: String,
    pub reverse_roles: Vec<String>,
    pub speaker_roles: Vec<String>,
}

/// Record des guild-weiten "alle Kanaele"-Links (Format 3)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllesRecord {
    pub roles: Vec<String>,
    pub except: Vec<String>,
    pub suffix: String,
    pub reverse_roles: Vec<String>,
    pub speaker_roles: Vec<String>,
}

/// Alle Link-Records einer Guild, nach Art gruppiert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildRecord {
    pub permanent: HashMap<String, KanalRecord>,
    pub voice: HashMap<String, KanalRecord>,
    pub stage: HashMap<String, KanalRecord>,
    pub category: HashMap<String, KanalRecord>,
    pub all: Option<AllesRecord>,
}

/// Vollstaendiger Store-Snapshot (nach Migration immer Format 3)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub format: u8,
    pub exportiert_am: Option<DateTime<Utc>>,
    /// Guild-ID (als String-Schluessel) -> Records
    pub guilds: HashMap<String, GuildRecord>,
}

impl Snapshot {
    pub fn neu() -> Self {
        Self {
            format: RECORD_FORMAT,
            exportiert_am: Some(Utc::now()),
            guilds: HashMap::new(),
        }
    }
}

/// Parst eine String-Rollen-Liste; nicht parsebare Eintraege werden
/// mit Warnung uebersprungen statt den Import abzubrechen
fn rollen_parsen(roh: &[String]) -> BTreeSet<RoleId> {
    roh.iter()
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(RoleId(id)),
            Err(_) => {
                tracing::warn!(wert = %s, "Nicht parsebare Rollen-ID im Record uebersprungen");
                None
            }
        })
        .collect()
}

fn kanaele_parsen(roh: &[String]) -> BTreeSet<ChannelId> {
    roh.iter()
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(ChannelId(id)),
            Err(_) => {
                tracing::warn!(wert = %s, "Nicht parsebare Kanal-ID im Record uebersprungen");
                None
            }
        })
        .collect()
}

fn suffix_normalisieren(suffix: &str) -> Option<String> {
    if suffix.is_empty() {
        None
    } else {
        Some(suffix.to_string())
    }
}

impl KanalRecord {
    /// Wandelt den Record in einen Domain-Link um
    pub fn als_link(&self, kind: LinkKind, scope: LinkScope) -> Link {
        Link {
            kind,
            scope,
            grant_rollen: rollen_parsen(&self.roles),
            reverse_rollen: rollen_parsen(&self.reverse_roles),
            ausgeschlossen: BTreeSet::new(),
            suffix: suffix_normalisieren(&self.suffix),
            speaker_rollen: rollen_parsen(&self.speaker_roles),
        }
    }

    /// Erstellt einen Record aus einem Domain-Link
    pub fn von_link(link: &Link) -> Self {
        Self {
            roles: link.grant_rollen.iter().map(|r| r.0.to_string()).collect(),
            suffix: link.suffix.clone().unwrap_or_default(),
            reverse_roles: link.reverse_rollen.iter().map(|r| r.0.to_string()).collect(),
            speaker_roles: link.speaker_rollen.iter().map(|r| r.0.to_string()).collect(),
        }
    }
}

impl AllesRecord {
    /// Wandelt den Record in einen Domain-Link um
    pub fn als_link(&self) -> Link {
        Link {
            kind: LinkKind::All,
            scope: LinkScope::Alle,
            grant_rollen: rollen_parsen(&self.roles),
            reverse_rollen: rollen_parsen(&self.reverse_roles),
            ausgeschlossen: kanaele_parsen(&self.except),
            suffix: suffix_normalisieren(&self.suffix),
            speaker_rollen: rollen_parsen(&self.speaker_roles),
        }
    }

    /// Erstellt einen Record aus einem Domain-Link
    pub fn von_link(link: &Link) -> Self {
        Self {
            roles: link.grant_rollen.iter().map(|r| r.0.to_string()).collect(),
            except: link.ausgeschlossen.iter().map(|c| c.0.to_string()).collect(),
            suffix: link.suffix.clone().unwrap_or_default(),
            reverse_roles: link.reverse_rollen.iter().map(|r| r.0.to_string()).collect(),
            speaker_roles: link.speaker_rollen.iter().map(|r| r.0.to_string()).collect(),
        }
    }
}

/// Parst einen Scope-Schluessel aus der Kanal-Map der gegebenen Art
pub fn scope_parsen(kind: LinkKind, schluessel: &str) -> Option<LinkScope> {
    let id = schluessel.parse::<u64>().ok()?;
    Some(match kind {
        LinkKind::Category => LinkScope::Kategorie(CategoryId(id)),
        LinkKind::All => LinkScope::Alle,
        _ => LinkScope::Kanal(ChannelId(id)),
    })
}
