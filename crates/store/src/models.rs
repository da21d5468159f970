//! Link-Datenmodell
//!
//! Ein Link bindet einen Geltungsbereich (Kanal, Kategorie oder "alle
//! Kanaele") an Rollen-Effekte und einen optionalen Anzeigename-Suffix.
//! Rollen-Mengen sind echte Mengen: Reihenfolge irrelevant, Duplikate
//! kollabieren. Eine Rolle die sowohl in `grant_rollen` als auch in
//! `reverse_rollen` steht hebt sich im Resolver auf.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use voicelink_core::types::{CategoryId, ChannelId, RoleId};

/// Art eines Links – bestimmt Geltungsdauer und Geltungsbereich
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Grants bleiben nach Austritt/Wechsel bestehen (einseitig)
    Permanent,
    /// Gilt waehrend der Anwesenheit im Voice-Kanal
    Voice,
    /// Gilt waehrend der Anwesenheit im Stage-Kanal
    Stage,
    /// Gilt fuer alle Kanaele einer Kategorie
    Category,
    /// Gilt fuer alle Kanaele der Guild (mit Ausnahmeliste)
    All,
}

impl LinkKind {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Voice => "voice",
            Self::Stage => "stage",
            Self::Category => "category",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for LinkKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(Self::Permanent),
            "voice" => Ok(Self::Voice),
            "stage" => Ok(Self::Stage),
            "category" => Ok(Self::Category),
            "all" => Ok(Self::All),
            other => Err(format!("Unbekannte Link-Art: {other}")),
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}

/// Geltungsbereich eines Links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkScope {
    /// Ein einzelner Voice- oder Stage-Kanal
    Kanal(ChannelId),
    /// Alle Kanaele einer Kategorie
    Kategorie(CategoryId),
    /// Alle Kanaele der Guild
    Alle,
}

/// Eine konfigurierte Link-Regel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub scope: LinkScope,
    /// Rollen die beim Betreten vergeben werden
    pub grant_rollen: BTreeSet<RoleId>,
    /// Rollen die beim Verlassen vergeben / beim Betreten entzogen werden
    pub reverse_rollen: BTreeSet<RoleId>,
    /// Kanaele auf die dieser Link trotz passendem Scope nicht anzuwenden ist
    pub ausgeschlossen: BTreeSet<ChannelId>,
    /// Suffix der waehrend der Geltung an den Anzeigenamen angehaengt wird
    pub suffix: Option<String>,
    /// Rollen die beim Sprecherwechsel in Stage-Kanaelen getoggelt werden
    pub speaker_rollen: BTreeSet<RoleId>,
}

impl Link {
    /// Erstellt einen leeren Link fuer den gegebenen Scope
    pub fn neu(kind: LinkKind, scope: LinkScope) -> Self {
        Self {
            kind,
            scope,
            grant_rollen: BTreeSet::new(),
            reverse_rollen: BTreeSet::new(),
            ausgeschlossen: BTreeSet::new(),
            suffix: None,
            speaker_rollen: BTreeSet::new(),
        }
    }

    pub fn mit_grants(mut self, rollen: impl IntoIterator<Item = RoleId>) -> Self {
        self.grant_rollen.extend(rollen);
        self
    }

    pub fn mit_reverse(mut self, rollen: impl IntoIterator<Item = RoleId>) -> Self {
        self.reverse_rollen.extend(rollen);
        self
    }

    pub fn mit_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn mit_speaker_rollen(mut self, rollen: impl IntoIterator<Item = RoleId>) -> Self {
        self.speaker_rollen.extend(rollen);
        self
    }

    pub fn mit_ausnahmen(mut self, kanaele: impl IntoIterator<Item = ChannelId>) -> Self {
        self.ausgeschlossen.extend(kanaele);
        self
    }

    /// Prueft ob der Link auf den gegebenen Kanal anzuwenden ist
    /// (Scope passt bereits; hier greift nur die Ausnahmeliste)
    pub fn gilt_fuer(&self, kanal: ChannelId) -> bool {
        !self.ausgeschlossen.contains(&kanal)
    }

    /// Prueft ob der Link keinerlei Effekte mehr traegt
    ///
    /// Die Konfigurationsschicht loescht leere Links beim Unlink.
    pub fn ist_leer(&self) -> bool {
        self.grant_rollen.is_empty()
            && self.reverse_rollen.is_empty()
            && self.speaker_rollen.is_empty()
            && self.suffix.as_deref().unwrap_or("").is_empty()
    }

    /// Store-Schluessel: Art + Scope identifizieren einen Link eindeutig
    pub fn schluessel(&self) -> (LinkKind, LinkScope) {
        (self.kind, self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollen_mengen_kollabieren_duplikate() {
        let link = Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(1)))
            .mit_grants([RoleId(5), RoleId(5), RoleId(6)]);
        assert_eq!(link.grant_rollen.len(), 2);
    }

    #[test]
    fn ausnahmeliste_greift() {
        let link = Link::neu(LinkKind::All, LinkScope::Alle).mit_ausnahmen([ChannelId(9)]);
        assert!(!link.gilt_fuer(ChannelId(9)));
        assert!(link.gilt_fuer(ChannelId(10)));
    }

    #[test]
    fn leerer_link_erkannt() {
        let leer = Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(1)));
        assert!(leer.ist_leer());

        let mit_suffix = leer.clone().mit_suffix("🎮");
        assert!(!mit_suffix.ist_leer());

        let mit_leerem_suffix = leer.mit_suffix("");
        assert!(mit_leerem_suffix.ist_leer());
    }

    #[test]
    fn kind_roundtrip() {
        for kind in [
            LinkKind::Permanent,
            LinkKind::Voice,
            LinkKind::Stage,
            LinkKind::Category,
            LinkKind::All,
        ] {
            let s = kind.als_str();
            assert_eq!(s.parse::<LinkKind>().unwrap(), kind);
        }
    }
}
