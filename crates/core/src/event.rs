//! Voice-Presence-Ereignisse und ihre Klassifizierung
//!
//! Der externe Gateway liefert pro Presence-Aenderung ein rohes
//! Vorher/Nachher-Paar. Die Klassifizierung leitet daraus genau eine
//! Uebergangsart ab; widerspruechliche oder leere Paare gelten als
//! `KeineAenderung` und loesen keine Mutation aus.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ChannelId, GuildId, MemberId};

/// Art eines Voice-Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KanalArt {
    /// Gewoehnlicher Voice-Kanal
    Voice,
    /// Stage-Kanal mit Sprecher/Zuhoerer-Trennung
    Stage,
}

/// Ein Voice-Kanal mit optionaler Eltern-Kategorie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceKanal {
    pub id: ChannelId,
    pub kategorie: Option<CategoryId>,
    pub art: KanalArt,
}

impl VoiceKanal {
    pub fn voice(id: ChannelId, kategorie: Option<CategoryId>) -> Self {
        Self {
            id,
            kategorie,
            art: KanalArt::Voice,
        }
    }

    pub fn stage(id: ChannelId, kategorie: Option<CategoryId>) -> Self {
        Self {
            id,
            kategorie,
            art: KanalArt::Stage,
        }
    }
}

/// Momentaufnahme des Voice-Zustands eines Mitglieds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceZustand {
    /// Aktueller Kanal (None wenn nicht verbunden)
    pub kanal: Option<VoiceKanal>,
    /// Suppress-Flag in Stage-Kanaelen (Zuhoerer = true)
    pub suppressed: bool,
}

impl VoiceZustand {
    /// Zustand "nicht verbunden"
    pub fn getrennt() -> Self {
        Self {
            kanal: None,
            suppressed: false,
        }
    }

    /// Zustand "in Kanal", standardmaessig nicht suppressed
    pub fn in_kanal(kanal: VoiceKanal) -> Self {
        Self {
            kanal: Some(kanal),
            suppressed: false,
        }
    }
}

/// Ein rohes Presence-Ereignis des Gateways
///
/// Wird pro Aenderung synthetisiert und nach der Verarbeitung verworfen;
/// die Engine haelt keinen Zustand ueber Ereignisse hinweg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub guild_id: GuildId,
    pub member_id: MemberId,
    /// Bot-Accounts werden (konfigurierbar) ignoriert
    pub ist_bot: bool,
    pub vorher: VoiceZustand,
    pub nachher: VoiceZustand,
}

/// Richtung einer Link-Anwendung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Richtung {
    /// Kanal wird betreten – Grant-Rollen anwenden
    Betreten,
    /// Kanal wird verlassen – Grant-Rollen zurueckrollen
    Verlassen,
}

/// Klassifiziertes Ereignis – genau eine Uebergangsart pro Event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uebergang {
    /// Kein Kanal -> Kanal
    Beitritt(VoiceKanal),
    /// Kanal -> kein Kanal
    Austritt(VoiceKanal),
    /// Kanal A -> Kanal B
    Wechsel { von: VoiceKanal, nach: VoiceKanal },
    /// Suppress-Flag im selben Stage-Kanal gekippt
    SprecherWechsel {
        kanal: VoiceKanal,
        /// true = wurde Sprecher, false = Sprecher beendet
        wird_sprecher: bool,
    },
    /// Kein relevanter Uebergang (inkl. fehlerhafter Paare)
    KeineAenderung,
}

impl TransitionEvent {
    /// Leitet die Uebergangsart aus dem Vorher/Nachher-Paar ab
    ///
    /// Der Sprecherwechsel erfordert denselben Stage-Kanal auf beiden
    /// Seiten; ein Wechsel zwischen zwei verschiedenen Stage-Kanaelen
    /// ist ein gewoehnlicher `Wechsel`.
    pub fn klassifizieren(&self) -> Uebergang {
        match (self.vorher.kanal, self.nachher.kanal) {
            (None, Some(nach)) => Uebergang::Beitritt(nach),
            (Some(von), None) => Uebergang::Austritt(von),
            (Some(von), Some(nach)) if von.id != nach.id => Uebergang::Wechsel { von, nach },
            (Some(von), Some(nach))
                if von.art == KanalArt::Stage
                    && nach.art == KanalArt::Stage
                    && self.vorher.suppressed != self.nachher.suppressed =>
            {
                Uebergang::SprecherWechsel {
                    kanal: nach,
                    wird_sprecher: !self.nachher.suppressed,
                }
            }
            _ => Uebergang::KeineAenderung,
        }
    }
}
