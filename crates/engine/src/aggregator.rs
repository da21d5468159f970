//! Link-Aggregator
//!
//! Sammelt fuer einen Kanal (plus optionale Eltern-Kategorie) und eine
//! Richtung alle anwendbaren Links: kanal-gebundene, kategorie-weite
//! und guild-weite Regeln. Effektlose Links und Kanaele auf der
//! Ausnahmeliste eines Links fallen heraus; beim Verlassen entfallen
//! Permanent-Links komplett, deren Grants sind einseitig und werden
//! nie zurueckgerollt.

use std::sync::Arc;

use voicelink_core::event::{Richtung, VoiceKanal};
use voicelink_core::types::GuildId;
use voicelink_store::{Link, LinkKind, LinkRepository};

use crate::error::EngineResult;

/// Aggregiert anwendbare Links aus dem Store
pub struct LinkAggregator<L: LinkRepository> {
    store: Arc<L>,
}

impl<L: LinkRepository> LinkAggregator<L> {
    pub fn neu(store: Arc<L>) -> Self {
        Self { store }
    }

    /// Sammelt alle auf den Kanal anwendbaren Links in Abrufreihenfolge
    ///
    /// Kein Treffer ist ein leeres, gueltiges Ergebnis.
    pub async fn sammeln(
        &self,
        guild: GuildId,
        kanal: &VoiceKanal,
        richtung: Richtung,
    ) -> EngineResult<Vec<Link>> {
        let links = self
            .store
            .links_fuer_kanal(guild, kanal.id, kanal.kategorie)
            .await?;

        let anwendbar: Vec<Link> = links
            .into_iter()
            .filter(|link| !link.ist_leer())
            .filter(|link| link.gilt_fuer(kanal.id))
            .filter(|link| {
                !(richtung == Richtung::Verlassen && link.kind == LinkKind::Permanent)
            })
            .collect();

        tracing::debug!(
            guild = %guild,
            kanal = %kanal.id,
            richtung = ?richtung,
            anwendbar = anwendbar.len(),
            "Links aggregiert"
        );
        Ok(anwendbar)
    }
}
