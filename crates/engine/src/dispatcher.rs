//! Transition-Dispatcher
//!
//! Der Einstiegspunkt der Engine: nimmt ein rohes Presence-Ereignis
//! entgegen, klassifiziert es und faehrt den Konvergenz-Pfad
//! (Aggregation -> Diff -> Suffix -> Plan -> Mutation) bzw. den
//! Sprecher-Pfad. Pro (Guild, Mitglied) laeuft zu jedem Zeitpunkt
//! hoechstens ein Uebergang; verschiedene Mitglieder laufen parallel.
//!
//! Der Mutationsschritt ist best-effort: genau ein Versuch, Fehler
//! werden geloggt und verschluckt. Das berechnete Ergebnis gibt immer
//! den geplanten Zielzustand wieder.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use voicelink_core::event::{Richtung, TransitionEvent, Uebergang, VoiceKanal};
use voicelink_core::types::{ChannelId, GuildId, MemberId, RoleId};
use voicelink_directory::{DirectoryService, RollenInfo};
use voicelink_store::LinkRepository;

use crate::aggregator::LinkAggregator;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::planner::planen;
use crate::resolver::RollenKandidaten;
use crate::serial::MitgliedSchleusen;
use crate::speaker::SpeakerHandler;
use crate::suffix::{self, SuffixKonstruktor};

const GRUND_BETRETEN: &str = "Voice-Kanal betreten";
const GRUND_VERLASSEN: &str = "Voice-Kanal verlassen";
const GRUND_WECHSEL: &str = "Voice-Kanal gewechselt";

/// Anzahl geplanter Rollen-Aenderungen eines Uebergangs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollenZaehler {
    pub hinzugefuegt: usize,
    pub entfernt: usize,
}

/// Ergebnis eines verarbeiteten Uebergangs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionErgebnis {
    /// Rollen die der Plan dem Mitglied neu zuweist
    pub hinzugefuegt: BTreeSet<RoleId>,
    /// Rollen die der Plan dem Mitglied entzieht
    pub entfernt: BTreeSet<RoleId>,
    /// Geplanter neuer Anzeigename (None wenn unveraendert)
    pub neuer_name: Option<String>,
    /// Aufgeloeste, aber nicht zuweisbare Rollen
    pub fehlgeschlagen: BTreeSet<RoleId>,
    /// Der Uebergang hat in dieser Guild effektive Aenderungen berechnet
    pub guild_aktiv: bool,
    /// Geplante Aenderungszahlen, unabhaengig vom Mutationserfolg
    pub zaehler: RollenZaehler,
    /// Betretener Kanal – Signal fuer den externen Kanal-Generator
    pub kanal_betreten: Option<ChannelId>,
    /// Verlassener Kanal – Signal fuer den externen Kanal-Generator
    pub kanal_verlassen: Option<ChannelId>,
}

/// Verarbeitet Presence-Ereignisse zu Rollen- und Namens-Konvergenz
pub struct TransitionDispatcher<L: LinkRepository, D: DirectoryService> {
    verzeichnis: Arc<D>,
    aggregator: LinkAggregator<L>,
    speaker: SpeakerHandler<L, D>,
    config: EngineConfig,
    schleusen: MitgliedSchleusen,
}

impl<L: LinkRepository, D: DirectoryService> TransitionDispatcher<L, D> {
    pub fn neu(store: Arc<L>, verzeichnis: Arc<D>, config: EngineConfig) -> Self {
        Self {
            aggregator: LinkAggregator::neu(store.clone()),
            speaker: SpeakerHandler::neu(store, verzeichnis.clone()),
            verzeichnis,
            config,
            schleusen: MitgliedSchleusen::neu(),
        }
    }

    /// Verarbeitet ein Presence-Ereignis
    ///
    /// `Ok(None)` bedeutet: nichts zu tun (Bot, kein relevanter
    /// Uebergang). Fehler des Verzeichnisdienstes beim LESEN werden
    /// propagiert; der Mutationsschritt selbst ist best-effort.
    pub async fn verarbeiten(
        &self,
        event: &TransitionEvent,
    ) -> EngineResult<Option<TransitionErgebnis>> {
        if event.ist_bot && self.config.bots_ignorieren {
            tracing::trace!(
                guild = %event.guild_id,
                mitglied = %event.member_id,
                "Bot-Uebergang ignoriert"
            );
            return Ok(None);
        }

        match event.klassifizieren() {
            Uebergang::KeineAenderung => Ok(None),
            Uebergang::SprecherWechsel {
                kanal,
                wird_sprecher,
            } => {
                // Auch der Sprecher-Pfad liest das Profil und schreibt
                // die volle Rollenmenge; er muss durch dieselbe Schleuse
                let _schleuse = self
                    .schleusen
                    .sperren(event.guild_id, event.member_id)
                    .await;
                let ergebnis = self
                    .speaker
                    .behandeln(event.guild_id, event.member_id, kanal.id, wird_sprecher)
                    .await?;
                Ok(Some(ergebnis))
            }
            Uebergang::Beitritt(kanal) => {
                self.konvergieren(event.guild_id, event.member_id, None, Some(kanal), GRUND_BETRETEN)
                    .await
                    .map(Some)
            }
            Uebergang::Austritt(kanal) => {
                self.konvergieren(event.guild_id, event.member_id, Some(kanal), None, GRUND_VERLASSEN)
                    .await
                    .map(Some)
            }
            Uebergang::Wechsel { von, nach } => {
                self.konvergieren(event.guild_id, event.member_id, Some(von), Some(nach), GRUND_WECHSEL)
                    .await
                    .map(Some)
            }
        }
    }

    /// Konvergenz-Pfad fuer Beitritt, Austritt und Wechsel
    ///
    /// Ein Wechsel speist Verlassen- und Betreten-Seite in EINEN
    /// Kandidaten-Satz, bevor die Aufhebung laeuft; eine auf beiden
    /// Seiten vergebene Rolle wird so nie sichtbar entzogen.
    async fn konvergieren(
        &self,
        guild: GuildId,
        mitglied: MemberId,
        verlassen: Option<VoiceKanal>,
        betreten: Option<VoiceKanal>,
        grund: &'static str,
    ) -> EngineResult<TransitionErgebnis> {
        let _schleuse = self.schleusen.sperren(guild, mitglied).await;

        let mut kandidaten = RollenKandidaten::neu();
        let mut verlassen_suffix = SuffixKonstruktor::neu();
        let mut betreten_suffix = SuffixKonstruktor::neu();

        if let Some(kanal) = &verlassen {
            let links = self
                .aggregator
                .sammeln(guild, kanal, Richtung::Verlassen)
                .await?;
            for link in &links {
                kandidaten.link_einbringen(link, Richtung::Verlassen);
                if let Some(suffix) = &link.suffix {
                    verlassen_suffix.hinzufuegen(link.kind, suffix);
                }
            }
        }
        if let Some(kanal) = &betreten {
            let links = self
                .aggregator
                .sammeln(guild, kanal, Richtung::Betreten)
                .await?;
            for link in &links {
                kandidaten.link_einbringen(link, Richtung::Betreten);
                if let Some(suffix) = &link.suffix {
                    betreten_suffix.hinzufuegen(link.kind, suffix);
                }
            }
        }
        let diff = kandidaten.abschliessen();

        let profil = self.verzeichnis.profil(guild, mitglied).await?;

        // Erst die Suffixe der verlassenen Seite abstreifen, dann die
        // der betretenen Seite anwenden
        let mut ziel_name = profil.anzeige_name.clone();
        if !verlassen_suffix.ist_leer() {
            ziel_name = suffix::entfernen(&ziel_name, &verlassen_suffix.gesamt());
        }
        if !betreten_suffix.ist_leer() {
            ziel_name = suffix::anwenden(
                &ziel_name,
                &betreten_suffix.gesamt(),
                self.config.anzeige_name_limit,
            );
        }

        let mut rollen: BTreeMap<RoleId, Option<RollenInfo>> = BTreeMap::new();
        for rolle in diff.hinzufuegen.iter().chain(diff.entfernen.iter()) {
            let info = self.verzeichnis.rolle(guild, *rolle).await?;
            rollen.insert(*rolle, info);
        }
        let caps = self.verzeichnis.faehigkeiten(guild).await?;

        let plan = planen(&profil, &diff, ziel_name, &rollen, caps, grund);

        let ergebnis = TransitionErgebnis {
            hinzugefuegt: plan.ziel_rollen.difference(&profil.rollen).copied().collect(),
            entfernt: profil.rollen.difference(&plan.ziel_rollen).copied().collect(),
            neuer_name: plan.name_geaendert.then(|| plan.ziel_name.clone()),
            fehlgeschlagen: plan.fehlgeschlagen.clone(),
            guild_aktiv: plan.rollen_geaendert || plan.name_geaendert,
            zaehler: RollenZaehler {
                hinzugefuegt: diff.hinzufuegen.len(),
                entfernt: diff.entfernen.len(),
            },
            kanal_betreten: betreten.map(|k| k.id),
            kanal_verlassen: verlassen.map(|k| k.id),
        };

        if let Some(update) = plan.update {
            if let Err(fehler) = self
                .verzeichnis
                .mitglied_bearbeiten(guild, mitglied, update)
                .await
            {
                // Genau ein Versuch; der Gateway liefert beim naechsten
                // Uebergang ohnehin einen frischen Zustand
                tracing::warn!(
                    guild = %guild,
                    mitglied = %mitglied,
                    grund,
                    fehler = %fehler,
                    "Profil-Mutation fehlgeschlagen"
                );
            }
        }

        tracing::debug!(
            guild = %guild,
            mitglied = %mitglied,
            grund,
            hinzugefuegt = ergebnis.zaehler.hinzugefuegt,
            entfernt = ergebnis.zaehler.entfernt,
            aktiv = ergebnis.guild_aktiv,
            "Uebergang konvergiert"
        );
        Ok(ergebnis)
    }

    /// Raeumt verwaiste Serialisierungs-Schleusen auf
    pub fn schleusen_aufraeumen(&self) {
        self.schleusen.aufraeumen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicelink_core::event::VoiceZustand;
    use voicelink_core::types::ChannelId;
    use voicelink_directory::{CallerCaps, InMemoryDirectory};
    use voicelink_store::{InMemoryLinkStore, Link, LinkKind, LinkScope};

    fn guild() -> GuildId {
        GuildId(1)
    }

    fn volle_caps() -> CallerCaps {
        CallerCaps {
            kann_rollen_bearbeiten: true,
            kann_nicknames_bearbeiten: true,
            top_rolle_rang: 100,
        }
    }

    fn beitritt(kanal: VoiceKanal, ist_bot: bool) -> TransitionEvent {
        TransitionEvent {
            guild_id: guild(),
            member_id: MemberId(7),
            ist_bot,
            vorher: VoiceZustand::getrennt(),
            nachher: VoiceZustand::in_kanal(kanal),
        }
    }

    async fn aufbau() -> (
        TransitionDispatcher<InMemoryLinkStore, InMemoryDirectory>,
        Arc<InMemoryDirectory>,
    ) {
        let store = Arc::new(InMemoryLinkStore::neu());
        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(10)))
                    .mit_grants([RoleId(1)]),
            )
            .await
            .unwrap();

        let dir = Arc::new(InMemoryDirectory::neu());
        dir.guild_anlegen(guild(), volle_caps());
        dir.rolle_anlegen(guild(), RollenInfo::neu(RoleId(1), 5));
        dir.mitglied_anlegen(guild(), MemberId(7), "Anna", []);

        (
            TransitionDispatcher::neu(store, dir.clone(), EngineConfig::default()),
            dir,
        )
    }

    #[tokio::test]
    async fn beitritt_vergibt_grant_rolle() {
        let (dispatcher, dir) = aufbau().await;
        let kanal = VoiceKanal::voice(ChannelId(10), None);

        let ergebnis = dispatcher
            .verarbeiten(&beitritt(kanal, false))
            .await
            .unwrap()
            .unwrap();

        assert!(ergebnis.hinzugefuegt.contains(&RoleId(1)));
        assert!(ergebnis.guild_aktiv);
        assert_eq!(ergebnis.zaehler.hinzugefuegt, 1);

        let profil = dir.profil(guild(), MemberId(7)).await.unwrap();
        assert!(profil.rollen.contains(&RoleId(1)));
    }

    #[tokio::test]
    async fn bot_wird_ignoriert() {
        let (dispatcher, dir) = aufbau().await;
        let kanal = VoiceKanal::voice(ChannelId(10), None);

        let ergebnis = dispatcher.verarbeiten(&beitritt(kanal, true)).await.unwrap();
        assert!(ergebnis.is_none());
        assert_eq!(dir.edit_aufrufe(), 0);
    }

    #[tokio::test]
    async fn keine_aenderung_ist_none() {
        let (dispatcher, _) = aufbau().await;
        let event = TransitionEvent {
            guild_id: guild(),
            member_id: MemberId(7),
            ist_bot: false,
            vorher: VoiceZustand::getrennt(),
            nachher: VoiceZustand::getrennt(),
        };
        assert!(dispatcher.verarbeiten(&event).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn kanal_ohne_links_ist_inaktiv() {
        let (dispatcher, dir) = aufbau().await;
        let kanal = VoiceKanal::voice(ChannelId(99), None);

        let ergebnis = dispatcher
            .verarbeiten(&beitritt(kanal, false))
            .await
            .unwrap()
            .unwrap();
        assert!(!ergebnis.guild_aktiv);
        assert_eq!(dir.edit_aufrufe(), 0);
    }
}
