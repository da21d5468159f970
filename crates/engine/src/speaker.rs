//! Sprecherwechsel in Stage-Kanaelen
//!
//! Wird ein Mitglied in einem Stage-Kanal Sprecher (oder tritt zurueck
//! ins Publikum), werden die Sprecher-Rollen des Stage-Links einzeln
//! und bestmoeglich vergeben bzw. entzogen. Ein Fehlschlag bei einer
//! Rolle stoppt die uebrigen nicht; gezaehlt wird hier nichts, der
//! Kanal selbst wird ja nicht gewechselt.

use std::sync::Arc;

use voicelink_core::types::{ChannelId, GuildId, MemberId};
use voicelink_directory::{DirectoryService, MitgliedUpdate};
use voicelink_store::LinkRepository;

use crate::dispatcher::TransitionErgebnis;
use crate::error::EngineResult;

const GRUND_SPRECHER_GEWORDEN: &str = "Sprecher geworden";
const GRUND_SPRECHER_BEENDET: &str = "Sprecher beendet";

/// Behandelt Sprecherwechsel unabhaengig vom Konvergenz-Pfad
pub struct SpeakerHandler<L: LinkRepository, D: DirectoryService> {
    store: Arc<L>,
    verzeichnis: Arc<D>,
}

impl<L: LinkRepository, D: DirectoryService> SpeakerHandler<L, D> {
    pub fn neu(store: Arc<L>, verzeichnis: Arc<D>) -> Self {
        Self { store, verzeichnis }
    }

    /// Vergibt oder entzieht die Sprecher-Rollen des Stage-Links
    ///
    /// Idempotent: Rollen die das Mitglied bereits (nicht) hat werden
    /// uebersprungen. Ohne Stage-Link passiert nichts.
    pub async fn behandeln(
        &self,
        guild: GuildId,
        mitglied: MemberId,
        kanal: ChannelId,
        wird_sprecher: bool,
    ) -> EngineResult<TransitionErgebnis> {
        let mut ergebnis = TransitionErgebnis::default();

        let Some(link) = self.store.stage_link(guild, kanal).await? else {
            return Ok(ergebnis);
        };
        if link.speaker_rollen.is_empty() {
            return Ok(ergebnis);
        }

        let profil = self.verzeichnis.profil(guild, mitglied).await?;
        let mut aktuelle_rollen = profil.rollen;
        let grund = if wird_sprecher {
            GRUND_SPRECHER_GEWORDEN
        } else {
            GRUND_SPRECHER_BEENDET
        };

        for rolle in &link.speaker_rollen {
            if self.verzeichnis.rolle(guild, *rolle).await?.is_none() {
                continue;
            }
            let hat_rolle = aktuelle_rollen.contains(rolle);
            if hat_rolle == wird_sprecher {
                continue;
            }

            let mut ziel = aktuelle_rollen.clone();
            if wird_sprecher {
                ziel.insert(*rolle);
            } else {
                ziel.remove(rolle);
            }
            let update = MitgliedUpdate {
                rollen: Some(ziel.clone()),
                nickname: None,
                grund,
            };
            match self.verzeichnis.mitglied_bearbeiten(guild, mitglied, update).await {
                Ok(()) => {
                    aktuelle_rollen = ziel;
                    if wird_sprecher {
                        ergebnis.hinzugefuegt.insert(*rolle);
                    } else {
                        ergebnis.entfernt.insert(*rolle);
                    }
                }
                Err(fehler) => {
                    tracing::warn!(
                        guild = %guild,
                        mitglied = %mitglied,
                        rolle = %rolle,
                        fehler = %fehler,
                        "Sprecher-Rolle konnte nicht angepasst werden"
                    );
                    ergebnis.fehlgeschlagen.insert(*rolle);
                }
            }
        }

        tracing::debug!(
            guild = %guild,
            mitglied = %mitglied,
            kanal = %kanal,
            wird_sprecher,
            vergeben = ergebnis.hinzugefuegt.len(),
            entzogen = ergebnis.entfernt.len(),
            "Sprecherwechsel behandelt"
        );
        Ok(ergebnis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicelink_core::types::RoleId;
    use voicelink_directory::{CallerCaps, InMemoryDirectory, RollenInfo};
    use voicelink_store::{InMemoryLinkStore, Link, LinkKind, LinkScope};

    fn guild() -> GuildId {
        GuildId(1)
    }

    fn caps() -> CallerCaps {
        CallerCaps {
            kann_rollen_bearbeiten: true,
            kann_nicknames_bearbeiten: true,
            top_rolle_rang: 100,
        }
    }

    async fn aufbau(
        speaker_rollen: impl IntoIterator<Item = RoleId>,
    ) -> SpeakerHandler<InMemoryLinkStore, InMemoryDirectory> {
        let store = Arc::new(InMemoryLinkStore::neu());
        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Stage, LinkScope::Kanal(ChannelId(10)))
                    .mit_speaker_rollen(speaker_rollen),
            )
            .await
            .unwrap();

        let dir = InMemoryDirectory::neu();
        dir.guild_anlegen(guild(), caps());
        dir.rolle_anlegen(guild(), RollenInfo::neu(RoleId(1), 5));
        dir.rolle_anlegen(guild(), RollenInfo::neu(RoleId(2), 5));
        dir.mitglied_anlegen(guild(), MemberId(7), "Anna", []);

        SpeakerHandler::neu(store, Arc::new(dir))
    }

    #[tokio::test]
    async fn sprecher_bekommt_rollen() {
        let handler = aufbau([RoleId(1), RoleId(2)]).await;
        let ergebnis = handler
            .behandeln(guild(), MemberId(7), ChannelId(10), true)
            .await
            .unwrap();

        assert_eq!(ergebnis.hinzugefuegt.len(), 2);
        let profil = handler.verzeichnis.profil(guild(), MemberId(7)).await.unwrap();
        assert!(profil.rollen.contains(&RoleId(1)));
        assert!(profil.rollen.contains(&RoleId(2)));
    }

    #[tokio::test]
    async fn rueckkehr_ins_publikum_entzieht() {
        let handler = aufbau([RoleId(1)]).await;
        handler
            .behandeln(guild(), MemberId(7), ChannelId(10), true)
            .await
            .unwrap();
        let ergebnis = handler
            .behandeln(guild(), MemberId(7), ChannelId(10), false)
            .await
            .unwrap();

        assert!(ergebnis.entfernt.contains(&RoleId(1)));
        let profil = handler.verzeichnis.profil(guild(), MemberId(7)).await.unwrap();
        assert!(!profil.rollen.contains(&RoleId(1)));
    }

    #[tokio::test]
    async fn wiederholter_wechsel_ist_idempotent() {
        let handler = aufbau([RoleId(1)]).await;
        handler
            .behandeln(guild(), MemberId(7), ChannelId(10), true)
            .await
            .unwrap();
        let zweites = handler
            .behandeln(guild(), MemberId(7), ChannelId(10), true)
            .await
            .unwrap();

        // Bereits vorhandene Rolle wird nicht erneut angefasst
        assert!(zweites.hinzugefuegt.is_empty());
        assert!(zweites.fehlgeschlagen.is_empty());
    }

    #[tokio::test]
    async fn ohne_stage_link_passiert_nichts() {
        let handler = aufbau([RoleId(1)]).await;
        let ergebnis = handler
            .behandeln(guild(), MemberId(7), ChannelId(99), true)
            .await
            .unwrap();
        assert!(ergebnis.hinzugefuegt.is_empty());
        assert!(!ergebnis.guild_aktiv);
    }

    #[tokio::test]
    async fn unbekannte_sprecher_rolle_wird_uebersprungen() {
        let handler = aufbau([RoleId(1), RoleId(42)]).await; // r42 existiert nicht
        let ergebnis = handler
            .behandeln(guild(), MemberId(7), ChannelId(10), true)
            .await
            .unwrap();
        assert_eq!(ergebnis.hinzugefuegt.len(), 1);
        assert!(ergebnis.fehlgeschlagen.is_empty());
    }
}
