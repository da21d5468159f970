//! In-Memory-Implementierung des Link-Stores
//!
//! Thread-safe durch DashMap. Snapshots im versionierten JSON-Format
//! koennen importiert (mit einmaliger Migration) und exportiert werden.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use voicelink_core::types::{CategoryId, ChannelId, GuildId};

use crate::error::{StoreError, StoreResult};
use crate::migration::snapshot_migrieren;
use crate::models::{Link, LinkKind, LinkScope};
use crate::record::{scope_parsen, AllesRecord, GuildRecord, KanalRecord, Snapshot};
use crate::repository::LinkRepository;

/// Schluessel eines Links innerhalb einer Guild
type LinkSchluessel = (LinkKind, LinkScope);

/// In-Memory Link-Store
#[derive(Clone, Default)]
pub struct InMemoryLinkStore {
    inner: Arc<DashMap<GuildId, HashMap<LinkSchluessel, Link>>>,
}

impl InMemoryLinkStore {
    /// Erstellt einen leeren Store
    pub fn neu() -> Self {
        Self::default()
    }

    /// Importiert einen JSON-Snapshot; aeltere Formate werden hier
    /// einmalig migriert, der Lesepfad bleibt davon frei
    pub fn aus_snapshot_json(json: &str) -> StoreResult<Self> {
        let roh: serde_json::Value = serde_json::from_str(json)?;
        let snapshot = snapshot_migrieren(&roh)?;
        Self::aus_snapshot(snapshot)
    }

    /// Baut den Store aus einem bereits migrierten Snapshot auf
    pub fn aus_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        let store = Self::neu();
        for (guild_roh, record) in &snapshot.guilds {
            let guild = guild_roh
                .parse::<u64>()
                .map(GuildId)
                .map_err(|_| StoreError::format(format!("Ungueltige Guild-ID: {guild_roh}")))?;

            let mut links = HashMap::new();
            let kanal_maps = [
                (LinkKind::Permanent, &record.permanent),
                (LinkKind::Voice, &record.voice),
                (LinkKind::Stage, &record.stage),
                (LinkKind::Category, &record.category),
            ];
            for (kind, map) in kanal_maps {
                for (schluessel, eintrag) in map {
                    let Some(scope) = scope_parsen(kind, schluessel) else {
                        tracing::warn!(
                            guild = %guild,
                            kind = %kind,
                            schluessel = %schluessel,
                            "Ungueltiger Scope-Schluessel im Snapshot uebersprungen"
                        );
                        continue;
                    };
                    links.insert((kind, scope), eintrag.als_link(kind, scope));
                }
            }
            if let Some(alles) = &record.all {
                links.insert((LinkKind::All, LinkScope::Alle), alles.als_link());
            }

            store.inner.insert(guild, links);
        }
        Ok(store)
    }

    /// Exportiert den aktuellen Stand als Snapshot (immer Format 3)
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::neu();
        for eintrag in self.inner.iter() {
            let mut record = GuildRecord::default();
            for ((kind, scope), link) in eintrag.value() {
                let ziel = match kind {
                    LinkKind::Permanent => &mut record.permanent,
                    LinkKind::Voice => &mut record.voice,
                    LinkKind::Stage => &mut record.stage,
                    LinkKind::Category => &mut record.category,
                    LinkKind::All => {
                        record.all = Some(AllesRecord::von_link(link));
                        continue;
                    }
                };
                let schluessel = match scope {
                    LinkScope::Kanal(k) => k.0.to_string(),
                    LinkScope::Kategorie(k) => k.0.to_string(),
                    LinkScope::Alle => continue,
                };
                ziel.insert(schluessel, KanalRecord::von_link(link));
            }
            snapshot.guilds.insert(eintrag.key().0.to_string(), record);
        }
        snapshot
    }

    /// Entfernt alle Daten einer Guild (Guild-Austritt)
    pub fn guild_entfernen(&self, guild: GuildId) -> bool {
        self.inner.remove(&guild).is_some()
    }

    /// Anzahl Guilds mit mindestens einem Link
    pub fn guild_anzahl(&self) -> usize {
        self.inner.len()
    }
}

impl LinkRepository for InMemoryLinkStore {
    async fn links_fuer_kanal(
        &self,
        guild: GuildId,
        kanal: ChannelId,
        kategorie: Option<CategoryId>,
    ) -> StoreResult<Vec<Link>> {
        let Some(links) = self.inner.get(&guild) else {
            return Ok(Vec::new());
        };

        // Feste Abrufreihenfolge; der Resolver behandelt das Ergebnis
        // als Multiset, die Reihenfolge beeinflusst nur den Suffix
        let mut ergebnis = Vec::new();
        for kind in [LinkKind::Permanent, LinkKind::Voice, LinkKind::Stage] {
            if let Some(link) = links.get(&(kind, LinkScope::Kanal(kanal))) {
                ergebnis.push(link.clone());
            }
        }
        if let Some(kategorie) = kategorie {
            if let Some(link) = links.get(&(LinkKind::Category, LinkScope::Kategorie(kategorie))) {
                ergebnis.push(link.clone());
            }
        }
        if let Some(link) = links.get(&(LinkKind::All, LinkScope::Alle)) {
            ergebnis.push(link.clone());
        }
        Ok(ergebnis)
    }

    async fn stage_link(&self, guild: GuildId, kanal: ChannelId) -> StoreResult<Option<Link>> {
        Ok(self
            .inner
            .get(&guild)
            .and_then(|links| links.get(&(LinkKind::Stage, LinkScope::Kanal(kanal))).cloned()))
    }

    async fn speichern(&self, guild: GuildId, link: Link) -> StoreResult<()> {
        self.inner
            .entry(guild)
            .or_default()
            .insert(link.schluessel(), link);
        Ok(())
    }

    async fn loeschen(
        &self,
        guild: GuildId,
        kind: LinkKind,
        scope: LinkScope,
    ) -> StoreResult<bool> {
        let Some(mut links) = self.inner.get_mut(&guild) else {
            return Ok(false);
        };
        Ok(links.remove(&(kind, scope)).is_some())
    }

    async fn alle_fuer_guild(&self, guild: GuildId) -> StoreResult<Vec<Link>> {
        Ok(self
            .inner
            .get(&guild)
            .map(|links| links.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicelink_core::types::RoleId;

    fn guild() -> GuildId {
        GuildId(1)
    }

    #[tokio::test]
    async fn speichern_und_abrufen() {
        let store = InMemoryLinkStore::neu();
        let link = Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(10)))
            .mit_grants([RoleId(100)]);
        store.speichern(guild(), link.clone()).await.unwrap();

        let gefunden = store
            .links_fuer_kanal(guild(), ChannelId(10), None)
            .await
            .unwrap();
        assert_eq!(gefunden, vec![link]);
    }

    #[tokio::test]
    async fn abruf_umfasst_kategorie_und_all() {
        let store = InMemoryLinkStore::neu();
        let kategorie = CategoryId(5);
        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(10))),
            )
            .await
            .unwrap();
        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Category, LinkScope::Kategorie(kategorie)),
            )
            .await
            .unwrap();
        store
            .speichern(guild(), Link::neu(LinkKind::All, LinkScope::Alle))
            .await
            .unwrap();

        let mit_kategorie = store
            .links_fuer_kanal(guild(), ChannelId(10), Some(kategorie))
            .await
            .unwrap();
        assert_eq!(mit_kategorie.len(), 3);

        // Ohne Kategorie faellt der Kategorie-Link weg
        let ohne_kategorie = store
            .links_fuer_kanal(guild(), ChannelId(10), None)
            .await
            .unwrap();
        assert_eq!(ohne_kategorie.len(), 2);
    }

    #[tokio::test]
    async fn kein_treffer_ist_leeres_ergebnis() {
        let store = InMemoryLinkStore::neu();
        let gefunden = store
            .links_fuer_kanal(guild(), ChannelId(99), None)
            .await
            .unwrap();
        assert!(gefunden.is_empty());
    }

    #[tokio::test]
    async fn stage_link_nur_fuer_stage_art() {
        let store = InMemoryLinkStore::neu();
        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Voice, LinkScope::Kanal(ChannelId(20))),
            )
            .await
            .unwrap();
        assert!(store.stage_link(guild(), ChannelId(20)).await.unwrap().is_none());

        store
            .speichern(
                guild(),
                Link::neu(LinkKind::Stage, LinkScope::Kanal(ChannelId(20)))
                    .mit_speaker_rollen([RoleId(7)]),
            )
            .await
            .unwrap();
        let link = store.stage_link(guild(), ChannelId(20)).await.unwrap().unwrap();
        assert!(link.speaker_rollen.contains(&RoleId(7)));
    }

    #[tokio::test]
    async fn loeschen_entfernt_link() {
        let store = InMemoryLinkStore::neu();
        let scope = LinkScope::Kanal(ChannelId(10));
        store
            .speichern(guild(), Link::neu(LinkKind::Voice, scope))
            .await
            .unwrap();

        assert!(store.loeschen(guild(), LinkKind::Voice, scope).await.unwrap());
        assert!(!store.loeschen(guild(), LinkKind::Voice, scope).await.unwrap());
    }

    #[tokio::test]
    async fn snapshot_import_und_export() {
        let json = r#"{
            "guilds": {
                "1": {
                    "voice": { "10": ["100", "200"] },
                    "permanent": {
                        "format": 1,
                        "11": { "roles": ["300"], "suffix": "⭐" }
                    },
                    "all": { "roles": ["400"], "except": ["12"] }
                }
            }
        }"#;
        let store = InMemoryLinkStore::aus_snapshot_json(json).unwrap();

        let links = store
            .links_fuer_kanal(guild(), ChannelId(10), None)
            .await
            .unwrap();
        // Voice-Link + All-Link
        assert_eq!(links.len(), 2);

        let export = store.snapshot();
        assert_eq!(export.guilds["1"].voice["10"].roles, vec!["100", "200"]);
        assert_eq!(export.guilds["1"].permanent["11"].suffix, "⭐");
        assert_eq!(export.guilds["1"].all.as_ref().unwrap().except, vec!["12"]);
    }

    #[tokio::test]
    async fn guild_entfernen_loescht_alles() {
        let store = InMemoryLinkStore::neu();
        store
            .speichern(guild(), Link::neu(LinkKind::All, LinkScope::Alle))
            .await
            .unwrap();
        assert_eq!(store.guild_anzahl(), 1);

        assert!(store.guild_entfernen(guild()));
        assert_eq!(store.guild_anzahl(), 0);
    }
}
