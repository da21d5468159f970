//! In-Memory-Verzeichnisdienst
//!
//! Thread-safe durch DashMap. Dient als Testdouble fuer die Engine und
//! als lokaler Harness; Mutationen werden direkt auf den gehaltenen
//! Profilen ausgefuehrt. Ueber `bearbeiten_fehlschlagen_lassen` laesst
//! sich ein fehlschlagender Edit-Pfad simulieren.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use voicelink_core::types::{GuildId, MemberId, RoleId};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{CallerCaps, MitgliedProfil, MitgliedUpdate, RollenInfo};
use crate::service::DirectoryService;

/// Mitglieds-Eintrag im In-Memory-Verzeichnis
#[derive(Debug, Clone)]
struct MitgliedEintrag {
    rollen: BTreeSet<RoleId>,
    anzeige_name: String,
}

/// Verzeichnis-Daten einer Guild
#[derive(Debug)]
struct GuildVerzeichnis {
    mitglieder: HashMap<MemberId, MitgliedEintrag>,
    rollen: HashMap<RoleId, RollenInfo>,
    owner: Option<MemberId>,
    caps: CallerCaps,
}

/// In-Memory-Implementierung des Verzeichnisdienstes
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<DashMap<GuildId, GuildVerzeichnis>>,
    /// Simuliert einen fehlschlagenden Verzeichnisdienst
    bearbeiten_schlaegt_fehl: Arc<AtomicBool>,
    /// Zaehlt ausgefuehrte Edit-Aufrufe (fuer Tests)
    edit_aufrufe: Arc<AtomicU64>,
}

impl InMemoryDirectory {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Legt eine Guild mit den Faehigkeiten des Dienstkontos an
    pub fn guild_anlegen(&self, guild: GuildId, caps: CallerCaps) {
        self.inner.insert(
            guild,
            GuildVerzeichnis {
                mitglieder: HashMap::new(),
                rollen: HashMap::new(),
                owner: None,
                caps,
            },
        );
    }

    /// Registriert eine Rolle in der Guild
    pub fn rolle_anlegen(&self, guild: GuildId, info: RollenInfo) {
        if let Some(mut verzeichnis) = self.inner.get_mut(&guild) {
            verzeichnis.rollen.insert(info.id, info);
        }
    }

    /// Registriert ein Mitglied mit Startprofil
    pub fn mitglied_anlegen(
        &self,
        guild: GuildId,
        mitglied: MemberId,
        anzeige_name: impl Into<String>,
        rollen: impl IntoIterator<Item = RoleId>,
    ) {
        if let Some(mut verzeichnis) = self.inner.get_mut(&guild) {
            verzeichnis.mitglieder.insert(
                mitglied,
                MitgliedEintrag {
                    rollen: rollen.into_iter().collect(),
                    anzeige_name: anzeige_name.into(),
                },
            );
        }
    }

    /// Markiert ein Mitglied als Guild-Owner
    pub fn owner_setzen(&self, guild: GuildId, mitglied: MemberId) {
        if let Some(mut verzeichnis) = self.inner.get_mut(&guild) {
            verzeichnis.owner = Some(mitglied);
        }
    }

    /// Laesst alle folgenden `mitglied_bearbeiten`-Aufrufe fehlschlagen
    pub fn bearbeiten_fehlschlagen_lassen(&self, fehlschlagen: bool) {
        self.bearbeiten_schlaegt_fehl
            .store(fehlschlagen, Ordering::SeqCst);
    }

    /// Anzahl der bisher ausgefuehrten Edit-Aufrufe
    pub fn edit_aufrufe(&self) -> u64 {
        self.edit_aufrufe.load(Ordering::SeqCst)
    }

    fn top_rang(verzeichnis: &GuildVerzeichnis, rollen: &BTreeSet<RoleId>) -> u32 {
        rollen
            .iter()
            .filter_map(|r| verzeichnis.rollen.get(r))
            .map(|info| info.rang)
            .max()
            .unwrap_or(0)
    }
}

impl DirectoryService for InMemoryDirectory {
    async fn profil(&self, guild: GuildId, mitglied: MemberId) -> DirectoryResult<MitgliedProfil> {
        let verzeichnis = self
            .inner
            .get(&guild)
            .ok_or_else(|| DirectoryError::GuildNichtGefunden(guild.to_string()))?;
        let eintrag = verzeichnis
            .mitglieder
            .get(&mitglied)
            .ok_or_else(|| DirectoryError::MitgliedNichtGefunden(mitglied.to_string()))?;

        Ok(MitgliedProfil {
            rollen: eintrag.rollen.clone(),
            anzeige_name: eintrag.anzeige_name.clone(),
            top_rolle_rang: Self::top_rang(&verzeichnis, &eintrag.rollen),
            ist_owner: verzeichnis.owner == Some(mitglied),
        })
    }

    async fn rolle(&self, guild: GuildId, rolle: RoleId) -> DirectoryResult<Option<RollenInfo>> {
        let verzeichnis = self
            .inner
            .get(&guild)
            .ok_or_else(|| DirectoryError::GuildNichtGefunden(guild.to_string()))?;
        Ok(verzeichnis.rollen.get(&rolle).copied())
    }

    async fn faehigkeiten(&self, guild: GuildId) -> DirectoryResult<CallerCaps> {
        let verzeichnis = self
            .inner
            .get(&guild)
            .ok_or_else(|| DirectoryError::GuildNichtGefunden(guild.to_string()))?;
        Ok(verzeichnis.caps)
    }

    async fn mitglied_bearbeiten(
        &self,
        guild: GuildId,
        mitglied: MemberId,
        update: MitgliedUpdate,
    ) -> DirectoryResult<()> {
        // Ein leeres Update erreicht den Dienst gar nicht erst
        if update.ist_leer() {
            return Ok(());
        }
        self.edit_aufrufe.fetch_add(1, Ordering::SeqCst);

        if self.bearbeiten_schlaegt_fehl.load(Ordering::SeqCst) {
            return Err(DirectoryError::Dienst("simulierter Ausfall".into()));
        }

        let mut verzeichnis = self
            .inner
            .get_mut(&guild)
            .ok_or_else(|| DirectoryError::GuildNichtGefunden(guild.to_string()))?;
        let eintrag = verzeichnis
            .mitglieder
            .get_mut(&mitglied)
            .ok_or_else(|| DirectoryError::MitgliedNichtGefunden(mitglied.to_string()))?;

        if let Some(rollen) = update.rollen {
            eintrag.rollen = rollen;
        }
        if let Some(nickname) = update.nickname {
            eintrag.anzeige_name = nickname;
        }
        tracing::debug!(
            guild = %guild,
            mitglied = %mitglied,
            grund = update.grund,
            "Mitglied bearbeitet"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> CallerCaps {
        CallerCaps {
            kann_rollen_bearbeiten: true,
            kann_nicknames_bearbeiten: true,
            top_rolle_rang: 100,
        }
    }

    #[tokio::test]
    async fn profil_mit_top_rang() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        dir.rolle_anlegen(guild, RollenInfo::neu(RoleId(10), 3));
        dir.rolle_anlegen(guild, RollenInfo::neu(RoleId(11), 7));
        dir.mitglied_anlegen(guild, MemberId(2), "Anna", [RoleId(10), RoleId(11)]);

        let profil = dir.profil(guild, MemberId(2)).await.unwrap();
        assert_eq!(profil.top_rolle_rang, 7);
        assert_eq!(profil.anzeige_name, "Anna");
        assert!(!profil.ist_owner);
    }

    #[tokio::test]
    async fn owner_erkannt() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        dir.mitglied_anlegen(guild, MemberId(2), "Chef", []);
        dir.owner_setzen(guild, MemberId(2));

        let profil = dir.profil(guild, MemberId(2)).await.unwrap();
        assert!(profil.ist_owner);
    }

    #[tokio::test]
    async fn bearbeiten_wendet_update_an() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        dir.mitglied_anlegen(guild, MemberId(2), "Anna", []);

        dir.mitglied_bearbeiten(
            guild,
            MemberId(2),
            MitgliedUpdate {
                rollen: Some(BTreeSet::from([RoleId(10)])),
                nickname: Some("Anna 🎮".into()),
                grund: "Test",
            },
        )
        .await
        .unwrap();

        let profil = dir.profil(guild, MemberId(2)).await.unwrap();
        assert!(profil.rollen.contains(&RoleId(10)));
        assert_eq!(profil.anzeige_name, "Anna 🎮");
        assert_eq!(dir.edit_aufrufe(), 1);
    }

    #[tokio::test]
    async fn simulierter_ausfall() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        dir.mitglied_anlegen(guild, MemberId(2), "Anna", []);
        dir.bearbeiten_fehlschlagen_lassen(true);

        let ergebnis = dir
            .mitglied_bearbeiten(
                guild,
                MemberId(2),
                MitgliedUpdate {
                    rollen: None,
                    nickname: Some("X".into()),
                    grund: "Test",
                },
            )
            .await;
        assert!(matches!(ergebnis, Err(DirectoryError::Dienst(_))));

        // Profil unveraendert
        let profil = dir.profil(guild, MemberId(2)).await.unwrap();
        assert_eq!(profil.anzeige_name, "Anna");
    }

    #[tokio::test]
    async fn leeres_update_zaehlt_nicht_als_edit() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        dir.mitglied_anlegen(guild, MemberId(2), "Anna", []);

        dir.mitglied_bearbeiten(
            guild,
            MemberId(2),
            MitgliedUpdate {
                rollen: None,
                nickname: None,
                grund: "Test",
            },
        )
        .await
        .unwrap();

        assert_eq!(dir.edit_aufrufe(), 0);
    }

    #[tokio::test]
    async fn unbekannte_rolle_ist_none() {
        let dir = InMemoryDirectory::neu();
        let guild = GuildId(1);
        dir.guild_anlegen(guild, caps());
        assert!(dir.rolle(guild, RoleId(99)).await.unwrap().is_none());
    }
}
