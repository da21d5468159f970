//! Trait-Definition des Verzeichnisdienstes
//!
//! Die konkrete Implementierung (Gateway-Anbindung) lebt ausserhalb
//! dieses Workspaces; fuer Tests und lokale Harnesse gibt es
//! `InMemoryDirectory`.

use voicelink_core::types::{GuildId, MemberId, RoleId};

use crate::error::DirectoryResult;
use crate::models::{CallerCaps, MitgliedProfil, MitgliedUpdate, RollenInfo};

/// Zugriffs-Vertrag zum Verzeichnisdienst
#[allow(async_fn_in_trait)]
pub trait DirectoryService: Send + Sync {
    /// Laedt die aktuelle Profil-Momentaufnahme eines Mitglieds
    async fn profil(&self, guild: GuildId, mitglied: MemberId) -> DirectoryResult<MitgliedProfil>;

    /// Loest eine Rollen-ID auf; `None` wenn die Rolle nicht (mehr) existiert
    async fn rolle(&self, guild: GuildId, rolle: RoleId) -> DirectoryResult<Option<RollenInfo>>;

    /// Faehigkeiten des aufrufenden Dienstkontos in der Guild
    async fn faehigkeiten(&self, guild: GuildId) -> DirectoryResult<CallerCaps>;

    /// Fuehrt eine Profil-Mutation aus (Rollen und/oder Nickname)
    ///
    /// Genau ein Versuch; Fehler werden vom Aufrufer geloggt und
    /// verschluckt, nie wiederholt.
    async fn mitglied_bearbeiten(
        &self,
        guild: GuildId,
        mitglied: MemberId,
        update: MitgliedUpdate,
    ) -> DirectoryResult<()>;
}
