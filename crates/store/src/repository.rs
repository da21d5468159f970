//! Repository-Trait fuer den Link-Store
//!
//! Das Repository-Pattern entkoppelt die Engine von der konkreten
//! Store-Implementierung. Die Engine liest Links nur; die CRUD-Methoden
//! werden von der externen Konfigurationsschicht benutzt.

use voicelink_core::types::{CategoryId, ChannelId, GuildId};

use crate::error::StoreResult;
use crate::models::{Link, LinkKind, LinkScope};

/// Zugriffs-Vertrag zum Link-Store
#[allow(async_fn_in_trait)]
pub trait LinkRepository: Send + Sync {
    /// Alle Links die auf den gegebenen Kanal anwendbar sein koennten:
    /// kanal-gebundene Links (Permanent/Voice/Stage), der Kategorie-Link
    /// der Eltern-Kategorie sowie der guild-weite All-Link.
    ///
    /// Die Ausnahmeliste eines Links wird hier NICHT ausgewertet; das
    /// uebernimmt der Aggregator. Kein Treffer ist ein leeres, gueltiges
    /// Ergebnis.
    async fn links_fuer_kanal(
        &self,
        guild: GuildId,
        kanal: ChannelId,
        kategorie: Option<CategoryId>,
    ) -> StoreResult<Vec<Link>>;

    /// Der Stage-Link eines Stage-Kanals (fuer Sprecherwechsel)
    async fn stage_link(&self, guild: GuildId, kanal: ChannelId) -> StoreResult<Option<Link>>;

    /// Legt einen Link an oder ueberschreibt ihn (Schluessel: Art + Scope)
    async fn speichern(&self, guild: GuildId, link: Link) -> StoreResult<()>;

    /// Loescht einen Link; gibt true zurueck wenn er existierte
    async fn loeschen(&self, guild: GuildId, kind: LinkKind, scope: LinkScope)
        -> StoreResult<bool>;

    /// Alle Links einer Guild (Konfigurations-/Anzeige-Pfad)
    async fn alle_fuer_guild(&self, guild: GuildId) -> StoreResult<Vec<Link>>;
}
