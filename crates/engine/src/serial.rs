//! Serialisierung pro Mitglied
//!
//! Uebergaenge desselben Mitglieds in derselben Guild duerfen sich
//! nicht ueberlappen: zwischen Profil-Momentaufnahme und Mutation darf
//! kein zweiter Uebergang dazwischenfunken. Verschiedene Mitglieder
//! laufen uneingeschraenkt parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use voicelink_core::types::{GuildId, MemberId};

/// Schleusen-Registry, eine Schleuse pro (Guild, Mitglied)
#[derive(Debug, Default)]
pub struct MitgliedSchleusen {
    schleusen: DashMap<(GuildId, MemberId), Arc<Mutex<()>>>,
}

impl MitgliedSchleusen {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Wartet auf exklusiven Zugriff fuer das Mitglied
    ///
    /// Der Guard haelt die Schleuse bis zum Drop; Folge-Uebergaenge
    /// desselben Mitglieds warten hier in FIFO-Reihenfolge.
    pub async fn sperren(&self, guild: GuildId, mitglied: MemberId) -> OwnedMutexGuard<()> {
        // Die DashMap-Referenz muss vor dem await fallen
        let schleuse = {
            self.schleusen
                .entry((guild, mitglied))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        schleuse.lock_owned().await
    }

    /// Raeumt Schleusen auf die niemand mehr haelt oder erwartet
    pub fn aufraeumen(&self) {
        self.schleusen
            .retain(|_, schleuse| Arc::strong_count(schleuse) > 1);
    }

    pub fn anzahl(&self) -> usize {
        self.schleusen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test]
    async fn gleiche_schleuse_serialisiert() {
        let schleusen = Arc::new(MitgliedSchleusen::neu());
        let zaehler = Arc::new(AtomicU64::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let schleusen = schleusen.clone();
            let zaehler = zaehler.clone();
            tasks.push(tokio::spawn(async move {
                let _guard = schleusen.sperren(GuildId(1), MemberId(1)).await;
                // Im kritischen Abschnitt darf der Zaehler nie ueber 1 steigen
                let aktiv = zaehler.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(aktiv, 1);
                tokio::task::yield_now().await;
                zaehler.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn verschiedene_mitglieder_blockieren_sich_nicht() {
        let schleusen = MitgliedSchleusen::neu();
        let a = schleusen.sperren(GuildId(1), MemberId(1)).await;
        // Darf nicht haengen obwohl a noch gehalten wird
        let b = schleusen.sperren(GuildId(1), MemberId(2)).await;
        let c = schleusen.sperren(GuildId(2), MemberId(1)).await;
        drop((a, b, c));
    }

    #[tokio::test]
    async fn aufraeumen_entfernt_freie_schleusen() {
        let schleusen = MitgliedSchleusen::neu();
        {
            let _guard = schleusen.sperren(GuildId(1), MemberId(1)).await;
            schleusen.aufraeumen();
            // Gehaltene Schleuse ueberlebt
            assert_eq!(schleusen.anzahl(), 1);
        }
        schleusen.aufraeumen();
        assert_eq!(schleusen.anzahl(), 0);
    }
}
