//! Rollen-Diff-Resolver
//!
//! Sammelt die Rollen-Beitraege aller anwendbaren Links als Multisets
//! und kollabiert sie zu einem endgueltigen Diff. Eine Rolle die sowohl
//! im Hinzufuegen- als auch im Entfernen-Kandidaten landet hebt sich
//! vollstaendig auf: "keine effektive Aenderung" statt eines von der
//! Anwendungsreihenfolge abhaengigen Ergebnisses.

use std::collections::BTreeSet;

use voicelink_core::event::Richtung;
use voicelink_core::types::RoleId;
use voicelink_store::Link;

/// Endgueltiger Rollen-Diff eines Uebergangs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollenDiff {
    pub hinzufuegen: BTreeSet<RoleId>,
    pub entfernen: BTreeSet<RoleId>,
}

impl RollenDiff {
    pub fn ist_leer(&self) -> bool {
        self.hinzufuegen.is_empty() && self.entfernen.is_empty()
    }
}

/// Kandidaten-Multisets vor Dedup und Aufhebung
///
/// Ein Wechsel speist BEIDE Seiten (Verlassen-Seite der Quelle,
/// Betreten-Seite des Ziels) in dieselben Kandidaten ein, bevor
/// `abschliessen` laeuft. So hebt sich eine Rolle, die die eine Seite
/// entziehen und die andere vergeben wuerde, exakt auf und flackert
/// nicht sichtbar.
#[derive(Debug, Clone, Default)]
pub struct RollenKandidaten {
    hinzufuegen: Vec<RoleId>,
    entfernen: Vec<RoleId>,
}

impl RollenKandidaten {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Bringt die Beitraege eines Links fuer die gegebene Richtung ein
    ///
    /// Betreten: Grant-Rollen -> hinzufuegen, Reverse-Rollen -> entfernen.
    /// Verlassen: symmetrisch invertiert.
    pub fn link_einbringen(&mut self, link: &Link, richtung: Richtung) {
        match richtung {
            Richtung::Betreten => {
                self.hinzufuegen.extend(link.grant_rollen.iter().copied());
                self.entfernen.extend(link.reverse_rollen.iter().copied());
            }
            Richtung::Verlassen => {
                self.hinzufuegen.extend(link.reverse_rollen.iter().copied());
                self.entfernen.extend(link.grant_rollen.iter().copied());
            }
        }
    }

    /// Kollabiert die Multisets: Dedup, dann Aufhebung beidseitiger Rollen
    pub fn abschliessen(self) -> RollenDiff {
        let hinzufuegen: BTreeSet<RoleId> = self.hinzufuegen.into_iter().collect();
        let entfernen: BTreeSet<RoleId> = self.entfernen.into_iter().collect();

        let beidseitig: BTreeSet<RoleId> =
            hinzufuegen.intersection(&entfernen).copied().collect();

        RollenDiff {
            hinzufuegen: hinzufuegen.difference(&beidseitig).copied().collect(),
            entfernen: entfernen.difference(&beidseitig).copied().collect(),
        }
    }
}

/// Loest eine Link-Liste einer einzelnen Richtung auf
pub fn aufloesen(links: &[Link], richtung: Richtung) -> RollenDiff {
    let mut kandidaten = RollenKandidaten::neu();
    for link in links {
        kandidaten.link_einbringen(link, richtung);
    }
    kandidaten.abschliessen()
}
