//! Mutations-Planer
//!
//! Berechnet aus Profil-Momentaufnahme, Rollen-Diff und Ziel-Namen die
//! konkrete Mutation gegen den Verzeichnisdienst. Die Faehigkeiten des
//! Aufrufers (Rollen- und Nickname-Bearbeitung sind unabhaengig
//! gewaehrbar) bilden eine Entscheidungsmatrix; die Rollen-Hierarchie
//! begrenzt Namensaenderungen zusaetzlich.
//!
//! Teilfehler-Semantik: eine unbekannte Rollen-ID faellt stillschweigend
//! weg, eine bekannte aber nicht zuweisbare Rolle landet in
//! `fehlgeschlagen` – der Rest des Plans laeuft weiter.

use std::collections::{BTreeMap, BTreeSet};

use voicelink_core::types::RoleId;
use voicelink_directory::{CallerCaps, MitgliedProfil, MitgliedUpdate, RollenInfo};

use crate::resolver::RollenDiff;

/// Ergebnis der Mutationsplanung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationsPlan {
    /// Berechnete Ziel-Rollenmenge (nur ueber zuweisbare Rollen)
    pub ziel_rollen: BTreeSet<RoleId>,
    /// Berechneter Ziel-Anzeigename
    pub ziel_name: String,
    /// Auszufuehrende Mutation; None wenn nichts zu tun ist oder die
    /// Faehigkeiten des Aufrufers nichts zulassen
    pub update: Option<MitgliedUpdate>,
    /// Aufloesbare, aber nicht zuweisbare Rollen (nur Beobachtbarkeit)
    pub fehlgeschlagen: BTreeSet<RoleId>,
    /// Ziel-Rollen weichen vom aktuellen Profil ab
    pub rollen_geaendert: bool,
    /// Ziel-Name weicht vom aktuellen Profil ab
    pub name_geaendert: bool,
}

/// Plant die Mutation fuer einen Uebergang
///
/// `rollen` enthaelt die aufgeloesten Stammdaten aller im Diff
/// vorkommenden Rollen-IDs; `None` bedeutet: Rolle existiert nicht
/// (mehr) und wird kommentarlos uebergangen.
pub fn planen(
    profil: &MitgliedProfil,
    diff: &RollenDiff,
    ziel_name: String,
    rollen: &BTreeMap<RoleId, Option<RollenInfo>>,
    caps: CallerCaps,
    grund: &'static str,
) -> MutationsPlan {
    let mut ziel_rollen = profil.rollen.clone();
    let mut fehlgeschlagen = BTreeSet::new();

    for rolle in &diff.hinzufuegen {
        match rollen.get(rolle).copied().flatten() {
            None => continue,
            Some(info) if !info.zuweisbar(caps.top_rolle_rang) => {
                fehlgeschlagen.insert(*rolle);
            }
            Some(_) => {
                ziel_rollen.insert(*rolle);
            }
        }
    }
    for rolle in &diff.entfernen {
        match rollen.get(rolle).copied().flatten() {
            None => continue,
            Some(info) if !info.zuweisbar(caps.top_rolle_rang) => {
                fehlgeschlagen.insert(*rolle);
            }
            Some(_) => {
                ziel_rollen.remove(rolle);
            }
        }
    }

    let rollen_geaendert = ziel_rollen != profil.rollen;
    let name_geaendert = ziel_name != profil.anzeige_name;
    let name_erlaubt = name_geaendert && caps.darf_name_aendern(profil);

    // Entscheidungsmatrix ueber die beiden unabhaengigen Faehigkeiten
    let update = match (caps.kann_rollen_bearbeiten, caps.kann_nicknames_bearbeiten) {
        (true, true) => {
            if rollen_geaendert && name_erlaubt {
                Some(MitgliedUpdate {
                    rollen: Some(ziel_rollen.clone()),
                    nickname: Some(ziel_name.clone()),
                    grund,
                })
            } else if name_erlaubt {
                Some(MitgliedUpdate {
                    rollen: None,
                    nickname: Some(ziel_name.clone()),
                    grund,
                })
            } else if rollen_geaendert {
                Some(MitgliedUpdate {
                    rollen: Some(ziel_rollen.clone()),
                    nickname: None,
                    grund,
                })
            } else {
                None
            }
        }
        (true, false) => rollen_geaendert.then(|| MitgliedUpdate {
            rollen: Some(ziel_rollen.clone()),
            nickname: None,
            grund,
        }),
        (false, true) => name_erlaubt.then(|| MitgliedUpdate {
            rollen: None,
            nickname: Some(ziel_name.clone()),
            grund,
        }),
        (false, false) => None,
    };

    if !fehlgeschlagen.is_empty() {
        tracing::debug!(
            anzahl = fehlgeschlagen.len(),
            "Nicht zuweisbare Rollen aus dem Plan entfernt"
        );
    }

    MutationsPlan {
        ziel_rollen,
        ziel_name,
        update,
        fehlgeschlagen,
        rollen_geaendert,
        name_geaendert,
    }
}
