//! Explizite Migration aelterer Snapshot-Formate
//!
//! Historische Record-Formate der Kanal-Maps:
//! - 0: `{kanal_id: [rollen_id, ...]}` – nackte Rollen-Liste
//! - 1: `{kanal_id: {"roles": [...], "suffix": "..."}}`
//! - 2: Format 1 plus `"reverse_roles"`
//! - 3: Format 2 plus `"speaker_roles"` (aktuell)
//!
//! Der Legacy-Store hob aeltere Formate beim ersten Lesezugriff nebenbei
//! an. Hier ist die Migration ein eigener, reiner Schritt der genau
//! einmal beim Snapshot-Import laeuft; der Lesepfad kennt danach nur
//! noch Format 3.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::record::{AllesRecord, GuildRecord, KanalRecord, Snapshot, RECORD_FORMAT};

/// Migriert eine Kanal-Map beliebigen Legacy-Formats auf Format 3
pub fn kanal_map_migrieren(wert: &Value) -> StoreResult<HashMap<String, KanalRecord>> {
    let obj = wert
        .as_object()
        .ok_or_else(|| StoreError::format("Kanal-Map ist kein JSON-Objekt"))?;

    let format = obj
        .get("format")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u8;
    if format > RECORD_FORMAT {
        return Err(StoreError::format(format!(
            "Record-Format {format} ist neuer als das unterstuetzte Format {RECORD_FORMAT}"
        )));
    }

    let mut map = HashMap::with_capacity(obj.len());
    for (schluessel, eintrag) in obj {
        if schluessel == "format" {
            continue;
        }
        map.insert(schluessel.clone(), eintrag_migrieren(eintrag)?);
    }
    Ok(map)
}

/// Migriert einen einzelnen Kanal-Eintrag auf Format 3
///
/// Format 0 traegt eine nackte Rollen-Liste; ab Format 1 ist der Eintrag
/// ein Objekt, dessen in spaeteren Formaten ergaenzte Felder ueber
/// `#[serde(default)]` leer aufgefuellt werden.
fn eintrag_migrieren(wert: &Value) -> StoreResult<KanalRecord> {
    if let Some(liste) = wert.as_array() {
        let roles = liste
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(StoreError::format("Rollen-Eintrag ist weder String noch Zahl")),
            })
            .collect::<StoreResult<Vec<String>>>()?;
        return Ok(KanalRecord {
            roles,
            ..Default::default()
        });
    }

    Ok(serde_json::from_value(wert.clone())?)
}

/// Migriert den guild-weiten "alle Kanaele"-Record
///
/// Das All-Record kannte nie Format-Nummern; in alten Daten fehlen
/// lediglich spaeter ergaenzte Felder, die leer aufgefuellt werden.
pub fn alles_migrieren(wert: &Value) -> StoreResult<AllesRecord> {
    Ok(serde_json::from_value(wert.clone())?)
}

/// Migriert alle Records einer Guild
pub fn guild_migrieren(wert: &Value) -> StoreResult<GuildRecord> {
    let obj = wert
        .as_object()
        .ok_or_else(|| StoreError::format("Guild-Record ist kein JSON-Objekt"))?;

    let mut record = GuildRecord::default();
    for (art, eintrag) in obj {
        match art.as_str() {
            "permanent" => record.permanent = kanal_map_migrieren(eintrag)?,
            "voice" => record.voice = kanal_map_migrieren(eintrag)?,
            "stage" => record.stage = kanal_map_migrieren(eintrag)?,
            "category" => record.category = kanal_map_migrieren(eintrag)?,
            "all" => record.all = Some(alles_migrieren(eintrag)?),
            unbekannt => {
                return Err(StoreError::format(format!(
                    "Unbekannte Link-Art im Snapshot: {unbekannt}"
                )));
            }
        }
    }
    Ok(record)
}

/// Migriert einen vollstaendigen Roh-Snapshot auf Format 3
pub fn snapshot_migrieren(roh: &Value) -> StoreResult<Snapshot> {
    let guilds_roh = roh
        .get("guilds")
        .and_then(Value::as_object)
        .ok_or_else(|| StoreError::format("Snapshot ohne 'guilds'-Objekt"))?;

    let mut snapshot = Snapshot::neu();
    for (guild_id, guild_roh) in guilds_roh {
        let record = guild_migrieren(guild_roh)?;
        snapshot.guilds.insert(guild_id.clone(), record);
    }

    tracing::info!(
        guilds = snapshot.guilds.len(),
        format = RECORD_FORMAT,
        "Snapshot migriert"
    );
    Ok(snapshot)
}
