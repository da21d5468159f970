//! voicelink-core – Gemeinsame Typen, Events und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Voicelink-Crates gemeinsam genutzt werden.

pub mod error;
pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, VoicelinkError};
pub use event::{KanalArt, Richtung, TransitionEvent, Uebergang, VoiceKanal, VoiceZustand};
pub use types::{CategoryId, ChannelId, GuildId, MemberId, RoleId};
