//! voicelink-engine – Die Konvergenz-Engine
//!
//! Reagiert auf Voice-Presence-Uebergaenge eines Mitglieds und
//! konvergiert dessen Rollen-Menge und Anzeigenamen gegen die
//! konfigurierten Link-Regeln. Die Verarbeitung eines Ereignisses ist
//! bis auf den finalen Mutationsschritt reine, seiteneffektfreie
//! Berechnung:
//!
//! Dispatcher -> Aggregator -> Resolver + Suffix -> Planer -> Verzeichnisdienst
//!
//! Der Sprecherwechsel in Stage-Kanaelen laeuft unabhaengig davon.

pub mod aggregator;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod planner;
pub mod resolver;
pub mod serial;
pub mod speaker;
pub mod suffix;

pub use aggregator::LinkAggregator;
pub use config::EngineConfig;
pub use dispatcher::{RollenZaehler, TransitionDispatcher, TransitionErgebnis};
pub use error::{EngineError, EngineResult};
pub use planner::{planen, MutationsPlan};
pub use resolver::{RollenDiff, RollenKandidaten};
pub use serial::MitgliedSchleusen;
pub use speaker::SpeakerHandler;
pub use suffix::SuffixKonstruktor;
