//! voicelink-store – Link-Regeln und ihr Store
//!
//! Enthaelt das Link-Datenmodell, den `LinkRepository`-Trait als Vertrag
//! zum (extern verwalteten) Regel-Store sowie eine In-Memory-Implementierung
//! mit versioniertem JSON-Snapshot-Format. Aeltere Snapshot-Formate werden
//! beim Import einmalig und explizit migriert, nie lesend nebenbei.

pub mod error;
pub mod memory;
pub mod migration;
pub mod models;
pub mod record;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLinkStore;
pub use models::{Link, LinkKind, LinkScope};
pub use repository::LinkRepository;
