//! voicelink-directory – Vertrag zum externen Verzeichnisdienst
//!
//! Der Verzeichnisdienst verwaltet Mitglieder, Rollen und die
//! Faehigkeiten des aufrufenden Dienstkontos. Er ist extern, fallibel
//! und rate-limitiert; die Engine erreicht ihn ausschliesslich ueber
//! den `DirectoryService`-Trait. Die In-Memory-Implementierung dient
//! Tests und lokalen Harnessen.

pub mod error;
pub mod memory;
pub mod models;
pub mod service;

pub use error::{DirectoryError, DirectoryResult};
pub use memory::InMemoryDirectory;
pub use models::{CallerCaps, MitgliedProfil, MitgliedUpdate, RollenInfo};
pub use service::DirectoryService;
