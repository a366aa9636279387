use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::BoardResult;
use taskboard_domain::{Board, BoardId, Card, Column};
use uuid::Uuid;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Metadata for persistence operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(instance_id: Uuid) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Every stored document, as flat lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documents {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Documents {
    pub fn board(&self, board_id: BoardId) -> Option<&Board> {
        self.boards
            .iter()
            .find(|board| board.id == board_id && !board.destroyed)
    }
}

/// Trait for abstract storage operations
/// Implementations handle different backend storage (file, database, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Replace everything in the store with `documents`
    async fn save(&self, documents: &Documents) -> BoardResult<PersistenceMetadata>;

    /// Load the current documents from the store
    async fn load(&self) -> BoardResult<(Documents, PersistenceMetadata)>;

    /// Check if the store has been written yet
    async fn exists(&self) -> bool;
}
