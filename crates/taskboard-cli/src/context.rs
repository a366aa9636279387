use std::path::Path;
use std::sync::Arc;
use taskboard_core::{AppConfig, BoardResult};
use taskboard_domain::{BoardAggregate, BoardId, OrderBackend};
use taskboard_persistence::{BoardStore, JsonFileStore};

pub struct CliContext {
    pub config: AppConfig,
    store: Arc<BoardStore<JsonFileStore>>,
}

impl CliContext {
    pub async fn load(file_path: &Path, config: AppConfig) -> BoardResult<Self> {
        let store = BoardStore::open(JsonFileStore::new(file_path)).await?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn store(&self) -> &BoardStore<JsonFileStore> {
        &self.store
    }

    /// Shared handle for work that outlives the current handler call.
    pub fn backend(&self) -> Arc<dyn OrderBackend> {
        self.store.clone()
    }

    /// Fetch a board and arrange it in display order.
    pub async fn load_board(&self, board_id: BoardId) -> BoardResult<BoardAggregate> {
        let snapshot = self.store.fetch_board(board_id).await?;
        Ok(BoardAggregate::from_snapshot(snapshot))
    }
}
