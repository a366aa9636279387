//! Writes the reordering engine asks the backend to perform.
//!
//! Commits are plain values produced synchronously when a gesture ends.
//! Applying them is asynchronous and best-effort: nothing here retries or
//! rolls back the optimistic client state.

use async_trait::async_trait;
use serde::Serialize;
use taskboard_core::BoardResult;

use crate::aggregate::BoardSnapshot;
use crate::board::BoardId;
use crate::card::{Card, CardId};
use crate::column::{Column, ColumnId};

/// A column's card order as the backend stores it.
///
/// Only constructible from real cards, so a placeholder id cannot end up
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CardOrder(Vec<CardId>);

impl CardOrder {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        Self(cards.into_iter().map(|card| card.id).collect())
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<CardId> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OrderCommit {
    ColumnCardOrder {
        column_id: ColumnId,
        order: CardOrder,
    },
    CardOwner {
        card_id: CardId,
        column_id: ColumnId,
    },
    BoardColumnOrder {
        board_id: BoardId,
        order: Vec<ColumnId>,
    },
}

impl OrderCommit {
    pub fn description(&self) -> String {
        match self {
            OrderCommit::ColumnCardOrder { column_id, order } => {
                format!("Update card order of column {} ({} cards)", column_id, order.len())
            }
            OrderCommit::CardOwner { card_id, column_id } => {
                format!("Move card {} to column {}", card_id, column_id)
            }
            OrderCommit::BoardColumnOrder { board_id, order } => {
                format!("Update column order of board {} ({} columns)", board_id, order.len())
            }
        }
    }

    pub async fn apply(&self, backend: &dyn OrderBackend) -> BoardResult<()> {
        match self {
            OrderCommit::ColumnCardOrder { column_id, order } => {
                backend.update_column_order(*column_id, order.clone()).await
            }
            OrderCommit::CardOwner { card_id, column_id } => {
                backend.update_card_owner(*card_id, *column_id).await
            }
            OrderCommit::BoardColumnOrder { board_id, order } => {
                backend
                    .update_board_column_order(*board_id, order.clone())
                    .await
            }
        }
    }
}

/// Apply commits in order, stopping at the first failure.
///
/// Writes already made before the failure stay made.
pub async fn apply_commits(backend: &dyn OrderBackend, commits: &[OrderCommit]) -> BoardResult<()> {
    for commit in commits {
        tracing::debug!("Committing: {}", commit.description());
        if let Err(e) = commit.apply(backend).await {
            tracing::error!("Commit failed ({}): {}", commit.description(), e);
            return Err(e);
        }
    }
    Ok(())
}

/// Persistence operations the reordering engine consumes.
///
/// Each call is an independent write; none of them spans more than one
/// document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Board, its columns and their cards, unsorted.
    async fn fetch_board(&self, board_id: BoardId) -> BoardResult<BoardSnapshot>;

    /// Replace a column's card order. An empty order is valid.
    async fn update_column_order(&self, column_id: ColumnId, order: CardOrder) -> BoardResult<()>;

    async fn update_card_owner(&self, card_id: CardId, column_id: ColumnId) -> BoardResult<()>;

    async fn update_board_column_order(
        &self,
        board_id: BoardId,
        order: Vec<ColumnId>,
    ) -> BoardResult<()>;

    /// Create a column at the end of the board's column order.
    async fn create_column(&self, board_id: BoardId, title: String) -> BoardResult<Column>;

    /// Create a card at the end of the column's card order.
    async fn create_card(&self, column_id: ColumnId, title: String) -> BoardResult<Card>;

    async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()>;
}
