//! Board documents held in memory and written through to a
//! [`PersistenceStore`] after every change.
//!
//! A write is applied to a copy of the documents first; the copy replaces
//! the in-memory state only once it has been saved, so a failed save leaves
//! nothing half-applied.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{
    Board, BoardId, BoardSnapshot, Card, CardId, CardOrder, Column, ColumnId, OrderBackend,
};
use tokio::sync::Mutex;

use crate::traits::{Documents, PersistenceStore};

pub struct BoardStore<S> {
    store: S,
    documents: Mutex<Documents>,
}

fn live_column(documents: &Documents, column_id: ColumnId) -> BoardResult<&Column> {
    documents
        .columns
        .iter()
        .find(|column| column.id == column_id && !column.destroyed)
        .ok_or_else(|| BoardError::not_found("column", column_id))
}

fn live_column_mut(documents: &mut Documents, column_id: ColumnId) -> BoardResult<&mut Column> {
    documents
        .columns
        .iter_mut()
        .find(|column| column.id == column_id && !column.destroyed)
        .ok_or_else(|| BoardError::not_found("column", column_id))
}

fn live_board_mut(documents: &mut Documents, board_id: BoardId) -> BoardResult<&mut Board> {
    documents
        .boards
        .iter_mut()
        .find(|board| board.id == board_id && !board.destroyed)
        .ok_or_else(|| BoardError::not_found("board", board_id))
}

fn reject_duplicates(ids: &[uuid::Uuid], what: &str) -> BoardResult<()> {
    let mut seen = HashSet::new();
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(duplicate) => Err(BoardError::Validation(format!(
            "{} {} listed more than once",
            what, duplicate
        ))),
        None => Ok(()),
    }
}

impl<S: PersistenceStore> BoardStore<S> {
    /// Open the store, loading existing documents if it has been written
    /// before.
    pub async fn open(store: S) -> BoardResult<Self> {
        let documents = if store.exists().await {
            store.load().await?.0
        } else {
            tracing::debug!("No existing data, starting empty");
            Documents::default()
        };
        Ok(Self {
            store,
            documents: Mutex::new(documents),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_boards(&self) -> Vec<Board> {
        let documents = self.documents.lock().await;
        documents
            .boards
            .iter()
            .filter(|board| !board.destroyed)
            .cloned()
            .collect()
    }

    pub async fn create_board(
        &self,
        title: String,
        description: Option<String>,
    ) -> BoardResult<Board> {
        if title.trim().is_empty() {
            return Err(BoardError::Validation("board title is empty".to_string()));
        }
        let board = Board::new(title, description);
        let created = board.clone();
        self.write(move |documents| {
            documents.boards.push(board);
            Ok(())
        })
        .await?;
        tracing::info!("Created board {}", created.id);
        Ok(created)
    }

    async fn write<T, F>(&self, change: F) -> BoardResult<T>
    where
        F: FnOnce(&mut Documents) -> BoardResult<T> + Send,
        T: Send,
    {
        let mut documents = self.documents.lock().await;
        let mut next = documents.clone();
        let value = change(&mut next)?;
        self.store.save(&next).await?;
        *documents = next;
        Ok(value)
    }
}

#[async_trait]
impl<S: PersistenceStore> OrderBackend for BoardStore<S> {
    async fn fetch_board(&self, board_id: BoardId) -> BoardResult<BoardSnapshot> {
        let documents = self.documents.lock().await;
        let board = documents
            .board(board_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("board", board_id))?;
        let columns = documents
            .columns
            .iter()
            .filter(|column| column.board_id == board_id)
            .cloned()
            .collect();
        let cards = documents
            .cards
            .iter()
            .filter(|card| card.board_id == board_id)
            .cloned()
            .collect();
        Ok(BoardSnapshot {
            board,
            columns,
            cards,
        })
    }

    async fn update_column_order(&self, column_id: ColumnId, order: CardOrder) -> BoardResult<()> {
        let order = order.into_vec();
        let count = order.len();
        self.write(move |documents| {
            let board_id = live_column(documents, column_id)?.board_id;
            reject_duplicates(&order, "card")?;
            for card_id in &order {
                let known = documents.cards.iter().any(|card| {
                    card.id == *card_id && card.board_id == board_id && !card.destroyed
                });
                if !known {
                    return Err(BoardError::Validation(format!(
                        "card {} is not a card of board {}",
                        card_id, board_id
                    )));
                }
            }
            live_column_mut(documents, column_id)?.set_card_order(order);
            Ok(())
        })
        .await?;
        tracing::info!("Stored order of column {} ({} cards)", column_id, count);
        Ok(())
    }

    async fn update_card_owner(&self, card_id: CardId, column_id: ColumnId) -> BoardResult<()> {
        self.write(move |documents| {
            let board_id = live_column(documents, column_id)?.board_id;
            let card = documents
                .cards
                .iter_mut()
                .find(|card| card.id == card_id && !card.destroyed)
                .ok_or_else(|| BoardError::not_found("card", card_id))?;
            if card.board_id != board_id {
                return Err(BoardError::Validation(format!(
                    "card {} and column {} are on different boards",
                    card_id, column_id
                )));
            }
            card.move_to_column(column_id);
            Ok(())
        })
        .await?;
        tracing::info!("Moved card {} to column {}", card_id, column_id);
        Ok(())
    }

    async fn update_board_column_order(
        &self,
        board_id: BoardId,
        order: Vec<ColumnId>,
    ) -> BoardResult<()> {
        self.write(move |documents| {
            reject_duplicates(&order, "column")?;
            for column_id in &order {
                if live_column(documents, *column_id)?.board_id != board_id {
                    return Err(BoardError::Validation(format!(
                        "column {} is not on board {}",
                        column_id, board_id
                    )));
                }
            }
            live_board_mut(documents, board_id)?.set_column_order(order);
            Ok(())
        })
        .await?;
        tracing::info!("Stored column order of board {}", board_id);
        Ok(())
    }

    async fn create_column(&self, board_id: BoardId, title: String) -> BoardResult<Column> {
        if title.trim().is_empty() {
            return Err(BoardError::Validation("column title is empty".to_string()));
        }
        let column = self
            .write(move |documents| {
                let column = Column::new(board_id, title);
                live_board_mut(documents, board_id)?.push_column(column.id);
                documents.columns.push(column.clone());
                Ok(column)
            })
            .await?;
        tracing::info!("Created column {} on board {}", column.id, board_id);
        Ok(column)
    }

    async fn create_card(&self, column_id: ColumnId, title: String) -> BoardResult<Card> {
        if title.trim().is_empty() {
            return Err(BoardError::Validation("card title is empty".to_string()));
        }
        let card = self
            .write(move |documents| {
                let column = live_column_mut(documents, column_id)?;
                let card = Card::new(column.board_id, column.id, title);
                column.push_card(card.id);
                documents.cards.push(card.clone());
                Ok(card)
            })
            .await?;
        tracing::info!("Created card {} in column {}", card.id, column_id);
        Ok(card)
    }

    async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()> {
        self.write(move |documents| {
            let now = Utc::now();
            let column = live_column_mut(documents, column_id)?;
            column.destroyed = true;
            column.updated_at = now;
            let board_id = column.board_id;

            for card in documents
                .cards
                .iter_mut()
                .filter(|card| card.column_id == column_id && !card.destroyed)
            {
                card.destroyed = true;
                card.updated_at = now;
            }
            live_board_mut(documents, board_id)?.remove_column(column_id);
            Ok(())
        })
        .await?;
        tracing::info!("Deleted column {}", column_id);
        Ok(())
    }
}
