use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;
use crate::card::CardId;

pub type ColumnId = Uuid;

/// Stored column document.
///
/// `card_order_ids` only ever holds ids of real cards; placeholders live in
/// the client view and never reach this document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    #[serde(default)]
    pub card_order_ids: Vec<CardId>,
    #[serde(default)]
    pub destroyed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: BoardId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            card_order_ids: Vec::new(),
            destroyed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_card_order(&mut self, order: Vec<CardId>) {
        self.card_order_ids = order;
        self.updated_at = Utc::now();
    }

    pub fn push_card(&mut self, card_id: CardId) {
        self.card_order_ids.push(card_id);
        self.updated_at = Utc::now();
    }
}
