use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{board::BoardId, column::ColumnId};

pub type CardId = Uuid;

const PLACEHOLDER_NAME: &[u8] = b"placeholder-card";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub destroyed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(board_id: BoardId, column_id: ColumnId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            column_id,
            title,
            description: None,
            labels: Vec::new(),
            due_date: None,
            destroyed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn move_to_column(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
        self.updated_at = Utc::now();
    }
}

/// Synthetic stand-in that keeps an empty column droppable.
///
/// Its id is derived from the owning column, so two placeholders for the same
/// column are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderCard {
    pub id: CardId,
    pub column_id: ColumnId,
}

impl PlaceholderCard {
    pub fn for_column(column_id: ColumnId) -> Self {
        Self {
            id: Uuid::new_v5(&column_id, PLACEHOLDER_NAME),
            column_id,
        }
    }
}

/// One entry of a column's card list in the client view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardSlot {
    Real(Card),
    Placeholder(PlaceholderCard),
}

impl CardSlot {
    pub fn id(&self) -> CardId {
        match self {
            CardSlot::Real(card) => card.id,
            CardSlot::Placeholder(placeholder) => placeholder.id,
        }
    }

    pub fn column_id(&self) -> ColumnId {
        match self {
            CardSlot::Real(card) => card.column_id,
            CardSlot::Placeholder(placeholder) => placeholder.column_id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CardSlot::Placeholder(_))
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            CardSlot::Real(card) => Some(card),
            CardSlot::Placeholder(_) => None,
        }
    }
}
