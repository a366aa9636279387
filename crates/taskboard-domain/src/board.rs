use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::ColumnId;

pub type BoardId = Uuid;

/// Stored board document.
///
/// `column_order_ids` is the authoritative display order of the board's
/// columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub column_order_ids: Vec<ColumnId>,
    #[serde(default)]
    pub destroyed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            column_order_ids: Vec::new(),
            destroyed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_column_order(&mut self, order: Vec<ColumnId>) {
        self.column_order_ids = order;
        self.updated_at = Utc::now();
    }

    pub fn push_column(&mut self, column_id: ColumnId) {
        self.column_order_ids.push(column_id);
        self.updated_at = Utc::now();
    }

    pub fn remove_column(&mut self, column_id: ColumnId) {
        self.column_order_ids.retain(|id| *id != column_id);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_remove_column() {
        let mut board = Board::new("Test".to_string(), None);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        board.push_column(a);
        board.push_column(b);
        assert_eq!(board.column_order_ids, vec![a, b]);

        board.remove_column(a);
        assert_eq!(board.column_order_ids, vec![b]);
    }

    #[test]
    fn test_set_column_order_bumps_timestamp() {
        let mut board = Board::new("Test".to_string(), None);
        let before = board.updated_at;
        board.set_column_order(vec![Uuid::new_v4()]);
        assert!(board.updated_at >= before);
        assert_eq!(board.column_order_ids.len(), 1);
    }
}
