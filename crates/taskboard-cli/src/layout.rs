//! Fixed-grid measurement of a board, standing in for the rectangles a
//! renderer would report.
//!
//! Columns sit left to right; cards stack from the top of their column.
//! A column's placeholder gets no region of its own, so an empty column is
//! reached through the column region.

use serde::Deserialize;
use taskboard_core::{Point, Rect};
use taskboard_domain::{BoardAggregate, DroppableRegion, EntityRef};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub column_width: f64,
    pub column_gap: f64,
    pub column_height: f64,
    pub header_height: f64,
    pub card_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            column_width: 200.0,
            column_gap: 20.0,
            column_height: 600.0,
            header_height: 40.0,
            card_height: 50.0,
        }
    }
}

impl GridLayout {
    pub fn measure(&self, board: &BoardAggregate) -> Vec<DroppableRegion> {
        let mut regions = Vec::new();
        for (c, column) in board.columns().iter().enumerate() {
            let x = c as f64 * (self.column_width + self.column_gap);
            regions.push(DroppableRegion::new(
                EntityRef::Column(column.id),
                Rect::new(x, 0.0, self.column_width, self.column_height),
            ));
            for (i, card) in column.cards().enumerate() {
                regions.push(DroppableRegion::new(
                    EntityRef::Card(card.id),
                    Rect::new(
                        x,
                        self.header_height + i as f64 * self.card_height,
                        self.column_width,
                        self.card_height,
                    ),
                ));
            }
        }
        regions
    }

    /// Centre of `entity` on this grid, handy for writing scripts by hand.
    pub fn center_of(&self, board: &BoardAggregate, entity: EntityRef) -> Option<Point> {
        self.measure(board)
            .into_iter()
            .find(|region| region.target == entity)
            .map(|region| region.rect.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::{Board, BoardSnapshot, Card, Column};

    #[test]
    fn test_measure_skips_placeholders() {
        let mut board = Board::new("Board".to_string(), None);
        let mut todo = Column::new(board.id, "Todo".to_string());
        let done = Column::new(board.id, "Done".to_string());
        let card = Card::new(board.id, todo.id, "Card".to_string());
        todo.push_card(card.id);
        board.push_column(todo.id);
        board.push_column(done.id);
        let aggregate = BoardAggregate::from_snapshot(BoardSnapshot {
            board,
            columns: vec![todo.clone(), done.clone()],
            cards: vec![card.clone()],
        });

        let layout = GridLayout::default();
        let regions = layout.measure(&aggregate);
        assert_eq!(regions.len(), 3);
        assert_eq!(
            layout.center_of(&aggregate, EntityRef::Card(card.id)),
            Some(Point::new(100.0, 65.0))
        );
        assert_eq!(
            layout.center_of(&aggregate, EntityRef::Column(done.id)),
            Some(Point::new(320.0, 300.0))
        );
    }
}
