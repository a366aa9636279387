//! Moving a card from one column to another.
//!
//! Pure over the board: the caller gets back updated copies of the two
//! columns and decides when to swap them in. Both columns are rebuilt from
//! their real cards on every pass, so repeating a pass or moving the last
//! card out and straight back cannot leave a stale placeholder behind.

use taskboard_core::{Point, Rect};

use crate::aggregate::{BoardAggregate, ColumnView};
use crate::card::CardId;
use crate::column::ColumnId;

/// Insertion point in the destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before(CardId),
    After(CardId),
    End,
}

impl Placement {
    /// `After` once the pointer passes the vertical midpoint of the card
    /// it is over.
    pub fn relative_to(over_card: CardId, over_rect: &Rect, pointer: Point) -> Self {
        if pointer.y > over_rect.center().y {
            Placement::After(over_card)
        } else {
            Placement::Before(over_card)
        }
    }

    fn anchor(&self) -> Option<CardId> {
        match self {
            Placement::Before(id) | Placement::After(id) => Some(*id),
            Placement::End => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossColumnMove {
    pub card_id: CardId,
    /// Column currently holding the card.
    pub from_column: ColumnId,
    pub to_column: ColumnId,
    pub placement: Placement,
}

/// Updated copies of the columns touched by a move.
///
/// `source` is `None` when the card was repositioned inside one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub source: Option<ColumnView>,
    pub destination: ColumnView,
}

impl Reconciled {
    /// Replace the touched columns in the board.
    pub fn apply_to(self, board: &mut BoardAggregate) {
        if let Some(source) = self.source {
            let _ = board.replace_column(source);
        }
        let _ = board.replace_column(self.destination);
    }
}

/// Compute the columns resulting from `mv`, or `None` when the move does
/// not apply to this board (unknown columns, card not in `from_column`, or
/// the card anchored on itself).
pub fn reconcile(board: &BoardAggregate, mv: &CrossColumnMove) -> Option<Reconciled> {
    let source = board.column(mv.from_column)?;
    let destination = board.column(mv.to_column)?;
    let mut card = source.card(mv.card_id)?.clone();

    if mv.placement.anchor() == Some(mv.card_id) {
        return None;
    }

    let mut source_cards = source.real_cards();
    source_cards.retain(|c| c.id != mv.card_id);

    let mut destination_cards = if mv.from_column == mv.to_column {
        source_cards.clone()
    } else {
        let mut cards = destination.real_cards();
        cards.retain(|c| c.id != mv.card_id);
        cards
    };

    let index = match mv.placement {
        Placement::End => destination_cards.len(),
        Placement::Before(anchor) | Placement::After(anchor) => {
            match destination_cards.iter().position(|c| c.id == anchor) {
                Some(i) if matches!(mv.placement, Placement::After(_)) => i + 1,
                Some(i) => i,
                None => destination_cards.len(),
            }
        }
    };

    card.column_id = mv.to_column;
    destination_cards.insert(index, card);

    let mut next_destination = destination.clone();
    next_destination.set_cards(destination_cards);

    let next_source = if mv.from_column == mv.to_column {
        None
    } else {
        let mut next_source = source.clone();
        next_source.set_cards(source_cards);
        Some(next_source)
    };

    tracing::debug!(
        card = %mv.card_id,
        from = %mv.from_column,
        to = %mv.to_column,
        index,
        "Reconciled card move"
    );

    Some(Reconciled {
        source: next_source,
        destination: next_destination,
    })
}
