//! Client-side view of one board: its columns in display order, and each
//! column's cards in display order.
//!
//! Every column's slot list and order list are rebuilt together from the
//! real cards whenever they change, so an empty column always holds exactly
//! one placeholder and the two lists never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use taskboard_core::{BoardError, BoardResult};

use crate::board::{Board, BoardId};
use crate::card::{Card, CardId, CardSlot, PlaceholderCard};
use crate::column::{Column, ColumnId};
use crate::commit::CardOrder;
use crate::ordering::{array_move, sort_by_order, OrderedCollection};

/// Documents for one board as the backend returned them, in no particular
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    card_order_ids: OrderedCollection<CardId>,
    cards: Vec<CardSlot>,
}

impl ColumnView {
    /// An empty column holding only its placeholder.
    pub fn new(id: ColumnId, board_id: BoardId, title: String) -> Self {
        let mut view = Self {
            id,
            board_id,
            title,
            card_order_ids: OrderedCollection::new(),
            cards: Vec::new(),
        };
        view.set_cards(Vec::new());
        view
    }

    /// Build from a stored column and the cards that name it as owner.
    ///
    /// Cards follow the stored `card_order_ids`; owned cards missing from
    /// that list go last.
    pub fn from_documents(column: &Column, cards: Vec<Card>) -> Self {
        let owned: Vec<Card> = cards
            .into_iter()
            .filter(|card| card.column_id == column.id && !card.destroyed)
            .collect();
        let sorted = sort_by_order(owned, &column.card_order_ids, |card| card.id);

        let mut view = Self::new(column.id, column.board_id, column.title.clone());
        view.set_cards(sorted);
        view
    }

    pub fn card_order_ids(&self) -> &[CardId] {
        self.card_order_ids.as_slice()
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.cards
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter_map(CardSlot::as_card)
    }

    pub fn real_cards(&self) -> Vec<Card> {
        self.cards().cloned().collect()
    }

    pub fn real_card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn has_placeholder(&self) -> bool {
        self.cards.iter().any(CardSlot::is_placeholder)
    }

    pub fn contains_card(&self, card_id: CardId) -> bool {
        self.card_order_ids.contains(card_id)
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards().find(|card| card.id == card_id)
    }

    /// Index among real cards.
    pub fn card_index(&self, card_id: CardId) -> Option<usize> {
        self.cards().position(|card| card.id == card_id)
    }

    /// The order the backend should store: real cards only.
    pub fn persisted_order(&self) -> CardOrder {
        CardOrder::from_cards(self.cards())
    }

    /// Replace the card list, rebuilding the placeholder and the order list
    /// from scratch.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        self.cards = if cards.is_empty() {
            vec![CardSlot::Placeholder(PlaceholderCard::for_column(self.id))]
        } else {
            cards.into_iter().map(CardSlot::Real).collect()
        };
        self.card_order_ids = self
            .cards
            .iter()
            .map(CardSlot::id)
            .collect::<Vec<_>>()
            .into();
        debug_assert!(self.check_invariants().is_ok());
    }

    pub fn check_invariants(&self) -> BoardResult<()> {
        let slot_ids: Vec<CardId> = self.cards.iter().map(CardSlot::id).collect();
        if slot_ids.as_slice() != self.card_order_ids.as_slice() {
            return Err(BoardError::Internal(format!(
                "column {} order list disagrees with its cards",
                self.id
            )));
        }

        let placeholders = self.cards.iter().filter(|s| s.is_placeholder()).count();
        let expected = usize::from(self.real_card_count() == 0);
        if placeholders != expected {
            return Err(BoardError::Internal(format!(
                "column {} holds {} placeholders for {} real cards",
                self.id,
                placeholders,
                self.real_card_count()
            )));
        }

        if let Some(stray) = self.cards.iter().find(|s| s.column_id() != self.id) {
            return Err(BoardError::Internal(format!(
                "card {} listed in column {} but owned by {}",
                stray.id(),
                self.id,
                stray.column_id()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardAggregate {
    pub id: BoardId,
    pub title: String,
    column_order_ids: OrderedCollection<ColumnId>,
    columns: Vec<ColumnView>,
}

impl BoardAggregate {
    pub fn new(id: BoardId, title: String) -> Self {
        Self {
            id,
            title,
            column_order_ids: OrderedCollection::new(),
            columns: Vec::new(),
        }
    }

    /// Build the view from backend documents.
    ///
    /// Destroyed columns and cards are dropped, columns follow the board's
    /// `column_order_ids` and each column's cards follow its own order list.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let BoardSnapshot {
            board,
            columns,
            cards,
        } = snapshot;

        let live: Vec<Column> = columns
            .into_iter()
            .filter(|column| column.board_id == board.id && !column.destroyed)
            .collect();
        let sorted = sort_by_order(live, &board.column_order_ids, |column| column.id);

        let mut by_column: HashMap<ColumnId, Vec<Card>> = HashMap::new();
        for card in cards.into_iter().filter(|card| !card.destroyed) {
            by_column.entry(card.column_id).or_default().push(card);
        }

        let mut aggregate = Self::new(board.id, board.title);
        for column in &sorted {
            let owned = by_column.remove(&column.id).unwrap_or_default();
            aggregate.push_column(ColumnView::from_documents(column, owned));
        }
        aggregate
    }

    pub fn column_order_ids(&self) -> &[ColumnId] {
        self.column_order_ids.as_slice()
    }

    pub fn columns(&self) -> &[ColumnView] {
        &self.columns
    }

    pub fn column(&self, column_id: ColumnId) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub fn column_index(&self, column_id: ColumnId) -> Option<usize> {
        self.column_order_ids.position(column_id)
    }

    /// The column whose order list currently holds `card_id`.
    pub fn column_of_card(&self, card_id: CardId) -> Option<&ColumnView> {
        self.columns
            .iter()
            .find(|column| column.contains_card(card_id))
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.columns.iter().find_map(|column| column.card(card_id))
    }

    /// Swap in an updated copy of an existing column.
    pub fn replace_column(&mut self, column: ColumnView) -> BoardResult<()> {
        let slot = self
            .columns
            .iter_mut()
            .find(|existing| existing.id == column.id)
            .ok_or_else(|| BoardError::not_found("column", column.id))?;
        *slot = column;
        Ok(())
    }

    /// Move the column at `from` to `to`, keeping both lists aligned.
    pub fn move_column(&mut self, from: usize, to: usize) {
        array_move(&mut self.columns, from, to);
        self.column_order_ids = self
            .columns
            .iter()
            .map(|column| column.id)
            .collect::<Vec<_>>()
            .into();
    }

    /// Move a card within its own column to `to` (index among real cards).
    pub fn move_card_within(&mut self, column_id: ColumnId, card_id: CardId, to: usize) -> bool {
        let Some(column) = self.columns.iter_mut().find(|c| c.id == column_id) else {
            return false;
        };
        let Some(from) = column.card_index(card_id) else {
            return false;
        };
        if from == to {
            return false;
        }
        let mut cards = column.real_cards();
        array_move(&mut cards, from, to);
        column.set_cards(cards);
        true
    }

    fn push_column(&mut self, column: ColumnView) {
        self.column_order_ids.push(column.id);
        self.columns.push(column);
    }

    /// Append a newly created column; it starts with only its placeholder.
    pub fn add_column(&mut self, column: &Column) -> BoardResult<()> {
        if column.board_id != self.id {
            return Err(BoardError::Validation(format!(
                "column {} belongs to board {}, not {}",
                column.id, column.board_id, self.id
            )));
        }
        if self.column(column.id).is_some() {
            return Err(BoardError::Validation(format!(
                "column {} already on board",
                column.id
            )));
        }
        self.push_column(ColumnView::new(
            column.id,
            column.board_id,
            column.title.clone(),
        ));
        Ok(())
    }

    /// Append a newly created card to the end of its column, replacing the
    /// placeholder if the column was empty.
    pub fn add_card(&mut self, card: Card) -> BoardResult<()> {
        if self.card(card.id).is_some() {
            return Err(BoardError::Validation(format!(
                "card {} already on board",
                card.id
            )));
        }
        let column = self
            .columns
            .iter_mut()
            .find(|column| column.id == card.column_id)
            .ok_or_else(|| BoardError::not_found("column", card.column_id))?;
        let mut cards = column.real_cards();
        cards.push(card);
        column.set_cards(cards);
        Ok(())
    }

    /// Drop a column together with its cards.
    pub fn remove_column(&mut self, column_id: ColumnId) -> BoardResult<ColumnView> {
        let index = self
            .columns
            .iter()
            .position(|column| column.id == column_id)
            .ok_or_else(|| BoardError::not_found("column", column_id))?;
        self.column_order_ids.remove(column_id);
        Ok(self.columns.remove(index))
    }

    pub fn check_invariants(&self) -> BoardResult<()> {
        let ids: Vec<ColumnId> = self.columns.iter().map(|column| column.id).collect();
        if ids.as_slice() != self.column_order_ids.as_slice() {
            return Err(BoardError::Internal(format!(
                "board {} column order disagrees with its columns",
                self.id
            )));
        }
        for column in &self.columns {
            column.check_invariants()?;
        }
        Ok(())
    }
}
