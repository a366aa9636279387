//! Lifecycle of a single drag gesture.
//!
//! `Idle -> Active -> Idle`. Card drags update the board eagerly while the
//! pointer moves between columns; column drags only reorder on drop. Commits
//! are handed back to the caller at drop and never issued from here.

use taskboard_core::{BoardError, BoardResult};

use crate::aggregate::{BoardAggregate, ColumnView};
use crate::card::{Card, CardId};
use crate::collision::{
    region_for, CollisionResolver, DragGeometry, DragKind, DroppableRegion, EntityRef,
};
use crate::column::ColumnId;
use crate::commit::OrderCommit;
use crate::ordering::sort_by_order;
use crate::reconcile::{reconcile, CrossColumnMove, Placement};

/// Read-only copy of the dragged entity, taken before anything moves.
#[derive(Debug, Clone, PartialEq)]
pub enum DraggedEntity {
    Column(ColumnView),
    Card {
        card: Card,
        origin_column: ColumnId,
        /// Order of the origin column at drag start, placeholder included.
        origin_order: Vec<CardId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub active: EntityRef,
    pub snapshot: DraggedEntity,
}

impl DragSession {
    pub fn kind(&self) -> DragKind {
        self.active.kind()
    }

    pub fn origin_column(&self) -> Option<ColumnId> {
        match &self.snapshot {
            DraggedEntity::Card { origin_column, .. } => Some(*origin_column),
            DraggedEntity::Column(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Active(DragSession),
}

/// Insertion point implied by the resolved target and pointer position.
pub fn placement_for(
    over: Option<EntityRef>,
    geometry: &DragGeometry,
    regions: &[DroppableRegion],
) -> Placement {
    match over {
        Some(EntityRef::Card(card_id)) => match region_for(regions, EntityRef::Card(card_id)) {
            Some(region) => Placement::relative_to(card_id, &region.rect, geometry.pointer),
            None => Placement::Before(card_id),
        },
        _ => Placement::End,
    }
}

fn column_for(board: &BoardAggregate, target: EntityRef) -> Option<ColumnId> {
    match target {
        EntityRef::Column(column_id) => board.column(column_id).map(|column| column.id),
        EntityRef::Card(card_id) => board.column_of_card(card_id).map(|column| column.id),
    }
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    resolver: CollisionResolver,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Active(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active(_))
    }

    /// Start a gesture on `entity`. Rejected while another gesture is
    /// active; the running session is left untouched.
    pub fn begin(&mut self, board: &BoardAggregate, entity: EntityRef) -> BoardResult<()> {
        if let DragState::Active(session) = &self.state {
            tracing::warn!(
                "Ignoring drag of {:?}: {:?} is already being dragged",
                entity,
                session.active
            );
            return Err(BoardError::Validation(
                "a drag gesture is already in progress".to_string(),
            ));
        }

        let snapshot = match entity {
            EntityRef::Column(column_id) => {
                let column = board
                    .column(column_id)
                    .ok_or_else(|| BoardError::not_found("column", column_id))?;
                DraggedEntity::Column(column.clone())
            }
            EntityRef::Card(card_id) => {
                let origin = board
                    .column_of_card(card_id)
                    .ok_or_else(|| BoardError::not_found("card", card_id))?;
                let card = origin
                    .card(card_id)
                    .ok_or_else(|| BoardError::not_found("card", card_id))?;
                DraggedEntity::Card {
                    card: card.clone(),
                    origin_column: origin.id,
                    origin_order: origin.card_order_ids().to_vec(),
                }
            }
        };

        tracing::debug!("Drag started: {:?}", entity);
        self.resolver.reset();
        self.state = DragState::Active(DragSession {
            active: entity,
            snapshot,
        });
        Ok(())
    }

    /// Per-frame update. Only card drags react, and only when the hovered
    /// column differs from the one currently holding the card.
    pub fn drag_over(
        &mut self,
        board: &mut BoardAggregate,
        over: Option<EntityRef>,
        placement: Placement,
    ) {
        let Some(DragSession {
            snapshot: DraggedEntity::Card { card, .. },
            ..
        }) = self.session()
        else {
            return;
        };
        let card_id = card.id;

        let Some(target) = over else {
            return;
        };
        let Some(over_column) = column_for(board, target) else {
            return;
        };
        let Some(live_column) = board.column_of_card(card_id).map(|column| column.id) else {
            return;
        };
        if live_column == over_column {
            return;
        }

        if let Some(result) = reconcile(
            board,
            &CrossColumnMove {
                card_id,
                from_column: live_column,
                to_column: over_column,
                placement,
            },
        ) {
            result.apply_to(board);
        }
    }

    /// Finish the gesture and return the writes it implies, in the order
    /// they must be issued. The session is cleared whatever the outcome.
    pub fn drop_on(
        &mut self,
        board: &mut BoardAggregate,
        over: Option<EntityRef>,
        placement: Placement,
    ) -> Vec<OrderCommit> {
        let session = match std::mem::take(&mut self.state) {
            DragState::Active(session) => session,
            DragState::Idle => return Vec::new(),
        };
        self.resolver.reset();

        let commits = match (session.snapshot, over) {
            (
                DraggedEntity::Card {
                    card,
                    origin_column,
                    origin_order,
                },
                None,
            ) => {
                tracing::debug!("Drag of card {} cancelled: no target", card.id);
                restore_origin(board, card.id, origin_column, &origin_order);
                Vec::new()
            }
            (DraggedEntity::Column(column), None) => {
                tracing::debug!("Drag of column {} cancelled: no target", column.id);
                Vec::new()
            }
            (DraggedEntity::Column(column), Some(over)) => drop_column(board, column.id, over),
            (
                DraggedEntity::Card {
                    card,
                    origin_column,
                    origin_order,
                },
                Some(over),
            ) => drop_card(
                board,
                card.id,
                origin_column,
                &origin_order,
                over,
                placement,
            ),
        };

        tracing::debug!("Drag ended with {} commits", commits.len());
        commits
    }

    /// Abandon the gesture, putting an eagerly moved card back where it
    /// started.
    pub fn cancel(&mut self, board: &mut BoardAggregate) {
        self.drop_on(board, None, Placement::End);
    }

    /// Resolve the hovered target for this frame and apply it.
    pub fn pointer_move(
        &mut self,
        board: &mut BoardAggregate,
        geometry: &DragGeometry,
        regions: &[DroppableRegion],
    ) -> Option<EntityRef> {
        let kind = self.session()?.kind();
        let over = self.resolver.resolve(kind, geometry, regions, board);
        let placement = placement_for(over, geometry, regions);
        self.drag_over(board, over, placement);
        over
    }

    /// Resolve the final target and finish the gesture.
    pub fn pointer_up(
        &mut self,
        board: &mut BoardAggregate,
        geometry: &DragGeometry,
        regions: &[DroppableRegion],
    ) -> Vec<OrderCommit> {
        let over = match self.session().map(DragSession::kind) {
            Some(kind) => self.resolver.resolve(kind, geometry, regions, board),
            None => None,
        };
        let placement = placement_for(over, geometry, regions);
        self.drop_on(board, over, placement)
    }
}

fn drop_column(
    board: &mut BoardAggregate,
    column_id: ColumnId,
    over: EntityRef,
) -> Vec<OrderCommit> {
    let Some(over_column) = column_for(board, over) else {
        return Vec::new();
    };
    let (Some(from), Some(to)) = (board.column_index(column_id), board.column_index(over_column))
    else {
        return Vec::new();
    };
    if from == to {
        return Vec::new();
    }

    board.move_column(from, to);
    vec![OrderCommit::BoardColumnOrder {
        board_id: board.id,
        order: board.column_order_ids().to_vec(),
    }]
}

fn drop_card(
    board: &mut BoardAggregate,
    card_id: CardId,
    origin_column: ColumnId,
    origin_order: &[CardId],
    over: EntityRef,
    placement: Placement,
) -> Vec<OrderCommit> {
    let Some(over_column) = column_for(board, over) else {
        restore_origin(board, card_id, origin_column, origin_order);
        return Vec::new();
    };
    let Some(live_column) = board.column_of_card(card_id).map(|column| column.id) else {
        return Vec::new();
    };

    if over_column != origin_column {
        if let Some(result) = reconcile(
            board,
            &CrossColumnMove {
                card_id,
                from_column: live_column,
                to_column: over_column,
                placement,
            },
        ) {
            result.apply_to(board);
        }

        let (Some(source), Some(destination)) =
            (board.column(origin_column), board.column(over_column))
        else {
            return Vec::new();
        };
        return vec![
            OrderCommit::ColumnCardOrder {
                column_id: origin_column,
                order: source.persisted_order(),
            },
            OrderCommit::ColumnCardOrder {
                column_id: over_column,
                order: destination.persisted_order(),
            },
            OrderCommit::CardOwner {
                card_id,
                column_id: over_column,
            },
        ];
    }

    if live_column != origin_column {
        // Left and came back on the final frame.
        if let Some(result) = reconcile(
            board,
            &CrossColumnMove {
                card_id,
                from_column: live_column,
                to_column: origin_column,
                placement,
            },
        ) {
            result.apply_to(board);
        }
    } else if let EntityRef::Card(over_card) = over {
        if let Some(to) = board
            .column(origin_column)
            .and_then(|column| column.card_index(over_card))
        {
            board.move_card_within(origin_column, card_id, to);
        }
    }

    match board.column(origin_column) {
        Some(column) if column.card_order_ids() != origin_order => {
            vec![OrderCommit::ColumnCardOrder {
                column_id: origin_column,
                order: column.persisted_order(),
            }]
        }
        _ => Vec::new(),
    }
}

/// Put a card that was moved during the gesture back at its starting index.
fn restore_origin(
    board: &mut BoardAggregate,
    card_id: CardId,
    origin_column: ColumnId,
    origin_order: &[CardId],
) {
    let Some(live_column) = board.column_of_card(card_id).map(|column| column.id) else {
        return;
    };
    if live_column != origin_column {
        let Some(origin) = board.column(origin_column) else {
            return;
        };
        let anchor = origin_order
            .iter()
            .skip_while(|id| **id != card_id)
            .skip(1)
            .find(|id| origin.card(**id).is_some())
            .copied();
        let placement = anchor.map(Placement::Before).unwrap_or(Placement::End);

        if let Some(result) = reconcile(
            board,
            &CrossColumnMove {
                card_id,
                from_column: live_column,
                to_column: origin_column,
                placement,
            },
        ) {
            result.apply_to(board);
        }
    }

    // The card may have come back to its column at another index.
    let Some(origin) = board.column(origin_column) else {
        return;
    };
    if origin.card_order_ids() == origin_order {
        return;
    }
    let mut restored = origin.clone();
    restored.set_cards(sort_by_order(origin.real_cards(), origin_order, |card| card.id));
    if let Err(e) = board.replace_column(restored) {
        tracing::warn!("Failed to restore column {}: {}", origin_column, e);
    }
}
