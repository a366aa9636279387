//! Decides which column or card a dragged item is over.
//!
//! Columns are tall, so point containment alone flickers near their edges;
//! column drags fall back to the nearest column by corner distance. Card
//! drags only ever land on something the pointer is actually inside, and a
//! hit on a column's empty area is narrowed to that column's nearest card.

use serde::{Deserialize, Serialize};
use taskboard_core::{Point, Rect};
use uuid::Uuid;

use crate::aggregate::BoardAggregate;
use crate::card::CardId;
use crate::column::ColumnId;

/// A draggable or droppable entity on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Column(ColumnId),
    Card(CardId),
}

impl EntityRef {
    pub fn id(&self) -> Uuid {
        match self {
            EntityRef::Column(id) | EntityRef::Card(id) => *id,
        }
    }

    pub fn kind(&self) -> DragKind {
        match self {
            EntityRef::Column(_) => DragKind::Column,
            EntityRef::Card(_) => DragKind::Card,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Column,
    Card,
}

/// Measured screen area of one droppable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroppableRegion {
    pub target: EntityRef,
    pub rect: Rect,
}

impl DroppableRegion {
    pub fn new(target: EntityRef, rect: Rect) -> Self {
        Self { target, rect }
    }
}

/// Where the gesture is this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragGeometry {
    pub pointer: Point,
    /// Translated rectangle of the item being dragged.
    pub active_rect: Rect,
}

impl DragGeometry {
    pub fn new(pointer: Point, active_rect: Rect) -> Self {
        Self {
            pointer,
            active_rect,
        }
    }
}

pub fn region_for(regions: &[DroppableRegion], target: EntityRef) -> Option<&DroppableRegion> {
    regions.iter().find(|region| region.target == target)
}

fn closest_corners<'a, I>(rect: &Rect, candidates: I) -> Option<&'a DroppableRegion>
where
    I: IntoIterator<Item = &'a DroppableRegion>,
{
    candidates.into_iter().min_by(|a, b| {
        rect.corner_distance(&a.rect)
            .total_cmp(&rect.corner_distance(&b.rect))
    })
}

/// Regions containing the pointer, cards before columns, nearest centre
/// first within each kind.
fn pointer_within(pointer: Point, regions: &[DroppableRegion]) -> Vec<&DroppableRegion> {
    let mut hits: Vec<&DroppableRegion> = regions
        .iter()
        .filter(|region| region.rect.contains(pointer))
        .collect();
    hits.sort_by(|a, b| {
        let rank = |r: &DroppableRegion| match r.target {
            EntityRef::Card(_) => 0u8,
            EntityRef::Column(_) => 1u8,
        };
        rank(*a).cmp(&rank(*b)).then_with(|| {
            pointer
                .distance_to(a.rect.center())
                .total_cmp(&pointer.distance_to(b.rect.center()))
        })
    });
    hits
}

#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    last_over: Option<EntityRef>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self { last_over: None }
    }

    pub fn reset(&mut self) {
        self.last_over = None;
    }

    pub fn resolve(
        &mut self,
        kind: DragKind,
        geometry: &DragGeometry,
        regions: &[DroppableRegion],
        board: &BoardAggregate,
    ) -> Option<EntityRef> {
        let resolved = match kind {
            DragKind::Column => self.resolve_column(geometry, regions),
            DragKind::Card => self.resolve_card(geometry, regions, board),
        };
        if resolved.is_some() {
            self.last_over = resolved;
        }
        resolved
    }

    fn resolve_column(
        &self,
        geometry: &DragGeometry,
        regions: &[DroppableRegion],
    ) -> Option<EntityRef> {
        let columns: Vec<&DroppableRegion> = regions
            .iter()
            .filter(|region| matches!(region.target, EntityRef::Column(_)))
            .collect();
        if columns.is_empty() {
            return self.last_over;
        }

        columns
            .iter()
            .copied()
            .find(|region| region.rect.contains(geometry.pointer))
            .or_else(|| closest_corners(&geometry.active_rect, columns.iter().copied()))
            .map(|region| region.target)
    }

    fn resolve_card(
        &self,
        geometry: &DragGeometry,
        regions: &[DroppableRegion],
        board: &BoardAggregate,
    ) -> Option<EntityRef> {
        let hit = pointer_within(geometry.pointer, regions).into_iter().next()?;

        let column_id = match hit.target {
            EntityRef::Card(_) => return Some(hit.target),
            EntityRef::Column(column_id) => column_id,
        };

        let Some(column) = board.column(column_id) else {
            return Some(hit.target);
        };
        if column.real_card_count() == 0 {
            return Some(hit.target);
        }

        let candidates: Vec<&DroppableRegion> = regions
            .iter()
            .filter(|region| match region.target {
                EntityRef::Card(card_id) => column.card(card_id).is_some(),
                EntityRef::Column(_) => false,
            })
            .collect();
        if candidates.is_empty() {
            // Cards not measured this frame.
            return Some(self.last_over.unwrap_or(hit.target));
        }

        closest_corners(&geometry.active_rect, candidates).map(|region| region.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::BoardSnapshot;
    use crate::board::Board;
    use crate::card::Card;
    use crate::column::Column;

    const COLUMN_WIDTH: f64 = 200.0;
    const COLUMN_GAP: f64 = 20.0;
    const CARD_HEIGHT: f64 = 50.0;

    /// Columns laid out left to right, cards stacked from the top.
    fn layout(board: &BoardAggregate) -> Vec<DroppableRegion> {
        let mut regions = Vec::new();
        for (c, column) in board.columns().iter().enumerate() {
            let x = c as f64 * (COLUMN_WIDTH + COLUMN_GAP);
            regions.push(DroppableRegion::new(
                EntityRef::Column(column.id),
                Rect::new(x, 0.0, COLUMN_WIDTH, 600.0),
            ));
            for (i, card) in column.cards().enumerate() {
                regions.push(DroppableRegion::new(
                    EntityRef::Card(card.id),
                    Rect::new(x, 40.0 + i as f64 * CARD_HEIGHT, COLUMN_WIDTH, CARD_HEIGHT),
                ));
            }
        }
        regions
    }

    fn board(cards_per_column: &[usize]) -> BoardAggregate {
        let mut board = Board::new("Board".to_string(), None);
        let mut columns = Vec::new();
        let mut cards = Vec::new();
        for (c, count) in cards_per_column.iter().enumerate() {
            let mut column = Column::new(board.id, format!("C{}", c));
            for i in 0..*count {
                let card = Card::new(board.id, column.id, format!("{}-{}", c, i));
                column.push_card(card.id);
                cards.push(card);
            }
            board.push_column(column.id);
            columns.push(column);
        }
        BoardAggregate::from_snapshot(BoardSnapshot {
            board,
            columns,
            cards,
        })
    }

    fn at(x: f64, y: f64) -> DragGeometry {
        DragGeometry::new(Point::new(x, y), Rect::new(x - 10.0, y - 10.0, 180.0, 40.0))
    }

    #[test]
    fn test_card_over_card() {
        let board = board(&[2, 1]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let target = board.columns()[1].card_order_ids()[0];

        let over = resolver.resolve(DragKind::Card, &at(300.0, 60.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Card(target)));
    }

    #[test]
    fn test_card_outside_everything_has_no_target() {
        let board = board(&[1, 1]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();

        resolver.resolve(DragKind::Card, &at(50.0, 60.0), &regions, &board);
        let over = resolver.resolve(DragKind::Card, &at(50.0, 900.0), &regions, &board);
        assert_eq!(over, None);
    }

    #[test]
    fn test_card_in_column_empty_area_snaps_to_nearest_card() {
        let board = board(&[0, 3]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let last_card = *board.columns()[1].card_order_ids().last().unwrap();

        let over = resolver.resolve(DragKind::Card, &at(300.0, 400.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Card(last_card)));
    }

    #[test]
    fn test_card_over_empty_column_targets_column() {
        let board = board(&[0, 3]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let empty = board.columns()[0].id;

        let over = resolver.resolve(DragKind::Card, &at(100.0, 300.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Column(empty)));
    }

    #[test]
    fn test_unmeasured_cards_reuse_previous_target() {
        let board = board(&[2]);
        let mut regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let first = board.columns()[0].card_order_ids()[0];

        let over = resolver.resolve(DragKind::Card, &at(100.0, 60.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Card(first)));

        regions.retain(|r| matches!(r.target, EntityRef::Column(_)));
        let over = resolver.resolve(DragKind::Card, &at(100.0, 500.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Card(first)));
    }

    #[test]
    fn test_column_pointer_inside() {
        let board = board(&[0, 0, 0]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();

        let over = resolver.resolve(DragKind::Column, &at(450.0, 300.0), &regions, &board);
        assert_eq!(over, Some(EntityRef::Column(board.columns()[2].id)));
    }

    #[test]
    fn test_column_between_columns_uses_nearest_corners() {
        let board = board(&[1, 1]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let geometry = DragGeometry::new(
            Point::new(210.0, 300.0),
            Rect::new(215.0, 0.0, COLUMN_WIDTH, 600.0),
        );

        let over = resolver.resolve(DragKind::Column, &geometry, &regions, &board);
        assert_eq!(over, Some(EntityRef::Column(board.columns()[1].id)));
    }

    #[test]
    fn test_column_without_regions_reuses_previous_target() {
        let board = board(&[0, 0]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();

        let first = resolver.resolve(DragKind::Column, &at(100.0, 100.0), &regions, &board);
        let again = resolver.resolve(DragKind::Column, &at(100.0, 100.0), &[], &board);
        assert_eq!(first, again);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let board = board(&[3, 2]);
        let regions = layout(&board);
        let mut resolver = CollisionResolver::new();
        let geometry = at(310.0, 150.0);

        let first = resolver.resolve(DragKind::Card, &geometry, &regions, &board);
        for _ in 0..5 {
            assert_eq!(
                resolver.resolve(DragKind::Card, &geometry, &regions, &board),
                first
            );
        }
    }
}
