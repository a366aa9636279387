//! Replays recorded pointer input against a board.
//!
//! Presses go through the activation sensor first, so a script can show a
//! click, an aborted touch and a real drag side by side. The board is
//! re-measured on every frame because eager moves shift cards around.

use serde::{Deserialize, Serialize};
use taskboard_core::{Point, Rect, SensorConfig};
use taskboard_domain::{
    region_for, BoardAggregate, DragController, DragGeometry, EntityRef, OrderCommit, PointerKind,
    PointerSensor, SensorEvent,
};

use crate::layout::GridLayout;

#[derive(Debug, Clone, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub layout: GridLayout,
    pub events: Vec<GestureEvent>,
}

fn default_pointer() -> PointerKind {
    PointerKind::Mouse
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Pointer goes down on an entity, at its centre unless `at` is given.
    Press {
        target: EntityRef,
        #[serde(default = "default_pointer")]
        pointer: PointerKind,
        at: Option<Point>,
        #[serde(default)]
        time_ms: u64,
    },
    Move {
        at: Point,
        #[serde(default)]
        time_ms: u64,
    },
    /// Move to the current centre of an entity.
    MoveTo {
        target: EntityRef,
        #[serde(default)]
        time_ms: u64,
    },
    Release {
        at: Option<Point>,
        #[serde(default)]
        time_ms: u64,
    },
    Cancel,
}

/// What a replay did besides producing commits.
#[derive(Debug, Default, Serialize)]
pub struct ReplaySummary {
    /// Presses released before they activated.
    pub clicks: Vec<EntityRef>,
    /// Drags that could not start.
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    origin: Point,
    rect: Rect,
}

pub struct GestureReplay<'a> {
    board: &'a mut BoardAggregate,
    layout: GridLayout,
    sensor: PointerSensor,
    drag: DragController,
    pending: Option<Grab>,
    grab: Option<Grab>,
    pointer: Point,
    summary: ReplaySummary,
}

impl<'a> GestureReplay<'a> {
    pub fn new(board: &'a mut BoardAggregate, layout: GridLayout, sensors: SensorConfig) -> Self {
        Self {
            board,
            layout,
            sensor: PointerSensor::new(sensors),
            drag: DragController::new(),
            pending: None,
            grab: None,
            pointer: Point::default(),
            summary: ReplaySummary::default(),
        }
    }

    /// Feed one event. Returns the commits of a drag that ended on it.
    pub fn apply(&mut self, event: GestureEvent) -> Option<Vec<OrderCommit>> {
        match event {
            GestureEvent::Press {
                target,
                pointer,
                at,
                time_ms,
            } => {
                let regions = self.layout.measure(self.board);
                let rect = region_for(&regions, target).map(|region| region.rect);
                let at = at
                    .or_else(|| rect.map(|rect| rect.center()))
                    .unwrap_or(self.pointer);
                self.pointer = at;
                self.pending = Some(Grab {
                    origin: at,
                    rect: rect.unwrap_or(Rect::new(at.x, at.y, 0.0, 0.0)),
                });
                self.sensor.press(target, pointer, at, time_ms);
                None
            }
            GestureEvent::Move { at, time_ms } => {
                self.move_to(at, time_ms);
                None
            }
            GestureEvent::MoveTo { target, time_ms } => {
                match self.layout.center_of(self.board, target) {
                    Some(at) => self.move_to(at, time_ms),
                    None => tracing::warn!("Cannot move to {:?}: not on the board", target),
                }
                None
            }
            GestureEvent::Release { at, time_ms } => {
                if let Some(at) = at {
                    self.move_to(at, time_ms);
                }
                let pending = self.sensor.release();
                self.pending = None;
                if self.drag.is_active() {
                    let geometry = self.geometry();
                    let regions = self.layout.measure(self.board);
                    self.grab = None;
                    return Some(self.drag.pointer_up(self.board, &geometry, &regions));
                }
                if let Some(entity) = pending {
                    tracing::debug!("Press on {:?} released before activation", entity);
                    self.summary.clicks.push(entity);
                }
                None
            }
            GestureEvent::Cancel => {
                self.sensor.release();
                self.pending = None;
                self.grab = None;
                self.drag.cancel(self.board);
                None
            }
        }
    }

    /// End the replay. A drag still in progress is cancelled.
    pub fn finish(mut self) -> ReplaySummary {
        if self.drag.is_active() {
            tracing::debug!("Script ended mid-drag, cancelling");
            self.drag.cancel(self.board);
        }
        self.summary
    }

    fn move_to(&mut self, at: Point, time_ms: u64) {
        self.pointer = at;
        match self.sensor.update(at, time_ms) {
            SensorEvent::Activated(entity) => match self.drag.begin(self.board, entity) {
                Ok(()) => self.grab = self.pending.take(),
                Err(e) => {
                    tracing::warn!("Drag of {:?} rejected: {}", entity, e);
                    self.pending = None;
                    self.summary.rejected.push(e.to_string());
                }
            },
            SensorEvent::Aborted => {
                tracing::debug!("Touch press drifted too far, dropped");
                self.pending = None;
            }
            SensorEvent::Idle | SensorEvent::Pending => {}
        }

        if self.drag.is_active() {
            let geometry = self.geometry();
            let regions = self.layout.measure(self.board);
            self.drag.pointer_move(self.board, &geometry, &regions);
        }
    }

    fn geometry(&self) -> DragGeometry {
        let active_rect = match self.grab {
            Some(grab) => grab
                .rect
                .translated(self.pointer.x - grab.origin.x, self.pointer.y - grab.origin.y),
            None => Rect::new(self.pointer.x, self.pointer.y, 0.0, 0.0),
        };
        DragGeometry::new(self.pointer, active_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::{Board, BoardSnapshot, Card, CardId, Column, ColumnId};

    struct Fixture {
        board: BoardAggregate,
        columns: Vec<ColumnId>,
        cards: Vec<Vec<CardId>>,
    }

    fn fixture(cards_per_column: &[usize]) -> Fixture {
        let mut board = Board::new("Board".to_string(), None);
        let mut column_docs = Vec::new();
        let mut card_docs = Vec::new();
        let mut cards = Vec::new();
        for (c, count) in cards_per_column.iter().enumerate() {
            let mut column = Column::new(board.id, format!("C{}", c));
            let mut ids = Vec::new();
            for i in 0..*count {
                let card = Card::new(board.id, column.id, format!("{}-{}", c, i));
                column.push_card(card.id);
                ids.push(card.id);
                card_docs.push(card);
            }
            board.push_column(column.id);
            column_docs.push(column);
            cards.push(ids);
        }
        let columns = board.column_order_ids.clone();
        Fixture {
            board: BoardAggregate::from_snapshot(BoardSnapshot {
                board,
                columns: column_docs,
                cards: card_docs,
            }),
            columns,
            cards,
        }
    }

    fn press(target: EntityRef) -> GestureEvent {
        GestureEvent::Press {
            target,
            pointer: PointerKind::Mouse,
            at: None,
            time_ms: 0,
        }
    }

    fn release() -> GestureEvent {
        GestureEvent::Release {
            at: None,
            time_ms: 0,
        }
    }

    #[test]
    fn test_click_does_not_drag() {
        let Fixture { mut board, cards, .. } = fixture(&[2]);
        let before = board.clone();
        let mut replay =
            GestureReplay::new(&mut board, GridLayout::default(), SensorConfig::default());

        replay.apply(press(EntityRef::Card(cards[0][0])));
        replay.apply(GestureEvent::Move {
            at: Point::new(102.0, 66.0),
            time_ms: 5,
        });
        assert!(replay.apply(release()).is_none());

        let summary = replay.finish();
        assert_eq!(summary.clicks, vec![EntityRef::Card(cards[0][0])]);
        assert_eq!(board, before);
    }

    #[test]
    fn test_drag_card_to_other_column() {
        let Fixture {
            mut board,
            columns,
            cards,
        } = fixture(&[2, 1]);
        let (moving, target) = (cards[0][1], cards[1][0]);
        let mut replay =
            GestureReplay::new(&mut board, GridLayout::default(), SensorConfig::default());

        replay.apply(press(EntityRef::Card(moving)));
        replay.apply(GestureEvent::MoveTo {
            target: EntityRef::Card(target),
            time_ms: 10,
        });
        // The dragged card now sits above the target; aim for the target's
        // lower half.
        replay.apply(GestureEvent::Move {
            at: Point::new(320.0, 120.0),
            time_ms: 20,
        });
        let commits = replay.apply(release()).unwrap();
        replay.finish();

        assert_eq!(commits.len(), 3);
        assert_eq!(
            commits[2],
            OrderCommit::CardOwner {
                card_id: moving,
                column_id: columns[1]
            }
        );
        assert_eq!(
            board.column(columns[1]).unwrap().card_order_ids(),
            &[target, moving]
        );
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_second_press_during_drag_is_rejected() {
        let Fixture {
            mut board,
            columns,
            cards,
        } = fixture(&[1, 1]);
        let mut replay =
            GestureReplay::new(&mut board, GridLayout::default(), SensorConfig::default());

        replay.apply(press(EntityRef::Card(cards[0][0])));
        replay.apply(GestureEvent::Move {
            at: Point::new(100.0, 200.0),
            time_ms: 10,
        });
        replay.apply(press(EntityRef::Column(columns[1])));
        replay.apply(GestureEvent::Move {
            at: Point::new(100.0, 400.0),
            time_ms: 20,
        });
        let summary = replay.finish();

        assert_eq!(summary.rejected.len(), 1);
    }

    #[test]
    fn test_unfinished_drag_is_cancelled() {
        let Fixture {
            mut board, cards, ..
        } = fixture(&[2, 1]);
        let before = board.clone();
        let mut replay =
            GestureReplay::new(&mut board, GridLayout::default(), SensorConfig::default());

        replay.apply(press(EntityRef::Card(cards[0][0])));
        replay.apply(GestureEvent::MoveTo {
            target: EntityRef::Card(cards[1][0]),
            time_ms: 10,
        });
        replay.finish();

        assert_eq!(board, before);
    }

    #[test]
    fn test_parse_script() {
        let card = uuid::Uuid::new_v4();
        let script: GestureScript = serde_json::from_str(&format!(
            r#"{{
                "events": [
                    {{"type": "press", "target": {{"kind": "card", "id": "{card}"}}, "pointer": "touch"}},
                    {{"type": "move", "at": {{"x": 1.0, "y": 2.0}}, "time_ms": 300}},
                    {{"type": "release"}},
                    {{"type": "cancel"}}
                ]
            }}"#
        ))
        .unwrap();

        assert_eq!(script.layout, GridLayout::default());
        assert_eq!(script.events.len(), 4);
        assert!(matches!(
            script.events[0],
            GestureEvent::Press {
                pointer: PointerKind::Touch,
                at: None,
                ..
            }
        ));
    }
}
