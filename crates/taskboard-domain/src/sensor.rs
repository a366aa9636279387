//! Turning presses into drags.
//!
//! A press stays pending until its activation constraint is met, so a plain
//! click or a scroll gesture on a touch screen never starts a drag.

use serde::{Deserialize, Serialize};
use taskboard_core::{Point, SensorConfig};

use crate::collision::EntityRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingPress {
    entity: EntityRef,
    kind: PointerKind,
    origin: Point,
    pressed_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    /// No press is pending.
    Idle,
    /// Constraint not met yet.
    Pending,
    /// The press became a drag of this entity.
    Activated(EntityRef),
    /// The press moved too far before its delay elapsed and was dropped.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct PointerSensor {
    config: SensorConfig,
    pending: Option<PendingPress>,
}

impl PointerSensor {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start tracking a press. A press already pending is replaced.
    pub fn press(&mut self, entity: EntityRef, kind: PointerKind, at: Point, time_ms: u64) {
        self.pending = Some(PendingPress {
            entity,
            kind,
            origin: at,
            pressed_at_ms: time_ms,
        });
    }

    /// Feed a pointer position; `time_ms` uses the same clock as `press`.
    pub fn update(&mut self, at: Point, time_ms: u64) -> SensorEvent {
        let Some(press) = self.pending else {
            return SensorEvent::Idle;
        };
        let travelled = press.origin.distance_to(at);
        let held_ms = time_ms.saturating_sub(press.pressed_at_ms);

        let event = match press.kind {
            PointerKind::Mouse if travelled >= self.config.mouse_distance => {
                SensorEvent::Activated(press.entity)
            }
            PointerKind::Mouse => SensorEvent::Pending,
            PointerKind::Touch if travelled > self.config.touch_tolerance => SensorEvent::Aborted,
            PointerKind::Touch if held_ms >= self.config.touch_delay_ms => {
                SensorEvent::Activated(press.entity)
            }
            PointerKind::Touch => SensorEvent::Pending,
        };

        if matches!(event, SensorEvent::Activated(_) | SensorEvent::Aborted) {
            self.pending = None;
        }
        event
    }

    /// Release before activation. Returns the entity that was clicked.
    pub fn release(&mut self) -> Option<EntityRef> {
        self.pending.take().map(|press| press.entity)
    }
}
