pub mod aggregate;
pub mod board;
pub mod card;
pub mod collision;
pub mod column;
pub mod commit;
pub mod drag;
pub mod ordering;
pub mod reconcile;
pub mod sensor;

pub use aggregate::{BoardAggregate, BoardSnapshot, ColumnView};
pub use board::{Board, BoardId};
pub use card::{Card, CardId, CardSlot, PlaceholderCard};
pub use collision::{
    region_for, CollisionResolver, DragGeometry, DragKind, DroppableRegion, EntityRef,
};
pub use column::{Column, ColumnId};
pub use commit::{apply_commits, CardOrder, OrderBackend, OrderCommit};
pub use drag::{placement_for, DragController, DragSession, DragState, DraggedEntity};
pub use ordering::OrderedCollection;
pub use reconcile::{reconcile, CrossColumnMove, Placement, Reconciled};
pub use sensor::{PointerKind, PointerSensor, SensorEvent};
