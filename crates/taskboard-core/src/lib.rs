pub mod config;
pub mod error;
pub mod geometry;
pub mod notification;
pub mod result;

pub use config::{AppConfig, SensorConfig};
pub use error::BoardError;
pub use geometry::{Point, Rect};
pub use notification::{Notification, NotificationLog, Notifier, Severity};
pub use result::BoardResult;
