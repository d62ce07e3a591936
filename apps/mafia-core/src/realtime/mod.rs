//! Per-player notification delivery.

pub mod fanout;
pub mod subscription;

pub use fanout::{DeliveryOutcome, NotificationFanout};
pub use subscription::NotificationStream;
