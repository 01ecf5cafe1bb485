//! Transient user-facing notifications with timed auto-dismissal.

pub mod queue;
pub mod runtime;
pub mod ticker;

pub use queue::{
    Notification, NotificationKind, NotificationPhase, NotificationQueue, NotificationTiming,
    Subscription,
};
pub use runtime::{global, install, teardown, NotificationRuntime};
pub use ticker::NotificationTicker;
