use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{Clock, SystemClock};

pub const DEFAULT_DISPLAY_MS: u64 = 2000;
pub const DEFAULT_EXIT_GRACE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        };
        f.write_str(label)
    }
}

/// Lifecycle of a listed notification. Removed entries are no longer listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    Active,
    /// Leaving the list once the exit grace period has elapsed.
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
    pub created_at: DateTime<Utc>,
}

/// Display window and exit grace applied to every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub display: Duration,
    /// Zero removes dismissed or expired notifications without an exit phase.
    pub exit_grace: Duration,
}

impl NotificationTiming {
    pub fn from_millis(display_ms: u64, exit_grace_ms: u64) -> Self {
        Self {
            display: millis(display_ms),
            exit_grace: millis(exit_grace_ms),
        }
    }
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DISPLAY_MS, DEFAULT_EXIT_GRACE_MS)
    }
}

fn millis(value: u64) -> Duration {
    Duration::try_milliseconds(i64::try_from(value).unwrap_or(i64::MAX)).unwrap_or(Duration::MAX)
}

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Tracked {
    notification: Notification,
    exiting_since: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    items: Vec<Tracked>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

struct Inner {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    timing: NotificationTiming,
}

/// Ordered list of active notifications with publish/subscribe delivery.
///
/// Cloning yields another handle to the same queue. All mutations are
/// serialized behind one lock and listeners run after it is released, so a
/// listener may call back into the queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("NotificationQueue")
            .field("notifications", &state.items.len())
            .field("listeners", &state.listeners.len())
            .field("timing", &self.inner.timing)
            .finish()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(NotificationTiming::default())
    }
}

impl NotificationQueue {
    pub fn new(timing: NotificationTiming) -> Self {
        Self::with_clock(timing, Arc::new(SystemClock))
    }

    pub fn with_clock(timing: NotificationTiming, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                clock,
                timing,
            }),
        }
    }

    /// True when both handles point at the same underlying queue.
    pub fn same_queue(&self, other: &NotificationQueue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn timing(&self) -> NotificationTiming {
        self.inner.timing
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a notification, replacing any existing one with the same
    /// message and kind. Returns the new id.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> String {
        let message = message.into();
        let id = Uuid::new_v4().to_string();
        {
            let mut state = self.state();
            state.items.retain(|tracked| {
                !(tracked.notification.message == message && tracked.notification.kind == kind)
            });
            state.items.push(Tracked {
                notification: Notification {
                    id: id.clone(),
                    message,
                    kind,
                    phase: NotificationPhase::Active,
                    created_at: self.inner.clock.now(),
                },
                exiting_since: None,
            });
        }
        tracing::debug!(%id, %kind, "notification shown");
        self.notify();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(message, NotificationKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.show(message, NotificationKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.show(message, NotificationKind::Warning)
    }

    /// Drops the notification immediately. Unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        self.state()
            .items
            .retain(|tracked| tracked.notification.id != id);
        self.notify();
    }

    /// User dismissal: starts the exit phase now, or removes outright when
    /// there is no exit grace.
    pub fn dismiss(&self, id: &str) {
        let now = self.inner.clock.now();
        let changed = {
            let mut state = self.state();
            let grace = self.inner.timing.exit_grace;
            let position = state
                .items
                .iter()
                .position(|tracked| tracked.notification.id == id);
            match position {
                Some(position) if grace <= Duration::zero() => {
                    state.items.remove(position);
                    true
                }
                Some(position) => {
                    let tracked = &mut state.items[position];
                    if tracked.exiting_since.is_none() {
                        tracked.exiting_since = Some(now);
                        tracked.notification.phase = NotificationPhase::Exiting;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn clear(&self) {
        self.state().items.clear();
        self.notify();
    }

    /// Advances lifecycles to the clock's current time.
    ///
    /// Expired notifications enter the exit phase at their scheduled deadline,
    /// so a late tick still honors the original timing. Returns whether
    /// anything changed.
    pub fn tick(&self) -> bool {
        let now = self.inner.clock.now();
        let NotificationTiming {
            display,
            exit_grace,
        } = self.inner.timing;
        let changed = {
            let mut state = self.state();
            let mut changed = false;
            for tracked in state.items.iter_mut() {
                if tracked.exiting_since.is_some() {
                    continue;
                }
                // An unrepresentable deadline never expires.
                let deadline = tracked.notification.created_at.checked_add_signed(display);
                if let Some(deadline) = deadline.filter(|deadline| now >= *deadline) {
                    tracked.exiting_since = Some(deadline);
                    tracked.notification.phase = NotificationPhase::Exiting;
                    changed = true;
                }
            }
            let before = state.items.len();
            state.items.retain(|tracked| match tracked.exiting_since {
                Some(since) => since
                    .checked_add_signed(exit_grace)
                    .map_or(true, |removal| now < removal),
                None => true,
            });
            changed || state.items.len() != before
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Snapshot of the listed notifications, oldest first.
    pub fn get_all(&self) -> Vec<Notification> {
        self.state()
            .items
            .iter()
            .map(|tracked| tracked.notification.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    /// Registers a listener invoked after every show, remove, clear, and
    /// every dismissal or tick that changed the list.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut state = self.state();
        let id = state.next_listener_id;
        state.next_listener_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        Subscription {
            queue: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state().listeners.len()
    }

    fn notify(&self) {
        let listeners: Vec<(u64, Listener)> = self.state().listeners.clone();
        for (id, listener) in listeners {
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::warn!(listener = id, "notification listener panicked");
            }
        }
    }
}

/// Handle returned by [`NotificationQueue::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    queue: Weak<Inner>,
    id: u64,
}

impl Subscription {
    /// Deregisters the listener. Safe to call after the queue is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.queue.upgrade() {
            inner
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::time::ManualClock;

    fn queue_with_clock() -> (NotificationQueue, ManualClock) {
        let clock = ManualClock::default();
        let queue =
            NotificationQueue::with_clock(NotificationTiming::default(), Arc::new(clock.clone()));
        (queue, clock)
    }

    #[test]
    fn duplicate_show_replaces_previous_entry() {
        let (queue, _) = queue_with_clock();
        let first = queue.show("X", NotificationKind::Error);
        let second = queue.show("X", NotificationKind::Error);
        let all = queue.get_all();
        assert_ne!(first, second);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, second);
    }

    #[test]
    fn same_message_with_other_kind_is_kept() {
        let (queue, _) = queue_with_clock();
        queue.error("Saved");
        queue.success("Saved");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn notifications_expire_after_display_and_grace() {
        let (queue, clock) = queue_with_clock();
        queue.info("Recibo generado");
        clock.advance(Duration::milliseconds(1900));
        queue.tick();
        assert_eq!(queue.get_all()[0].phase, NotificationPhase::Active);
        clock.advance(Duration::milliseconds(200));
        queue.tick();
        assert_eq!(queue.get_all()[0].phase, NotificationPhase::Exiting);
        clock.advance(Duration::milliseconds(300));
        queue.tick();
        assert!(queue.is_empty());
    }

    #[test]
    fn late_tick_uses_scheduled_deadline() {
        let (queue, clock) = queue_with_clock();
        queue.info("late");
        clock.advance(Duration::milliseconds(2400));
        assert!(queue.tick());
        assert!(queue.is_empty());
    }

    #[test]
    fn dismiss_starts_exit_phase_immediately() {
        let (queue, clock) = queue_with_clock();
        let id = queue.warning("Sesión por expirar");
        queue.dismiss(&id);
        assert_eq!(queue.get_all()[0].phase, NotificationPhase::Exiting);
        clock.advance(Duration::milliseconds(300));
        queue.tick();
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_grace_dismiss_removes_outright() {
        let queue = NotificationQueue::with_clock(
            NotificationTiming::from_millis(2000, 0),
            Arc::new(ManualClock::default()),
        );
        let id = queue.info("gone");
        queue.dismiss(&id);
        assert!(queue.is_empty());
    }

    #[test]
    fn very_long_timings_are_kept_without_capping() {
        let timing = NotificationTiming::from_millis(u64::from(u32::MAX) + 1, u64::MAX);
        assert_eq!(timing.display, Duration::milliseconds(i64::from(u32::MAX) + 1));
        assert_eq!(timing.exit_grace, Duration::MAX);

        let clock = ManualClock::default();
        let queue = NotificationQueue::with_clock(
            NotificationTiming::from_millis(u64::MAX, u64::MAX),
            Arc::new(clock.clone()),
        );
        let id = queue.info("pinned");
        clock.advance(Duration::days(365));
        assert!(!queue.tick());
        queue.dismiss(&id);
        clock.advance(Duration::days(365));
        queue.tick();
        assert_eq!(queue.get_all()[0].phase, NotificationPhase::Exiting);
    }

    #[test]
    fn remove_and_clear_are_idempotent() {
        let (queue, _) = queue_with_clock();
        let id = queue.info("one");
        queue.remove(&id);
        queue.remove(&id);
        queue.remove("missing");
        queue.clear();
        queue.clear();
        assert!(queue.get_all().is_empty());
    }

    #[test]
    fn get_all_returns_a_copy() {
        let (queue, _) = queue_with_clock();
        queue.info("one");
        let mut snapshot = queue.get_all();
        snapshot.clear();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn listeners_run_in_order_and_survive_panics() {
        let (queue, _) = queue_with_clock();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let _failing = queue.subscribe(|| panic!("listener failure"));
        let recorded = Arc::clone(&calls);
        let _first = queue.subscribe(move || recorded.lock().unwrap().push("first"));
        let recorded = Arc::clone(&calls);
        let _second = queue.subscribe(move || recorded.lock().unwrap().push("second"));
        queue.info("hello");
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let (queue, _) = queue_with_clock();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let subscription = queue.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        queue.info("first");
        subscription.unsubscribe();
        queue.info("second");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(queue.listener_count(), 0);
    }

    #[test]
    fn listener_can_read_queue_during_delivery() {
        let (queue, _) = queue_with_clock();
        let seen = Arc::new(AtomicUsize::new(0));
        let handle = queue.clone();
        let observed = Arc::clone(&seen);
        let _subscription = queue.subscribe(move || {
            observed.store(handle.get_all().len(), Ordering::SeqCst);
        });
        queue.info("a");
        queue.info("b");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
