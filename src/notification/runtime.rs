//! Process-wide notification queue with explicit start-up and shutdown.

use std::{
    io,
    sync::{PoisonError, RwLock},
};

use once_cell::sync::Lazy;

use super::{queue::NotificationQueue, ticker::NotificationTicker};
use crate::config::NotificationSettings;

static GLOBAL_QUEUE: Lazy<RwLock<Option<NotificationQueue>>> = Lazy::new(|| RwLock::new(None));

/// Makes `queue` the process-wide queue, returning the one it replaces.
pub fn install(queue: NotificationQueue) -> Option<NotificationQueue> {
    GLOBAL_QUEUE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(queue)
}

/// Handle to the process-wide queue, if one is installed.
pub fn global() -> Option<NotificationQueue> {
    GLOBAL_QUEUE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Uninstalls the process-wide queue.
pub fn teardown() -> Option<NotificationQueue> {
    GLOBAL_QUEUE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Installed queue plus the ticker driving it.
#[derive(Debug)]
pub struct NotificationRuntime {
    queue: NotificationQueue,
    ticker: NotificationTicker,
}

impl NotificationRuntime {
    pub fn start(settings: &NotificationSettings) -> io::Result<Self> {
        let queue = NotificationQueue::new(settings.timing());
        let ticker = NotificationTicker::spawn(queue.clone(), settings.tick_interval())?;
        if install(queue.clone()).is_some() {
            tracing::warn!("replaced an existing notification queue");
        }
        tracing::info!("notification runtime started");
        Ok(Self { queue, ticker })
    }

    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }

    /// Stops the ticker and uninstalls the queue if it is still the global one.
    pub fn shutdown(self) {
        self.ticker.stop();
        let mut slot = GLOBAL_QUEUE.write().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|current| current.same_queue(&self.queue)) {
            slot.take();
        }
        tracing::info!("notification runtime stopped");
    }
}
