use std::{
    io,
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use super::queue::NotificationQueue;

/// Background thread that advances notification lifecycles at a fixed
/// interval. Stops when [`NotificationTicker::stop`] is called or on drop.
#[derive(Debug)]
pub struct NotificationTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl NotificationTicker {
    pub fn spawn(queue: NotificationQueue, interval: Duration) -> io::Result<Self> {
        let (stop, signal) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("notification-ticker".into())
            .spawn(move || loop {
                match signal.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        queue.tick();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        tracing::debug!(interval_ms = interval.as_millis(), "notification ticker started");
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("notification ticker thread panicked");
            }
        }
    }
}

impl Drop for NotificationTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::queue::NotificationTiming;

    #[test]
    fn ticker_removes_expired_notifications() {
        let queue = NotificationQueue::new(NotificationTiming::from_millis(20, 0));
        queue.info("short lived");
        let ticker = NotificationTicker::spawn(queue.clone(), Duration::from_millis(5))
            .expect("spawn ticker");
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while !queue.is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        ticker.stop();
        assert!(queue.is_empty());
    }
}
