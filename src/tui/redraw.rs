//! Periodic repaint requests.
//!
//! The driver knows nothing about frames. It only tells the host UI, at a
//! fixed cadence, that enough time may have passed for the picture to change;
//! the host then repaints on its own loop and the widget picks the frame.
//!
//! Only one driver may be alive per process. Spawning a second one while the
//! first is running is an error, and dropping or shutting down a driver
//! releases the slot once its task has exited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::{GifViewError, Result};

static DRIVER_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Shortest cadence the driver will tick at.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Something that can ask a host UI to repaint.
///
/// Implementations must not draw themselves; they hand the request to the
/// host's own loop (for example by sending on a channel).
pub trait RepaintRequester: Send + Sync + 'static {
    fn request_repaint(&self);
}

impl<F> RepaintRequester for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn request_repaint(&self) {
        self()
    }
}

/// Releases the process-wide driver slot when dropped.
struct ActiveSlot;

impl ActiveSlot {
    fn acquire() -> Option<Self> {
        DRIVER_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ActiveSlot)
    }
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        DRIVER_ACTIVE.store(false, Ordering::Release);
    }
}

/// Background task that requests a repaint every tick until cancelled.
pub struct RedrawDriver {
    cancel: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    tick_interval: Duration,
}

impl RedrawDriver {
    /// Start requesting repaints every `tick_interval`.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`GifViewError::RedrawAlreadyRunning`] if another driver is alive.
    pub fn spawn<R: RepaintRequester>(requester: R, tick_interval: Duration) -> Result<Self> {
        let slot = ActiveSlot::acquire().ok_or(GifViewError::RedrawAlreadyRunning)?;
        let tick_interval = tick_interval.max(MIN_TICK_INTERVAL);
        let (cancel, cancelled) = watch::channel(false);

        let handle = tokio::spawn(run(requester, tick_interval, cancelled, slot));

        Ok(Self {
            cancel,
            handle: Some(handle),
            tick_interval,
        })
    }

    /// Whether any driver currently holds the process-wide slot.
    pub fn is_active() -> bool {
        DRIVER_ACTIVE.load(Ordering::Acquire)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether this driver's task is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the task to stop at its next tick. Does not wait for it.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Cancel the task and wait until it has exited.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RedrawDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run<R: RepaintRequester>(
    requester: R,
    tick_interval: Duration,
    mut cancelled: watch::Receiver<bool>,
    _slot: ActiveSlot,
) {
    info!(
        tick_ms = tick_interval.as_millis() as u64,
        "Starting redraw driver"
    );

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            // Sender dropped or cancel sent
            _ = cancelled.changed() => {}
        }
        if *cancelled.borrow() || cancelled.has_changed().is_err() {
            break;
        }
        requester.request_repaint();
        ticks += 1;
    }

    debug!(ticks, "Redraw driver stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    async fn wait_until_inactive() {
        for _ in 0..100 {
            if !RedrawDriver::is_active() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    // The driver slot is process-wide, so the whole lifecycle lives in one test.
    #[tokio::test]
    async fn test_driver_lifecycle() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let driver = RedrawDriver::spawn(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(5),
        )
        .unwrap();
        assert!(RedrawDriver::is_active());
        assert!(driver.is_running());

        let second = RedrawDriver::spawn(|| {}, Duration::from_millis(5));
        assert!(matches!(second, Err(GifViewError::RedrawAlreadyRunning)));

        tokio::time::sleep(Duration::from_millis(60)).await;
        driver.shutdown().await;
        assert!(!RedrawDriver::is_active());

        let stopped_at = count.load(Ordering::SeqCst);
        assert!(stopped_at >= 2, "only {stopped_at} repaints requested");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), stopped_at);

        // Dropping a driver cancels it and frees the slot.
        let dropped = RedrawDriver::spawn(|| {}, Duration::ZERO).unwrap();
        assert_eq!(dropped.tick_interval(), MIN_TICK_INTERVAL);
        drop(dropped);
        wait_until_inactive().await;
        assert!(!RedrawDriver::is_active());

        let again = RedrawDriver::spawn(|| {}, Duration::from_millis(5)).unwrap();
        again.shutdown().await;
    }
}
