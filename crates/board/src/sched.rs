use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, sync_channel};
use std::thread;
use std::time::{Duration, Instant};

/// Redraw triggers fire at most this often.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_micros(1_000_000 / 144);

const FRAME_QUEUE_CAPACITY: usize = 10;

/// Debounces redraw requests to a maximum frame rate.
///
/// `request_frame` may be called at any frequency from any thread; the
/// worker fires the injected trigger at most once per interval and
/// collapses bursts, always ending a burst with exactly one trigger.
/// Requests arriving while the bounded queue is full are no-ops; they
/// are already satisfied by the pending fire.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    tx: SyncSender<()>,
}

impl FrameScheduler {
    pub fn spawn<F>(interval: Duration, fire: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = sync_channel(FRAME_QUEUE_CAPACITY);
        thread::spawn(move || run(rx, interval, fire));
        Self { tx }
    }

    pub fn with_defaults<F>(fire: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        Self::spawn(MIN_FRAME_INTERVAL, fire)
    }

    /// Scheduler that swallows every request. Headless use and tests.
    pub fn noop() -> Self {
        Self::spawn(MIN_FRAME_INTERVAL, || {})
    }

    pub fn request_frame(&self) {
        // Full queue or a gone worker both mean no trigger is owed.
        let _ = self.tx.try_send(());
    }
}

fn run<F: Fn()>(rx: Receiver<()>, interval: Duration, fire: F) {
    let mut last_fire: Option<Instant> = None;
    while rx.recv().is_ok() {
        if let Some(last) = last_fire {
            let since = last.elapsed();
            if since < interval {
                let mut remaining = interval - since;
                // Wait out the rest of the interval, folding every request
                // that lands meanwhile into the single upcoming fire.
                loop {
                    let wait_started = Instant::now();
                    match rx.recv_timeout(remaining) {
                        Ok(()) => {
                            let waited = wait_started.elapsed();
                            if waited >= remaining {
                                break;
                            }
                            remaining -= waited;
                        }
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
            }
        }
        fire();
        last_fire = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_scheduler(interval: Duration) -> (FrameScheduler, Arc<AtomicUsize>) {
        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);
        let scheduler = FrameScheduler::spawn(interval, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (scheduler, fires)
    }

    #[test]
    fn single_request_fires_once() {
        let (scheduler, fires) = counting_scheduler(Duration::from_millis(20));
        scheduler.request_frame();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(fires.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn burst_coalesces_but_never_drops_the_last_request() {
        let (scheduler, fires) = counting_scheduler(Duration::from_millis(40));
        for _ in 0..50 {
            scheduler.request_frame();
        }
        thread::sleep(Duration::from_millis(200));
        let fired = fires.load(Ordering::SeqCst);
        assert!(fired >= 1, "burst must end with a fire");
        assert!(fired <= 2, "burst of instantaneous requests fired {fired} times");
    }

    #[test]
    fn sustained_requests_are_rate_limited() {
        let interval = Duration::from_millis(50);
        let (scheduler, fires) = counting_scheduler(interval);

        let start = Instant::now();
        while start.elapsed() < Duration::from_millis(300) {
            scheduler.request_frame();
            thread::sleep(Duration::from_millis(2));
        }
        thread::sleep(Duration::from_millis(100));

        let fired = fires.load(Ordering::SeqCst);
        assert!(fired >= 3, "starved: only {fired} fires");
        assert!(fired <= 9, "rate limit exceeded: {fired} fires in ~300ms at 50ms");
    }

    #[test]
    fn quiescence_then_new_request_fires_again() {
        let (scheduler, fires) = counting_scheduler(Duration::from_millis(20));
        scheduler.request_frame();
        thread::sleep(Duration::from_millis(80));
        let after_first = fires.load(Ordering::SeqCst);

        scheduler.request_frame();
        thread::sleep(Duration::from_millis(80));
        assert_eq!(fires.load(Ordering::SeqCst), after_first + 1);
    }
}
