use chrono::{Duration, NaiveDateTime};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration as StdDuration, Instant},
};

use super::sim_error::SimError;

/// A fixed-cadence tick source running on its own thread.
///
/// The `Timer` keeps a simulated clock that moves forward by one interval per
/// tick and hands it to the callback together with the tick count. Ticks never
/// overlap: the next one is scheduled only after the callback returns.
pub struct Timer {
    pub current_time: Mutex<NaiveDateTime>,
    interval: StdDuration,
    running: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    /// Creates new timer
    pub fn new(start_time: NaiveDateTime, interval: StdDuration) -> Arc<Self> {
        Arc::new(Self {
            current_time: Mutex::new(start_time),
            interval,
            running: AtomicBool::new(false),
            handle: Mutex::new(None),
        })
    }

    pub fn interval(&self) -> StdDuration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the tick thread and waits for the tick in progress to finish.
    pub fn stop(&self) -> Result<(), SimError> {
        self.running.store(false, Ordering::SeqCst);

        let handle = self
            .handle
            .lock()
            .map_err(|_| SimError::LockError("Failed to lock the timer handle.".to_string()))?
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| SimError::Other("Timer thread panicked.".to_string()))?;
        }
        Ok(())
    }

    /// Starts timer and executes the callback function on each tick.
    pub fn start(
        self: &Arc<Self>,
        mut tick_callback: impl FnMut(NaiveDateTime, usize) + Send + 'static,
    ) -> Result<(), SimError> {
        let mut handle_lock = self
            .handle
            .lock()
            .map_err(|_| SimError::LockError("Failed to lock the timer handle.".to_string()))?;
        if handle_lock.is_some() {
            return Err(SimError::TimerStartError(
                "The timer is already running.".to_string(),
            ));
        }

        let tick_advance = Duration::from_std(self.interval)
            .map_err(|_| SimError::TimerStartError("Interval out of range.".to_string()))?;

        self.running.store(true, Ordering::SeqCst);
        let timer = Arc::clone(self);

        let handle = thread::Builder::new()
            .name("timer-thread".to_string())
            .spawn(move || {
                let mut tick_count = 0;
                while timer.running.load(Ordering::SeqCst) {
                    let now = Instant::now();

                    let current_time = match timer.current_time.lock() {
                        Ok(mut time_lock) => {
                            *time_lock += tick_advance;
                            *time_lock
                        }
                        Err(_) => {
                            eprintln!("Failed to acquire lock on current_time. Skipping tick.");
                            thread::sleep(timer.interval);
                            continue;
                        }
                    };

                    tick_count += 1;

                    tick_callback(current_time, tick_count);

                    let elapsed = now.elapsed();
                    thread::sleep(timer.interval.saturating_sub(elapsed));
                }
            })
            .map_err(|_| {
                self.running.store(false, Ordering::SeqCst);
                SimError::TimerStartError("Failed to start the timer thread.".to_string())
            })?;

        *handle_lock = Some(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::mpsc;

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 1, 10)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_ticks_advance_simulated_clock() {
        let timer = Timer::new(midnight(), StdDuration::from_millis(10));
        let (tx, rx) = mpsc::channel();

        timer
            .start(move |time, count| {
                let _ = tx.send((time, count));
            })
            .unwrap();

        let first = rx.recv_timeout(StdDuration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(StdDuration::from_secs(2)).unwrap();
        timer.stop().unwrap();

        assert_eq!(first, (midnight() + Duration::milliseconds(10), 1));
        assert_eq!(second, (midnight() + Duration::milliseconds(20), 2));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_twice_fails() {
        let timer = Timer::new(midnight(), StdDuration::from_millis(10));
        timer.start(|_, _| {}).unwrap();
        assert!(matches!(
            timer.start(|_, _| {}),
            Err(SimError::TimerStartError(_))
        ));
        timer.stop().unwrap();
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let timer = Timer::new(midnight(), StdDuration::from_millis(5));
        let (tx, rx) = mpsc::channel();
        timer
            .start(move |_, count| {
                let _ = tx.send(count);
            })
            .unwrap();
        rx.recv_timeout(StdDuration::from_secs(2)).unwrap();
        timer.stop().unwrap();

        while rx.try_recv().is_ok() {}
        thread::sleep(StdDuration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let timer = Timer::new(midnight(), StdDuration::from_millis(5));
        assert!(timer.stop().is_ok());
    }
}
