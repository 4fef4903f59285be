//! A thread which repeatedly calls a callback at a (roughly) fixed rate.

use atomic::Atomic;
use std::{
    ops::DerefMut,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

pub struct TimerThread {
    cb: Arc<Mutex<dyn FnMut() + Send + 'static>>,
    thread: Option<JoinHandle<()>>,

    counter_secs: Arc<Atomic<f64>>,
    interval_secs: Arc<Atomic<f64>>,

    sentinel: Arc<AtomicBool>,
}

impl TimerThread {
    pub fn new<F: FnMut() + Send + 'static>(cb: F) -> Self {
        Self {
            cb: Arc::new(Mutex::new(cb)),
            thread: None,

            counter_secs: Arc::new(Atomic::new(0.0)),
            interval_secs: Arc::new(Atomic::new(0.0)),

            sentinel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts calling the callback every `interval_secs` seconds. Does nothing
    /// if the thread is already running.
    pub fn start(&mut self, interval_secs: f64) {
        if self.thread.is_some() {
            return;
        }

        self.counter_secs.store(0.0, Ordering::Release);
        self.interval_secs.store(interval_secs, Ordering::Release);
        self.sentinel.store(true, Ordering::Release);

        let counter = Arc::clone(&self.counter_secs);
        let interval = Arc::clone(&self.interval_secs);
        let sentinel = Arc::clone(&self.sentinel);
        let cb = Arc::clone(&self.cb);

        let thread = std::thread::spawn(move || {
            let mut now = Instant::now();
            let mut dt = || {
                // sleeping briefly lets more time accumulate per step, which
                // reduces errors from a lack of nanosecond precision.
                std::thread::sleep(Duration::from_micros(20));

                let elapsed = now.elapsed().as_secs_f64();
                now = Instant::now();
                elapsed
            };

            while sentinel.load(Ordering::Acquire) {
                let curr_count = counter.load(Ordering::Acquire);
                let curr_interval = interval.load(Ordering::Acquire);

                if curr_count >= curr_interval {
                    if let Ok(mut guard) = cb.lock() {
                        guard.deref_mut()();
                    }

                    // never let a long stall turn into a burst of callbacks
                    let remainder = (curr_count - curr_interval).min(curr_interval);
                    counter.store(remainder, Ordering::Release);
                    _ = dt();

                    continue;
                }

                counter.store(curr_count + dt(), Ordering::Release);
            }
        });

        self.thread = Some(thread);
    }

    pub fn start_hz(&mut self, interval_rate_hz: f64) {
        self.start(interval_rate_hz.recip());
    }

    /// Changes the interval of the timer. Takes effect from the next step if
    /// the thread is running.
    pub fn set_interval(&self, interval_secs: f64) {
        self.interval_secs.store(interval_secs, Ordering::Release);
    }

    pub fn set_rate_hz(&self, interval_rate_hz: f64) {
        self.set_interval(interval_rate_hz.recip());
    }

    /// Stops the thread, blocking until it has finished its current step.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.sentinel.store(false, Ordering::Release);

            if thread.join().is_err() {
                log::error!("timer thread panicked before it was stopped");
            }
        }
    }

    pub const fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_timer_calls_back_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = Arc::clone(&count);

        let mut timer = TimerThread::new(move || {
            cb_count.fetch_add(1, Ordering::Relaxed);
        });

        timer.start_hz(1000.0);
        assert!(timer.is_running());
        std::thread::sleep(Duration::from_millis(50));
        timer.stop();

        let after_stop = count.load(Ordering::Relaxed);
        assert!(after_stop > 0);
        assert!(!timer.is_running());

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::Relaxed), after_stop);
    }

    #[test]
    fn test_rate_can_change() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = Arc::clone(&count);

        let mut timer = TimerThread::new(move || {
            cb_count.fetch_add(1, Ordering::Relaxed);
        });

        timer.start_hz(1.0);
        timer.set_rate_hz(1000.0);
        std::thread::sleep(Duration::from_millis(100));
        timer.stop();

        assert!(count.load(Ordering::Relaxed) > 10);
    }
}
