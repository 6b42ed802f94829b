//! Throttle and debounce timers for continuous input.
//!
//! Nothing here spawns threads or owns a timer. The host event loop calls
//! `poll` (typically once per frame) and pending invocations fire from
//! there, on the caller's thread.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default throttle window (one frame at 60Hz).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(16);

/// Default debounce delay.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and hand
/// another to a timer.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed.get()
    }
}

/// Limits a callback to one invocation per window.
///
/// The first call in a window fires immediately. Calls arriving inside an
/// active window are buffered and only the latest buffered arguments fire
/// once the window has elapsed (trailing call). A buffered call cannot be
/// cancelled.
pub struct Throttle<A, F, C = SystemClock>
where
    F: FnMut(A),
    C: Clock,
{
    callback: F,
    limit: Duration,
    clock: C,
    last_fired: Option<Instant>,
    trailing: Option<A>,
}

impl<A, F> Throttle<A, F>
where
    F: FnMut(A),
{
    /// Create a throttle driven by the system clock.
    pub fn new(limit: Duration, callback: F) -> Self {
        Self::with_clock(limit, SystemClock, callback)
    }
}

impl<A, F, C> Throttle<A, F, C>
where
    F: FnMut(A),
    C: Clock,
{
    pub fn with_clock(limit: Duration, clock: C, callback: F) -> Self {
        Self {
            callback,
            limit,
            clock,
            last_fired: None,
            trailing: None,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) => now.duration_since(last) < self.limit,
            None => false,
        }
    }

    /// Invoke now if the window allows it, otherwise buffer `args` as the
    /// trailing call (replacing any earlier buffered arguments).
    /// Returns true if the callback ran.
    pub fn call(&mut self, args: A) -> bool {
        let now = self.clock.now();
        if self.window_open(now) {
            self.trailing = Some(args);
            return false;
        }
        // A newer call supersedes a trailing call nobody polled for.
        self.trailing = None;
        self.fire(args, now);
        true
    }

    /// Fire the trailing call if its window has elapsed.
    /// Returns true if the callback ran.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        if self.trailing.is_none() || self.window_open(now) {
            return false;
        }
        match self.trailing.take() {
            Some(args) => {
                self.fire(args, now);
                true
            }
            None => false,
        }
    }

    /// Fire the trailing call immediately, ignoring the window.
    pub fn flush(&mut self) -> bool {
        match self.trailing.take() {
            Some(args) => {
                let now = self.clock.now();
                self.fire(args, now);
                true
            }
            None => false,
        }
    }

    /// Whether a trailing call is buffered.
    pub fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }

    fn fire(&mut self, args: A, now: Instant) {
        self.last_fired = Some(now);
        (self.callback)(args);
    }
}

/// Delays a callback until calls have stopped for a full delay period.
///
/// Every call replaces the pending arguments and restarts the delay.
pub struct Debounce<A, F, C = SystemClock>
where
    F: FnMut(A),
    C: Clock,
{
    callback: F,
    delay: Duration,
    clock: C,
    pending: Option<(A, Instant)>,
}

impl<A, F> Debounce<A, F>
where
    F: FnMut(A),
{
    /// Create a debounce driven by the system clock.
    pub fn new(delay: Duration, callback: F) -> Self {
        Self::with_clock(delay, SystemClock, callback)
    }
}

impl<A, F, C> Debounce<A, F, C>
where
    F: FnMut(A),
    C: Clock,
{
    pub fn with_clock(delay: Duration, clock: C, callback: F) -> Self {
        Self {
            callback,
            delay,
            clock,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `args`, cancelling whatever was pending.
    pub fn call(&mut self, args: A) {
        let deadline = self.clock.now() + self.delay;
        self.pending = Some((args, deadline));
    }

    /// Fire the pending call if its deadline has passed.
    pub fn poll(&mut self) -> bool {
        let due = match &self.pending {
            Some((_, deadline)) => self.clock.now() >= *deadline,
            None => false,
        };
        if due {
            return self.flush();
        }
        false
    }

    /// Fire the pending call immediately.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((args, _)) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }

    /// Drop the pending call without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl FnMut(i32)) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn test_throttle_first_call_fires() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut throttle = Throttle::with_clock(DEFAULT_THROTTLE, clock.clone(), cb);

        assert!(throttle.call(1));
        assert_eq!(*calls.borrow(), vec![1]);
    }

    #[test]
    fn test_throttle_trailing_uses_latest_args() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut throttle = Throttle::with_clock(Duration::from_millis(16), clock.clone(), cb);

        throttle.call(1);
        clock.advance(Duration::from_millis(4));
        assert!(!throttle.call(2));
        assert!(!throttle.call(3));
        assert!(throttle.has_trailing());

        // Window still open.
        clock.advance(Duration::from_millis(4));
        assert!(!throttle.poll());

        clock.advance(Duration::from_millis(8));
        assert!(throttle.poll());
        assert_eq!(*calls.borrow(), vec![1, 3]);
        assert!(!throttle.has_trailing());
    }

    #[test]
    fn test_throttle_fires_again_after_window() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut throttle = Throttle::with_clock(Duration::from_millis(16), clock.clone(), cb);

        throttle.call(1);
        clock.advance(Duration::from_millis(20));
        assert!(throttle.call(2));
        assert!(!throttle.poll());
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_throttle_trailing_restarts_window() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut throttle = Throttle::with_clock(Duration::from_millis(16), clock.clone(), cb);

        throttle.call(1);
        throttle.call(2);
        clock.advance(Duration::from_millis(16));
        assert!(throttle.poll());

        // The trailing call opened a fresh window.
        clock.advance(Duration::from_millis(5));
        assert!(!throttle.call(3));
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_throttle_flush() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut throttle = Throttle::with_clock(Duration::from_millis(16), clock.clone(), cb);

        throttle.call(1);
        throttle.call(2);
        assert!(throttle.flush());
        assert!(!throttle.flush());
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut debounce = Debounce::with_clock(DEFAULT_DEBOUNCE, clock.clone(), cb);

        debounce.call(1);
        clock.advance(Duration::from_millis(200));
        debounce.call(2);
        clock.advance(Duration::from_millis(200));
        assert!(!debounce.poll());
        assert!(calls.borrow().is_empty());

        clock.advance(Duration::from_millis(100));
        assert!(debounce.poll());
        assert_eq!(*calls.borrow(), vec![2]);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_debounce_cancel() {
        let clock = ManualClock::new();
        let (calls, cb) = recorder();
        let mut debounce = Debounce::with_clock(Duration::from_millis(300), clock.clone(), cb);

        debounce.call(1);
        debounce.cancel();
        clock.advance(Duration::from_secs(1));
        assert!(!debounce.poll());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();
        clock.advance(Duration::from_millis(50));
        assert_eq!(other.now().duration_since(start), Duration::from_millis(50));
    }
}
