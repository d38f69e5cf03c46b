use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond clock injected into animation and timer logic.
///
/// Separating the clock from the state machines keeps height interpolation
/// and settle delays testable without a real rendering clock.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Wall clock measured from construction
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss)]
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }
}

/// Manually advanced clock for driving logical time in tests and replays
#[derive(Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
