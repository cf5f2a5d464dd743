//! Second-granularity counting clocks driven by the engine's ticker

/// Direction a clock counts in on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDirection {
    Down,
    Up,
}

/// A counting clock advanced one second at a time.
///
/// Clocks never schedule themselves; whoever owns the engine calls
/// [`Clock::tick`] once per elapsed second. A clock that is paused, or was
/// never started, yields no tick value.
pub trait Clock {
    /// Create a paused clock counting in `direction` from `origin`
    fn create(direction: CountDirection, origin: i64) -> Self
    where
        Self: Sized;

    /// Resume ticking. Starting a running clock is a no-op.
    fn start(&mut self);

    /// Halt ticking without touching the count
    fn pause(&mut self);

    /// Set the counting origin
    fn reset(&mut self, value: i64);

    fn is_running(&self) -> bool;

    /// Advance by one second, returning the new count if the clock is running
    fn tick(&mut self) -> Option<i64>;
}

/// Default in-memory clock
#[derive(Debug, Clone)]
pub struct TickClock {
    direction: CountDirection,
    count: i64,
    running: bool,
}

impl TickClock {
    /// Current count, regardless of whether the clock is running
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn direction(&self) -> CountDirection {
        self.direction
    }
}

impl Clock for TickClock {
    fn create(direction: CountDirection, origin: i64) -> Self {
        Self {
            direction,
            count: origin,
            running: false,
        }
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn reset(&mut self, value: i64) {
        self.count = value;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn tick(&mut self) -> Option<i64> {
        if !self.running {
            return None;
        }
        self.count = match self.direction {
            CountDirection::Down => self.count - 1,
            CountDirection::Up => self.count + 1,
        };
        Some(self.count)
    }
}

/// The turn clock and alert clock, always created together
#[derive(Debug, Clone)]
pub struct ClockPair<C> {
    /// Counts down the current turn
    pub turn: C,
    /// Counts up elapsed alert seconds after a turn expires
    pub alert: C,
}

impl<C: Clock> ClockPair<C> {
    pub fn new(seconds_per_turn: i64) -> Self {
        Self {
            turn: C::create(CountDirection::Down, seconds_per_turn),
            alert: C::create(CountDirection::Up, 0),
        }
    }
}
