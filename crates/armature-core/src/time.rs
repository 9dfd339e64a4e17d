use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Simulation time, stored as integer nanoseconds to avoid float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    pub const ZERO: Self = Self { nanos: 0 };

    #[must_use]
    pub const fn new() -> Self {
        Self::ZERO
    }

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        Self {
            nanos: (secs * 1e9) as u64,
        }
    }

    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    #[must_use]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / 1e9
    }

    #[must_use]
    pub fn secs_f32(&self) -> f32 {
        self.secs_f64() as f32
    }

    pub fn advance(&mut self, dt_nanos: u64) {
        self.nanos = self.nanos.saturating_add(dt_nanos);
    }

    pub fn reset(&mut self) {
        self.nanos = 0;
    }

    #[must_use]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}s", self.secs_f64())
    }
}

impl std::ops::Sub for SimTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(rhs.nanos))
    }
}

/// Metadata handed to the IK driver for one fixed step.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Simulation time at the start of the step.
    pub time: SimTime,
    /// Step length in seconds.
    pub dt: f64,
    /// Monotonic step counter, starting at zero.
    pub index: u64,
}

/// Fixed-timestep accumulator.
///
/// The owner feeds in wall-clock durations via [`accumulate`] and drains
/// whole steps via [`next_tick`], which yields a [`TickContext`] per step.
///
/// [`accumulate`]: TickClock::accumulate
/// [`next_tick`]: TickClock::next_tick
#[derive(Debug, Clone)]
pub struct TickClock {
    time: SimTime,
    accumulated: u64,
    timestep_nanos: u64,
    timestep_secs: f64,
    max_ticks: u32,
    ticks_this_frame: u32,
    index: u64,
}

impl TickClock {
    #[must_use]
    pub fn new(timestep_secs: f64) -> Self {
        Self {
            time: SimTime::ZERO,
            accumulated: 0,
            timestep_nanos: (timestep_secs * 1e9) as u64,
            timestep_secs,
            max_ticks: u32::MAX,
            ticks_this_frame: 0,
            index: 0,
        }
    }

    /// Caps the number of ticks drained per `accumulate` call. Prevents a
    /// long stall from producing an unbounded burst of catch-up steps.
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Feed elapsed wall-clock time into the accumulator.
    pub fn accumulate(&mut self, elapsed: Duration) {
        self.accumulated = self
            .accumulated
            .saturating_add(elapsed.as_nanos().min(u128::from(u64::MAX)) as u64);
        self.ticks_this_frame = 0;
    }

    /// Drain one fixed step if enough time has accumulated.
    pub fn next_tick(&mut self) -> Option<TickContext> {
        if self.accumulated < self.timestep_nanos || self.ticks_this_frame >= self.max_ticks {
            return None;
        }
        let ctx = TickContext {
            time: self.time,
            dt: self.timestep_secs,
            index: self.index,
        };
        self.accumulated -= self.timestep_nanos;
        self.time.advance(self.timestep_nanos);
        self.ticks_this_frame += 1;
        self.index += 1;
        Some(ctx)
    }

    #[must_use]
    pub const fn time(&self) -> SimTime {
        self.time
    }

    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.timestep_secs
    }

    pub fn reset(&mut self) {
        self.time.reset();
        self.accumulated = 0;
        self.ticks_this_frame = 0;
        self.index = 0;
    }
}
