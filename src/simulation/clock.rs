use std::fmt;

/// Half of the day/night cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Day,
    Night,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Day => "day",
            Phase::Night => "night",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulation time and the day/night phase derived from it.
///
/// The phase is always `Night` exactly when
/// `elapsed_ms mod cycle_ms >= cycle_ms / 2`.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    elapsed_ms: f64,
    cycle_start_ms: f64,
    cycle_ms: f64,
    phase: Phase,
}

impl SimulationClock {
    pub fn new(cycle_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            cycle_start_ms: 0.0,
            cycle_ms,
            phase: Phase::Day,
        }
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Start of the current cycle
    #[inline]
    pub fn cycle_start_ms(&self) -> f64 {
        self.cycle_start_ms
    }

    #[inline]
    pub fn cycle_ms(&self) -> f64 {
        self.cycle_ms
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_night(&self) -> bool {
        self.phase == Phase::Night
    }

    /// Time into the current cycle
    #[inline]
    pub fn cycle_time(&self) -> f64 {
        self.elapsed_ms - self.cycle_start_ms
    }

    /// Inside the `window_ms` right after the quarter-cycle mark
    pub fn is_midday(&self, window_ms: f64) -> bool {
        let quarter = self.cycle_ms / 4.0;
        let t = self.cycle_time();
        t >= quarter && t < quarter + window_ms
    }

    /// Advance time. Returns the new phase when this step crossed into it.
    pub fn advance(&mut self, dt_ms: f64) -> Option<Phase> {
        self.elapsed_ms += dt_ms.max(0.0);
        self.cycle_start_ms = (self.elapsed_ms / self.cycle_ms).floor() * self.cycle_ms;

        let phase = if self.cycle_time() >= self.cycle_ms / 2.0 {
            Phase::Night
        } else {
            Phase::Day
        };
        if phase == self.phase {
            return None;
        }
        self.phase = phase;
        Some(phase)
    }
}
