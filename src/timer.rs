//! Stopwatch with three states. Elapsed time excludes paused intervals and is
//! derived from the monotonic clock reference while running, never from
//! counting ticks.

use std::time::Duration;

use tokio::time::Instant;

use crate::utils::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Running { reference: Instant },
    Paused { elapsed: Duration },
}

/// What a [Timer::stop] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing accumulated, the machine went back to `Idle`.
    Discarded,
    /// Frozen elapsed time, ready for write-out. The machine stays paused
    /// until [Timer::reset], so a failed write keeps the duration around for
    /// a retry.
    Finished(Duration),
}

pub struct Timer {
    clock: Box<dyn Clock>,
    state: State,
}

impl Timer {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            clock: Box::new(clock),
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Running { .. } => Phase::Running,
            State::Paused { .. } => Phase::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    pub fn elapsed(&self) -> Duration {
        match self.state {
            State::Idle => Duration::ZERO,
            State::Running { reference } => self.clock.instant() - reference,
            State::Paused { elapsed } => elapsed,
        }
    }

    /// Starts or resumes. The reference is shifted back by the accumulated
    /// elapsed so resuming continues the count instead of restarting it.
    /// No-op when already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let reference = self.clock.instant() - self.elapsed();
        self.state = State::Running { reference };
    }

    /// Freezes the accumulated elapsed. No-op unless running.
    pub fn pause(&mut self) {
        if let State::Running { reference } = self.state {
            self.state = State::Paused {
                elapsed: self.clock.instant() - reference,
            };
        }
    }

    /// Finalizes the run. A zero elapsed resets straight to `Idle` and
    /// records nothing; otherwise the frozen value is handed back and the
    /// caller is expected to [Timer::reset] once the write-out succeeded.
    pub fn stop(&mut self) -> StopOutcome {
        let elapsed = self.elapsed();
        if elapsed.is_zero() {
            self.state = State::Idle;
            return StopOutcome::Discarded;
        }
        self.state = State::Paused { elapsed };
        StopOutcome::Finished(elapsed)
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
