use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Represents an entity responsible for providing time across the application.
/// The stopwatch only ever measures against [Clock::instant], so tests can run
/// it on tokio's paused clock.
pub trait Clock: Send + Sync + 'static {
    /// Wall-clock time, used for the date written into the workbook.
    fn now(&self) -> DateTime<Local>;

    /// Monotonic reference the stopwatch accrues against.
    fn instant(&self) -> Instant;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}
