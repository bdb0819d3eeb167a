//! Fixed-interval tick scheduling with skip-on-overlap.
//!
//! Ticks run one after another on the calling task. A tick that overruns its
//! interval causes the missed slots to be dropped, never queued.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use flume::Receiver;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Clone, Copy, Debug)]
pub struct Schedule {
    period: Duration,
    align_to_clock: bool,
}

impl Schedule {
    /// `align_to_clock` places ticks on wall-clock multiples of `period`
    /// (e.g. on the full minute) instead of counting from start-up.
    pub fn new(period: Duration, align_to_clock: bool) -> Self {
        assert!(!period.is_zero(), "tick period must be positive");
        Schedule {
            period,
            align_to_clock,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Delay before the first tick
    pub fn start_delay(&self, now: SystemTime) -> Duration {
        if !self.align_to_clock {
            return Duration::ZERO;
        }
        let period = self.period.as_millis().max(1);
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let until_boundary = period - since_epoch % period;
        Duration::from_millis(u64::try_from(until_boundary).unwrap_or(u64::MAX))
    }

    /// Whole periods a tick of length `elapsed` ran past its slot
    pub fn skipped_ticks(&self, elapsed: Duration) -> u128 {
        elapsed.as_nanos() / self.period.as_nanos()
    }

    /// Timer firing on this schedule. Must be called inside a tokio runtime.
    pub fn interval(&self) -> Interval {
        let delay = self.start_delay(SystemTime::now());
        if !delay.is_zero() {
            log::debug!("Aligning first tick to the clock, waiting {:?}", delay);
        }
        let start = Instant::now()
            .checked_add(delay)
            .unwrap_or_else(Instant::now);
        let mut timer = interval_at(start, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }
}

/// Run `tick` on `schedule` until `shutdown` fires or its sender goes away.
/// A tick in progress always runs to completion.
pub async fn run_schedule<F: FnMut()>(schedule: &Schedule, shutdown: &Receiver<()>, mut tick: F) {
    let mut timer = schedule.interval();

    loop {
        tokio::select! {
            biased;
            signal = shutdown.recv_async() => {
                match signal {
                    Ok(()) => log::info!("Shutdown requested, scheduler stopped"),
                    Err(_) => log::info!("Shutdown channel closed, scheduler stopped"),
                }
                return;
            }
            _ = timer.tick() => {}
        }

        let started = Instant::now();
        tick();
        let skipped = schedule.skipped_ticks(started.elapsed());
        if skipped > 0 {
            log::warn!(
                "Tick took longer than the {:?} period, skipping {} tick(s)",
                schedule.period(),
                skipped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_start_delay() {
        let now = UNIX_EPOCH + Duration::from_secs(125);
        assert_eq!(Schedule::new(MINUTE, false).start_delay(now), Duration::ZERO);
        assert_eq!(
            Schedule::new(MINUTE, true).start_delay(now),
            Duration::from_secs(55)
        );
    }

    #[test]
    fn test_start_delay_on_boundary_waits_full_period() {
        let now = UNIX_EPOCH + Duration::from_secs(120);
        assert_eq!(Schedule::new(MINUTE, true).start_delay(now), MINUTE);
    }

    #[test]
    fn test_start_delay_with_long_period_is_not_truncated() {
        let period = Duration::from_secs(20_000_000_000);
        let now = UNIX_EPOCH + Duration::from_secs(1);
        assert_eq!(
            Schedule::new(period, true).start_delay(now),
            period - Duration::from_secs(1)
        );
    }

    #[test]
    fn test_skipped_ticks() {
        let schedule = Schedule::new(MINUTE, false);
        assert_eq!(schedule.skipped_ticks(Duration::from_secs(3)), 0);
        assert_eq!(schedule.skipped_ticks(Duration::from_secs(150)), 2);
        assert_eq!(
            Schedule::new(Duration::from_secs(20_000_000_000), false)
                .skipped_ticks(Duration::from_secs(1)),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_skips_missed_ticks() {
        let mut timer = Schedule::new(MINUTE, false).interval();
        assert_eq!(timer.missed_tick_behavior(), MissedTickBehavior::Skip);

        let first = timer.tick().await;
        tokio::time::advance(Duration::from_secs(150)).await;
        // Late tick fires at once, the next one lands on the following slot
        timer.tick().await;
        let next = timer.tick().await;
        assert_eq!(next - first, Duration::from_secs(180));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_schedule_stops_on_shutdown() {
        let (tx, rx) = flume::bounded(1);
        let mut ticks = 0;
        run_schedule(&Schedule::new(Duration::from_millis(5), false), &rx, || {
            ticks += 1;
            if ticks == 3 {
                tx.send(()).unwrap();
            }
        })
        .await;
        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_schedule_stops_when_sender_dropped() {
        let (tx, rx) = flume::bounded::<()>(1);
        drop(tx);
        let mut ticks = 0;
        run_schedule(&Schedule::new(MINUTE, false), &rx, || ticks += 1).await;
        assert_eq!(ticks, 0);
    }
}
