//! ============================================================================
//! Sleep Simulation - Cosmetic stat extrapolation while the pet sleeps
//! ============================================================================
//! The chain only reports stats when queried. Between refreshes the
//! dashboard extrapolates energy up and hunger/happiness down so the bars
//! move. These values are never authoritative and are reset whenever a
//! fresh snapshot arrives.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::types::{GameBalance, Stats};

/// Default simulation tick
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Fractional stats shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DisplayStats {
    pub energy: f64,
    pub hunger: f64,
    pub happiness: f64,
}

impl From<Stats> for DisplayStats {
    fn from(stats: Stats) -> Self {
        Self {
            energy: stats.energy as f64,
            hunger: stats.hunger as f64,
            happiness: stats.happiness as f64,
        }
    }
}

/// Points moved per tick for a "milliseconds per point" rate.
/// A zero rate means the stat does not move.
fn per_tick(tick: Duration, ms_per_point: u64) -> f64 {
    if ms_per_point == 0 {
        return 0.0;
    }
    tick.as_millis() as f64 / ms_per_point as f64
}

/// Advance displayed stats by one tick of sleep
pub fn sleep_tick(prev: DisplayStats, balance: &GameBalance, tick: Duration) -> DisplayStats {
    let max = balance.max_stat as f64;
    let clamp = |v: f64| v.clamp(0.0, max);

    DisplayStats {
        energy: clamp(prev.energy + per_tick(tick, balance.sleep_energy_gain_ms)),
        hunger: clamp(prev.hunger - per_tick(tick, balance.sleep_hunger_loss_ms)),
        happiness: clamp(prev.happiness - per_tick(tick, balance.sleep_happiness_loss_ms)),
    }
}

/// Repeating simulation task. Aborted on drop.
pub struct SleepTicker {
    handle: JoinHandle<()>,
}

impl SleepTicker {
    /// Start ticking `display`; the first tick lands one `tick` from now
    pub fn start(display: Arc<RwLock<DisplayStats>>, balance: GameBalance, tick: Duration) -> Self {
        info!("Starting sleep simulation ({} ms tick)", tick.as_millis());

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut stats = display.write().await;
                *stats = sleep_tick(*stats, &balance, tick);
                debug!(
                    "Sleep tick: energy {:.2}, hunger {:.2}, happiness {:.2}",
                    stats.energy, stats.hunger, stats.happiness
                );
            }
        });

        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SleepTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Sleep simulation stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::eligibility::fixtures::balance;

    fn stats(energy: f64, hunger: f64, happiness: f64) -> DisplayStats {
        DisplayStats {
            energy,
            hunger,
            happiness,
        }
    }

    #[test]
    fn test_energy_gain_per_tick() {
        let balance = balance();
        let next = sleep_tick(stats(50.0, 50.0, 50.0), &balance, DEFAULT_TICK);
        assert_eq!(next.energy, 51.0);
    }

    #[test]
    fn test_hunger_loss_per_tick() {
        let balance = balance();
        let next = sleep_tick(stats(50.0, 50.0, 50.0), &balance, DEFAULT_TICK);
        assert_eq!(next.hunger, 48.0);
        assert_eq!(next.happiness, 49.0);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let balance = balance();
        let next = sleep_tick(stats(100.0, 1.0, 0.5), &balance, DEFAULT_TICK);
        assert_eq!(next.energy, 100.0);
        assert_eq!(next.hunger, 0.0);
        assert_eq!(next.happiness, 0.0);
    }

    #[test]
    fn test_zero_rate_holds_stat() {
        let mut balance = balance();
        balance.sleep_energy_gain_ms = 0;
        let next = sleep_tick(stats(10.0, 10.0, 10.0), &balance, DEFAULT_TICK);
        assert_eq!(next.energy, 10.0);
    }

    #[test]
    fn test_rate_scales_with_tick() {
        let balance = balance();
        let next = sleep_tick(stats(10.0, 10.0, 10.0), &balance, Duration::from_millis(500));
        assert_eq!(next.energy, 10.5);
        assert_eq!(next.hunger, 9.0);
    }

    #[test]
    fn test_long_step_matches_repeated_ticks() {
        let balance = balance();
        let start = stats(95.0, 10.0, 50.0);

        let mut stepped = start;
        for _ in 0..5 {
            stepped = sleep_tick(stepped, &balance, DEFAULT_TICK);
        }
        assert_eq!(sleep_tick(start, &balance, Duration::from_secs(5)), stepped);
        assert_eq!(stepped, stats(100.0, 0.0, 45.0));

        let settled = sleep_tick(start, &balance, Duration::from_millis(u64::MAX));
        assert_eq!(settled, stats(100.0, 0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_and_stops() {
        let display = Arc::new(RwLock::new(stats(10.0, 10.0, 10.0)));
        let ticker = SleepTicker::start(display.clone(), balance(), DEFAULT_TICK);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(display.read().await.energy, 10.0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(display.read().await.energy, 11.0);
        assert!(ticker.is_running());

        ticker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(display.read().await.energy, 11.0);
    }
}
