//! Auto-click scheduling on simulated milliseconds.
//!
//! The frame loop converts wall-clock time into elapsed milliseconds and
//! feeds it here. Timers carry leftover time between calls, so a period is
//! never counted twice and never dropped.

use super::state::GameState;

/// A repeating countdown on simulated time.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatingTimer {
    period_ms: u64,
    elapsed_ms: u64,
}

impl RepeatingTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Time accumulated towards the next fire.
    #[cfg(test)]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Advance by `delta_ms`. Returns how many periods completed.
    pub fn advance(&mut self, delta_ms: u64) -> u32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        let fires = self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        fires.min(u32::MAX as u64) as u32
    }

    /// A timer with a new period that keeps this one's progress.
    /// Progress beyond the new period is capped so it fires once, not twice.
    fn rescheduled(&self, period_ms: u64) -> Self {
        let mut next = Self::new(period_ms);
        next.elapsed_ms = self.elapsed_ms.min(next.period_ms);
        next
    }
}

/// Identifies one armed auto-click timer. A new handle is issued every
/// time the timer is (re)armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Owns the single auto-click timer.
#[derive(Debug, Default)]
pub struct AutoClickScheduler {
    armed: Option<(TimerHandle, RepeatingTimer)>,
    next_handle: u64,
}

impl AutoClickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.armed.as_ref().map(|(h, _)| *h)
    }

    pub fn timer(&self) -> Option<&RepeatingTimer> {
        self.armed.as_ref().map(|(_, t)| t)
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    fn arm(&mut self, timer: RepeatingTimer) {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.armed = Some((handle, timer));
    }

    /// Bring the timer in line with `state`: stopped without auto-click
    /// levels, otherwise exactly one timer at `auto_click_interval`.
    /// Safe to call repeatedly; an up-to-date timer is left alone.
    pub fn sync(&mut self, state: &GameState) {
        if state.auto_click_power == 0 {
            self.cancel();
            return;
        }
        let period = state.auto_click_interval;
        match self.armed.take() {
            None => self.arm(RepeatingTimer::new(period)),
            Some((handle, timer)) if timer.period_ms() == period => {
                self.armed = Some((handle, timer));
            }
            Some((_, timer)) => self.arm(timer.rescheduled(period)),
        }
    }

    /// Advance simulated time and credit auto-click yield for every
    /// completed period. Returns the number of fires; the caller saves when
    /// this is non-zero.
    pub fn advance(&mut self, delta_ms: u64, state: &mut GameState) -> u32 {
        let Some((_, timer)) = self.armed.as_mut() else {
            return 0;
        };
        if state.auto_click_power == 0 {
            return 0;
        }
        let fires = timer.advance(delta_ms);
        state.points += (state.auto_click_power * u64::from(fires)) as f64;
        fires
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_split_advance_matches_single(
            period in 1u64..20_000,
            a in 0u64..50_000,
            b in 0u64..50_000,
        ) {
            let mut split = RepeatingTimer::new(period);
            let mut whole = RepeatingTimer::new(period);
            let fires = split.advance(a) + split.advance(b);
            prop_assert_eq!(fires, whole.advance(a + b));
            prop_assert_eq!(split.elapsed_ms(), whole.elapsed_ms());
        }

        #[test]
        fn prop_fire_count_is_elapsed_over_period(
            power in 1u64..100,
            interval in 1_000u64..=10_000,
            delta in 0u64..200_000,
        ) {
            let mut state = GameState::new();
            state.auto_click_power = power;
            state.auto_click_interval = interval;
            let mut sched = AutoClickScheduler::new();
            sched.sync(&state);
            let fires = sched.advance(delta, &mut state);
            prop_assert_eq!(u64::from(fires), delta / interval);
            prop_assert_eq!(state.points, (power * (delta / interval)) as f64);
        }
    }
}
