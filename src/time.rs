//! Wall clock to simulated milliseconds.
//!
//! `draw_web()` calls at roughly 60fps with fractional `performance.now()`
//! timestamps. [`SimClock`] turns them into whole elapsed milliseconds for
//! `ClickerGame::tick`, carrying the fractions so no time is lost.

/// Largest delta credited for one frame. A backgrounded tab resumes with a
/// huge gap; it is clamped instead of replayed.
pub const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct SimClock {
    /// Sub-millisecond remainder not yet handed out.
    carry: f64,
    last_timestamp: Option<f64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            carry: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed the current timestamp. Returns whole milliseconds elapsed since
    /// the previous call; the first call returns 0.
    pub fn update(&mut self, now_ms: f64) -> u64 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.carry += delta;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let mut clock = SimClock::new();
        assert_eq!(clock.update(12_345.0), 0);
    }

    #[test]
    fn whole_deltas_pass_through() {
        let mut clock = SimClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(100.0), 100);
        assert_eq!(clock.update(350.0), 250);
    }

    #[test]
    fn fractions_are_carried() {
        let mut clock = SimClock::new();
        clock.update(0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += clock.update(i as f64 * 16.5);
        }
        assert_eq!(total, 990);
    }

    #[test]
    fn backgrounded_tab_is_clamped() {
        let mut clock = SimClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(10_000.0), 500);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut clock = SimClock::new();
        clock.update(1_000.0);
        assert_eq!(clock.update(900.0), 0);
        assert_eq!(clock.update(950.0), 50);
    }
}
