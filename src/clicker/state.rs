//! MMF Clicker progression state and balance constants.

use std::collections::BTreeSet;

// ── Balance ─────────────────────────────────────────────────────

pub const BASE_CLICK_POWER: u64 = 1;
pub const BASE_CLICK_POWER_COST: u64 = 100;
/// Flat increase of the click power price after every purchase.
pub const CLICK_POWER_COST_STEP: u64 = 250;
pub const BASE_AUTO_CLICK_POWER_COST: u64 = 1_000_000;
/// Auto-click price grows by 3/2 per purchase, rounded down.
pub const AUTO_CLICK_COST_GROWTH: (u64, u64) = (3, 2);
pub const BASE_AUTO_CLICK_INTERVAL_MS: u64 = 10_000;
pub const MIN_AUTO_CLICK_INTERVAL_MS: u64 = 1_000;
pub const AUTO_CLICK_INTERVAL_STEP_MS: u64 = 100;
/// Rebirth price. Does not scale with the number of rebirths.
pub const REBIRTH_COST: u64 = 1_000_000;

pub const DEFAULT_CLICKER_ID: &str = "clicker";

// ── Clicker skins ───────────────────────────────────────────────

/// A purchasable clicker skin.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickerEntry {
    /// Stable identifier, also the value written to storage.
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
}

const CLICKERS: &[ClickerEntry] = &[
    ClickerEntry {
        id: DEFAULT_CLICKER_ID,
        name: "Default Clicker",
        cost: 0,
    },
    ClickerEntry {
        id: "new_clicker1",
        name: "MMF Mama",
        cost: 10_000_000,
    },
    ClickerEntry {
        id: "new_clicker2",
        name: "MMF Chad",
        cost: 50_000_000,
    },
];

/// All clicker skins in shop order.
pub fn clicker_catalog() -> &'static [ClickerEntry] {
    CLICKERS
}

/// Look up a clicker skin by id.
pub fn find_clicker(id: &str) -> Option<&'static ClickerEntry> {
    CLICKERS.iter().find(|c| c.id == id)
}

// ── Settings ────────────────────────────────────────────────────

/// Presentation toggles. Consulted by audio playback, persisted with the game.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub sound_on: bool,
    pub music_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            music_on: true,
        }
    }
}

// ── GameState ───────────────────────────────────────────────────

/// The canonical progression record.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub points: f64,
    pub click_power: u64,
    /// Auto-click levels bought; also the yield per scheduler tick.
    pub auto_click_power: u64,
    pub click_power_cost: u64,
    pub auto_click_power_cost: u64,
    pub auto_click_interval: u64,
    pub rebirth_count: u32,
    pub equipped_clicker: String,
    pub owned_clickers: BTreeSet<String>,
    pub settings: Settings,
}

/// Reason a state fails [`GameState::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidState {
    #[error("points must be a finite non-negative number (got {0})")]
    Points(f64),
    #[error("click power must be at least 1")]
    ClickPower,
    #[error("{0} must be at least 1")]
    ZeroCost(&'static str),
    #[error("auto-click interval {0}ms is outside 1000..=10000ms")]
    Interval(u64),
    #[error("unknown clicker `{0}`")]
    UnknownClicker(String),
    #[error("equipped clicker `{0}` is not owned")]
    NotOwned(String),
}

impl GameState {
    pub fn new() -> Self {
        Self {
            points: 0.0,
            click_power: BASE_CLICK_POWER,
            auto_click_power: 0,
            click_power_cost: BASE_CLICK_POWER_COST,
            auto_click_power_cost: BASE_AUTO_CLICK_POWER_COST,
            auto_click_interval: BASE_AUTO_CLICK_INTERVAL_MS,
            rebirth_count: 0,
            equipped_clicker: DEFAULT_CLICKER_ID.to_string(),
            owned_clickers: BTreeSet::from([DEFAULT_CLICKER_ID.to_string()]),
            settings: Settings::default(),
        }
    }

    pub fn equipped(&self) -> Option<&'static ClickerEntry> {
        find_clicker(&self.equipped_clicker)
    }

    pub fn owns(&self, id: &str) -> bool {
        self.owned_clickers.contains(id)
    }

    /// Check every economy invariant.
    pub fn validate(&self) -> Result<(), InvalidState> {
        if !self.points.is_finite() || self.points < 0.0 {
            return Err(InvalidState::Points(self.points));
        }
        if self.click_power == 0 {
            return Err(InvalidState::ClickPower);
        }
        if self.click_power_cost == 0 {
            return Err(InvalidState::ZeroCost("click power cost"));
        }
        if self.auto_click_power_cost == 0 {
            return Err(InvalidState::ZeroCost("auto-click cost"));
        }
        if !(MIN_AUTO_CLICK_INTERVAL_MS..=BASE_AUTO_CLICK_INTERVAL_MS)
            .contains(&self.auto_click_interval)
        {
            return Err(InvalidState::Interval(self.auto_click_interval));
        }
        if let Some(unknown) = self.owned_clickers.iter().find(|id| find_clicker(id).is_none()) {
            return Err(InvalidState::UnknownClicker(unknown.clone()));
        }
        if find_clicker(&self.equipped_clicker).is_none() {
            return Err(InvalidState::UnknownClicker(self.equipped_clicker.clone()));
        }
        if !self.owns(&self.equipped_clicker) {
            return Err(InvalidState::NotOwned(self.equipped_clicker.clone()));
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_uses_base_constants() {
        let s = GameState::new();
        assert_eq!(s.points, 0.0);
        assert_eq!(s.click_power, 1);
        assert_eq!(s.auto_click_power, 0);
        assert_eq!(s.click_power_cost, 100);
        assert_eq!(s.auto_click_power_cost, 1_000_000);
        assert_eq!(s.auto_click_interval, 10_000);
        assert_eq!(s.rebirth_count, 0);
        assert_eq!(s.equipped_clicker, "clicker");
        assert!(s.settings.sound_on && s.settings.music_on);
    }

    #[test]
    fn new_state_is_valid() {
        assert_eq!(GameState::new().validate(), Ok(()));
    }

    #[test]
    fn default_clicker_is_free_and_owned() {
        let s = GameState::new();
        let entry = s.equipped().unwrap();
        assert_eq!(entry.cost, 0);
        assert!(s.owns(entry.id));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: BTreeSet<&str> = clicker_catalog().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), clicker_catalog().len());
    }

    #[test]
    fn negative_points_rejected() {
        let mut s = GameState::new();
        s.points = -1.0;
        assert_eq!(s.validate(), Err(InvalidState::Points(-1.0)));
    }

    #[test]
    fn nan_points_rejected() {
        let mut s = GameState::new();
        s.points = f64::NAN;
        assert!(matches!(s.validate(), Err(InvalidState::Points(_))));
    }

    #[test]
    fn interval_out_of_range_rejected() {
        let mut s = GameState::new();
        s.auto_click_interval = 999;
        assert_eq!(s.validate(), Err(InvalidState::Interval(999)));
        s.auto_click_interval = 10_001;
        assert_eq!(s.validate(), Err(InvalidState::Interval(10_001)));
    }

    #[test]
    fn zero_click_power_rejected() {
        let mut s = GameState::new();
        s.click_power = 0;
        assert_eq!(s.validate(), Err(InvalidState::ClickPower));
    }

    #[test]
    fn equipped_must_be_owned() {
        let mut s = GameState::new();
        s.equipped_clicker = "new_clicker1".to_string();
        assert_eq!(
            s.validate(),
            Err(InvalidState::NotOwned("new_clicker1".to_string()))
        );
    }

    #[test]
    fn unknown_owned_clicker_rejected() {
        let mut s = GameState::new();
        s.owned_clickers.insert("golden".to_string());
        assert_eq!(
            s.validate(),
            Err(InvalidState::UnknownClicker("golden".to_string()))
        );
    }
}
