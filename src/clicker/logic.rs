//! MMF Clicker progression rules as pure functions.
//!
//! Every operation takes the current state by reference and returns either
//! the next state or a [`PurchaseError`]. A rejected operation never touches
//! the caller's state, so all purchases are all-or-nothing.

use super::actions::Action;
use super::state::{
    find_clicker, ClickerEntry, GameState, AUTO_CLICK_COST_GROWTH, AUTO_CLICK_INTERVAL_STEP_MS,
    BASE_AUTO_CLICK_POWER_COST, BASE_CLICK_POWER_COST, CLICK_POWER_COST_STEP,
    MIN_AUTO_CLICK_INTERVAL_MS, REBIRTH_COST,
};

/// Why a purchase, rebirth or equip was refused.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("not enough points: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: f64 },
    #[error("clicker `{id}` is not owned and costs {cost} points")]
    UnaffordableOrUnowned { id: String, cost: u64 },
    #[error("unknown clicker `{id}`")]
    UnknownClicker { id: String },
}

/// Shop button state of a clicker skin.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickerStatus {
    Equipped,
    /// Bought earlier, equipping is free.
    Owned,
    Free,
    Affordable,
    Locked,
}

pub fn can_afford(state: &GameState, cost: u64) -> bool {
    state.points >= cost as f64
}

fn charge(state: &GameState, cost: u64) -> Result<f64, PurchaseError> {
    if can_afford(state, cost) {
        Ok(state.points - cost as f64)
    } else {
        Err(PurchaseError::InsufficientFunds {
            needed: cost,
            available: state.points,
        })
    }
}

/// Manual click: add click power to points.
pub fn click(state: &GameState) -> GameState {
    GameState {
        points: state.points + state.click_power as f64,
        ..state.clone()
    }
}

/// Buy one level of click power. Price grows by a flat step.
pub fn buy_click_power(state: &GameState) -> Result<GameState, PurchaseError> {
    let points = charge(state, state.click_power_cost)?;
    Ok(GameState {
        points,
        click_power: state.click_power + 1,
        click_power_cost: state.click_power_cost.saturating_add(CLICK_POWER_COST_STEP),
        ..state.clone()
    })
}

/// Next auto-click price: `floor(cost * 1.5)` in exact integer arithmetic.
pub fn next_auto_click_cost(cost: u64) -> u64 {
    let (num, den) = AUTO_CLICK_COST_GROWTH;
    cost.saturating_add(cost * (num - den) / den)
}

/// Next auto-click period, floored at the minimum interval.
pub fn next_auto_click_interval(interval: u64) -> u64 {
    interval
        .saturating_sub(AUTO_CLICK_INTERVAL_STEP_MS)
        .max(MIN_AUTO_CLICK_INTERVAL_MS)
}

/// Buy one auto-click level. Also shortens the auto-click period.
pub fn buy_auto_click(state: &GameState) -> Result<GameState, PurchaseError> {
    let points = charge(state, state.auto_click_power_cost)?;
    Ok(GameState {
        points,
        auto_click_power: state.auto_click_power + 1,
        auto_click_power_cost: next_auto_click_cost(state.auto_click_power_cost),
        auto_click_interval: next_auto_click_interval(state.auto_click_interval),
        ..state.clone()
    })
}

/// Prestige reset. Click power restarts at `rebirth_count + 1`; the
/// auto-click period and clicker skins survive.
pub fn rebirth(state: &GameState) -> Result<GameState, PurchaseError> {
    charge(state, REBIRTH_COST)?;
    let rebirth_count = state.rebirth_count + 1;
    Ok(GameState {
        points: 0.0,
        click_power: u64::from(rebirth_count) + 1,
        auto_click_power: 0,
        click_power_cost: BASE_CLICK_POWER_COST,
        auto_click_power_cost: BASE_AUTO_CLICK_POWER_COST,
        rebirth_count,
        ..state.clone()
    })
}

pub fn clicker_status(state: &GameState, entry: &ClickerEntry) -> ClickerStatus {
    if state.equipped_clicker == entry.id {
        ClickerStatus::Equipped
    } else if state.owns(entry.id) {
        ClickerStatus::Owned
    } else if entry.cost == 0 {
        ClickerStatus::Free
    } else if can_afford(state, entry.cost) {
        ClickerStatus::Affordable
    } else {
        ClickerStatus::Locked
    }
}

/// Equip a clicker skin, buying it first if needed. A skin is only ever
/// paid for once.
pub fn equip_clicker(state: &GameState, id: &str) -> Result<GameState, PurchaseError> {
    let entry = find_clicker(id).ok_or_else(|| PurchaseError::UnknownClicker {
        id: id.to_string(),
    })?;

    let points = match clicker_status(state, entry) {
        ClickerStatus::Equipped | ClickerStatus::Owned | ClickerStatus::Free => state.points,
        ClickerStatus::Affordable => state.points - entry.cost as f64,
        ClickerStatus::Locked => {
            return Err(PurchaseError::UnaffordableOrUnowned {
                id: entry.id.to_string(),
                cost: entry.cost,
            })
        }
    };

    let mut next = GameState {
        points,
        equipped_clicker: entry.id.to_string(),
        ..state.clone()
    };
    next.owned_clickers.insert(entry.id.to_string());
    Ok(next)
}

pub fn toggle_sound(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.settings.sound_on = !next.settings.sound_on;
    next
}

pub fn toggle_music(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.settings.music_on = !next.settings.music_on;
    next
}

/// Dispatch a player command.
pub fn apply(action: &Action, state: &GameState) -> Result<GameState, PurchaseError> {
    match action {
        Action::Click => Ok(click(state)),
        Action::BuyClickPower => buy_click_power(state),
        Action::BuyAutoClick => buy_auto_click(state),
        Action::Rebirth => rebirth(state),
        Action::EquipClicker(id) => equip_clicker(state, id),
        Action::ToggleSound => Ok(toggle_sound(state)),
        Action::ToggleMusic => Ok(toggle_music(state)),
    }
}

/// Format a number with thousands separators. Fractions keep one digit.
pub fn format_number(n: f64) -> String {
    let negative = n < 0.0;
    let abs = n.abs();
    let int_part = abs.floor() as u64;
    let frac = abs - int_part as f64;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    let tenth = (frac * 10.0).floor() as u64;
    if tenth > 0 {
        format!("{sign}{grouped}.{tenth}")
    } else {
        format!("{sign}{grouped}")
    }
}
