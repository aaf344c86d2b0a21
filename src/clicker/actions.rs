//! Player commands and semantic action IDs for MMF Clicker click targets.
//!
//! Click target IDs are registered during render and dispatched via
//! `InputEvent::Click`. Engine commands are the [`Action`] values those IDs
//! (and key presses) resolve to.

/// A command that changes the progression state.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Click,
    BuyClickPower,
    BuyAutoClick,
    Rebirth,
    EquipClicker(String),
    ToggleSound,
    ToggleMusic,
}

// ── Core actions ────────────────────────────────────────────────
pub const CLICK: u16 = 0;

// ── Scene navigation ────────────────────────────────────────────
pub const GOTO_UPGRADES: u16 = 10;
pub const GOTO_MENU: u16 = 11;
pub const GOTO_SHOP: u16 = 12;
pub const GOTO_MAIN: u16 = 13;

// ── Upgrades ────────────────────────────────────────────────────
pub const BUY_CLICK_POWER: u16 = 100;
pub const BUY_AUTO_CLICK: u16 = 101;

// ── Menu ────────────────────────────────────────────────────────
pub const REBIRTH: u16 = 200;
pub const TOGGLE_SOUND: u16 = 201;
pub const TOGGLE_MUSIC: u16 = 202;
pub const RESET_PROGRESS: u16 = 203;

// ── Shop (base + catalog index) ─────────────────────────────────
pub const EQUIP_CLICKER_BASE: u16 = 300;
