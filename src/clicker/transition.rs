//! Scene transition payload and reconciliation.
//!
//! Navigating between scenes carries one canonical [`TransitionPayload`].
//! The receiving side rebuilds a [`GameState`] field by field. A scene is
//! only trusted for the fields it can change. For everything else the last
//! persisted value wins, so a stale payload can never roll back progress.

use super::save::SaveRecord;
use super::state::{GameState, Settings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Main,
    Upgrade,
    Menu,
    Shop,
}

/// A progression field carried across scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Points,
    ClickPower,
    AutoClickPower,
    ClickPowerCost,
    AutoClickPowerCost,
    AutoClickInterval,
    RebirthCount,
    Settings,
}

impl Scene {
    pub fn title(self) -> &'static str {
        match self {
            Scene::Main => "MMF Clicker Crack",
            Scene::Upgrade => "Upgrades",
            Scene::Menu => "Menu",
            Scene::Shop => "Clickers",
        }
    }

    /// Whether this scene can change `field`. Points change everywhere
    /// because the auto-clicker keeps running.
    pub fn owns(self, field: Field) -> bool {
        use Field::*;
        match self {
            Scene::Main | Scene::Shop => field == Points,
            Scene::Upgrade => matches!(
                field,
                Points
                    | ClickPower
                    | AutoClickPower
                    | ClickPowerCost
                    | AutoClickPowerCost
                    | AutoClickInterval
            ),
            Scene::Menu => matches!(
                field,
                Points
                    | ClickPower
                    | AutoClickPower
                    | ClickPowerCost
                    | AutoClickPowerCost
                    | RebirthCount
                    | Settings
            ),
        }
    }
}

/// Snapshot handed from one scene to the next. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPayload {
    pub from: Scene,
    pub points: Option<f64>,
    pub click_power: Option<u64>,
    pub auto_click_power: Option<u64>,
    pub bg_music_on: Option<bool>,
    pub sound_on: Option<bool>,
    pub click_power_cost: Option<u64>,
    pub auto_click_power_cost: Option<u64>,
    pub rebirth_count: Option<u32>,
    pub auto_click_interval: Option<u64>,
}

impl TransitionPayload {
    /// A payload carrying nothing.
    #[cfg(test)]
    pub fn empty(from: Scene) -> Self {
        Self {
            from,
            points: None,
            click_power: None,
            auto_click_power: None,
            bg_music_on: None,
            sound_on: None,
            click_power_cost: None,
            auto_click_power_cost: None,
            rebirth_count: None,
            auto_click_interval: None,
        }
    }
}

/// Package the whole state for a scene change.
pub fn carry(state: &GameState, from: Scene) -> TransitionPayload {
    TransitionPayload {
        from,
        points: Some(state.points),
        click_power: Some(state.click_power),
        auto_click_power: Some(state.auto_click_power),
        bg_music_on: Some(state.settings.music_on),
        sound_on: Some(state.settings.sound_on),
        click_power_cost: Some(state.click_power_cost),
        auto_click_power_cost: Some(state.auto_click_power_cost),
        rebirth_count: Some(state.rebirth_count),
        auto_click_interval: Some(state.auto_click_interval),
    }
}

fn resolve<T>(owned: bool, carried: Option<T>, persisted: Option<T>, default: T) -> T {
    match (owned, carried, persisted) {
        (true, Some(v), _) => v,
        (_, _, Some(v)) => v,
        (_, Some(v), None) => v,
        (_, None, None) => default,
    }
}

/// Rebuild the state on the receiving side of a scene change.
///
/// Clicker skins never travel in the payload. They come from the persisted
/// record here; the caller overlays its live skins when it has them.
pub fn receive(payload: &TransitionPayload, persisted: Option<&SaveRecord>) -> GameState {
    let fallback = persisted
        .cloned()
        .and_then(|r| r.into_state(None).ok())
        .unwrap_or_default();
    let rec = persisted.cloned().unwrap_or_default();
    let base = GameState::new();
    let owns = |field| payload.from.owns(field);

    let state = GameState {
        points: resolve(owns(Field::Points), payload.points, rec.points, base.points),
        click_power: resolve(
            owns(Field::ClickPower),
            payload.click_power,
            rec.click_power,
            base.click_power,
        ),
        auto_click_power: resolve(
            owns(Field::AutoClickPower),
            payload.auto_click_power,
            rec.auto_click_power,
            base.auto_click_power,
        ),
        click_power_cost: resolve(
            owns(Field::ClickPowerCost),
            payload.click_power_cost,
            rec.click_power_cost,
            base.click_power_cost,
        ),
        auto_click_power_cost: resolve(
            owns(Field::AutoClickPowerCost),
            payload.auto_click_power_cost,
            rec.auto_click_power_cost,
            base.auto_click_power_cost,
        ),
        auto_click_interval: resolve(
            owns(Field::AutoClickInterval),
            payload.auto_click_interval,
            rec.auto_click_interval,
            base.auto_click_interval,
        ),
        rebirth_count: resolve(
            owns(Field::RebirthCount),
            payload.rebirth_count,
            rec.rebirth_count,
            base.rebirth_count,
        ),
        settings: Settings {
            sound_on: resolve(
                owns(Field::Settings),
                payload.sound_on,
                rec.sound_on,
                base.settings.sound_on,
            ),
            music_on: resolve(
                owns(Field::Settings),
                payload.bg_music_on,
                rec.bg_music_on,
                base.settings.music_on,
            ),
        },
        equipped_clicker: fallback.equipped_clicker.clone(),
        owned_clickers: fallback.owned_clickers.clone(),
    };

    match state.validate() {
        Ok(()) => state,
        Err(_) => fallback,
    }
}
