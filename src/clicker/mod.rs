//! MMF Clicker: click for points, buy upgrades, rebirth and collect clicker skins.

pub mod actions;
pub mod logic;
pub mod render;
pub mod save;
pub mod scheduler;
pub mod state;
pub mod transition;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::*;
use logic::{format_number, PurchaseError};
use save::{console_log, console_warn, PersistenceStore, SaveRecord};
use scheduler::{AutoClickScheduler, RepeatingTimer};
use state::{clicker_catalog, find_clicker, GameState, REBIRTH_COST};
use transition::Scene;

/// Unconditional save period.
pub const HEARTBEAT_INTERVAL_MS: u64 = 5_000;
/// How long a notice stays on screen.
pub const NOTICE_DURATION_MS: u64 = 3_000;

/// A transient message shown over the current scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    ms_left: u64,
}

impl Notice {
    fn new(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            text: text.into(),
            is_error,
            ms_left: NOTICE_DURATION_MS,
        }
    }

    pub fn ms_left(&self) -> u64 {
        self.ms_left
    }
}

/// Owns the live state and everything that reacts to it.
pub struct ClickerGame {
    pub state: GameState,
    pub scene: Scene,
    pub notice: Option<Notice>,
    scheduler: AutoClickScheduler,
    heartbeat: RepeatingTimer,
    store: PersistenceStore,
    /// The last write failed, so the stored record is older than `state`.
    save_pending: bool,
    /// "Reset progress" was pressed once and waits for confirmation.
    reset_armed: bool,
}

impl ClickerGame {
    pub fn new(mut store: PersistenceStore) -> Self {
        let state = store.load_or_default();
        let mut game = Self {
            state,
            scene: Scene::Main,
            notice: None,
            scheduler: AutoClickScheduler::new(),
            heartbeat: RepeatingTimer::new(HEARTBEAT_INTERVAL_MS),
            store,
            save_pending: false,
            reset_armed: false,
        };
        game.sync_scheduler();
        game
    }

    pub fn scheduler(&self) -> &AutoClickScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &PersistenceStore {
        &self.store
    }

    pub fn reset_armed(&self) -> bool {
        self.reset_armed
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let confirms_reset = match event {
            InputEvent::Key(c) => self.scene == Scene::Menu && *c == 'x',
            InputEvent::Click(id) => *id == RESET_PROGRESS,
        };
        if !confirms_reset {
            self.reset_armed = false;
        }
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match (self.scene, key) {
            (Scene::Main, 'c' | ' ') => self.perform(Action::Click),
            (Scene::Main, 'u') => self.navigate(Scene::Upgrade),
            (Scene::Main, 'm') => self.navigate(Scene::Menu),
            (Scene::Main, 's') => self.navigate(Scene::Shop),
            (Scene::Main, _) => false,
            (_, 'b') => self.navigate(Scene::Main),
            (Scene::Upgrade, '1') => self.perform(Action::BuyClickPower),
            (Scene::Upgrade, '2') => self.perform(Action::BuyAutoClick),
            (Scene::Menu, 'r') => self.perform(Action::Rebirth),
            (Scene::Menu, 't') => self.perform(Action::ToggleSound),
            (Scene::Menu, 'y') => self.perform(Action::ToggleMusic),
            (Scene::Menu, 'x') => self.reset_progress(),
            (Scene::Shop, '1'..='9') => {
                let idx = (key as u8 - b'1') as usize;
                match clicker_catalog().get(idx) {
                    Some(entry) => self.perform(Action::EquipClicker(entry.id.to_string())),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            CLICK => self.perform(Action::Click),
            GOTO_UPGRADES => self.navigate(Scene::Upgrade),
            GOTO_MENU => self.navigate(Scene::Menu),
            GOTO_SHOP => self.navigate(Scene::Shop),
            GOTO_MAIN => self.navigate(Scene::Main),
            BUY_CLICK_POWER => self.perform(Action::BuyClickPower),
            BUY_AUTO_CLICK => self.perform(Action::BuyAutoClick),
            REBIRTH => self.perform(Action::Rebirth),
            TOGGLE_SOUND => self.perform(Action::ToggleSound),
            TOGGLE_MUSIC => self.perform(Action::ToggleMusic),
            RESET_PROGRESS => self.reset_progress(),
            id if id >= EQUIP_CLICKER_BASE => {
                match clicker_catalog().get((id - EQUIP_CLICKER_BASE) as usize) {
                    Some(entry) => self.perform(Action::EquipClicker(entry.id.to_string())),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn perform(&mut self, action: Action) -> bool {
        if let Err(e) = self.dispatch(action) {
            // The player already sees the refusal notice.
            console_log(&format!("refused: {e}"));
        }
        true
    }

    /// Apply one command to the live state. On success the new state is
    /// saved and the auto-clicker re-synced. On refusal nothing changes and
    /// a notice explains why.
    pub fn dispatch(&mut self, action: Action) -> Result<(), PurchaseError> {
        match logic::apply(&action, &self.state) {
            Ok(next) => {
                self.state = next;
                self.sync_scheduler();
                self.persist();
                if let Some(text) = success_notice(&action, &self.state) {
                    self.notice = Some(Notice::new(text, false));
                }
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::new(refusal_notice(&action, &e), true));
                Err(e)
            }
        }
    }

    /// Switch scenes, reconciling the carried state with the saved record.
    fn navigate(&mut self, to: Scene) -> bool {
        if to == self.scene {
            return true;
        }
        let payload = transition::carry(&self.state, self.scene);
        let persisted = if self.save_pending {
            // Nothing on disk is newer than the live state.
            Some(SaveRecord::from_state(&self.state))
        } else {
            match self.store.load_record() {
                Ok(record) => record,
                Err(e) => {
                    console_warn(&format!("cannot read save record during transition: {e}"));
                    None
                }
            }
        };
        let mut next = transition::receive(&payload, persisted.as_ref());
        // Skins are not part of the payload; the live ones are current.
        next.equipped_clicker = self.state.equipped_clicker.clone();
        next.owned_clickers = self.state.owned_clickers.clone();

        self.state = next;
        self.scene = to;
        self.sync_scheduler();
        self.persist();
        true
    }

    /// First press asks for confirmation, the second erases every save key
    /// and starts over.
    fn reset_progress(&mut self) -> bool {
        if !self.reset_armed {
            self.reset_armed = true;
            self.notice = Some(Notice::new("Press X again to erase all progress.", true));
            return true;
        }
        self.reset_armed = false;
        self.state = GameState::new();
        self.sync_scheduler();
        match self.store.reset() {
            Ok(()) => {
                self.save_pending = false;
                self.notice = Some(Notice::new("Progress erased.", false));
            }
            Err(e) => {
                console_warn(&format!("reset failed: {e}"));
                self.save_pending = true;
            }
        }
        true
    }

    /// Re-sync the auto-clicker and log whenever a new timer is armed.
    fn sync_scheduler(&mut self) {
        let before = self.scheduler.handle();
        self.scheduler.sync(&self.state);
        let after = self.scheduler.handle();
        if let (Some(handle), Some(timer)) = (after, self.scheduler.timer()) {
            if after != before {
                console_log(&format!(
                    "auto-click timer #{} every {} ms",
                    handle.id(),
                    timer.period_ms()
                ));
            }
        }
    }

    /// Advance simulated time: auto-click fires, heartbeat saves and
    /// notice expiry.
    pub fn tick(&mut self, delta_ms: u64) {
        let fires = self.scheduler.advance(delta_ms, &mut self.state);
        let beats = self.heartbeat.advance(delta_ms);
        if fires > 0 || beats > 0 {
            self.persist();
        }

        if let Some(notice) = self.notice.as_mut() {
            notice.ms_left = notice.ms_left.saturating_sub(delta_ms);
            if notice.ms_left == 0 {
                self.notice = None;
                self.reset_armed = false;
            }
        }
    }

    fn persist(&mut self) {
        match self.store.save(&self.state) {
            Ok(()) => self.save_pending = false,
            Err(e) => {
                self.save_pending = true;
                console_warn(&format!("save failed: {e}"));
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

fn success_notice(action: &Action, state: &GameState) -> Option<String> {
    match action {
        Action::Rebirth => Some(format!(
            "Rebirth successful! You now start with {}x click power.",
            state.click_power
        )),
        Action::EquipClicker(id) => find_clicker(id).map(|c| format!("{} equipped!", c.name)),
        _ => None,
    }
}

fn refusal_notice(action: &Action, err: &PurchaseError) -> String {
    match (action, err) {
        (Action::Rebirth, _) => format!(
            "Not enough points! You need {} points to rebirth.",
            format_number(REBIRTH_COST as f64)
        ),
        (_, PurchaseError::InsufficientFunds { needed, .. }) => format!(
            "Not enough points! You need {} points.",
            format_number(*needed as f64)
        ),
        (_, PurchaseError::UnaffordableOrUnowned { id, cost }) => {
            let name = find_clicker(id).map(|c| c.name).unwrap_or("that clicker");
            format!(
                "Not enough points! {} costs {} points.",
                name,
                format_number(*cost as f64)
            )
        }
        (_, PurchaseError::UnknownClicker { .. }) => "That clicker does not exist.".to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::tests::frozen_store;
    use super::*;
    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = GameState> {
        (
            0.0f64..1e9,
            1u64..10_000,
            0u64..200,
            1u64..10_000_000,
            1u64..1_000_000_000,
            1_000u64..=10_000,
            0u32..50,
            any::<bool>(),
        )
            .prop_map(
                |(points, click_power, auto, cp_cost, ac_cost, interval, rebirths, sound_on)| {
                    let mut s = GameState::new();
                    s.points = points;
                    s.click_power = click_power;
                    s.auto_click_power = auto;
                    s.click_power_cost = cp_cost;
                    s.auto_click_power_cost = ac_cost;
                    s.auto_click_interval = interval;
                    s.rebirth_count = rebirths;
                    s.settings.sound_on = sound_on;
                    s
                },
            )
    }

    proptest! {
        #[test]
        fn prop_stale_record_never_overrides_unsaved_state(
            stale in arb_state(),
            live in arb_state(),
            to in prop::sample::select(vec!['u', 'm', 's']),
        ) {
            let mut game = ClickerGame::new(frozen_store(&stale));
            game.state = live;
            game.sync_scheduler();
            // The heartbeat write fails, so the record on disk stays stale.
            game.tick(HEARTBEAT_INTERVAL_MS);
            let expected = game.state.clone();

            game.handle_input(&InputEvent::Key(to));
            prop_assert_ne!(game.scene, Scene::Main);
            prop_assert_eq!(&game.state, &expected);
        }
    }
}
