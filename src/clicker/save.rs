//! MMF Clicker save/load.
//!
//! ## Record layout
//!
//! The progression record is a flat JSON object under [`STORAGE_KEY`]. Every
//! key is optional on read and filled with the base constant when missing,
//! so records written by older builds (which only knew a subset of the keys)
//! load as-is. The equipped clicker lives in its own key,
//! [`EQUIPPED_KEY`], as a bare string.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: bump when keys are added.
//! - `MIN_COMPATIBLE_VERSION`: bump only when a key changes meaning or is
//!   removed. Records without a `version` key count as version 1.

use serde::{Deserialize, Serialize};

use super::state::{
    find_clicker, GameState, InvalidState, Settings, DEFAULT_CLICKER_ID,
};

pub const SAVE_VERSION: u32 = 2;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

pub const STORAGE_KEY: &str = "clickerGame";
pub const EQUIPPED_KEY: &str = "equippedClicker";

// ── Console logging ─────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
pub fn console_log(msg: &str) {
    web_sys::console::log_1(&format!("MMF Clicker: {msg}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn console_warn(msg: &str) {
    web_sys::console::warn_1(&format!("MMF Clicker: {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn console_log(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn console_warn(_msg: &str) {}

// ── Errors ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Why a stored record was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CorruptState {
    #[error("record does not parse: {0}")]
    Parse(String),
    #[error("save version {found} is older than {min}")]
    Unsupported { found: u32, min: u32 },
    #[error(transparent)]
    Invalid(#[from] InvalidState),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize save record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("corrupt save record: {0}")]
    Corrupt(#[from] CorruptState),
}

// ── Storage backends ────────────────────────────────────────────

/// String key-value storage the game persists into.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail, like a full or blocked localStorage.
    #[cfg(test)]
    pub fn read_only() -> Self {
        Self {
            items: Default::default(),
            read_only: true,
        }
    }

    /// Keep the current items but fail every later write.
    #[cfg(test)]
    pub fn freeze(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Backend(format!("`{key}` is read-only")));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Backend(format!("`{key}` is read-only")));
        }
        self.items.remove(key);
        Ok(())
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}

// ── Record ──────────────────────────────────────────────────────

/// The persisted progression record. `None` means the key was absent.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRecord {
    pub version: Option<u32>,
    pub points: Option<f64>,
    pub click_power: Option<u64>,
    pub auto_click_power: Option<u64>,
    pub click_power_cost: Option<u64>,
    pub auto_click_power_cost: Option<u64>,
    pub auto_click_interval: Option<u64>,
    pub rebirth_count: Option<u32>,
    pub sound_on: Option<bool>,
    pub bg_music_on: Option<bool>,
    pub owned_clickers: Option<Vec<String>>,
}

impl SaveRecord {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            version: Some(SAVE_VERSION),
            points: Some(state.points),
            click_power: Some(state.click_power),
            auto_click_power: Some(state.auto_click_power),
            click_power_cost: Some(state.click_power_cost),
            auto_click_power_cost: Some(state.auto_click_power_cost),
            auto_click_interval: Some(state.auto_click_interval),
            rebirth_count: Some(state.rebirth_count),
            sound_on: Some(state.settings.sound_on),
            bg_music_on: Some(state.settings.music_on),
            owned_clickers: Some(state.owned_clickers.iter().cloned().collect()),
        }
    }

    pub fn parse(json: &str) -> Result<Self, CorruptState> {
        let record: Self =
            serde_json::from_str(json).map_err(|e| CorruptState::Parse(e.to_string()))?;
        let version = record.version.unwrap_or(1);
        if version < MIN_COMPATIBLE_VERSION {
            return Err(CorruptState::Unsupported {
                found: version,
                min: MIN_COMPATIBLE_VERSION,
            });
        }
        Ok(record)
    }

    /// Build a state, defaulting absent keys. `equipped` is the separately
    /// stored equipped clicker id.
    pub fn into_state(self, equipped: Option<String>) -> Result<GameState, CorruptState> {
        let base = GameState::new();
        let mut owned = base.owned_clickers.clone();
        if let Some(ids) = self.owned_clickers {
            owned.extend(ids);
        }

        // An equipped skin was paid for when it was equipped, even if the
        // owned list predates it.
        let equipped = equipped
            .filter(|id| find_clicker(id).is_some())
            .unwrap_or_else(|| DEFAULT_CLICKER_ID.to_string());
        owned.insert(equipped.clone());

        let state = GameState {
            points: self.points.unwrap_or(base.points),
            click_power: self.click_power.unwrap_or(base.click_power),
            auto_click_power: self.auto_click_power.unwrap_or(base.auto_click_power),
            click_power_cost: self.click_power_cost.unwrap_or(base.click_power_cost),
            auto_click_power_cost: self
                .auto_click_power_cost
                .unwrap_or(base.auto_click_power_cost),
            auto_click_interval: self
                .auto_click_interval
                .unwrap_or(base.auto_click_interval),
            rebirth_count: self.rebirth_count.unwrap_or(base.rebirth_count),
            equipped_clicker: equipped,
            owned_clickers: owned,
            settings: Settings {
                sound_on: self.sound_on.unwrap_or(base.settings.sound_on),
                music_on: self.bg_music_on.unwrap_or(base.settings.music_on),
            },
        };
        state.validate()?;
        Ok(state)
    }
}

// ── Store ───────────────────────────────────────────────────────

/// Loads and saves [`GameState`] snapshots through a storage backend.
pub struct PersistenceStore {
    backend: Box<dyn StorageBackend>,
}

impl PersistenceStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// A store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Write the full state, overwriting any earlier record.
    pub fn save(&mut self, state: &GameState) -> Result<(), SaveError> {
        let json = serde_json::to_string(&SaveRecord::from_state(state))?;
        self.backend.set_item(STORAGE_KEY, &json)?;
        self.backend.set_item(EQUIPPED_KEY, &state.equipped_clicker)?;
        Ok(())
    }

    /// The raw stored record, or `None` when nothing was saved yet.
    pub fn load_record(&self) -> Result<Option<SaveRecord>, SaveError> {
        let json = match self.backend.get_item(STORAGE_KEY)? {
            Some(j) => j,
            None => return Ok(None),
        };
        let record = SaveRecord::parse(&json)?;
        let version = record.version.unwrap_or(1);
        if version < SAVE_VERSION {
            console_log(&format!(
                "migrating save record (saved={version}, current={SAVE_VERSION})"
            ));
        }
        Ok(Some(record))
    }

    fn try_load(&self) -> Result<Option<GameState>, SaveError> {
        let Some(record) = self.load_record()? else {
            return Ok(None);
        };
        let equipped = self.backend.get_item(EQUIPPED_KEY)?;
        Ok(Some(record.into_state(equipped)?))
    }

    /// Restore the last saved state. Absent records give `None`; corrupt
    /// records are discarded and also give `None`.
    pub fn load(&mut self) -> Option<GameState> {
        match self.try_load() {
            Ok(state) => state,
            Err(SaveError::Corrupt(reason)) => {
                console_warn(&format!("discarding corrupt save record: {reason}"));
                if let Err(e) = self.backend.remove_item(STORAGE_KEY) {
                    console_warn(&format!("failed to remove corrupt record: {e}"));
                }
                None
            }
            Err(e) => {
                console_warn(&format!("failed to load save record: {e}"));
                None
            }
        }
    }

    pub fn load_or_default(&mut self) -> GameState {
        self.load().unwrap_or_default()
    }

    /// Delete every persisted key.
    pub fn reset(&mut self) -> Result<(), SaveError> {
        self.backend.remove_item(STORAGE_KEY)?;
        self.backend.remove_item(EQUIPPED_KEY)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(items: &[(&str, &str)]) -> PersistenceStore {
        let mut storage = MemoryStorage::new();
        for (k, v) in items {
            storage.set_item(k, v).unwrap();
        }
        PersistenceStore::new(Box::new(storage))
    }

    #[test]
    fn load_without_record_is_none() {
        let mut store = PersistenceStore::in_memory();
        assert_eq!(store.load(), None);
        assert_eq!(store.load_or_default(), GameState::new());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut state = GameState::new();
        state.points = 12_345.5;
        state.click_power = 7;
        state.auto_click_power = 3;
        state.click_power_cost = 1_600;
        state.auto_click_power_cost = 3_375_000;
        state.auto_click_interval = 9_700;
        state.rebirth_count = 2;
        state.owned_clickers.insert("new_clicker2".to_string());
        state.equipped_clicker = "new_clicker2".to_string();
        state.settings.music_on = false;

        let mut store = PersistenceStore::in_memory();
        store.save(&state).unwrap();
        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn equipped_clicker_uses_its_own_key() {
        let mut state = GameState::new();
        state.owned_clickers.insert("new_clicker1".to_string());
        state.equipped_clicker = "new_clicker1".to_string();
        let mut store = PersistenceStore::in_memory();
        store.save(&state).unwrap();

        let backend = store.backend();
        assert_eq!(
            backend.get_item(EQUIPPED_KEY).unwrap().as_deref(),
            Some("new_clicker1")
        );
        let json = backend.get_item(STORAGE_KEY).unwrap().unwrap();
        assert!(!json.contains("equipped"));
    }

    #[test]
    fn save_overwrites_previous_record() {
        let mut store = PersistenceStore::in_memory();
        let mut state = GameState::new();
        state.points = 10.0;
        store.save(&state).unwrap();
        state.points = 20.0;
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap().points, 20.0);
    }

    #[test]
    fn legacy_partial_record_fills_defaults() {
        // Written by a build that only knew five keys.
        let mut store = store_with(&[(
            STORAGE_KEY,
            r#"{"points":5000,"clickPower":3,"autoClickPower":1,"clickPowerCost":600,"autoClickPowerCost":1500000}"#,
        )]);
        let state = store.load().unwrap();
        assert_eq!(state.points, 5000.0);
        assert_eq!(state.click_power, 3);
        assert_eq!(state.auto_click_power, 1);
        assert_eq!(state.click_power_cost, 600);
        assert_eq!(state.auto_click_power_cost, 1_500_000);
        assert_eq!(state.auto_click_interval, 10_000);
        assert_eq!(state.rebirth_count, 0);
        assert_eq!(state.equipped_clicker, DEFAULT_CLICKER_ID);
    }

    #[test]
    fn null_fields_are_defaulted() {
        let mut store = store_with(&[(STORAGE_KEY, r#"{"points":null,"clickPower":2}"#)]);
        let state = store.load().unwrap();
        assert_eq!(state.points, 0.0);
        assert_eq!(state.click_power, 2);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut store = store_with(&[(
            STORAGE_KEY,
            r#"{"points":1,"airdropWallet":"0xabc","futureField":[1,2]}"#,
        )]);
        assert_eq!(store.load().unwrap().points, 1.0);
    }

    #[test]
    fn malformed_json_is_discarded() {
        let mut store = store_with(&[(STORAGE_KEY, "{not json")]);
        assert_eq!(store.load(), None);
        assert_eq!(store.backend().get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn wrong_field_type_is_corrupt() {
        let mut store = store_with(&[(STORAGE_KEY, r#"{"points":"lots"}"#)]);
        assert_eq!(store.load(), None);
        assert_eq!(store.backend().get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn invariant_violation_is_corrupt() {
        let mut store = store_with(&[(STORAGE_KEY, r#"{"autoClickInterval":50}"#)]);
        assert!(matches!(
            store.load_record().and_then(|r| Ok(r.unwrap().into_state(None)?)),
            Err(SaveError::Corrupt(CorruptState::Invalid(InvalidState::Interval(50))))
        ));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn negative_points_is_corrupt() {
        let mut store = store_with(&[(STORAGE_KEY, r#"{"points":-5}"#)]);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn unsupported_version_rejected() {
        assert_eq!(
            SaveRecord::parse(r#"{"version":0,"points":1}"#),
            Err(CorruptState::Unsupported { found: 0, min: 1 })
        );
    }

    #[test]
    fn unknown_equipped_clicker_falls_back_to_default() {
        let mut store = store_with(&[
            (STORAGE_KEY, r#"{"points":1}"#),
            (EQUIPPED_KEY, "golden_clicker"),
        ]);
        let state = store.load().unwrap();
        assert_eq!(state.equipped_clicker, DEFAULT_CLICKER_ID);
    }

    #[test]
    fn equipped_clicker_missing_from_owned_is_adopted() {
        let mut store = store_with(&[
            (STORAGE_KEY, r#"{"points":1}"#),
            (EQUIPPED_KEY, "new_clicker1"),
        ]);
        let state = store.load().unwrap();
        assert_eq!(state.equipped_clicker, "new_clicker1");
        assert!(state.owns("new_clicker1"));
        assert!(state.owns(DEFAULT_CLICKER_ID));
    }

    #[test]
    fn saved_record_is_current_version() {
        let mut store = PersistenceStore::in_memory();
        store.save(&GameState::new()).unwrap();
        let record = store.load_record().unwrap().unwrap();
        assert_eq!(record.version, Some(SAVE_VERSION));
    }

    #[test]
    fn read_only_storage_reports_error() {
        let mut store = PersistenceStore::new(Box::new(MemoryStorage::read_only()));
        assert!(matches!(
            store.save(&GameState::new()),
            Err(SaveError::Storage(StorageError::Backend(_)))
        ));
    }

    #[test]
    fn reset_removes_both_keys() {
        let mut store = PersistenceStore::in_memory();
        store.save(&GameState::new()).unwrap();
        store.reset().unwrap();
        assert_eq!(store.backend().get_item(STORAGE_KEY).unwrap(), None);
        assert_eq!(store.backend().get_item(EQUIPPED_KEY).unwrap(), None);
        assert_eq!(store.load(), None);
    }
}
