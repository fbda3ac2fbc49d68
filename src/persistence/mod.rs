//! Save/load persistence
//!
//! Features:
//! - Single JSON document of the persisted `GameState` fields
//! - Per-section shallow merge over fresh defaults on load, so saves from
//!   older builds pick up new fields
//! - Corrupt data falls back to a new game with a player-visible warning
//! - Snapshot-then-write stores (memory, file with backup rotation)

pub mod merge;
pub mod store;

pub use store::{MemoryStore, SaveStore};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

use crate::error::PersistError;
use crate::sim::state::{GameState, LogKind};
use crate::tuning::Tuning;

/// Storage key / file stem for the save
pub const SAVE_KEY: &str = "catapult_space_save_v2";

/// Serialize the persisted part of the state
pub fn save_to_string(state: &GameState) -> Result<String, PersistError> {
    serde_json::to_string(state).map_err(PersistError::Encode)
}

/// Parse a save, merging it over defaults created at `now_ms`
pub fn try_load(text: &str, now_ms: u64, tuning: Tuning) -> Result<GameState, PersistError> {
    let saved: serde_json::Value = serde_json::from_str(text).map_err(PersistError::Corrupt)?;
    let defaults = GameState::new(now_ms, now_ms);
    let mut merged = serde_json::to_value(&defaults).map_err(PersistError::Encode)?;

    merge::merge_sections(&mut merged, saved).map_err(PersistError::Corrupt)?;

    let mut state: GameState = serde_json::from_value(merged).map_err(PersistError::Corrupt)?;
    state.reset_session(now_ms, tuning);
    Ok(state)
}

/// Load a save, falling back to a fresh game if it cannot be read
///
/// The outcome is reported in the player log feed either way.
pub fn load(text: &str, now_ms: u64, tuning: Tuning) -> GameState {
    match try_load(text, now_ms, tuning.clone()) {
        Ok(mut state) => {
            log::info!("Save loaded ({} launches)", state.total_launches);
            state.push_log("Save data loaded successfully.", LogKind::Success, now_ms);
            state
        }
        Err(err) => {
            log::warn!("Discarding save: {}", err);
            let mut state = GameState::with_tuning(now_ms, now_ms, tuning);
            state.push_log(
                "Save data corrupted. Starting new simulation.",
                LogKind::Danger,
                now_ms,
            );
            state
        }
    }
}

/// Read whatever the store holds; a missing save is a fresh game
pub fn load_from_store(store: &dyn SaveStore, now_ms: u64, tuning: Tuning) -> GameState {
    match store.read() {
        Ok(Some(text)) => load(&text, now_ms, tuning),
        Ok(None) => {
            log::info!("No save found, starting new game");
            GameState::with_tuning(now_ms, now_ms, tuning)
        }
        Err(err) => {
            log::warn!("Save store unreadable: {}", err);
            let mut state = GameState::with_tuning(now_ms, now_ms, tuning);
            state.push_log(
                "Save data corrupted. Starting new simulation.",
                LogKind::Danger,
                now_ms,
            );
            state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PendingMilestone, ResourceKind, Screen};
    use glam::Vec2;

    fn played_state() -> GameState {
        let mut state = GameState::new(5, 1_000);
        state.screen = Screen::Game;
        state.money = 12_345.0;
        state.gems = 40;
        state.upgrades.power.level = 7;
        state.structures.launch_gantry.level = 2;
        state.structures.xeno_lab.is_constructing = true;
        state.structures.xeno_lab.construction_progress = 42.5;
        state.reached_milestones = vec![5_000, 25_000];
        state.pending_milestones.push_back(PendingMilestone {
            height: 25_000,
            reward: 50_000.0,
            message: "Stratosphere Reached".to_string(),
        });
        state.redeemed_codes.insert("space".to_string());
        state.spawn_flying_resource(ResourceKind::Money, 99.0, Vec2::ZERO);
        state.ball.is_launched = true;
        state.ball.position = 800.0;
        state
    }

    #[test]
    fn test_round_trip_keeps_persisted_fields() {
        let state = played_state();
        let text = save_to_string(&state).unwrap();
        let loaded = try_load(&text, 50_000, Tuning::default()).unwrap();

        assert_eq!(loaded.money, state.money);
        assert_eq!(loaded.gems, state.gems);
        assert_eq!(loaded.upgrades, state.upgrades);
        assert_eq!(loaded.structures, state.structures);
        assert_eq!(loaded.reached_milestones, state.reached_milestones);
        assert_eq!(loaded.pending_milestones, state.pending_milestones);
        assert_eq!(loaded.redeemed_codes, state.redeemed_codes);
        assert_eq!(loaded.flying_resources, state.flying_resources);
        assert_eq!(loaded.time_shop, state.time_shop);

        // Session fields reset
        assert_eq!(loaded.screen, Screen::Title);
        assert!(!loaded.ball.is_launched);
    }

    #[test]
    fn test_save_load_save_is_stable() {
        let state = played_state();
        let first = save_to_string(&state).unwrap();
        let loaded = try_load(&first, 50_000, Tuning::default()).unwrap();
        let second = save_to_string(&loaded).unwrap();
        let a: serde_json::Value = serde_json::from_str(&first).unwrap();
        let b: serde_json::Value = serde_json::from_str(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_old_save_gets_new_fields() {
        let text = r#"{
            "money": 500.0,
            "upgrades": { "power": { "name": "Catapult Height", "level": 3,
                "base_cost": 10.0, "cost_multiplier": 1.15, "effect_multiplier": 1.0 } },
            "stats": { "hazards_hit": 4 },
            "likes": null
        }"#;
        let state = try_load(text, 0, Tuning::default()).unwrap();
        assert_eq!(state.money, 500.0);
        assert_eq!(state.upgrades.power.level, 3);
        assert_eq!(state.upgrades.economy.level, 1);
        assert_eq!(state.stats.hazards_hit, 4);
        assert_eq!(state.stats.items_found, 0);
        assert_eq!(state.likes, 0);
        assert_eq!(state.structures.mission_control.level, 0);
    }

    #[test]
    fn test_corrupt_save_falls_back() {
        let state = load("{ not json", 7_000, Tuning::default());
        assert_eq!(state.money, 0.0);
        assert_eq!(state.screen, Screen::Title);
        let last = state.logs.last().unwrap();
        assert_eq!(last.kind, LogKind::Danger);

        assert!(matches!(
            try_load("[1, 2, 3]", 0, Tuning::default()),
            Err(PersistError::Corrupt(_))
        ));
        assert!(matches!(
            try_load(r#"{"money": "lots"}"#, 0, Tuning::default()),
            Err(PersistError::Corrupt(_))
        ));
    }

    #[test]
    fn test_loaded_ids_stay_unique() {
        let state = played_state();
        let text = save_to_string(&state).unwrap();
        let mut loaded = load(&text, 50_000, Tuning::default());
        let max_existing = loaded
            .flying_resources
            .iter()
            .map(|f| f.id)
            .chain(loaded.logs.iter().map(|l| l.id))
            .max()
            .unwrap();
        assert!(loaded.next_entity_id() > max_existing);
    }

    #[test]
    fn test_load_from_memory_store() {
        let mut store = MemoryStore::default();
        let fresh = load_from_store(&store, 0, Tuning::default());
        assert!(fresh.logs.is_empty());

        store.write(&save_to_string(&played_state()).unwrap()).unwrap();
        let loaded = load_from_store(&store, 0, Tuning::default());
        assert_eq!(loaded.money, 12_345.0);
    }
}
