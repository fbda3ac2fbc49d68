//! Catapult Space - simulation core for an altitude idle clicker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight physics, entities, timers, actions)
//! - `scheduler`: Wall-clock scheduler feeding events into the reducer
//! - `persistence`: Save/load with per-section merge against defaults
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod platform;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use error::{PersistError, TuningError};
pub use scheduler::{Scheduler, Session};
pub use sim::{Action, Event, GameState, Rejection, StepOutcome, step};
pub use tuning::Tuning;

/// Game configuration constants
///
/// These are the authoritative defaults; `Tuning::default()` copies the
/// tunable subset.
pub mod consts {
    use crate::sim::state::{Rarity, World};

    /// Frame loop target rate
    pub const FRAME_RATE: f64 = 60.0;
    /// Maximum frame substeps per scheduler poll to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration per frame (altitude units/frame²)
    pub const GRAVITY: f64 = 0.6;
    /// Drag scale applied to the ball-upgrade drag reduction
    pub const DRAG_COEFFICIENT: f64 = 0.001;
    /// Launch velocity before power levels are added
    pub const LAUNCH_BASE_VELOCITY: f64 = 24.0;
    /// One-shot launch multiplier bought from the gem shop
    pub const MEGA_BOOST_FACTOR: f64 = 5.0;
    /// Launch starts one unit above the pad so the first frame is airborne
    pub const LAUNCH_START_ALTITUDE: f64 = 1.0;

    /// Altitude units per point of landing height bonus
    pub const HEIGHT_BONUS_STEP: f64 = 500.0;
    /// Landing multiplier per launch gantry level
    pub const GANTRY_BONUS_PER_LEVEL: f64 = 0.5;

    /// Planet encounter gate and odds
    pub const PLANET_MIN_ALTITUDE: f64 = 15_000.0;
    pub const PLANET_MIN_VELOCITY: f64 = 10.0;
    pub const PLANET_CHANCE_PER_FRAME: f64 = 0.002;
    /// Delay between the encounter warning and the damage flag
    pub const PLANET_DAMAGE_DELAY_MS: u64 = 500;
    /// Delay of the second recovery log line after a damaged landing
    pub const RECOVERY_FOLLOWUP_MS: u64 = 1000;

    /// Flying resource closure rate (fraction of remaining distance per frame)
    pub const FLYING_RATE: f32 = 0.03;
    /// Flying resource arrival distance (px)
    pub const FLYING_ARRIVAL_EPSILON: f32 = 20.0;
    /// Nominal viewport used for screen-relative spawns and HUD targets
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Ball sits at the horizontal center of the play field (percent)
    pub const BALL_X: f32 = 50.0;

    /// Drops
    pub const DROP_SPAWN_SPACING: f64 = 500.0;
    pub const DROP_PICKUP_BAND: f64 = 50.0;
    pub const MAX_DROPS: usize = 20;
    pub const DROP_CULL_BELOW: f64 = 1000.0;
    pub const BASE_ASTEROID_VALUE: f64 = 50_000.0;

    /// Hazards
    pub const HAZARD_SPAWN_CHANCE: f64 = 0.005;
    pub const HAZARD_VERTICAL_BAND: f64 = 40.0;
    pub const HAZARD_HORIZONTAL_BAND: f32 = 8.0;
    pub const HAZARD_CULL_BELOW: f64 = 2000.0;
    pub const BIRD_BONUS_PER_ECONOMY: f64 = 500.0;
    pub const JET_BONUS_PER_ECONOMY: f64 = 500_000.0;
    pub const JET_INTERVAL_MS: u64 = 60_000;
    pub const JET_DRIFT_PER_FRAME: f32 = 0.2;

    /// Airdrops
    pub const AIRDROP_INTERVAL_MS: u64 = 10_000;
    pub const AIRDROP_CHANCE: f64 = 0.3;
    pub const AIRDROP_DESCENT: f64 = -1.5;
    pub const AIRDROP_PICKUP_BAND: f64 = 50.0;
    pub const AIRDROP_HORIZONTAL_BAND: f32 = 10.0;
    pub const MAX_AIRDROPS: usize = 10;

    /// Rare events
    pub const RARE_EVENT_CHANCE: f64 = 0.005;
    pub const COMET_REWARD_PER_ECONOMY: f64 = 1_000_000.0;
    pub const DRONE_GEM_REWARD: u64 = 50;

    /// Timers
    pub const SECOND_TICK_MS: u64 = 1000;
    pub const CONSTRUCTION_TICK_MS: u64 = 50;
    pub const CONSTRUCTION_STEP: f32 = 0.5;
    pub const AUTOSAVE_INTERVAL_MS: u64 = 30_000;
    pub const TIME_SHOP_INTERVAL_MS: u64 = 2 * 60 * 1000;
    pub const COSMIC_EVENT_INTERVAL_MS: u64 = 10 * 60 * 1000;
    pub const MANAGER_GEM_INTERVAL_MS: u64 = 10_000;

    /// Manager
    pub const MANAGER_HIRE_COST: f64 = 1_000_000.0;
    pub const MANAGER_UPGRADE_COST_BASE: f64 = 500_000.0;
    pub const MANAGER_UPGRADE_COST_MULT: f64 = 1.8;

    /// Omega upgrade cost growth per level
    pub const OMEGA_MONEY_GROWTH: f64 = 2.5;
    pub const OMEGA_GEM_GROWTH: f64 = 1.5;

    /// Greedy buy-max safety bound
    pub const BUY_MAX_ITERATION_CAP: u32 = 200;

    /// Supply crate
    pub const CRATE_MONEY_COST: f64 = 1_000_000.0;
    pub const CRATE_GEM_COST: u64 = 1000;

    /// Player log feed length
    pub const LOG_CAPACITY: usize = 10;

    /// Altitude milestone with a one-time reward
    #[derive(Debug, Clone, Copy)]
    pub struct MilestoneDef {
        pub height: u64,
        pub reward_money: f64,
        pub message: &'static str,
    }

    /// Heights that trigger the milestone dialog (ascending)
    pub const MILESTONES: [MilestoneDef; 8] = [
        MilestoneDef { height: 5_000, reward_money: 10_000.0, message: "Leaving the Troposphere" },
        MilestoneDef { height: 25_000, reward_money: 50_000.0, message: "Stratosphere Reached" },
        MilestoneDef { height: 50_000, reward_money: 100_000.0, message: "Mesosphere Entry" },
        MilestoneDef { height: 100_000, reward_money: 500_000.0, message: "Thermosphere - Space Begins" },
        MilestoneDef { height: 250_000, reward_money: 2_000_000.0, message: "Low Earth Orbit" },
        MilestoneDef { height: 500_000, reward_money: 10_000_000.0, message: "High Orbit" },
        MilestoneDef { height: 800_000, reward_money: 50_000_000.0, message: "Lunar Distance" },
        MilestoneDef { height: 1_000_000, reward_money: 500_000_000.0, message: "THE EDGE OF THE UNIVERSE" },
    ];

    /// Cargo template for collectables
    #[derive(Debug, Clone, Copy)]
    pub struct CargoDef {
        pub name: &'static str,
        pub base_value: f64,
        pub rarity: Rarity,
    }

    pub const CARGO_ITEMS: [CargoDef; 10] = [
        CargoDef { name: "Space Rock", base_value: 5_000.0, rarity: Rarity::Common },
        CargoDef { name: "Iron Ore", base_value: 8_000.0, rarity: Rarity::Common },
        CargoDef { name: "Satellite Part", base_value: 15_000.0, rarity: Rarity::Common },
        CargoDef { name: "Moon Dust", base_value: 25_000.0, rarity: Rarity::Rare },
        CargoDef { name: "Golden Meteorite", base_value: 50_000.0, rarity: Rarity::Rare },
        CargoDef { name: "Void Geode", base_value: 100_000.0, rarity: Rarity::Epic },
        CargoDef { name: "UFO Fragment", base_value: 250_000.0, rarity: Rarity::Epic },
        CargoDef { name: "Alien Circuit", base_value: 500_000.0, rarity: Rarity::Legendary },
        CargoDef { name: "Dark Matter Vial", base_value: 1_000_000.0, rarity: Rarity::Legendary },
        CargoDef { name: "Time Crystal", base_value: 5_000_000.0, rarity: Rarity::Mystery },
    ];

    /// Purchase price of each world
    pub fn world_cost(world: World) -> f64 {
        match world {
            World::Earth => 0.0,
            World::Mars => 500_000.0,
            World::Neon => 2_000_000.0,
            World::Void => 10_000_000.0,
        }
    }

    /// Landing income multiplier of each world
    pub fn world_multiplier(world: World) -> f64 {
        match world {
            World::Earth => 1.0,
            World::Mars => 3.0,
            World::Neon => 8.0,
            World::Void => 20.0,
        }
    }
}
