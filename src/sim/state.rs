//! Game state and core simulation types
//!
//! Everything the save file carries lives on `GameState`; fields marked
//! `#[serde(skip)]` are session-only and rebuilt on load.

use std::collections::{BTreeSet, VecDeque};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Which top-level screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Title,
    Game,
}

/// Launch destinations, each with its own income multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum World {
    #[default]
    Earth,
    Mars,
    Neon,
    Void,
}

impl World {
    pub const ALL: [World; 4] = [World::Earth, World::Mars, World::Neon, World::Void];

    pub fn as_str(&self) -> &'static str {
        match self {
            World::Earth => "Earth",
            World::Mars => "Mars",
            World::Neon => "Neon",
            World::Void => "Void",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        World::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    #[serde(rename = "???")]
    Mystery,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mystery => "???",
        }
    }
}

/// The four money-bought upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Power,
    Economy,
    Catapult,
    Ball,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Power,
        UpgradeKind::Economy,
        UpgradeKind::Catapult,
        UpgradeKind::Ball,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "power" => Some(UpgradeKind::Power),
            "economy" => Some(UpgradeKind::Economy),
            "catapult" => Some(UpgradeKind::Catapult),
            "ball" => Some(UpgradeKind::Ball),
            _ => None,
        }
    }
}

/// A levelled upgrade; cost of the next level is
/// `base_cost * cost_multiplier^(level - 1)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStats {
    pub name: String,
    pub level: u32,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    /// How much the stat increases per level
    pub effect_multiplier: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
}

impl UpgradeStats {
    pub fn initial(kind: UpgradeKind) -> Self {
        let (name, base_cost, cost_multiplier, effect_multiplier, max_level) = match kind {
            UpgradeKind::Power => ("Catapult Height", 10.0, 1.15, 1.0, None),
            UpgradeKind::Economy => ("Money per Launch", 5.0, 1.6, 1.0, None),
            UpgradeKind::Catapult => ("Launcher Tech", 100_000.0, 4.0, 0.5, Some(5)),
            UpgradeKind::Ball => ("Projectile Aero", 75_000.0, 3.5, 0.15, Some(5)),
        };
        Self {
            name: name.to_string(),
            level: 1,
            base_cost,
            cost_multiplier,
            effect_multiplier,
            max_level,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.max_level.is_some_and(|max| self.level >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrades {
    pub power: UpgradeStats,
    pub economy: UpgradeStats,
    /// Multiplies all landing income
    pub catapult: UpgradeStats,
    /// Drag reduction
    pub ball: UpgradeStats,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            power: UpgradeStats::initial(UpgradeKind::Power),
            economy: UpgradeStats::initial(UpgradeKind::Economy),
            catapult: UpgradeStats::initial(UpgradeKind::Catapult),
            ball: UpgradeStats::initial(UpgradeKind::Ball),
        }
    }
}

impl Upgrades {
    pub fn get(&self, kind: UpgradeKind) -> &UpgradeStats {
        match kind {
            UpgradeKind::Power => &self.power,
            UpgradeKind::Economy => &self.economy,
            UpgradeKind::Catapult => &self.catapult,
            UpgradeKind::Ball => &self.ball,
        }
    }

    pub fn get_mut(&mut self, kind: UpgradeKind) -> &mut UpgradeStats {
        match kind {
            UpgradeKind::Power => &mut self.power,
            UpgradeKind::Economy => &mut self.economy,
            UpgradeKind::Catapult => &mut self.catapult,
            UpgradeKind::Ball => &mut self.ball,
        }
    }
}

/// Dual-currency upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OmegaKind {
    GravityDampener,
    GemFinder,
}

impl OmegaKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gravity_dampener" => Some(OmegaKind::GravityDampener),
            "gem_finder" => Some(OmegaKind::GemFinder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmegaUpgrade {
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub base_money_cost: f64,
    pub base_gem_cost: f64,
    /// Fractional effect per level
    pub effect: f64,
}

impl OmegaUpgrade {
    pub fn initial(kind: OmegaKind) -> Self {
        let (name, base_money_cost, base_gem_cost, effect) = match kind {
            OmegaKind::GravityDampener => ("Gravity Dampener", 100_000.0, 10.0, 0.05),
            OmegaKind::GemFinder => ("Gem Scanner", 500_000.0, 25.0, 0.02),
        };
        Self {
            name: name.to_string(),
            level: 0,
            max_level: 5,
            base_money_cost,
            base_gem_cost,
            effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmegaUpgrades {
    pub gravity_dampener: OmegaUpgrade,
    pub gem_finder: OmegaUpgrade,
}

impl Default for OmegaUpgrades {
    fn default() -> Self {
        Self {
            gravity_dampener: OmegaUpgrade::initial(OmegaKind::GravityDampener),
            gem_finder: OmegaUpgrade::initial(OmegaKind::GemFinder),
        }
    }
}

impl OmegaUpgrades {
    pub fn get(&self, kind: OmegaKind) -> &OmegaUpgrade {
        match kind {
            OmegaKind::GravityDampener => &self.gravity_dampener,
            OmegaKind::GemFinder => &self.gem_finder,
        }
    }

    pub fn get_mut(&mut self, kind: OmegaKind) -> &mut OmegaUpgrade {
        match kind {
            OmegaKind::GravityDampener => &mut self.gravity_dampener,
            OmegaKind::GemFinder => &mut self.gem_finder,
        }
    }
}

/// Base-building upgrades with a construction delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureKind {
    MissionControl,
    LaunchGantry,
    XenoLab,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] = [
        StructureKind::MissionControl,
        StructureKind::LaunchGantry,
        StructureKind::XenoLab,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mission_control" => Some(StructureKind::MissionControl),
            "launch_gantry" => Some(StructureKind::LaunchGantry),
            "xeno_lab" => Some(StructureKind::XenoLab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    #[serde(default)]
    pub is_constructing: bool,
    /// 0-100, only advances while `is_constructing`
    #[serde(default)]
    pub construction_progress: f32,
}

impl Structure {
    pub fn initial(kind: StructureKind) -> Self {
        let (name, max_level, base_cost, cost_multiplier) = match kind {
            StructureKind::MissionControl => ("Mission Control", 10, 1_000_000.0, 2.5),
            StructureKind::LaunchGantry => ("Launch Gantry", 5, 5_000_000.0, 3.0),
            StructureKind::XenoLab => ("Xeno-Laboratory", 5, 10_000_000.0, 4.0),
        };
        Self {
            name: name.to_string(),
            level: 0,
            max_level,
            base_cost,
            cost_multiplier,
            is_constructing: false,
            construction_progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structures {
    pub mission_control: Structure,
    pub launch_gantry: Structure,
    pub xeno_lab: Structure,
}

impl Default for Structures {
    fn default() -> Self {
        Self {
            mission_control: Structure::initial(StructureKind::MissionControl),
            launch_gantry: Structure::initial(StructureKind::LaunchGantry),
            xeno_lab: Structure::initial(StructureKind::XenoLab),
        }
    }
}

impl Structures {
    pub fn get(&self, kind: StructureKind) -> &Structure {
        match kind {
            StructureKind::MissionControl => &self.mission_control,
            StructureKind::LaunchGantry => &self.launch_gantry,
            StructureKind::XenoLab => &self.xeno_lab,
        }
    }

    pub fn get_mut(&mut self, kind: StructureKind) -> &mut Structure {
        match kind {
            StructureKind::MissionControl => &mut self.mission_control,
            StructureKind::LaunchGantry => &mut self.launch_gantry,
            StructureKind::XenoLab => &mut self.xeno_lab,
        }
    }
}

/// Earnings multipliers that only ever grow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentMultipliers {
    pub money: f64,
}

impl Default for PermanentMultipliers {
    fn default() -> Self {
        Self { money: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerState {
    pub hired: bool,
    /// Gems paid per interval
    pub level: u32,
    pub name: String,
    pub last_gem_claim_ms: u64,
}

impl ManagerState {
    fn new(now_ms: u64) -> Self {
        Self {
            hired: false,
            level: 1,
            name: "Director Kael".to_string(),
            last_gem_claim_ms: now_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedStats {
    pub total_gems_earned: u64,
    pub items_found: u32,
    pub hazards_hit: u32,
    pub airdrops_collected: u32,
    /// Seconds on the game screen while unpaused
    pub time_played: u64,
    pub rare_events_found: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeShopKind {
    Cash,
    PowerLevel,
    EconomyLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeShopItem {
    pub id: u64,
    pub name: String,
    pub rarity: Rarity,
    pub cost: f64,
    pub kind: TimeShopKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeShop {
    pub next_refresh_ms: u64,
    pub item: Option<TimeShopItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Asteroid,
    Collectable,
}

/// Cargo in the hold; immutable once created, removed on sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub rarity: Rarity,
    pub value: f64,
    pub category: ItemCategory,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Info,
    Success,
    Warning,
    Danger,
    Glitch,
}

/// Entry in the player-visible log feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub id: u64,
    pub text: String,
    pub kind: LogKind,
    pub timestamp_ms: u64,
}

/// The launched projectile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Altitude, never below zero
    pub position: f64,
    pub velocity: f64,
    pub is_launched: bool,
    /// Max altitude since the last launch
    pub peak_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    Money,
    Gem,
    Asteroid,
}

/// Altitude-anchored pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drop {
    pub id: u64,
    pub altitude: f64,
    /// Horizontal position (percent of play field)
    pub x: f32,
    pub kind: DropKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Bird,
    Collectable,
    Jet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u64,
    pub altitude: f64,
    pub x: f32,
    pub kind: HazardKind,
}

/// Supply crate falling toward the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airdrop {
    pub id: u64,
    pub x: f32,
    pub altitude: f64,
    /// Signed vertical speed per frame (negative = falling)
    pub descent: f64,
    pub is_landed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RareEventKind {
    GoldenComet,
    GemDrone,
}

/// Screen-relative horizontal drifter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RareEvent {
    pub id: u64,
    pub kind: RareEventKind,
    /// Percent of screen width
    pub x: f32,
    /// Screen pixels from the top
    pub y: f32,
    pub vx: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Money,
    Gems,
}

/// Reward animating toward the HUD; not part of the balance until it arrives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingResource {
    pub id: u64,
    pub kind: ResourceKind,
    pub value: f64,
    pub pos: Vec2,
    pub target: Vec2,
}

/// Milestone reward waiting for the player to dismiss its dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingMilestone {
    pub height: u64,
    pub reward: f64,
    pub message: String,
}

/// Visual hazard that damages systems after a delay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetEncounter {
    pub altitude: f64,
    pub damage_at_ms: u64,
}

/// Dialogs; any open dialog pauses the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modal {
    Shop,
    TimeShop,
    Map,
    Worlds,
    GemShop,
    Inventory,
    ControlTower,
    SpinWheel,
    CosmicEvent,
    Manager,
    Stats,
    Build,
    Codes,
    Crate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrizeKind {
    Money,
    Gems,
    Power,
    Economy,
    Item,
}

/// Non-pausing reward notice for the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub title: String,
    pub message: String,
    pub kind: PrizeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeferredEffect {
    SystemDamage,
    Log { text: String, kind: LogKind },
}

/// Effect applied on the first running frame at or after `due_ms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    pub due_ms: u64,
    pub effect: DeferredEffect,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the session rng was derived from
    pub seed: u64,
    pub money: f64,
    pub gems: u64,
    pub likes: u32,
    pub has_liked: bool,
    pub lifetime_earnings: f64,
    /// Best single landing income
    pub high_score: f64,
    pub total_launches: u32,
    pub max_height: f64,
    pub record_height: f64,
    /// Milestone heights already triggered (each at most once)
    pub reached_milestones: Vec<u64>,
    /// Milestone rewards queued behind their dialogs
    pub pending_milestones: VecDeque<PendingMilestone>,
    pub upgrades: Upgrades,
    pub omega: OmegaUpgrades,
    pub structures: Structures,
    pub manager: ManagerState,
    pub stats: DetailedStats,
    pub current_world: World,
    pub unlocked_worlds: Vec<World>,
    pub time_shop: TimeShop,
    pub next_cosmic_event_ms: u64,
    /// 0: done, 1: launch, 2: in-air, 3: shop
    pub tutorial_step: u8,
    pub permanent_multipliers: PermanentMultipliers,
    pub inventory: Vec<InventoryItem>,
    pub logs: Vec<LogMessage>,
    pub system_damage: bool,
    pub redeemed_codes: BTreeSet<String>,
    pub mega_boost_armed: bool,
    /// Rewards in transit to the HUD
    pub flying_resources: Vec<FlyingResource>,
    next_id: u64,

    // --- Session-only ---
    #[serde(skip)]
    pub screen: Screen,
    #[serde(skip)]
    pub open_modal: Option<Modal>,
    #[serde(skip)]
    pub ball: BallState,
    #[serde(skip)]
    pub drops: Vec<Drop>,
    #[serde(skip)]
    pub hazards: Vec<Hazard>,
    #[serde(skip)]
    pub airdrops: Vec<Airdrop>,
    #[serde(skip)]
    pub rare_events: Vec<RareEvent>,
    #[serde(skip)]
    pub planet_encounter: Option<PlanetEncounter>,
    #[serde(skip)]
    pub deferred: Vec<Deferred>,
    #[serde(skip)]
    pub prize: Option<Prize>,
    #[serde(skip)]
    pub last_drop_spawn_altitude: f64,
    #[serde(skip)]
    pub last_jet_spawn_ms: u64,
    /// "m:ss" until the next cosmic event
    #[serde(skip)]
    pub cosmic_countdown: String,
    /// Set by actions that want an immediate save
    #[serde(skip)]
    pub save_requested: bool,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    #[serde(skip)]
    pub tuning: Tuning,
}

impl GameState {
    /// Fresh save with every timer scheduled relative to `now_ms`
    pub fn new(seed: u64, now_ms: u64) -> Self {
        Self {
            seed,
            money: 0.0,
            gems: 0,
            likes: 0,
            has_liked: false,
            lifetime_earnings: 0.0,
            high_score: 0.0,
            total_launches: 0,
            max_height: 0.0,
            record_height: 0.0,
            reached_milestones: Vec::new(),
            pending_milestones: VecDeque::new(),
            upgrades: Upgrades::default(),
            omega: OmegaUpgrades::default(),
            structures: Structures::default(),
            manager: ManagerState::new(now_ms),
            stats: DetailedStats::default(),
            current_world: World::Earth,
            unlocked_worlds: vec![World::Earth],
            time_shop: TimeShop {
                next_refresh_ms: now_ms + TIME_SHOP_INTERVAL_MS,
                item: None,
            },
            next_cosmic_event_ms: now_ms + COSMIC_EVENT_INTERVAL_MS,
            tutorial_step: 0,
            permanent_multipliers: PermanentMultipliers::default(),
            inventory: Vec::new(),
            logs: Vec::new(),
            system_damage: false,
            redeemed_codes: BTreeSet::new(),
            mega_boost_armed: false,
            flying_resources: Vec::new(),
            next_id: 1,
            screen: Screen::Title,
            open_modal: None,
            ball: BallState::default(),
            drops: Vec::new(),
            hazards: Vec::new(),
            airdrops: Vec::new(),
            rare_events: Vec::new(),
            planet_encounter: None,
            deferred: Vec::new(),
            prize: None,
            last_drop_spawn_altitude: 0.0,
            last_jet_spawn_ms: now_ms,
            cosmic_countdown: String::new(),
            save_requested: false,
            rng: Pcg32::seed_from_u64(seed),
            tuning: Tuning::default(),
        }
    }

    /// Same as `new` with custom tuning
    pub fn with_tuning(seed: u64, now_ms: u64, tuning: Tuning) -> Self {
        let mut state = Self::new(seed, now_ms);
        state.tuning = tuning;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuild session-only fields after a load
    pub(crate) fn reset_session(&mut self, now_ms: u64, tuning: Tuning) {
        self.screen = Screen::Title;
        self.open_modal = None;
        self.ball = BallState::default();
        self.drops.clear();
        self.hazards.clear();
        self.airdrops.clear();
        self.rare_events.clear();
        self.planet_encounter = None;
        self.deferred.clear();
        self.prize = None;
        self.last_drop_spawn_altitude = 0.0;
        self.last_jet_spawn_ms = now_ms;
        self.cosmic_countdown.clear();
        self.save_requested = false;
        self.rng = Pcg32::seed_from_u64(self.seed ^ now_ms);
        self.tuning = tuning;
        // Ids must stay ahead of anything already in the save
        let max_seen = self
            .inventory
            .iter()
            .map(|i| i.id)
            .chain(self.logs.iter().map(|l| l.id))
            .chain(self.flying_resources.iter().map(|f| f.id))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_seen + 1);
    }

    /// Any dialog open, including a queued milestone
    pub fn is_paused(&self) -> bool {
        self.open_modal.is_some() || !self.pending_milestones.is_empty()
    }

    /// Frame loop and timers only do work while this holds
    pub fn is_running(&self) -> bool {
        self.screen == Screen::Game && !self.is_paused()
    }

    /// Append to the player log feed, keeping the newest entries
    pub fn push_log(&mut self, text: impl Into<String>, kind: LogKind, now_ms: u64) {
        let text = text.into();
        log::debug!("[{:?}] {}", kind, text);
        let id = self.next_entity_id();
        self.logs.push(LogMessage {
            id,
            text,
            kind,
            timestamp_ms: now_ms,
        });
        if self.logs.len() > LOG_CAPACITY {
            let excess = self.logs.len() - LOG_CAPACITY;
            self.logs.drain(..excess);
        }
    }

    /// HUD counter a resource flies toward
    pub fn hud_target(&self, kind: ResourceKind) -> Vec2 {
        let x = self.tuning.viewport_width - 80.0;
        match kind {
            ResourceKind::Money => Vec2::new(x, 40.0),
            ResourceKind::Gems => Vec2::new(x, 80.0),
        }
    }

    /// Screen point above the launch pad
    pub fn pad_point(&self) -> Vec2 {
        Vec2::new(
            self.tuning.viewport_width / 2.0,
            self.tuning.viewport_height - 100.0,
        )
    }

    /// Screen center, where in-flight pickups start
    pub fn center_point(&self) -> Vec2 {
        Vec2::new(
            self.tuning.viewport_width / 2.0,
            self.tuning.viewport_height / 2.0,
        )
    }

    /// Put a reward in flight toward the HUD
    pub fn spawn_flying_resource(&mut self, kind: ResourceKind, value: f64, origin: Vec2) {
        let id = self.next_entity_id();
        let target = self.hud_target(kind);
        self.flying_resources.push(FlyingResource {
            id,
            kind,
            value,
            pos: origin,
            target,
        });
    }

    /// Credit gems and count them toward lifetime stats
    pub fn earn_gems(&mut self, amount: u64) {
        self.gems += amount;
        self.stats.total_gems_earned += amount;
    }

    /// Add a found item to the hold
    pub fn stow_item(&mut self, item: InventoryItem) {
        self.inventory.push(item);
        self.stats.items_found += 1;
    }

    /// Read-only view for the rendering layer
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            screen: self.screen,
            open_modal: self.open_modal,
            milestone: self.pending_milestones.front(),
            prize: self.prize.as_ref(),
            money: self.money,
            gems: self.gems,
            system_damage: self.system_damage,
            current_world: self.current_world,
            ball: &self.ball,
            drops: &self.drops,
            hazards: &self.hazards,
            airdrops: &self.airdrops,
            rare_events: &self.rare_events,
            flying_resources: &self.flying_resources,
            planet_encounter: self.planet_encounter.as_ref(),
            logs: &self.logs,
            cosmic_countdown: &self.cosmic_countdown,
            tutorial_step: self.tutorial_step,
        }
    }
}

/// Per-frame view handed to the UI
#[derive(Debug, Serialize)]
pub struct RenderSnapshot<'a> {
    pub screen: Screen,
    pub open_modal: Option<Modal>,
    pub milestone: Option<&'a PendingMilestone>,
    pub prize: Option<&'a Prize>,
    pub money: f64,
    pub gems: u64,
    pub system_damage: bool,
    pub current_world: World,
    pub ball: &'a BallState,
    pub drops: &'a [Drop],
    pub hazards: &'a [Hazard],
    pub airdrops: &'a [Airdrop],
    pub rare_events: &'a [RareEvent],
    pub flying_resources: &'a [FlyingResource],
    pub planet_encounter: Option<&'a PlanetEncounter>,
    pub logs: &'a [LogMessage],
    pub cosmic_countdown: &'a str,
    pub tutorial_step: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7, 1_000);
        assert_eq!(state.screen, Screen::Title);
        assert_eq!(state.upgrades.power.level, 1);
        assert_eq!(state.omega.gravity_dampener.level, 0);
        assert_eq!(state.structures.xeno_lab.level, 0);
        assert_eq!(state.time_shop.next_refresh_ms, 1_000 + TIME_SHOP_INTERVAL_MS);
        assert_eq!(state.next_cosmic_event_ms, 1_000 + COSMIC_EVENT_INTERVAL_MS);
        assert_eq!(state.unlocked_worlds, vec![World::Earth]);
        assert!(!state.is_running());
    }

    #[test]
    fn test_log_feed_is_capped() {
        let mut state = GameState::new(1, 0);
        for i in 0..25 {
            state.push_log(format!("entry {i}"), LogKind::Info, i);
        }
        assert_eq!(state.logs.len(), LOG_CAPACITY);
        assert_eq!(state.logs.last().map(|l| l.text.as_str()), Some("entry 24"));
        assert_eq!(state.logs[0].text, "entry 15");
    }

    #[test]
    fn test_pause_condition() {
        let mut state = GameState::new(1, 0);
        state.screen = Screen::Game;
        assert!(state.is_running());

        state.open_modal = Some(Modal::Stats);
        assert!(!state.is_running());
        state.open_modal = None;

        state.pending_milestones.push_back(PendingMilestone {
            height: 5_000,
            reward: 10_000.0,
            message: String::new(),
        });
        assert!(state.is_paused());
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut state = GameState::new(1, 0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_upgrade_max_level() {
        let mut catapult = UpgradeStats::initial(UpgradeKind::Catapult);
        assert!(!catapult.is_maxed());
        catapult.level = 5;
        assert!(catapult.is_maxed());
        let power = UpgradeStats::initial(UpgradeKind::Power);
        assert!(power.max_level.is_none());
    }

    #[test]
    fn test_world_lookup() {
        assert_eq!(World::from_str("mars"), Some(World::Mars));
        assert_eq!(World::from_str(" VOID "), Some(World::Void));
        assert_eq!(World::from_str("pluto"), None);
    }
}
