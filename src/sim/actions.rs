//! Player actions
//!
//! Every action checks all of its preconditions before touching the state,
//! so a rejected action leaves the state exactly as it was. Rejections the
//! player should see (bad codes) also go to the log feed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::economy;
use super::entities::find_cargo;
use super::spawn::{self, AirdropReward, CrateRoll, SpinReward};
use super::state::{
    GameState, InventoryItem, ItemCategory, LogKind, Modal, OmegaKind, Prize, PrizeKind, Rarity,
    RareEventKind, ResourceKind, Screen, StructureKind, TimeShopKind, UpgradeKind, World,
};
use super::timers;

/// Why an action did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    InsufficientFunds,
    MaxLevel,
    AlreadyLaunched,
    Paused,
    NotFound,
    AlreadyRedeemed,
    UnknownCode,
    AlreadyConstructing,
    NotUnlocked,
    AlreadyUnlocked,
    NotHired,
    AlreadyHired,
    NotLanded,
    Damaged,
    Inactive,
    AlreadyLiked,
    NothingToSell,
    NoOffer,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::InsufficientFunds => "insufficient funds",
            Rejection::MaxLevel => "already at max level",
            Rejection::AlreadyLaunched => "ball is already in flight",
            Rejection::Paused => "game is paused",
            Rejection::NotFound => "no such entity",
            Rejection::AlreadyRedeemed => "code already redeemed",
            Rejection::UnknownCode => "unknown code",
            Rejection::AlreadyConstructing => "construction already in progress",
            Rejection::NotUnlocked => "world is locked",
            Rejection::AlreadyUnlocked => "world already unlocked",
            Rejection::NotHired => "manager not hired",
            Rejection::AlreadyHired => "manager already hired",
            Rejection::NotLanded => "airdrop has not landed",
            Rejection::Damaged => "systems damaged",
            Rejection::Inactive => "not available right now",
            Rejection::AlreadyLiked => "already liked",
            Rejection::NothingToSell => "cargo hold is empty",
            Rejection::NoOffer => "no offer available",
        };
        f.write_str(text)
    }
}

impl std::error::Error for Rejection {}

/// Gem shop catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GemShopItem {
    CashSmall,
    CashLarge,
    Multiplier,
    Boost,
}

impl GemShopItem {
    pub fn cost(&self) -> u64 {
        match self {
            GemShopItem::CashSmall => 5,
            GemShopItem::CashLarge => 25,
            GemShopItem::Multiplier => 100,
            GemShopItem::Boost => 10,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash_small" => Some(GemShopItem::CashSmall),
            "cash_large" => Some(GemShopItem::CashLarge),
            "multiplier" => Some(GemShopItem::Multiplier),
            "boost" => Some(GemShopItem::Boost),
            _ => None,
        }
    }
}

/// Everything the UI can ask the simulation to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    StartGame,
    Launch,
    BuyUpgrade(UpgradeKind),
    BuyMaxUpgrade(UpgradeKind),
    BuyOmega(OmegaKind),
    BuyStructure(StructureKind),
    BuyTimeShopItem,
    BuyGemShopItem(GemShopItem),
    SpinWheel { cost: u64 },
    OpenSupplyCrate,
    RedeemCode(String),
    CollectRareEvent(u64),
    CollectAirdrop(u64),
    SellInventoryItem(u64),
    SellAll,
    DismissMilestone,
    DismissPrize,
    ClaimCosmicEvent,
    SelectWorld(World),
    BuyWorld(World),
    HireManager,
    UpgradeManager,
    Like,
    ToggleModal(Modal),
    CloseModal,
}

/// Run one action
pub fn apply(state: &mut GameState, action: &Action, now_ms: u64) -> Result<(), Rejection> {
    match action {
        Action::StartGame => start_game(state, now_ms),
        Action::Launch => launch(state, now_ms),
        Action::BuyUpgrade(kind) => buy_upgrade(state, *kind, now_ms),
        Action::BuyMaxUpgrade(kind) => buy_max_upgrade(state, *kind, now_ms).map(|_| ()),
        Action::BuyOmega(kind) => buy_omega(state, *kind, now_ms),
        Action::BuyStructure(kind) => buy_structure(state, *kind, now_ms),
        Action::BuyTimeShopItem => buy_time_shop_item(state, now_ms),
        Action::BuyGemShopItem(item) => buy_gem_shop_item(state, *item, now_ms),
        Action::SpinWheel { cost } => spin_wheel(state, *cost, now_ms),
        Action::OpenSupplyCrate => open_supply_crate(state, now_ms),
        Action::RedeemCode(code) => redeem_code(state, code, now_ms),
        Action::CollectRareEvent(id) => collect_rare_event(state, *id, now_ms),
        Action::CollectAirdrop(id) => collect_airdrop(state, *id, now_ms),
        Action::SellInventoryItem(id) => sell_inventory_item(state, *id, now_ms),
        Action::SellAll => sell_all(state, now_ms),
        Action::DismissMilestone => dismiss_milestone(state),
        Action::DismissPrize => dismiss_prize(state),
        Action::ClaimCosmicEvent => claim_cosmic_event(state, now_ms),
        Action::SelectWorld(world) => select_world(state, *world),
        Action::BuyWorld(world) => buy_world(state, *world, now_ms),
        Action::HireManager => hire_manager(state, now_ms),
        Action::UpgradeManager => upgrade_manager(state, now_ms),
        Action::Like => like(state),
        Action::ToggleModal(modal) => toggle_modal(state, *modal),
        Action::CloseModal => {
            state.open_modal = None;
            Ok(())
        }
    }
}

/// Leave the title screen
pub fn start_game(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if state.screen == Screen::Game {
        return Ok(());
    }
    state.screen = Screen::Game;
    state.tutorial_step = 1;
    state.push_log("Welcome Pilot. Initialize Launch Sequence.", LogKind::Info, now_ms);
    if state.time_shop.item.is_none() {
        timers::refresh_time_shop(state, now_ms);
    }
    log::info!("Game started");
    Ok(())
}

pub fn launch(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if state.screen != Screen::Game {
        return Err(Rejection::Inactive);
    }
    if state.ball.is_launched {
        return Err(Rejection::AlreadyLaunched);
    }
    if state.is_paused() {
        return Err(Rejection::Paused);
    }
    if state.system_damage {
        return Err(Rejection::Damaged);
    }

    let velocity = economy::launch_velocity(state);
    if state.mega_boost_armed {
        state.mega_boost_armed = false;
        state.push_log("MEGA BOOST INITIATED!", LogKind::Info, now_ms);
    } else {
        state.push_log("Launch sequence initiated.", LogKind::Info, now_ms);
    }

    state.ball.is_launched = true;
    state.ball.velocity = velocity;
    state.ball.position = LAUNCH_START_ALTITUDE;
    state.ball.peak_height = 0.0;
    state.total_launches += 1;
    state.tutorial_step = if state.tutorial_step == 1 { 2 } else { 0 };
    log::debug!("Launch #{} at {:.1}", state.total_launches, velocity);
    Ok(())
}

pub fn buy_upgrade(state: &mut GameState, kind: UpgradeKind, now_ms: u64) -> Result<(), Rejection> {
    let upgrade = state.upgrades.get(kind);
    if upgrade.is_maxed() {
        return Err(Rejection::MaxLevel);
    }
    let cost = economy::upgrade_cost(upgrade);
    if state.money < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= cost;
    let upgrade = state.upgrades.get_mut(kind);
    upgrade.level += 1;
    let text = format!("System Upgraded: {}", upgrade.name);
    state.tutorial_step = 0;
    state.push_log(text, LogKind::Success, now_ms);
    Ok(())
}

/// Buy as many levels as money allows in one transaction. Returns the
/// number of levels bought.
pub fn buy_max_upgrade(state: &mut GameState, kind: UpgradeKind, now_ms: u64) -> Result<u32, Rejection> {
    let upgrade = state.upgrades.get(kind);
    if upgrade.is_maxed() {
        return Err(Rejection::MaxLevel);
    }
    let plan = economy::plan_buy_max(upgrade, state.money);
    if plan.levels == 0 {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= plan.total_cost;
    state.upgrades.get_mut(kind).level += plan.levels;
    state.push_log(
        format!("System Overclocked: +{} Levels", plan.levels),
        LogKind::Success,
        now_ms,
    );
    Ok(plan.levels)
}

pub fn buy_omega(state: &mut GameState, kind: OmegaKind, now_ms: u64) -> Result<(), Rejection> {
    let upgrade = state.omega.get(kind);
    if upgrade.level >= upgrade.max_level {
        return Err(Rejection::MaxLevel);
    }
    let (money_cost, gem_cost) = economy::omega_costs(upgrade);
    if state.money < money_cost || state.gems < gem_cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= money_cost;
    state.gems -= gem_cost;
    let upgrade = state.omega.get_mut(kind);
    upgrade.level += 1;
    let text = format!("OMEGA PROTOCOL: {} Enhanced.", upgrade.name);
    state.push_log(text, LogKind::Success, now_ms);
    Ok(())
}

/// Start construction; the level arrives when construction completes
pub fn buy_structure(state: &mut GameState, kind: StructureKind, now_ms: u64) -> Result<(), Rejection> {
    let structure = state.structures.get(kind);
    if structure.level >= structure.max_level {
        return Err(Rejection::MaxLevel);
    }
    if structure.is_constructing {
        return Err(Rejection::AlreadyConstructing);
    }
    let cost = economy::structure_cost(structure);
    if state.money < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= cost;
    let structure = state.structures.get_mut(kind);
    structure.is_constructing = true;
    structure.construction_progress = 0.0;
    let text = format!("Construction Initiated: {}", structure.name);
    state.push_log(text, LogKind::Info, now_ms);
    Ok(())
}

pub fn buy_time_shop_item(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    let Some(offer) = state.time_shop.item.as_ref() else {
        return Err(Rejection::NoOffer);
    };
    if state.money < offer.cost {
        return Err(Rejection::InsufficientFunds);
    }

    let (cost, kind, value) = (offer.cost, offer.kind, offer.value);
    state.money -= cost;
    match kind {
        TimeShopKind::Cash => state.money += value,
        TimeShopKind::PowerLevel => state.upgrades.power.level += 1,
        TimeShopKind::EconomyLevel => state.upgrades.economy.level += 1,
    }
    state.time_shop.item = None;
    close_if_open(state, Modal::TimeShop);
    state.push_log("Transaction Complete.", LogKind::Success, now_ms);
    Ok(())
}

pub fn buy_gem_shop_item(state: &mut GameState, item: GemShopItem, now_ms: u64) -> Result<(), Rejection> {
    let cost = item.cost();
    if state.gems < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.gems -= cost;
    match item {
        GemShopItem::CashSmall => state.money += 10_000.0,
        GemShopItem::CashLarge => state.money += 1_000_000.0,
        GemShopItem::Multiplier => state.permanent_multipliers.money *= 2.0,
        GemShopItem::Boost => state.mega_boost_armed = true,
    }
    close_if_open(state, Modal::GemShop);
    state.push_log("Premium Purchase Confirmed.", LogKind::Success, now_ms);
    Ok(())
}

pub fn spin_wheel(state: &mut GameState, cost: u64, now_ms: u64) -> Result<(), Rejection> {
    if state.gems < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.gems -= cost;
    let economy_level = state.upgrades.economy.level;
    let prize = match spawn::roll_spin(&mut state.rng, economy_level) {
        SpinReward::Money(amount) => {
            state.money += amount;
            prize("HYPER CASH INJECTION", format_money(amount), PrizeKind::Money)
        }
        SpinReward::Gems(gems) => {
            state.earn_gems(gems);
            prize("GEM CACHE", format!("{} Gems", gems), PrizeKind::Gems)
        }
        SpinReward::PowerLevels(levels) => {
            state.upgrades.power.level += levels;
            prize("CATAPULT OVERCHARGE", format!("+{} Power Levels", levels), PrizeKind::Power)
        }
        SpinReward::EconomyLevels(levels) => {
            state.upgrades.economy.level += levels;
            prize("MARKET SYNERGY", format!("+{} Money Levels", levels), PrizeKind::Economy)
        }
        SpinReward::DarkMatterCore => {
            let id = state.next_entity_id();
            state.stow_item(InventoryItem {
                id,
                name: "Dark Matter Core".to_string(),
                rarity: Rarity::Legendary,
                value: 100_000_000.0,
                category: ItemCategory::Collectable,
                timestamp_ms: now_ms,
            });
            prize("ANOMALY CONTAINED", "Item: Dark Matter Core".to_string(), PrizeKind::Item)
        }
    };
    log::debug!("Spin wheel: {}", prize.title);
    state.prize = Some(prize);
    Ok(())
}

/// Premium crate bought with both currencies
pub fn open_supply_crate(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if state.money < CRATE_MONEY_COST || state.gems < CRATE_GEM_COST {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= CRATE_MONEY_COST;
    state.gems -= CRATE_GEM_COST;
    let prize = match spawn::roll_supply_crate(&mut state.rng) {
        CrateRoll::Money(amount) => {
            state.money += amount;
            prize("SUPPLY CRATE", format_money(amount), PrizeKind::Money)
        }
        CrateRoll::Gems(gems) => {
            state.earn_gems(gems);
            prize("SUPPLY CRATE", format!("{} Gems", group_digits(gems)), PrizeKind::Gems)
        }
        CrateRoll::Cargo => {
            let id = state.next_entity_id();
            let item = spawn::premium_cargo(&mut state.rng, id, now_ms);
            let message = item.name.clone();
            state.stow_item(item);
            prize("SUPPLY CRATE", message, PrizeKind::Item)
        }
    };
    state.prize = Some(prize);
    Ok(())
}

struct CodeReward {
    money: f64,
    gems: u64,
    label: &'static str,
    kind: PrizeKind,
    singularity: bool,
}

fn lookup_code(code: &str) -> Option<CodeReward> {
    let cash = |money: f64, label: &'static str| CodeReward {
        money,
        gems: 0,
        label,
        kind: PrizeKind::Money,
        singularity: false,
    };
    let reward = match code {
        "asteroid" => cash(10_000.0, "$10,000"),
        "space" => cash(50_000.0, "$50,000"),
        "galaxy" => cash(200_000.0, "$200,000"),
        "galactical" => cash(1_000_000.0, "$1,000,000"),
        "dark mater" => cash(10_000_000.0, "$10,000,000"),
        "gems" => CodeReward {
            money: 0.0,
            gems: 500,
            label: "500 Gems",
            kind: PrizeKind::Gems,
            singularity: false,
        },
        "???" => CodeReward {
            money: 1_000_000_000.0,
            gems: 5000,
            label: "DEV OVERRIDE: 1B Cash + 5k Gems + 'The Singularity'",
            kind: PrizeKind::Item,
            singularity: true,
        },
        _ => return None,
    };
    Some(reward)
}

/// Case-insensitive, single use per save
pub fn redeem_code(state: &mut GameState, input: &str, now_ms: u64) -> Result<(), Rejection> {
    let code = input.trim();
    let key = code.to_lowercase();

    if state.redeemed_codes.contains(&key) {
        state.push_log("Code already redeemed.", LogKind::Warning, now_ms);
        return Err(Rejection::AlreadyRedeemed);
    }
    let Some(reward) = lookup_code(&key) else {
        state.push_log(format!("Invalid access code: {}", code), LogKind::Danger, now_ms);
        return Err(Rejection::UnknownCode);
    };

    state.money += reward.money;
    if reward.gems > 0 {
        state.earn_gems(reward.gems);
    }
    if reward.singularity {
        let id = state.next_entity_id();
        state.inventory.push(InventoryItem {
            id,
            name: "The Singularity".to_string(),
            rarity: Rarity::Mystery,
            value: 5_000_000_000.0,
            category: ItemCategory::Collectable,
            timestamp_ms: now_ms,
        });
    }
    state.redeemed_codes.insert(key);

    close_if_open(state, Modal::Codes);
    state.prize = Some(prize(
        "ACCESS GRANTED",
        format!("Code Accepted: {}. Reward: {}", code, reward.label),
        reward.kind,
    ));
    state.push_log(format!("Code Accepted: {}", code), LogKind::Success, now_ms);
    log::info!("Redeemed code '{}'", code);
    Ok(())
}

/// Click on a comet or drone
pub fn collect_rare_event(state: &mut GameState, id: u64, now_ms: u64) -> Result<(), Rejection> {
    let Some(index) = state.rare_events.iter().position(|e| e.id == id) else {
        return Err(Rejection::NotFound);
    };

    let event = state.rare_events.remove(index);
    state.stats.rare_events_found += 1;
    match event.kind {
        RareEventKind::GoldenComet => {
            let reward = COMET_REWARD_PER_ECONOMY * f64::from(state.upgrades.economy.level);
            state.money += reward;
            state.prize = Some(prize(
                "INTERSTELLAR LOTTERY",
                format!(
                    "You intercepted a secure banking transmission! +{}",
                    format_money(reward)
                ),
                PrizeKind::Money,
            ));
            state.push_log("RARE EVENT: GOLDEN COMET INTERCEPTED", LogKind::Glitch, now_ms);
        }
        RareEventKind::GemDrone => {
            state.earn_gems(DRONE_GEM_REWARD);
            state.prize = Some(prize(
                "DRONE SALVAGE",
                format!(
                    "You recovered a smuggling drone's payload. +{} Gems",
                    DRONE_GEM_REWARD
                ),
                PrizeKind::Gems,
            ));
            state.push_log("RARE EVENT: DRONE DOWNED", LogKind::Success, now_ms);
        }
    }
    Ok(())
}

/// Click on a landed supply crate
pub fn collect_airdrop(state: &mut GameState, id: u64, now_ms: u64) -> Result<(), Rejection> {
    let Some(index) = state.airdrops.iter().position(|a| a.id == id) else {
        return Err(Rejection::NotFound);
    };
    if !state.airdrops[index].is_landed {
        return Err(Rejection::NotLanded);
    }

    state.airdrops.remove(index);
    let economy_level = state.upgrades.economy.level;
    match spawn::roll_airdrop_open(&mut state.rng, economy_level) {
        AirdropReward::Money(amount) => {
            let origin = state.center_point();
            state.spawn_flying_resource(ResourceKind::Money, amount, origin);
            state.stats.airdrops_collected += 1;
            state.push_log(format!("Supply Crate: ${:.0}", amount), LogKind::Success, now_ms);
        }
        AirdropReward::Gems(gems) => {
            let origin = state.center_point();
            state.spawn_flying_resource(ResourceKind::Gems, gems as f64, origin);
            state.stats.airdrops_collected += 1;
            state.push_log(format!("Supply Crate: {} Gems", gems), LogKind::Success, now_ms);
        }
        AirdropReward::Cargo => {
            let item = find_cargo(state, ItemCategory::Collectable, now_ms);
            let text = format!("Supply Crate: {}", item.name);
            state.stow_item(item);
            state.push_log(text, LogKind::Success, now_ms);
        }
    }
    Ok(())
}

pub fn sell_inventory_item(state: &mut GameState, id: u64, now_ms: u64) -> Result<(), Rejection> {
    let Some(index) = state.inventory.iter().position(|i| i.id == id) else {
        return Err(Rejection::NotFound);
    };

    let item = state.inventory.remove(index);
    let origin = state.center_point();
    state.spawn_flying_resource(ResourceKind::Money, item.value, origin);
    state.push_log(format!("Sold data for \"{}\".", item.name), LogKind::Success, now_ms);
    Ok(())
}

/// Sell the whole hold as one flying payout
pub fn sell_all(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if state.inventory.is_empty() {
        return Err(Rejection::NothingToSell);
    }

    let total: f64 = state.inventory.drain(..).map(|i| i.value).sum();
    let origin = state.center_point();
    state.spawn_flying_resource(ResourceKind::Money, total, origin);
    state.push_log(
        format!("Bulk sale complete: {}", format_money(total)),
        LogKind::Success,
        now_ms,
    );
    close_if_open(state, Modal::Inventory);
    Ok(())
}

/// Close the front milestone dialog and pay its reward
pub fn dismiss_milestone(state: &mut GameState) -> Result<(), Rejection> {
    let milestone = state.pending_milestones.pop_front().ok_or(Rejection::NotFound)?;
    state.money += milestone.reward;
    Ok(())
}

pub fn dismiss_prize(state: &mut GameState) -> Result<(), Rejection> {
    state.prize.take().map(|_| ()).ok_or(Rejection::NotFound)
}

/// Double the permanent money multiplier
pub fn claim_cosmic_event(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if now_ms < state.next_cosmic_event_ms {
        return Err(Rejection::Inactive);
    }

    state.permanent_multipliers.money *= 2.0;
    state.next_cosmic_event_ms = now_ms + COSMIC_EVENT_INTERVAL_MS;
    close_if_open(state, Modal::CosmicEvent);
    state.push_log("COSMIC POWER ASSIMILATED. x2 EARNINGS.", LogKind::Glitch, now_ms);
    state.save_requested = true;
    log::info!("Cosmic event claimed, multiplier now x{}", state.permanent_multipliers.money);
    Ok(())
}

pub fn select_world(state: &mut GameState, world: World) -> Result<(), Rejection> {
    if !state.unlocked_worlds.contains(&world) {
        return Err(Rejection::NotUnlocked);
    }
    state.current_world = world;
    Ok(())
}

/// Unlock and travel to a world
pub fn buy_world(state: &mut GameState, world: World, now_ms: u64) -> Result<(), Rejection> {
    if state.unlocked_worlds.contains(&world) {
        return Err(Rejection::AlreadyUnlocked);
    }
    let cost = world_cost(world);
    if state.money < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= cost;
    state.unlocked_worlds.push(world);
    state.current_world = world;
    state.push_log(
        format!("Destination Authorized: {}", world.as_str()),
        LogKind::Success,
        now_ms,
    );
    Ok(())
}

pub fn hire_manager(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if state.manager.hired {
        return Err(Rejection::AlreadyHired);
    }
    if state.money < MANAGER_HIRE_COST {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= MANAGER_HIRE_COST;
    state.manager.hired = true;
    state.manager.last_gem_claim_ms = now_ms;
    let text = format!("{} Hired.", state.manager.name);
    state.push_log(text, LogKind::Success, now_ms);
    Ok(())
}

pub fn upgrade_manager(state: &mut GameState, now_ms: u64) -> Result<(), Rejection> {
    if !state.manager.hired {
        return Err(Rejection::NotHired);
    }
    let cost = economy::manager_upgrade_cost(&state.manager);
    if state.money < cost {
        return Err(Rejection::InsufficientFunds);
    }

    state.money -= cost;
    state.manager.level += 1;
    state.push_log("Gem Logistics Upgraded.", LogKind::Success, now_ms);
    Ok(())
}

pub fn like(state: &mut GameState) -> Result<(), Rejection> {
    if state.has_liked {
        return Err(Rejection::AlreadyLiked);
    }
    state.likes += 1;
    state.has_liked = true;
    Ok(())
}

/// Open `modal` (closing any other) or close it if already open. While
/// systems are damaged only the shop can be toggled.
pub fn toggle_modal(state: &mut GameState, modal: Modal) -> Result<(), Rejection> {
    if state.system_damage && modal != Modal::Shop {
        return Err(Rejection::Damaged);
    }

    state.open_modal = if state.open_modal == Some(modal) {
        None
    } else {
        Some(modal)
    };
    if modal == Modal::Shop && state.tutorial_step == 3 {
        state.tutorial_step = 0;
    }
    Ok(())
}

fn close_if_open(state: &mut GameState, modal: Modal) {
    if state.open_modal == Some(modal) {
        state.open_modal = None;
    }
}

fn prize(title: &str, message: String, kind: PrizeKind) -> Prize {
    Prize {
        title: title.to_string(),
        message,
        kind,
    }
}

/// "$1,234,567"
pub fn format_money(amount: f64) -> String {
    format!("${}", group_digits(amount.max(0.0).floor() as u64))
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
