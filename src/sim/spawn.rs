//! Procedural generators
//!
//! Every spawner is a function of current progress plus an injected rng, so
//! a seeded `Pcg32` reproduces a run exactly. Spawners return blueprints;
//! the caller assigns ids.

use rand::Rng;

use crate::consts::*;

use super::state::{
    Airdrop, Drop, DropKind, Hazard, HazardKind, InventoryItem, ItemCategory, Rarity, RareEvent,
    RareEventKind, TimeShopItem, TimeShopKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DropSpawn {
    pub altitude: f64,
    pub x: f32,
    pub kind: DropKind,
    pub value: f64,
}

impl DropSpawn {
    pub fn into_drop(self, id: u64) -> Drop {
        Drop {
            id,
            altitude: self.altitude,
            x: self.x,
            kind: self.kind,
            value: self.value,
        }
    }
}

/// Roll for a drop above a ball at `altitude`. Higher altitude raises both
/// the spawn odds and the share of gems/asteroids.
pub fn roll_drop<R: Rng + ?Sized>(rng: &mut R, altitude: f64, gem_bonus: f64) -> Option<DropSpawn> {
    let altitude_modifier = (altitude / 100_000.0).min(0.2);
    if rng.random::<f64>() >= 0.3 + altitude_modifier {
        return None;
    }

    let roll = rng.random::<f64>();
    let mut kind = DropKind::Money;
    // +$1 per 2ft of height on top of the base
    let mut value = (rng.random::<f64>() * 9000.0).floor() + 1000.0 + (altitude * 0.5).floor();

    let shifted = gem_bonus + altitude_modifier * 0.5;
    if roll < 0.05 + shifted && altitude > 5000.0 {
        kind = DropKind::Asteroid;
        value = BASE_ASTEROID_VALUE + altitude * 0.1;
    } else if roll < 0.25 + shifted {
        kind = DropKind::Gem;
        value = (rng.random::<f64>() * 9.0).floor() + 1.0 + (altitude / 20_000.0).floor();
    }

    Some(DropSpawn {
        altitude: altitude + 400.0 + rng.random::<f64>() * 500.0,
        x: 20.0 + rng.random::<f32>() * 60.0,
        kind,
        value,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardSpawn {
    pub altitude: f64,
    pub x: f32,
    pub kind: HazardKind,
}

impl HazardSpawn {
    pub fn into_hazard(self, id: u64) -> Hazard {
        Hazard {
            id,
            altitude: self.altitude,
            x: self.x,
            kind: self.kind,
        }
    }
}

/// Bird or collectable somewhere above the ball
pub fn roll_hazard<R: Rng + ?Sized>(rng: &mut R, altitude: f64, chance: f64) -> Option<HazardSpawn> {
    if rng.random::<f64>() >= chance {
        return None;
    }
    let spawn_altitude = altitude + 500.0 + rng.random::<f64>() * 500.0;
    let x = 10.0 + rng.random::<f32>() * 80.0;
    let kind = if rng.random::<f64>() > 0.5 {
        HazardKind::Collectable
    } else {
        HazardKind::Bird
    };
    Some(HazardSpawn {
        altitude: spawn_altitude,
        x,
        kind,
    })
}

/// Jumbo jet entering from the left between 2,000 and 50,000 ft
pub fn jet<R: Rng + ?Sized>(rng: &mut R) -> HazardSpawn {
    HazardSpawn {
        altitude: 2000.0 + rng.random::<f64>() * 48_000.0,
        x: -10.0,
        kind: HazardKind::Jet,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirdropSpawn {
    pub x: f32,
    pub altitude: f64,
    pub descent: f64,
}

impl AirdropSpawn {
    pub fn into_airdrop(self, id: u64) -> Airdrop {
        Airdrop {
            id,
            x: self.x,
            altitude: self.altitude,
            descent: self.descent,
            is_landed: false,
        }
    }
}

/// Supply crate dropped from just above the camera
pub fn roll_airdrop<R: Rng + ?Sized>(
    rng: &mut R,
    ball_altitude: f64,
    viewport_height: f32,
    chance: f64,
    descent: f64,
) -> Option<AirdropSpawn> {
    if rng.random::<f64>() >= chance {
        return None;
    }
    Some(AirdropSpawn {
        x: 10.0 + rng.random::<f32>() * 80.0,
        altitude: ball_altitude + f64::from(viewport_height) + 100.0,
        descent,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RareEventSpawn {
    pub kind: RareEventKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
}

impl RareEventSpawn {
    pub fn into_event(self, id: u64) -> RareEvent {
        RareEvent {
            id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            vx: self.vx,
        }
    }
}

/// Comet from the left or drone from the right
pub fn roll_rare_event<R: Rng + ?Sized>(
    rng: &mut R,
    viewport_height: f32,
    chance: f64,
) -> Option<RareEventSpawn> {
    if rng.random::<f64>() >= chance {
        return None;
    }
    let kind = if rng.random::<f64>() > 0.7 {
        RareEventKind::GoldenComet
    } else {
        RareEventKind::GemDrone
    };
    let y = 100.0 + rng.random::<f32>() * (viewport_height - 300.0).max(0.0);
    let (x, vx) = match kind {
        RareEventKind::GoldenComet => (-10.0, 3.0),
        RareEventKind::GemDrone => (110.0, -4.0),
    };
    Some(RareEventSpawn { kind, x, y, vx })
}

/// Rarity roll shared by shop offers
fn roll_offer_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    let roll = rng.random::<f64>();
    if roll > 0.98 {
        Rarity::Mystery
    } else if roll > 0.90 {
        Rarity::Legendary
    } else if roll > 0.75 {
        Rarity::Epic
    } else if roll > 0.50 {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Limited-time crate priced from lifetime earnings
pub fn time_shop_offer<R: Rng + ?Sized>(
    rng: &mut R,
    id: u64,
    lifetime_earnings: f64,
    economy_level: u32,
) -> TimeShopItem {
    let rarity = roll_offer_rarity(rng);
    let economy_level = f64::from(economy_level);
    let base_cost = 50.0 + lifetime_earnings * 0.05;

    let (cost, kind, value) = match rarity {
        Rarity::Common => (base_cost * 0.5, TimeShopKind::Cash, 100.0 + economy_level * 50.0),
        Rarity::Rare => (base_cost * 1.5, TimeShopKind::Cash, 500.0 + economy_level * 200.0),
        Rarity::Epic => {
            let kind = if rng.random::<f64>() > 0.5 {
                TimeShopKind::PowerLevel
            } else {
                TimeShopKind::EconomyLevel
            };
            (base_cost * 5.0, kind, 1.0)
        }
        Rarity::Legendary => (base_cost * 20.0, TimeShopKind::Cash, 50_000.0),
        Rarity::Mystery => (0.0, TimeShopKind::Cash, 1_000_000.0),
    };

    TimeShopItem {
        id,
        name: format!("{} Crate", rarity.as_str()),
        rarity,
        cost: cost.floor(),
        kind,
        value,
    }
}

/// Cargo found in flight or in a supply crate
pub fn cargo_item<R: Rng + ?Sized>(
    rng: &mut R,
    category: ItemCategory,
    lab_multiplier: f64,
    id: u64,
    now_ms: u64,
) -> InventoryItem {
    match category {
        ItemCategory::Collectable => {
            let template = CARGO_ITEMS[rng.random_range(0..CARGO_ITEMS.len())];
            let variance = 0.9 + rng.random::<f64>() * 0.2;
            InventoryItem {
                id,
                name: template.name.to_string(),
                rarity: template.rarity,
                value: (template.base_value * variance * lab_multiplier).floor(),
                category,
                timestamp_ms: now_ms,
            }
        }
        ItemCategory::Asteroid => {
            let roll = rng.random::<f64>();
            let (rarity, base_value) = if roll > 0.98 {
                (Rarity::Legendary, 500_000.0)
            } else if roll > 0.9 {
                (Rarity::Epic, 100_000.0)
            } else if roll > 0.7 {
                (Rarity::Rare, 25_000.0)
            } else {
                (Rarity::Common, 5_000.0)
            };
            let bonus = (rng.random::<f64>() * base_value * 0.5).floor();
            InventoryItem {
                id,
                name: "Unidentified Asteroid".to_string(),
                rarity,
                value: ((base_value + bonus) * lab_multiplier).floor(),
                category,
                timestamp_ms: now_ms,
            }
        }
    }
}

/// High-tier cargo at double base value
pub fn premium_cargo<R: Rng + ?Sized>(rng: &mut R, id: u64, now_ms: u64) -> InventoryItem {
    let wanted = if rng.random::<f64>() > 0.4 {
        Rarity::Legendary
    } else {
        Rarity::Epic
    };
    let pool: Vec<_> = CARGO_ITEMS
        .iter()
        .filter(|c| c.rarity == wanted || c.rarity == Rarity::Mystery)
        .collect();
    let template = pool[rng.random_range(0..pool.len())];
    InventoryItem {
        id,
        name: template.name.to_string(),
        rarity: template.rarity,
        value: template.base_value * 2.0,
        category: ItemCategory::Collectable,
        timestamp_ms: now_ms,
    }
}

/// Outcome of a proximity pickup of a falling crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AirdropPickup {
    Money(f64),
    Cargo,
}

/// Outcome of opening a landed crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AirdropReward {
    Money(f64),
    Gems(u64),
    Cargo,
}

/// Crate grabbed by the ball mid-air: half cash, half cargo
pub fn roll_airdrop_pickup<R: Rng + ?Sized>(rng: &mut R, economy_level: u32) -> AirdropPickup {
    if rng.random::<f64>() < 0.5 {
        AirdropPickup::Money(5000.0 * f64::from(economy_level))
    } else {
        AirdropPickup::Cargo
    }
}

/// Landed crate opened by click
pub fn roll_airdrop_open<R: Rng + ?Sized>(rng: &mut R, economy_level: u32) -> AirdropReward {
    let roll = rng.random::<f64>();
    if roll < 0.4 {
        AirdropReward::Money(10_000.0 * f64::from(economy_level))
    } else if roll < 0.5 {
        AirdropReward::Gems(5)
    } else {
        AirdropReward::Cargo
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinReward {
    Money(f64),
    Gems(u64),
    PowerLevels(u32),
    EconomyLevels(u32),
    DarkMatterCore,
}

pub fn roll_spin<R: Rng + ?Sized>(rng: &mut R, economy_level: u32) -> SpinReward {
    let roll = rng.random::<f64>();
    if roll < 0.25 {
        SpinReward::Money(5_000_000.0 * f64::from(economy_level))
    } else if roll < 0.50 {
        SpinReward::Gems(300)
    } else if roll < 0.70 {
        SpinReward::PowerLevels(3)
    } else if roll < 0.90 {
        SpinReward::EconomyLevels(3)
    } else {
        SpinReward::DarkMatterCore
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrateRoll {
    Money(f64),
    Gems(u64),
    Cargo,
}

pub fn roll_supply_crate<R: Rng + ?Sized>(rng: &mut R) -> CrateRoll {
    let roll = rng.random::<f64>();
    if roll < 0.15 {
        CrateRoll::Money(50_000_000.0)
    } else if roll < 0.3 {
        CrateRoll::Gems(5000)
    } else {
        CrateRoll::Cargo
    }
}
