//! Per-frame lifecycle of transient entities
//!
//! Each collection is updated, culled and collided independently. Every
//! proximity test reads the same [`BallProbe`], sampled before the ball was
//! integrated this frame. Hits are gathered over the whole set first and
//! removed in one pass.

use crate::consts::*;

use super::collision::{self, BallProbe, Window};
use super::economy;
use super::spawn::{self, AirdropPickup};
use super::state::{
    DropKind, GameState, HazardKind, InventoryItem, ItemCategory, LogKind, ResourceKind,
};

/// Move flying resources toward the HUD and credit every arrival at once
pub fn update_flying_resources(state: &mut GameState) {
    if state.flying_resources.is_empty() {
        return;
    }
    let rate = state.tuning.flying_rate;
    let epsilon = state.tuning.arrival_epsilon;

    let mut money = 0.0;
    let mut gems = 0;
    state.flying_resources.retain_mut(|resource| {
        let remaining = resource.target - resource.pos;
        if remaining.length() < epsilon {
            match resource.kind {
                ResourceKind::Money => money += resource.value,
                ResourceKind::Gems => gems += resource.value as u64,
            }
            return false;
        }
        resource.pos += remaining * rate;
        true
    });

    state.money += money;
    if gems > 0 {
        state.earn_gems(gems);
    }
}

/// Everything except flying resources, in frame order
pub fn advance(state: &mut GameState, probe: &BallProbe, now_ms: u64) {
    update_rare_events(state);
    update_airdrops(state, probe, now_ms);
    update_hazards(state, probe, now_ms);
    update_drops(state, probe, now_ms);
}

/// Horizontal drift; gone once past the far edge
pub fn update_rare_events(state: &mut GameState) {
    for event in &mut state.rare_events {
        event.x += event.vx;
    }
    state.rare_events.retain(|e| e.x > -20.0 && e.x < 120.0);
}

pub fn update_airdrops(state: &mut GameState, probe: &BallProbe, now_ms: u64) {
    if state.airdrops.is_empty() {
        return;
    }

    for airdrop in state.airdrops.iter_mut().filter(|a| !a.is_landed) {
        airdrop.altitude += airdrop.descent;
        if airdrop.altitude <= 0.0 {
            airdrop.altitude = 0.0;
            airdrop.is_landed = true;
        }
    }

    if probe.in_flight {
        let window = Window::boxed(AIRDROP_PICKUP_BAND, AIRDROP_HORIZONTAL_BAND);
        let hit = collision::hits(&state.airdrops, probe, window, |a| (a.altitude, a.x));
        let collected = collision::take_indices(&mut state.airdrops, &hit);
        for _ in collected {
            let economy_level = state.upgrades.economy.level;
            match spawn::roll_airdrop_pickup(&mut state.rng, economy_level) {
                AirdropPickup::Money(amount) => {
                    let origin = state.center_point();
                    state.spawn_flying_resource(ResourceKind::Money, amount, origin);
                    state.stats.airdrops_collected += 1;
                    state.push_log(format!("Airdrop Secured: ${:.0}", amount), LogKind::Success, now_ms);
                }
                AirdropPickup::Cargo => {
                    let item = find_cargo(state, ItemCategory::Collectable, now_ms);
                    let text = format!("Airdrop: Found {}", item.name);
                    state.stow_item(item);
                    state.push_log(text, LogKind::Success, now_ms);
                }
            }
        }
    }

    let cap = state.tuning.max_airdrops;
    if state.airdrops.len() > cap {
        let excess = state.airdrops.len() - cap;
        state.airdrops.drain(..excess);
    }
}

pub fn update_hazards(state: &mut GameState, probe: &BallProbe, now_ms: u64) {
    let drift = state.tuning.jet_drift_per_frame;
    for jet in state.hazards.iter_mut().filter(|h| h.kind == HazardKind::Jet) {
        jet.x += drift;
    }
    let floor = probe.altitude - HAZARD_CULL_BELOW;
    state.hazards.retain(|h| match h.kind {
        HazardKind::Jet => h.x < 120.0,
        _ => h.altitude > floor,
    });

    if !probe.in_flight {
        return;
    }

    let chance = state.tuning.hazard_spawn_chance;
    if let Some(blueprint) = spawn::roll_hazard(&mut state.rng, probe.altitude, chance) {
        let id = state.next_entity_id();
        state.hazards.push(blueprint.into_hazard(id));
    }

    let window = Window::boxed(state.tuning.hazard_vertical_band, state.tuning.hazard_horizontal_band);
    let hit = collision::hits(&state.hazards, probe, window, |h| (h.altitude, h.x));
    let struck = collision::take_indices(&mut state.hazards, &hit);
    let economy_level = f64::from(state.upgrades.economy.level);

    for hazard in struck {
        match hazard.kind {
            HazardKind::Bird => {
                let bonus = BIRD_BONUS_PER_ECONOMY * economy_level;
                let origin = state.center_point();
                state.spawn_flying_resource(ResourceKind::Money, bonus, origin);
                state.stats.hazards_hit += 1;
                state.push_log(format!("Target Hit! +${:.0}", bonus), LogKind::Success, now_ms);
            }
            HazardKind::Jet => {
                let bonus = JET_BONUS_PER_ECONOMY * economy_level;
                let origin = state.center_point();
                state.spawn_flying_resource(ResourceKind::Money, bonus, origin);
                state.stats.hazards_hit += 1;
                state.push_log(
                    format!("JUMBO JET INTERCEPTED! +${:.0}", bonus),
                    LogKind::Success,
                    now_ms,
                );
            }
            HazardKind::Collectable => {
                let item = find_cargo(state, ItemCategory::Collectable, now_ms);
                let text = format!("Collected: {}", item.name);
                state.stow_item(item);
                state.push_log(text, LogKind::Success, now_ms);
            }
        }
    }
}

pub fn update_drops(state: &mut GameState, probe: &BallProbe, now_ms: u64) {
    if !probe.in_flight {
        return;
    }

    if probe.velocity > 0.0 && probe.altitude > state.last_drop_spawn_altitude + DROP_SPAWN_SPACING {
        let gem_bonus = economy::gem_bonus(state);
        if let Some(blueprint) = spawn::roll_drop(&mut state.rng, probe.altitude, gem_bonus) {
            let id = state.next_entity_id();
            state.drops.push(blueprint.into_drop(id));
            state.last_drop_spawn_altitude = probe.altitude;
        }
    }

    let window = Window::vertical(state.tuning.drop_pickup_band);
    let hit = collision::hits(&state.drops, probe, window, |d| (d.altitude, d.x));
    let collected = collision::take_indices(&mut state.drops, &hit);
    for drop in collected {
        match drop.kind {
            DropKind::Money => {
                let origin = state.center_point();
                state.spawn_flying_resource(ResourceKind::Money, drop.value, origin);
            }
            DropKind::Gem => {
                let origin = state.center_point();
                state.spawn_flying_resource(ResourceKind::Gems, drop.value, origin);
            }
            DropKind::Asteroid => {
                let item = find_cargo(state, ItemCategory::Asteroid, now_ms);
                state.stow_item(item);
                state.push_log("Asteroid Captured! Scan required.", LogKind::Success, now_ms);
            }
        }
    }

    let cap = state.tuning.max_drops;
    if state.drops.len() > cap {
        let floor = probe.altitude - DROP_CULL_BELOW;
        state.drops.retain(|d| d.altitude > floor);
    }
    while state.drops.len() > cap {
        let lowest = state
            .drops
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.altitude.total_cmp(&b.altitude))
            .map(|(i, _)| i);
        match lowest {
            Some(i) => {
                state.drops.remove(i);
            }
            None => break,
        }
    }
}

/// Roll a cargo item scaled by the xeno lab
pub(crate) fn find_cargo(state: &mut GameState, category: ItemCategory, now_ms: u64) -> InventoryItem {
    let id = state.next_entity_id();
    let lab = economy::lab_multiplier(state);
    spawn::cargo_item(&mut state.rng, category, lab, id, now_ms)
}
