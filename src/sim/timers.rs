//! Wall-clock tasks: the 1 s economy tick, the 50 ms construction tick and
//! the 10 s airdrop spawner
//!
//! Every "next refresh" comparison uses the caller's `now_ms`, never a tick
//! count, so a suspended tab catches up correctly on resume.

use crate::consts::*;

use super::economy;
use super::spawn;
use super::state::{GameState, LogKind, Modal, RareEventKind, StructureKind};

/// 1 s tick
pub fn second_tick(state: &mut GameState, now_ms: u64) {
    state.stats.time_played += 1;

    let passive = economy::passive_income(state);
    if passive > 0.0 {
        state.money += passive;
    }

    if now_ms >= state.time_shop.next_refresh_ms {
        refresh_time_shop(state, now_ms);
    }

    if now_ms >= state.next_cosmic_event_ms && state.open_modal.is_none() {
        log::info!("Cosmic event available");
        state.open_modal = Some(Modal::CosmicEvent);
    }

    if state.manager.hired && now_ms > state.manager.last_gem_claim_ms + MANAGER_GEM_INTERVAL_MS {
        let pay = u64::from(state.manager.level);
        state.earn_gems(pay);
        state.manager.last_gem_claim_ms = now_ms;
    }

    let viewport_height = state.tuning.viewport_height;
    let chance = state.tuning.rare_event_chance;
    if let Some(blueprint) = spawn::roll_rare_event(&mut state.rng, viewport_height, chance) {
        let text = match blueprint.kind {
            RareEventKind::GoldenComet => "ANOMALY DETECTED: GOLDEN ENERGY SIGNATURE",
            RareEventKind::GemDrone => "Drone signal detected nearby.",
        };
        let id = state.next_entity_id();
        state.rare_events.push(blueprint.into_event(id));
        state.push_log(text, LogKind::Warning, now_ms);
    }

    if now_ms.saturating_sub(state.last_jet_spawn_ms) >= state.tuning.jet_interval_ms {
        let blueprint = spawn::jet(&mut state.rng);
        let id = state.next_entity_id();
        state.hazards.push(blueprint.into_hazard(id));
        state.last_jet_spawn_ms = now_ms;
        state.push_log("Jumbo Jet detected in airspace!", LogKind::Info, now_ms);
    }

    state.cosmic_countdown = format_countdown(state.next_cosmic_event_ms.saturating_sub(now_ms));
}

/// Replace the time-shop offer and schedule the next refresh
pub fn refresh_time_shop(state: &mut GameState, now_ms: u64) {
    let id = state.next_entity_id();
    let lifetime = state.lifetime_earnings;
    let economy_level = state.upgrades.economy.level;
    let offer = spawn::time_shop_offer(&mut state.rng, id, lifetime, economy_level);
    log::debug!("Time shop offer: {} for ${}", offer.name, offer.cost);
    state.time_shop.item = Some(offer);
    state.time_shop.next_refresh_ms = now_ms + TIME_SHOP_INTERVAL_MS;
}

/// 50 ms tick
///
/// Progress advances by a fixed step while below 100; the tick after it
/// reaches 100 completes the level.
pub fn construction_tick(state: &mut GameState, now_ms: u64) {
    let step = state.tuning.construction_step;
    for kind in StructureKind::ALL {
        let structure = state.structures.get_mut(kind);
        if !structure.is_constructing {
            continue;
        }
        if structure.construction_progress < 100.0 {
            structure.construction_progress = (structure.construction_progress + step).min(100.0);
            continue;
        }

        structure.level += 1;
        structure.is_constructing = false;
        structure.construction_progress = 0.0;
        let text = format!("Construction Complete: {} Level {}", structure.name, structure.level);
        log::info!("{}", text);
        state.push_log(text, LogKind::Success, now_ms);
    }
}

/// 10 s tick
pub fn airdrop_tick(state: &mut GameState, now_ms: u64) {
    let blueprint = spawn::roll_airdrop(
        &mut state.rng,
        state.ball.position,
        state.tuning.viewport_height,
        state.tuning.airdrop_chance,
        state.tuning.airdrop_descent,
    );
    if let Some(blueprint) = blueprint {
        let id = state.next_entity_id();
        state.airdrops.push(blueprint.into_airdrop(id));
        state.push_log("Supply Drop detected inbound.", LogKind::Info, now_ms);
    }
}

/// "m:ss"
pub fn format_countdown(remaining_ms: u64) -> String {
    let minutes = remaining_ms / 60_000;
    let seconds = (remaining_ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}
