//! Ball flight integrator
//!
//! One call per frame while launched: integrate, check milestones, roll the
//! planet encounter, then resolve ground contact. Ground contact runs last so
//! the ball is never observable below zero.

use rand::Rng;

use crate::consts::*;

use super::economy;
use super::state::{
    BallState, Deferred, DeferredEffect, GameState, LogKind, PendingMilestone, PlanetEncounter,
    ResourceKind,
};

/// Result of a landing, for callers that want to report it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub income: f64,
    pub peak_height: f64,
}

/// Advance the ball by one frame. Returns the landing if the ball touched
/// down this frame.
pub fn advance_ball(state: &mut GameState, now_ms: u64) -> Option<Landing> {
    if !state.ball.is_launched {
        return None;
    }

    let gravity_mod = economy::gravity_modifier(state);
    let drag = economy::drag(state);

    let ball = &mut state.ball;
    ball.velocity = (ball.velocity - state.tuning.gravity * gravity_mod) * (1.0 - drag);
    ball.position += ball.velocity;
    ball.peak_height = ball.peak_height.max(ball.position);

    let (position, velocity) = (ball.position, ball.velocity);

    check_milestones(state, position);
    roll_planet_encounter(state, position, velocity, now_ms);

    if position <= 0.0 {
        Some(land(state, now_ms))
    } else {
        None
    }
}

/// Queue every milestone crossed at `altitude` that has not paid out yet
pub fn check_milestones(state: &mut GameState, altitude: f64) {
    for milestone in MILESTONES.iter() {
        if altitude < milestone.height as f64 || state.reached_milestones.contains(&milestone.height) {
            continue;
        }
        log::info!("Milestone reached: {} ({} ft)", milestone.message, milestone.height);
        state.reached_milestones.push(milestone.height);
        state.pending_milestones.push_back(PendingMilestone {
            height: milestone.height,
            reward: milestone.reward_money,
            message: milestone.message.to_string(),
        });
    }
}

fn roll_planet_encounter(state: &mut GameState, altitude: f64, velocity: f64, now_ms: u64) {
    if state.system_damage
        || state.planet_encounter.is_some()
        || altitude <= state.tuning.planet_min_altitude
        || velocity <= state.tuning.planet_min_velocity
    {
        return;
    }
    if state.rng.random::<f64>() >= state.tuning.planet_chance {
        return;
    }

    log::info!("Planet encounter at {:.0} ft", altitude);
    state.planet_encounter = Some(PlanetEncounter {
        altitude: altitude + 1000.0,
        damage_at_ms: now_ms + PLANET_DAMAGE_DELAY_MS,
    });
    state.push_log("ALERT: MASSIVE OBJECT DETECTED!", LogKind::Warning, now_ms);
    state.deferred.push(Deferred {
        due_ms: now_ms + PLANET_DAMAGE_DELAY_MS,
        effect: DeferredEffect::SystemDamage,
    });
}

/// Ground contact: pay out, reset the ball and clear the flight's entities
fn land(state: &mut GameState, now_ms: u64) -> Landing {
    let peak_height = state.ball.peak_height;
    let income = economy::landing_income(state, peak_height);
    let was_damaged = state.system_damage;

    let origin = state.pad_point();
    state.spawn_flying_resource(ResourceKind::Money, income, origin);

    state.lifetime_earnings += income;
    state.high_score = state.high_score.max(income);
    state.max_height = state.max_height.max(peak_height.round());
    state.record_height = state.record_height.max(peak_height);
    if state.tutorial_step == 1 {
        state.tutorial_step = 3;
    }
    state.system_damage = false;

    if was_damaged {
        state.push_log("Recovery Complete. Systems rebooting...", LogKind::Success, now_ms);
        state.deferred.push(Deferred {
            due_ms: now_ms + RECOVERY_FOLLOWUP_MS,
            effect: DeferredEffect::Log {
                text: "All systems operational.".to_string(),
                kind: LogKind::Success,
            },
        });
    } else {
        state.push_log("Touchdown. Initiating transfer...", LogKind::Success, now_ms);
    }

    state.ball = BallState::default();
    state.drops.clear();
    state.hazards.clear();
    state.planet_encounter = None;
    state
        .deferred
        .retain(|d| d.effect != DeferredEffect::SystemDamage);
    state.last_drop_spawn_altitude = 0.0;

    log::debug!("Landed: peak {:.0} ft, income {}", peak_height, income);
    Landing {
        income,
        peak_height,
    }
}
