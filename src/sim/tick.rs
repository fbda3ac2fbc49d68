//! The reducer
//!
//! `step` is the single entry point that mutates a [`GameState`]. The
//! scheduler turns wall-clock time into discrete [`Event`]s; the UI sends
//! actions. Simulation events pass one gate: nothing advances off the game
//! screen or while a dialog is open.

use serde::{Deserialize, Serialize};

use super::actions::{self, Action, Rejection};
use super::collision::BallProbe;
use super::entities;
use super::physics::{self, Landing};
use super::state::{DeferredEffect, GameState, LogKind};
use super::timers;

/// Discrete input to the reducer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// One ~16.7 ms animation frame
    Frame,
    /// 1 s economy tick
    SecondTick,
    /// 50 ms construction tick
    ConstructionTick,
    /// 10 s airdrop spawner
    AirdropTick,
    /// Player action
    Action(Action),
}

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Paused or off the game screen; nothing changed
    Skipped,
    /// A simulation event ran
    Advanced,
    /// A frame ran and the ball touched down
    Landed(Landing),
    /// An action ran
    Accepted,
    /// An action was refused; nothing changed
    Rejected(Rejection),
}

/// Apply one event at wall-clock time `now_ms`
pub fn step(state: &mut GameState, event: &Event, now_ms: u64) -> StepOutcome {
    if let Event::Action(action) = event {
        return match actions::apply(state, action, now_ms) {
            Ok(()) => StepOutcome::Accepted,
            Err(rejection) => {
                log::debug!("{:?} rejected: {}", action, rejection);
                StepOutcome::Rejected(rejection)
            }
        };
    }

    // Single pause gate
    if !state.is_running() {
        return StepOutcome::Skipped;
    }

    match event {
        Event::Frame => frame(state, now_ms),
        Event::SecondTick => {
            timers::second_tick(state, now_ms);
            StepOutcome::Advanced
        }
        Event::ConstructionTick => {
            timers::construction_tick(state, now_ms);
            StepOutcome::Advanced
        }
        Event::AirdropTick => {
            timers::airdrop_tick(state, now_ms);
            StepOutcome::Advanced
        }
        Event::Action(_) => StepOutcome::Skipped,
    }
}

fn frame(state: &mut GameState, now_ms: u64) -> StepOutcome {
    apply_deferred(state, now_ms);
    entities::update_flying_resources(state);

    // Entities collide against the ball as it was before this frame's move
    let mut probe = BallProbe::new(&state.ball);
    let landing = physics::advance_ball(state, now_ms);
    probe.in_flight &= state.ball.is_launched;
    entities::advance(state, &probe, now_ms);

    match landing {
        Some(landing) => StepOutcome::Landed(landing),
        None => StepOutcome::Advanced,
    }
}

/// Run every deferred effect whose time has come, oldest first
fn apply_deferred(state: &mut GameState, now_ms: u64) {
    if state.deferred.is_empty() {
        return;
    }
    let (mut due, pending): (Vec<_>, Vec<_>) =
        state.deferred.drain(..).partition(|d| d.due_ms <= now_ms);
    state.deferred = pending;
    due.sort_by_key(|d| d.due_ms);

    for deferred in due {
        match deferred.effect {
            DeferredEffect::SystemDamage => {
                log::info!("System damage applied");
                state.system_damage = true;
                state.push_log("IMPACT CONFIRMED. SYSTEMS CRITICAL.", LogKind::Glitch, now_ms);
            }
            DeferredEffect::Log { text, kind } => state.push_log(text, kind, now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MILESTONES;
    use crate::sim::state::{Deferred, Modal, Screen};

    fn running() -> GameState {
        let mut state = GameState::new(12345, 0);
        state.screen = Screen::Game;
        state.tuning.hazard_spawn_chance = 0.0;
        state.tuning.planet_chance = 0.0;
        state
    }

    #[test]
    fn test_title_screen_skips_simulation() {
        let mut state = GameState::new(1, 0);
        assert_eq!(step(&mut state, &Event::Frame, 0), StepOutcome::Skipped);
        assert_eq!(step(&mut state, &Event::SecondTick, 1_000), StepOutcome::Skipped);
        assert_eq!(state.stats.time_played, 0);
    }

    #[test]
    fn test_modal_freezes_flight() {
        let mut state = running();
        state.ball.is_launched = true;
        state.ball.position = 0.5;
        state.ball.velocity = -3.0;
        state.open_modal = Some(Modal::Stats);
        let before = state.ball;

        for i in 0..10 {
            assert_eq!(step(&mut state, &Event::Frame, i * 16), StepOutcome::Skipped);
        }
        assert_eq!(state.ball, before);
        assert!(state.flying_resources.is_empty());

        step(&mut state, &Event::Action(Action::CloseModal), 200);
        assert!(matches!(
            step(&mut state, &Event::Frame, 216),
            StepOutcome::Landed(_)
        ));
        assert_eq!(state.flying_resources.len(), 1);
    }

    #[test]
    fn test_pending_milestone_pauses_timers() {
        let mut state = running();
        state.ball.is_launched = true;
        state.ball.position = 4_999.0;
        state.ball.velocity = 20.0;
        step(&mut state, &Event::Frame, 0);
        assert_eq!(state.pending_milestones.len(), 1);

        assert_eq!(step(&mut state, &Event::SecondTick, 1_000), StepOutcome::Skipped);
        assert_eq!(step(&mut state, &Event::ConstructionTick, 1_050), StepOutcome::Skipped);

        step(&mut state, &Event::Action(Action::DismissMilestone), 2_000);
        assert_eq!(state.money, MILESTONES[0].reward_money);
        assert_eq!(step(&mut state, &Event::SecondTick, 3_000), StepOutcome::Advanced);
    }

    #[test]
    fn test_deferred_damage_applies_when_due() {
        let mut state = running();
        state.deferred.push(Deferred {
            due_ms: 500,
            effect: DeferredEffect::SystemDamage,
        });
        step(&mut state, &Event::Frame, 400);
        assert!(!state.system_damage);
        step(&mut state, &Event::Frame, 516);
        assert!(state.system_damage);
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_full_flight_lands_and_pays() {
        let mut state = running();
        state.reached_milestones = MILESTONES.iter().map(|m| m.height).collect();
        step(&mut state, &Event::Action(Action::Launch), 0);

        let mut now = 0;
        let landing = loop {
            now += 16;
            if let StepOutcome::Landed(landing) = step(&mut state, &Event::Frame, now) {
                break landing;
            }
            assert!(now < 60_000, "ball never landed");
        };
        assert!(landing.peak_height > 400.0);
        assert!(!state.ball.is_launched);

        // Let the payout fly to the HUD
        for _ in 0..300 {
            now += 16;
            step(&mut state, &Event::Frame, now);
        }
        assert!(state.money >= landing.income);
    }

    #[test]
    fn test_actions_bypass_pause_gate() {
        let mut state = running();
        state.open_modal = Some(Modal::Shop);
        state.money = 10.0;
        assert_eq!(
            step(&mut state, &Event::Action(Action::BuyUpgrade(crate::sim::state::UpgradeKind::Power)), 0),
            StepOutcome::Accepted
        );
        assert_eq!(
            step(&mut state, &Event::Action(Action::Launch), 0),
            StepOutcome::Rejected(Rejection::Paused)
        );
    }
}
