//! Wall-clock scheduling
//!
//! The simulation never reads the clock. [`Scheduler`] turns elapsed wall
//! time into discrete [`Event`]s: fixed-step frames plus the periodic
//! timers. [`Session`] ties a state, a scheduler and a save store together
//! and owns autosave.

use crate::consts::{CONSTRUCTION_TICK_MS, MAX_SUBSTEPS, SECOND_TICK_MS};
use crate::error::PersistError;
use crate::persistence::{self, SaveStore};
use crate::sim::state::{GameState, Screen};
use crate::sim::{Action, Event, StepOutcome, step};
use crate::tuning::Tuning;

/// Largest wall-clock gap fed into the frame accumulator per poll
const MAX_FRAME_GAP_MS: f64 = 100.0;

/// Clocks for the frame loop and the periodic timers
///
/// All clocks start on the first poll that sees the game screen and stop
/// (reset) whenever the game screen is left.
#[derive(Debug, Clone)]
pub struct Scheduler {
    frame_ms: f64,
    airdrop_interval_ms: u64,
    accumulator: f64,
    last_poll_ms: Option<u64>,
    next_second_ms: u64,
    next_construction_ms: u64,
    next_airdrop_ms: u64,
}

impl Scheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            frame_ms: tuning.frame_ms(),
            airdrop_interval_ms: tuning.airdrop_interval_ms,
            accumulator: 0.0,
            last_poll_ms: None,
            next_second_ms: 0,
            next_construction_ms: 0,
            next_airdrop_ms: 0,
        }
    }

    /// Whether the clocks are currently running
    pub fn is_armed(&self) -> bool {
        self.last_poll_ms.is_some()
    }

    /// Events due at `now_ms`, frames first
    pub fn poll(&mut self, now_ms: u64, in_game: bool) -> Vec<Event> {
        if !in_game {
            self.reset();
            return Vec::new();
        }

        let Some(last) = self.last_poll_ms else {
            self.arm(now_ms);
            return Vec::new();
        };
        self.last_poll_ms = Some(now_ms);

        let mut events = Vec::new();

        // Fixed timestep with bounded catch-up
        let dt = (now_ms.saturating_sub(last) as f64).min(MAX_FRAME_GAP_MS);
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= self.frame_ms && substeps < MAX_SUBSTEPS {
            events.push(Event::Frame);
            self.accumulator -= self.frame_ms;
            substeps += 1;
        }

        // Fires once however late, then counts from now
        if now_ms >= self.next_second_ms {
            events.push(Event::SecondTick);
            self.next_second_ms = now_ms + SECOND_TICK_MS;
        }

        let mut ticks = 0;
        while now_ms >= self.next_construction_ms && ticks < MAX_SUBSTEPS {
            events.push(Event::ConstructionTick);
            self.next_construction_ms += CONSTRUCTION_TICK_MS;
            ticks += 1;
        }
        if now_ms >= self.next_construction_ms {
            // Backlog beyond the cap is dropped
            self.next_construction_ms = now_ms + CONSTRUCTION_TICK_MS;
        }

        if now_ms >= self.next_airdrop_ms {
            events.push(Event::AirdropTick);
            self.next_airdrop_ms = now_ms + self.airdrop_interval_ms;
        }

        events
    }

    fn arm(&mut self, now_ms: u64) {
        log::debug!("Scheduler armed at {}", now_ms);
        self.accumulator = 0.0;
        self.last_poll_ms = Some(now_ms);
        self.next_second_ms = now_ms + SECOND_TICK_MS;
        self.next_construction_ms = now_ms + CONSTRUCTION_TICK_MS;
        self.next_airdrop_ms = now_ms + self.airdrop_interval_ms;
    }

    fn reset(&mut self) {
        if self.last_poll_ms.take().is_some() {
            log::debug!("Scheduler stopped");
        }
        self.accumulator = 0.0;
    }
}

/// A running game: state, clocks and where it is saved
pub struct Session<S: SaveStore> {
    pub state: GameState,
    scheduler: Scheduler,
    store: S,
    autosave_interval_ms: u64,
    last_save_ms: u64,
}

impl<S: SaveStore> Session<S> {
    /// Resume whatever `store` holds, or start fresh
    pub fn open(store: S, now_ms: u64, tuning: Tuning) -> Self {
        let state = persistence::load_from_store(&store, now_ms, tuning);
        Self::with_state(state, store, now_ms)
    }

    pub fn with_state(state: GameState, store: S, now_ms: u64) -> Self {
        Self {
            scheduler: Scheduler::new(&state.tuning),
            autosave_interval_ms: state.tuning.autosave_interval_ms,
            state,
            store,
            last_save_ms: now_ms,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run everything due at `now_ms` and autosave if it is time
    pub fn update(&mut self, now_ms: u64) -> Vec<StepOutcome> {
        let in_game = self.state.screen == Screen::Game;
        let outcomes = self
            .scheduler
            .poll(now_ms, in_game)
            .iter()
            .map(|event| step(&mut self.state, event, now_ms))
            .collect();

        let autosave_due = now_ms.saturating_sub(self.last_save_ms) >= self.autosave_interval_ms;
        if autosave_due || self.state.save_requested {
            if let Err(err) = self.save(now_ms) {
                log::warn!("Autosave failed: {}", err);
            }
        }
        outcomes
    }

    /// Apply a player action immediately
    pub fn dispatch(&mut self, action: Action, now_ms: u64) -> StepOutcome {
        let outcome = step(&mut self.state, &Event::Action(action), now_ms);
        if self.state.save_requested {
            if let Err(err) = self.save(now_ms) {
                log::warn!("Save failed: {}", err);
            }
        }
        outcome
    }

    /// Snapshot the state, then hand the snapshot to the store
    pub fn save(&mut self, now_ms: u64) -> Result<(), PersistError> {
        let snapshot = persistence::save_to_string(&self.state)?;
        self.last_save_ms = now_ms;
        self.state.save_requested = false;
        self.store.write(&snapshot)?;
        log::info!("Game saved ({} launches)", self.state.total_launches);
        Ok(())
    }

    /// Save on exit and give the store back
    pub fn shutdown(mut self, now_ms: u64) -> Result<S, PersistError> {
        self.save(now_ms)?;
        Ok(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn count(events: &[Event], kind: &Event) -> usize {
        events.iter().filter(|e| *e == kind).count()
    }

    #[test]
    fn test_off_game_screen_emits_nothing() {
        let mut scheduler = Scheduler::new(&Tuning::default());
        assert!(scheduler.poll(0, false).is_empty());
        assert!(scheduler.poll(5_000, false).is_empty());
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn test_frames_follow_fixed_step() {
        let mut scheduler = Scheduler::new(&Tuning::default());
        assert!(scheduler.poll(1_000, true).is_empty());
        let events = scheduler.poll(1_060, true);
        // 60 ms at 60 Hz
        assert_eq!(count(&events, &Event::Frame), 3);
        assert_eq!(count(&events, &Event::ConstructionTick), 1);
        assert_eq!(count(&events, &Event::SecondTick), 0);
    }

    #[test]
    fn test_long_gap_is_bounded() {
        let mut scheduler = Scheduler::new(&Tuning::default());
        scheduler.poll(0, true);
        let events = scheduler.poll(60_000, true);
        assert!(count(&events, &Event::Frame) <= MAX_SUBSTEPS as usize);
        assert_eq!(count(&events, &Event::ConstructionTick), MAX_SUBSTEPS as usize);
        assert_eq!(count(&events, &Event::SecondTick), 1);
        assert_eq!(count(&events, &Event::AirdropTick), 1);

        // Second tick was rescheduled from now, not from its old due time
        let events = scheduler.poll(60_500, true);
        assert_eq!(count(&events, &Event::SecondTick), 0);
        let events = scheduler.poll(61_000, true);
        assert_eq!(count(&events, &Event::SecondTick), 1);
    }

    #[test]
    fn test_leaving_game_resets_clocks() {
        let mut scheduler = Scheduler::new(&Tuning::default());
        scheduler.poll(0, true);
        scheduler.poll(900, true);
        scheduler.poll(950, false);
        // Re-armed from scratch: no second tick 1 s after the original start
        assert!(scheduler.poll(1_000, true).is_empty());
        let events = scheduler.poll(1_900, true);
        assert_eq!(count(&events, &Event::SecondTick), 0);
    }

    #[test]
    fn test_session_autosaves() {
        let mut session = Session::open(MemoryStore::default(), 0, Tuning::default());
        session.dispatch(Action::StartGame, 0);

        let mut now = 0;
        while now < 31_000 {
            now += 16;
            session.update(now);
        }
        assert_eq!(session.store().writes, 1);
        assert!(session.state.stats.time_played >= 25);
    }

    #[test]
    fn test_save_request_writes_immediately() {
        let mut session = Session::open(MemoryStore::default(), 0, Tuning::default());
        session.state.save_requested = true;
        session.update(10);
        assert_eq!(session.store().writes, 1);
        assert!(!session.state.save_requested);
    }

    #[test]
    fn test_shutdown_round_trips() {
        let mut session = Session::open(MemoryStore::default(), 0, Tuning::default());
        session.state.money = 777.0;
        let store = session.shutdown(5_000).unwrap();

        let resumed = Session::open(store, 9_000, Tuning::default());
        assert_eq!(resumed.state.money, 777.0);
        assert_eq!(resumed.state.screen, Screen::Title);
    }
}
