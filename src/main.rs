//! Catapult Space entry point
//!
//! Native: a headless runner that plays a scripted session against the
//! simulation and reports the result. Web: a `wasm-bindgen` facade the UI
//! drives with JSON actions and reads JSON snapshots from.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use catapult_space::platform::{Clock, LocalStorageStore, SystemClock};
    use catapult_space::{Action, Session, StepOutcome, Tuning};

    /// Game instance owned by the page
    #[wasm_bindgen]
    pub struct Game {
        session: Session<LocalStorageStore>,
        clock: SystemClock,
    }

    #[wasm_bindgen]
    impl Game {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Game {
            let clock = SystemClock;
            let session = Session::open(LocalStorageStore, clock.now_ms(), Tuning::default());
            Game { session, clock }
        }

        /// Call once per animation frame
        pub fn update(&mut self) -> bool {
            let outcomes = self.session.update(self.clock.now_ms());
            outcomes
                .iter()
                .any(|o| matches!(o, StepOutcome::Landed(_)))
        }

        /// Apply a JSON-encoded action; returns the rejection reason, if any
        pub fn dispatch(&mut self, action_json: &str) -> Result<Option<String>, JsValue> {
            let action: Action = serde_json::from_str(action_json)
                .map_err(|e| JsValue::from_str(&format!("bad action: {}", e)))?;
            match self.session.dispatch(action, self.clock.now_ms()) {
                StepOutcome::Rejected(rejection) => Ok(Some(rejection.to_string())),
                _ => Ok(None),
            }
        }

        /// Everything the UI draws, as JSON
        pub fn snapshot(&self) -> Result<String, JsValue> {
            serde_json::to_string(&self.session.state.snapshot())
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }

        /// Save now (page hide / unload)
        pub fn save(&mut self) {
            if let Err(err) = self.session.save(self.clock.now_ms()) {
                log::warn!("Save on exit failed: {}", err);
            }
        }
    }

    impl Default for Game {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Catapult Space starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use catapult_space::persistence::{FileStore, MemoryStore, SaveStore};
    use catapult_space::platform::{Clock, ManualClock};
    use catapult_space::sim::state::Screen;
    use catapult_space::sim::{Modal, StructureKind, UpgradeKind};
    use catapult_space::{Action, Session, StepOutcome, Tuning};

    const FRAME_MS: u64 = 16;

    /// Play a scripted headless session
    #[derive(Debug, Parser)]
    #[command(name = "catapult-space")]
    pub struct Options {
        /// TOML file overriding the default tuning
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,

        /// Save file to resume from and write back to
        #[arg(long, value_name = "FILE")]
        pub save: Option<PathBuf>,

        /// Number of flights to play
        #[arg(
            long,
            value_name = "COUNT",
            default_value_t = 10,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        pub launches: u32,
    }

    pub fn run(options: Options) -> Result<()> {
        let tuning = match &options.tuning {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Tuning::from_toml_str(&text)
                    .with_context(|| format!("loading tuning from {}", path.display()))?
            }
            None => Tuning::default(),
        };

        match &options.save {
            Some(path) => play(FileStore::new(path), tuning, options.launches),
            None => play(MemoryStore::default(), tuning, options.launches),
        }
    }

    fn play<S: SaveStore>(store: S, tuning: Tuning, launches: u32) -> Result<()> {
        let clock = ManualClock::new(0);
        let mut session = Session::open(store, clock.now_ms(), tuning);
        session.dispatch(Action::StartGame, clock.now_ms());

        for flight in 1..=launches {
            settle(&mut session, &clock);
            if let StepOutcome::Rejected(reason) = session.dispatch(Action::Launch, clock.now_ms())
            {
                log::warn!("Launch {} refused: {}", flight, reason);
                break;
            }

            let landing = fly(&mut session, &clock);
            match landing {
                Some(landing) => log::info!(
                    "Flight {}: peak {:.0}, income ${:.0}",
                    flight,
                    landing.peak_height,
                    landing.income
                ),
                None => log::warn!("Flight {} never landed", flight),
            }

            // Let payouts reach the HUD, then spend
            for _ in 0..200 {
                tick(&mut session, &clock);
            }
            spend(&mut session, &clock);
        }

        let state = &session.state;
        println!(
            "launches={} money={:.0} gems={} record={:.0} lifetime=${:.0}",
            state.total_launches, state.money, state.gems, state.record_height, state.lifetime_earnings
        );
        session
            .shutdown(clock.now_ms())
            .context("saving on exit")?;
        Ok(())
    }

    fn tick<S: SaveStore>(session: &mut Session<S>, clock: &ManualClock) -> Vec<StepOutcome> {
        clock.advance(FRAME_MS);
        session.update(clock.now_ms())
    }

    /// Acknowledge dialogs so the simulation keeps running
    fn settle<S: SaveStore>(session: &mut Session<S>, clock: &ManualClock) {
        while !session.state.pending_milestones.is_empty() {
            session.dispatch(Action::DismissMilestone, clock.now_ms());
        }
        match session.state.open_modal {
            Some(Modal::CosmicEvent) => {
                session.dispatch(Action::ClaimCosmicEvent, clock.now_ms());
            }
            Some(_) => {
                session.dispatch(Action::CloseModal, clock.now_ms());
            }
            None => {}
        }
        if session.state.screen != Screen::Game {
            session.dispatch(Action::StartGame, clock.now_ms());
        }
    }

    fn fly<S: SaveStore>(
        session: &mut Session<S>,
        clock: &ManualClock,
    ) -> Option<catapult_space::sim::Landing> {
        // Ten simulated minutes is far beyond any flight
        for _ in 0..(10 * 60 * 60) {
            settle(session, clock);
            for outcome in tick(session, clock) {
                if let StepOutcome::Landed(landing) = outcome {
                    return Some(landing);
                }
            }
        }
        None
    }

    fn spend<S: SaveStore>(session: &mut Session<S>, clock: &ManualClock) {
        settle(session, clock);
        let now = clock.now_ms();
        for kind in [UpgradeKind::Power, UpgradeKind::Economy, UpgradeKind::Ball] {
            session.dispatch(Action::BuyMaxUpgrade(kind), now);
        }
        session.dispatch(Action::SellAll, now);
        session.dispatch(Action::BuyStructure(StructureKind::LaunchGantry), now);
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_options_defaults() {
            let options = Options::try_parse_from(["catapult-space"]).unwrap();
            assert_eq!(options.launches, 10);
            assert!(options.tuning.is_none());
            assert!(options.save.is_none());
        }

        #[test]
        fn test_options_flags() {
            let options = Options::try_parse_from([
                "catapult-space",
                "--tuning",
                "fast.toml",
                "--save",
                "run.json",
                "--launches",
                "3",
            ])
            .unwrap();
            assert_eq!(options.tuning, Some(PathBuf::from("fast.toml")));
            assert_eq!(options.save, Some(PathBuf::from("run.json")));
            assert_eq!(options.launches, 3);
        }

        #[test]
        fn test_options_reject_bad_input() {
            assert!(Options::try_parse_from(["catapult-space", "--bogus"]).is_err());
            assert!(Options::try_parse_from(["catapult-space", "--launches", "0"]).is_err());
            assert!(Options::try_parse_from(["catapult-space", "--launches", "many"]).is_err());
            assert!(Options::try_parse_from(["catapult-space", "--tuning"]).is_err());
        }

        #[test]
        fn test_run_plays_requested_flights() {
            let options = Options::try_parse_from(["catapult-space", "--launches", "1"]).unwrap();
            assert!(run(options).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Catapult Space (headless) starting...");
    let options = headless::Options::parse();
    headless::run(options)
}
