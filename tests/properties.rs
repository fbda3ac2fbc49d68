//! Property tests for the simulation invariants

use proptest::prelude::*;
use rand::Rng;

use catapult_space::consts::MILESTONES;
use catapult_space::persistence::{save_to_string, try_load};
use catapult_space::sim::actions::{self, buy_max_upgrade};
use catapult_space::sim::economy::{plan_buy_max, upgrade_cost_at};
use catapult_space::sim::physics::check_milestones;
use catapult_space::sim::state::{OmegaKind, Screen};
use catapult_space::sim::timers::construction_tick;
use catapult_space::sim::{GemShopItem, Modal, StructureKind, UpgradeKind, World};
use catapult_space::{Action, Event, GameState, Rejection, StepOutcome, Tuning, step};

fn upgrade_kind() -> impl Strategy<Value = UpgradeKind> {
    prop::sample::select(UpgradeKind::ALL.to_vec())
}

fn structure_kind() -> impl Strategy<Value = StructureKind> {
    prop::sample::select(StructureKind::ALL.to_vec())
}

fn modal() -> impl Strategy<Value = Modal> {
    prop::sample::select(vec![
        Modal::Shop,
        Modal::TimeShop,
        Modal::GemShop,
        Modal::Inventory,
        Modal::Stats,
        Modal::Build,
        Modal::Codes,
        Modal::Crate,
    ])
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Launch),
        upgrade_kind().prop_map(Action::BuyUpgrade),
        upgrade_kind().prop_map(Action::BuyMaxUpgrade),
        prop::sample::select(vec![OmegaKind::GravityDampener, OmegaKind::GemFinder])
            .prop_map(Action::BuyOmega),
        structure_kind().prop_map(Action::BuyStructure),
        Just(Action::BuyTimeShopItem),
        prop::sample::select(vec![
            GemShopItem::CashSmall,
            GemShopItem::CashLarge,
            GemShopItem::Multiplier,
            GemShopItem::Boost,
        ])
        .prop_map(Action::BuyGemShopItem),
        (0u64..500).prop_map(|cost| Action::SpinWheel { cost }),
        Just(Action::OpenSupplyCrate),
        Just(Action::SellAll),
        Just(Action::DismissMilestone),
        prop::sample::select(World::ALL.to_vec()).prop_map(Action::BuyWorld),
        Just(Action::HireManager),
        Just(Action::UpgradeManager),
        modal().prop_map(Action::ToggleModal),
        Just(Action::CloseModal),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Act(Action),
    Frames(u8),
    Tick(Event),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => action().prop_map(Op::Act),
        2 => (1u8..120).prop_map(Op::Frames),
        1 => prop::sample::select(vec![
            Event::SecondTick,
            Event::ConstructionTick,
            Event::AirdropTick,
        ])
        .prop_map(Op::Tick),
    ]
}

fn in_game(seed: u64, money: f64, gems: u64) -> GameState {
    let mut state = GameState::new(seed, 0);
    state.screen = Screen::Game;
    state.money = money;
    state.gems = gems;
    state
}

proptest! {
    #[test]
    fn prop_balances_never_go_negative(
        seed in any::<u64>(),
        money in 0.0f64..1e9,
        gems in 0u64..5_000,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut state = in_game(seed, money, gems);
        let mut now = 0u64;
        for op in ops {
            match op {
                Op::Act(action) => {
                    step(&mut state, &Event::Action(action), now);
                }
                Op::Frames(n) => {
                    for _ in 0..n {
                        now += 16;
                        step(&mut state, &Event::Frame, now);
                    }
                }
                Op::Tick(event) => {
                    now += 50;
                    step(&mut state, &event, now);
                }
            }
            prop_assert!(state.money.is_finite());
            prop_assert!(state.money >= 0.0, "money went negative: {}", state.money);
        }
    }

    #[test]
    fn prop_rejected_actions_change_nothing(
        seed in any::<u64>(),
        action in action(),
    ) {
        // Nothing affordable, no flight, nothing to sell
        let mut state = in_game(seed, 0.0, 0);
        state.upgrades.catapult.level = 5;
        let before = save_to_string(&state).unwrap();
        let logs_before = state.logs.len();

        if let StepOutcome::Rejected(_) = step(&mut state, &Event::Action(action), 0) {
            prop_assert_eq!(save_to_string(&state).unwrap(), before);
            prop_assert_eq!(state.logs.len(), logs_before);
        }
    }

    #[test]
    fn prop_buy_max_is_maximal(
        kind in upgrade_kind(),
        level in 1u32..60,
        money in 0.0f64..1e12,
    ) {
        let mut state = in_game(1, money, 0);
        state.upgrades.get_mut(kind).level = level;
        let upgrade = state.upgrades.get(kind).clone();
        let plan = plan_buy_max(&upgrade, money);

        match buy_max_upgrade(&mut state, kind, 0) {
            Ok(levels) => {
                prop_assert_eq!(levels, plan.levels);
                prop_assert!(state.money >= 0.0);
                let bought = state.upgrades.get(kind);
                prop_assert_eq!(bought.level, level + levels);
                // One more level would not have been affordable
                if !bought.is_maxed() && levels < catapult_space::consts::BUY_MAX_ITERATION_CAP {
                    prop_assert!(state.money < upgrade_cost_at(&upgrade, bought.level));
                }
            }
            Err(Rejection::InsufficientFunds) => {
                prop_assert!(money < upgrade_cost_at(&upgrade, level));
                prop_assert_eq!(state.money, money);
            }
            Err(Rejection::MaxLevel) => prop_assert!(upgrade.is_maxed()),
            Err(other) => prop_assert!(false, "unexpected rejection {:?}", other),
        }
    }

    #[test]
    fn prop_milestones_trigger_once(
        altitudes in prop::collection::vec(0.0f64..6e6, 1..40),
    ) {
        let mut state = in_game(1, 0.0, 0);
        for altitude in altitudes {
            check_milestones(&mut state, altitude);
        }
        let mut heights = state.reached_milestones.clone();
        heights.sort_unstable();
        heights.dedup();
        prop_assert_eq!(heights.len(), state.reached_milestones.len());
        prop_assert_eq!(state.pending_milestones.len(), state.reached_milestones.len());
        prop_assert!(state.reached_milestones.len() <= MILESTONES.len());
    }

    #[test]
    fn prop_construction_never_overshoots(
        kind in structure_kind(),
        step_size in 0.01f32..100.0,
        ticks in 1usize..2_000,
    ) {
        let mut state = in_game(1, 0.0, 0);
        state.tuning.construction_step = step_size;
        let structure = state.structures.get_mut(kind);
        structure.is_constructing = true;
        let start_level = structure.level;

        for i in 0..ticks {
            construction_tick(&mut state, i as u64 * 50);
            let structure = state.structures.get(kind);
            prop_assert!(structure.construction_progress <= 100.0);
            prop_assert!(structure.level <= start_level + 1);
        }
        let structure = state.structures.get(kind);
        if structure.level == start_level + 1 {
            prop_assert!(!structure.is_constructing);
            prop_assert_eq!(structure.construction_progress, 0.0);
        }
    }

    #[test]
    fn prop_paused_simulation_is_frozen(
        seed in any::<u64>(),
        modal in modal(),
        altitude in 1.0f64..50_000.0,
        velocity in -50.0f64..50.0,
        events in prop::collection::vec(
            prop::sample::select(vec![
                Event::Frame,
                Event::SecondTick,
                Event::ConstructionTick,
                Event::AirdropTick,
            ]),
            1..100,
        ),
    ) {
        let mut state = in_game(seed, 1_000.0, 10);
        state.ball.is_launched = true;
        state.ball.position = altitude;
        state.ball.velocity = velocity;
        state.structures.mission_control.is_constructing = true;
        state.open_modal = Some(modal);

        let before = save_to_string(&state).unwrap();
        let ball = state.ball;
        let draw = state.rng.clone().random::<u64>();

        for (i, event) in events.iter().enumerate() {
            prop_assert_eq!(step(&mut state, event, i as u64 * 1_000), StepOutcome::Skipped);
        }
        prop_assert_eq!(save_to_string(&state).unwrap(), before);
        prop_assert_eq!(state.ball, ball);
        prop_assert_eq!(state.rng.clone().random::<u64>(), draw);
    }

    #[test]
    fn prop_save_round_trip(
        seed in any::<u64>(),
        money in 0.0f64..1e15,
        gems in any::<u32>(),
        power in 1u32..500,
        likes in 0u32..10,
    ) {
        let mut state = GameState::new(seed, 0);
        state.money = money;
        state.gems = u64::from(gems);
        state.upgrades.power.level = power;
        state.likes = likes;

        let text = save_to_string(&state).unwrap();
        let loaded = try_load(&text, 1_000, Tuning::default()).unwrap();
        prop_assert_eq!(loaded.money, money);
        prop_assert_eq!(loaded.gems, u64::from(gems));
        prop_assert_eq!(loaded.upgrades, state.upgrades);
        prop_assert_eq!(loaded.likes, likes);
        prop_assert_eq!(loaded.screen, Screen::Title);
    }

    #[test]
    fn prop_space_code_pays_once(
        padding in "[ ]{0,3}",
        upper in any::<bool>(),
    ) {
        let mut state = in_game(1, 0.0, 0);
        let code = if upper { "SPACE" } else { "space" };
        let input = format!("{}{}{}", padding, code, padding);

        prop_assert!(actions::redeem_code(&mut state, &input, 0).is_ok());
        prop_assert_eq!(state.money, 50_000.0);
        prop_assert_eq!(
            actions::redeem_code(&mut state, &input, 1),
            Err(Rejection::AlreadyRedeemed)
        );
        prop_assert_eq!(state.money, 50_000.0);
    }
}
