//! Cost curves, income formulas and multiplier stacking
//!
//! Pure functions of the state; nothing here mutates.

use crate::consts::*;

use super::state::{GameState, ManagerState, OmegaUpgrade, Structure, UpgradeStats};

/// Cost of buying `level + 1` when currently at `level`
pub fn upgrade_cost_at(upgrade: &UpgradeStats, level: u32) -> f64 {
    let exponent = level.saturating_sub(1) as i32;
    (upgrade.base_cost * upgrade.cost_multiplier.powi(exponent)).floor()
}

/// Cost of the next level
pub fn upgrade_cost(upgrade: &UpgradeStats) -> f64 {
    upgrade_cost_at(upgrade, upgrade.level)
}

/// Result of a greedy buy-max computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyMaxPlan {
    pub levels: u32,
    pub total_cost: f64,
}

/// Most levels affordable with `money`, buying one at a time from the
/// current level. Stops at max level or after `BUY_MAX_ITERATION_CAP`.
pub fn plan_buy_max(upgrade: &UpgradeStats, money: f64) -> BuyMaxPlan {
    let mut level = upgrade.level;
    let mut remaining = money;
    let mut plan = BuyMaxPlan {
        levels: 0,
        total_cost: 0.0,
    };

    while plan.levels < BUY_MAX_ITERATION_CAP {
        if upgrade.max_level.is_some_and(|max| level >= max) {
            break;
        }
        let cost = upgrade_cost_at(upgrade, level);
        if remaining < cost {
            break;
        }
        remaining -= cost;
        plan.total_cost += cost;
        plan.levels += 1;
        level += 1;
    }

    plan
}

/// Money and gem cost of the next omega level
pub fn omega_costs(upgrade: &OmegaUpgrade) -> (f64, u64) {
    let level = upgrade.level as i32;
    let money = (upgrade.base_money_cost * OMEGA_MONEY_GROWTH.powi(level)).floor();
    let gems = (upgrade.base_gem_cost * OMEGA_GEM_GROWTH.powi(level)).floor() as u64;
    (money, gems)
}

/// Cost of starting construction of the next structure level
pub fn structure_cost(structure: &Structure) -> f64 {
    (structure.base_cost * structure.cost_multiplier.powi(structure.level as i32)).floor()
}

pub fn manager_upgrade_cost(manager: &ManagerState) -> f64 {
    let exponent = manager.level.saturating_sub(1) as i32;
    (MANAGER_UPGRADE_COST_BASE * MANAGER_UPGRADE_COST_MULT.powi(exponent)).floor()
}

/// Gravity scale after the dampener (1.0 = full gravity)
pub fn gravity_modifier(state: &GameState) -> f64 {
    let dampener = &state.omega.gravity_dampener;
    1.0 - f64::from(dampener.level) * dampener.effect
}

/// Per-frame velocity loss fraction from air drag
pub fn drag(state: &GameState) -> f64 {
    let ball = &state.upgrades.ball;
    let drag_mod = 1.0 - f64::from(ball.level) * ball.effect_multiplier;
    state.tuning.drag_coefficient * (1.0 - drag_mod)
}

/// Initial velocity of the next launch
pub fn launch_velocity(state: &GameState) -> f64 {
    let power = &state.upgrades.power;
    let velocity = state.tuning.launch_base_velocity + f64::from(power.level) * power.effect_multiplier;
    if state.mega_boost_armed {
        velocity * state.tuning.mega_boost_factor
    } else {
        velocity
    }
}

/// Money paid on landing after a flight that peaked at `peak_height`
pub fn landing_income(state: &GameState, peak_height: f64) -> f64 {
    let economy = &state.upgrades.economy;
    let catapult = &state.upgrades.catapult;
    let gantry_level = f64::from(state.structures.launch_gantry.level);

    let height_bonus = (peak_height / HEIGHT_BONUS_STEP).floor();
    let base = f64::from(economy.level) * economy.effect_multiplier;

    let income = (base + height_bonus)
        * state.permanent_multipliers.money
        * world_multiplier(state.current_world)
        * (1.0 + f64::from(catapult.level) * catapult.effect_multiplier)
        * (1.0 + gantry_level * GANTRY_BONUS_PER_LEVEL);

    income.floor().max(1.0)
}

/// Mission control payout per second
pub fn passive_income(state: &GameState) -> f64 {
    let level = f64::from(state.structures.mission_control.level);
    (10.0 * level * (state.record_height / 1000.0)).floor()
}

/// Artifact value multiplier from the xeno lab
pub fn lab_multiplier(state: &GameState) -> f64 {
    1.0 + f64::from(state.structures.xeno_lab.level)
}

/// Extra gem/asteroid drop odds from the gem scanner
pub fn gem_bonus(state: &GameState) -> f64 {
    let finder = &state.omega.gem_finder;
    f64::from(finder.level) * finder.effect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{OmegaKind, UpgradeKind, World};

    #[test]
    fn test_upgrade_cost_curve() {
        let power = UpgradeStats::initial(UpgradeKind::Power);
        assert_eq!(upgrade_cost(&power), 10.0);
        // floor(10 * 1.15^2) = floor(13.225)
        assert_eq!(upgrade_cost_at(&power, 3), 13.0);
    }

    #[test]
    fn test_landing_income_reference_case() {
        let mut state = GameState::new(1, 0);
        state.upgrades.economy.level = 1;
        state.upgrades.catapult.level = 1;
        state.current_world = World::Earth;
        // (1 + 2) * 1 * 1 * 1.5 * 1 = 4.5
        assert_eq!(landing_income(&state, 1000.0), 4.0);
    }

    #[test]
    fn test_landing_income_floor_of_one() {
        let mut state = GameState::new(1, 0);
        state.upgrades.economy.level = 0;
        assert_eq!(landing_income(&state, 0.0), 1.0);
    }

    #[test]
    fn test_landing_income_stacks_world_and_gantry() {
        let mut state = GameState::new(1, 0);
        state.current_world = World::Mars;
        state.structures.launch_gantry.level = 2;
        state.permanent_multipliers.money = 2.0;
        // (1 + 0) * 2 * 3 * 1.5 * 2 = 18
        assert_eq!(landing_income(&state, 100.0), 18.0);
    }

    #[test]
    fn test_buy_max_plan_stops_at_money() {
        let power = UpgradeStats::initial(UpgradeKind::Power);
        // costs 10, 11, 13, ...
        let plan = plan_buy_max(&power, 34.0);
        assert_eq!(plan.levels, 3);
        assert_eq!(plan.total_cost, 34.0);

        let plan = plan_buy_max(&power, 9.0);
        assert_eq!(plan.levels, 0);
        assert_eq!(plan.total_cost, 0.0);
    }

    #[test]
    fn test_buy_max_plan_respects_max_level() {
        let mut catapult = UpgradeStats::initial(UpgradeKind::Catapult);
        catapult.level = 4;
        let plan = plan_buy_max(&catapult, 1e15);
        assert_eq!(plan.levels, 1);
    }

    #[test]
    fn test_buy_max_plan_iteration_cap() {
        let mut cheap = UpgradeStats::initial(UpgradeKind::Power);
        cheap.cost_multiplier = 1.0;
        cheap.base_cost = 1.0;
        let plan = plan_buy_max(&cheap, 1e9);
        assert_eq!(plan.levels, BUY_MAX_ITERATION_CAP);
    }

    #[test]
    fn test_omega_costs_grow_exponentially() {
        let mut dampener = OmegaUpgrade::initial(OmegaKind::GravityDampener);
        assert_eq!(omega_costs(&dampener), (100_000.0, 10));
        dampener.level = 1;
        assert_eq!(omega_costs(&dampener), (250_000.0, 15));
        dampener.level = 2;
        // 22.5 gems floors to 22
        assert_eq!(omega_costs(&dampener), (625_000.0, 22));
    }

    #[test]
    fn test_flight_modifiers() {
        let mut state = GameState::new(1, 0);
        assert_eq!(gravity_modifier(&state), 1.0);
        state.omega.gravity_dampener.level = 2;
        assert!((gravity_modifier(&state) - 0.9).abs() < 1e-12);

        // ball level 1 * 0.15 -> drag 0.001 * 0.15
        assert!((drag(&state) - 0.000_15).abs() < 1e-12);
    }

    #[test]
    fn test_launch_velocity_and_boost() {
        let mut state = GameState::new(1, 0);
        assert_eq!(launch_velocity(&state), 25.0);
        state.mega_boost_armed = true;
        assert_eq!(launch_velocity(&state), 125.0);
    }

    #[test]
    fn test_passive_income() {
        let mut state = GameState::new(1, 0);
        state.record_height = 2500.0;
        assert_eq!(passive_income(&state), 0.0);
        state.structures.mission_control.level = 3;
        assert_eq!(passive_income(&state), 75.0);
    }

    #[test]
    fn test_manager_upgrade_cost() {
        let mut state = GameState::new(1, 0);
        assert_eq!(manager_upgrade_cost(&state.manager), 500_000.0);
        state.manager.level = 2;
        assert_eq!(manager_upgrade_cost(&state.manager), 900_000.0);
    }
}
