//! Data-driven game balance
//!
//! [`Tuning`] mirrors the tunable subset of [`crate::consts`]. Every field
//! defaults to its constant, so a TOML override only has to name the values
//! it changes:
//!
//! ```toml
//! gravity = 0.5
//! flying_rate = 0.05
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable physics, spawn and animation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Flight ───────────────────────────────────────────────────────────────
    pub gravity: f64,
    pub drag_coefficient: f64,
    pub launch_base_velocity: f64,
    pub mega_boost_factor: f64,
    pub frame_rate: f64,

    // ── Planet encounter ─────────────────────────────────────────────────────
    pub planet_chance: f64,
    pub planet_min_altitude: f64,
    pub planet_min_velocity: f64,

    // ── Flying resources ─────────────────────────────────────────────────────
    /// Fraction of the remaining distance closed each frame
    pub flying_rate: f32,
    /// Remaining distance (px) at which a resource counts as arrived
    pub arrival_epsilon: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // ── Entities ─────────────────────────────────────────────────────────────
    pub drop_pickup_band: f64,
    pub max_drops: usize,
    pub hazard_spawn_chance: f64,
    pub hazard_vertical_band: f64,
    pub hazard_horizontal_band: f32,
    pub jet_drift_per_frame: f32,
    pub airdrop_chance: f64,
    pub airdrop_descent: f64,
    pub max_airdrops: usize,
    pub rare_event_chance: f64,

    // ── Timers ───────────────────────────────────────────────────────────────
    pub construction_step: f32,
    pub jet_interval_ms: u64,
    pub airdrop_interval_ms: u64,
    pub autosave_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag_coefficient: DRAG_COEFFICIENT,
            launch_base_velocity: LAUNCH_BASE_VELOCITY,
            mega_boost_factor: MEGA_BOOST_FACTOR,
            frame_rate: FRAME_RATE,
            planet_chance: PLANET_CHANCE_PER_FRAME,
            planet_min_altitude: PLANET_MIN_ALTITUDE,
            planet_min_velocity: PLANET_MIN_VELOCITY,
            flying_rate: FLYING_RATE,
            arrival_epsilon: FLYING_ARRIVAL_EPSILON,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            drop_pickup_band: DROP_PICKUP_BAND,
            max_drops: MAX_DROPS,
            hazard_spawn_chance: HAZARD_SPAWN_CHANCE,
            hazard_vertical_band: HAZARD_VERTICAL_BAND,
            hazard_horizontal_band: HAZARD_HORIZONTAL_BAND,
            jet_drift_per_frame: JET_DRIFT_PER_FRAME,
            airdrop_chance: AIRDROP_CHANCE,
            airdrop_descent: AIRDROP_DESCENT,
            max_airdrops: MAX_AIRDROPS,
            rare_event_chance: RARE_EVENT_CHANCE,
            construction_step: CONSTRUCTION_STEP,
            jet_interval_ms: JET_INTERVAL_MS,
            airdrop_interval_ms: AIRDROP_INTERVAL_MS,
            autosave_interval_ms: AUTOSAVE_INTERVAL_MS,
        }
    }
}

impl Tuning {
    /// Parse a TOML override and validate the result
    pub fn from_toml_str(text: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = toml::from_str(text).map_err(TuningError::Parse)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Frame step in milliseconds
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    /// Reject values that break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        check_range("gravity", self.gravity, 0.0, 100.0, "(0, 100]")?;
        check_range("frame_rate", self.frame_rate, 0.0, 1000.0, "(0, 1000]")?;
        check_range(
            "flying_rate",
            f64::from(self.flying_rate),
            0.0,
            1.0,
            "(0, 1]",
        )?;
        check_range(
            "arrival_epsilon",
            f64::from(self.arrival_epsilon),
            0.0,
            f64::MAX,
            "(0, inf)",
        )?;
        check_range(
            "construction_step",
            f64::from(self.construction_step),
            0.0,
            100.0,
            "(0, 100]",
        )?;
        for (name, p) in [
            ("planet_chance", self.planet_chance),
            ("hazard_spawn_chance", self.hazard_spawn_chance),
            ("airdrop_chance", self.airdrop_chance),
            ("rare_event_chance", self.rare_event_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(TuningError::OutOfRange {
                    name,
                    value: p,
                    safe_range: "[0, 1]",
                });
            }
        }
        if self.airdrop_descent >= 0.0 {
            return Err(TuningError::OutOfRange {
                name: "airdrop_descent",
                value: self.airdrop_descent,
                safe_range: "(-inf, 0)",
            });
        }
        Ok(())
    }
}

/// Exclusive lower bound, inclusive upper bound
fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    safe_range: &'static str,
) -> Result<(), TuningError> {
    if value <= min || value > max || value.is_nan() {
        Err(TuningError::OutOfRange {
            name,
            value,
            safe_range,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_toml_str("gravity = 0.5\nflying_rate = 0.05\n").unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.flying_rate, 0.05);
        assert_eq!(tuning.max_drops, MAX_DROPS);
        assert_eq!(tuning.launch_base_velocity, LAUNCH_BASE_VELOCITY);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_toml_str("flying_rate = 1.5").unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "flying_rate", .. }));

        let err = Tuning::from_toml_str("airdrop_chance = -0.1").unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "airdrop_chance", .. }));

        assert!(matches!(
            Tuning::from_toml_str("gravity = \"heavy\""),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_default_flying_resource_converges_in_two_seconds() {
        // Farthest start (bottom-left corner) to the HUD target
        let tuning = Tuning::default();
        let mut remaining = (tuning.viewport_width.powi(2) + tuning.viewport_height.powi(2)).sqrt();
        let mut frames = 0;
        while remaining >= tuning.arrival_epsilon {
            remaining *= 1.0 - tuning.flying_rate;
            frames += 1;
        }
        assert!(f64::from(frames) / tuning.frame_rate <= 2.5);
    }
}
