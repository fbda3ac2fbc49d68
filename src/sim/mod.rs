//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Wall-clock time only enters as the `now_ms` argument
//! - Seeded RNG only
//! - Entity ids from one monotonic counter
//! - No rendering or platform dependencies

pub mod actions;
pub mod collision;
pub mod economy;
pub mod entities;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use actions::{Action, GemShopItem, Rejection};
pub use collision::BallProbe;
pub use physics::Landing;
pub use state::{
    GameState, InventoryItem, LogKind, Modal, OmegaKind, RenderSnapshot, Screen, StructureKind,
    UpgradeKind, World,
};
pub use tick::{Event, StepOutcome, step};
