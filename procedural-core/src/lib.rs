//! Loot Procedural Core Library
//!
//! Deterministic magic itemization for generated loot:
//! - Weighted chance tables (weight and chance modes)
//! - Tiered spell and cantrip tables per item family
//! - Spell count distribution (plain spells + cantrip ladders)
//! - Spell assignment pipeline (legacy and treasure-roll entry points)
//! - Derived attributes (mana pool, mana rate, spellcraft, difficulty)
//! - Activation restrictions (skill, heritage, allegiance)
//! - Monte-Carlo itemization survey

pub mod chance;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod item;
pub mod logging;
pub mod magic;
pub mod rng;
pub mod ruleset;
pub mod spells;
pub mod survey;

pub use chance::{ChanceTable, ChanceTableError, ChanceTableKind};
pub use config::{ConfigError, LootConfig};
pub use distribution::SpellDistribution;
pub use error::{LootError, LootResult};
pub use item::{GeneratedItem, TreasureProfile, TreasureRoll};
pub use magic::{assign_for_roll, assign_legacy, LootContext, SpellAssignment};
pub use ruleset::Ruleset;
pub use spells::{SpellFamily, SpellId};
