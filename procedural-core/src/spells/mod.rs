//! Spell data and tiered spell tables.
//!
//! The itemization pipeline only ever sees spells through two read-only
//! interfaces: [`SpellMetadata`] (mana, power, formula level) and
//! [`SpellLevelProgression`] (the ordered tier variants of a base spell).
//! [`SpellCatalog`] is the built-in implementation of both.

pub mod catalog;
pub mod families;
pub mod melee;
pub mod table;

use serde::{Deserialize, Serialize};

pub use catalog::SpellCatalog;
pub use families::{FamilySpells, FamilyTables, SpellFamily};
pub use table::{SpellRow, SpellTable};

/// Spell identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub u32);

impl SpellId {
    /// Id of tier `tier` (1-8) of item spell line `line`
    pub const fn item(line: u32, tier: u32) -> Self {
        SpellId(line * 100 + tier)
    }

    /// Id of grade `grade` (1-4) of cantrip line `line`
    pub const fn cantrip(line: u32, grade: u32) -> Self {
        SpellId(50_000 + line * 10 + grade)
    }
}

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spell#{}", self.0)
    }
}

/// Static spell properties consulted by the derived attribute stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellInfo {
    pub id: SpellId,
    pub name: String,
    pub base_mana: u32,
    /// Intrinsic power, used by the default ruleset
    pub power: u32,
    /// Formula level 1-7
    pub level: u32,
}

/// Spell metadata lookup
pub trait SpellMetadata: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<&SpellInfo>;
}

/// Spell level progression source: base spell -> ordered tier variants
pub trait SpellLevelProgression: Send + Sync {
    fn spell_levels(&self, base: SpellId) -> Option<&[SpellId]>;
}
