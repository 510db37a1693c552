//! Magic itemization.
//!
//! Turns a freshly generated item into a magical one: rolls how many spells
//! it gets, draws them from its family tables, then derives mana, spellcraft,
//! difficulty and (roll-based only) activation restrictions.
//!
//! Two entry points share one pipeline:
//! - [`assign_magic`] with [`LegacyStrategy`]: category from the item itself
//! - [`assign_magic`] with [`RollStrategy`]: category from the treasure roll

pub mod assign;
pub mod context;
pub mod derived;
pub mod restrictions;

pub use assign::{
    assign_magic, assign_magic_with_report, LegacyStrategy, MagicStrategy, RollStrategy,
    SpellAssignment,
};
pub use context::{
    AllegianceRankTable, LinearWorkmanship, LootContext, TierAllegianceRanks, WorkmanshipTable,
};
pub use restrictions::RestrictionOutcome;

use rand::Rng;

use crate::item::{GeneratedItem, TreasureProfile, TreasureRoll};

/// Legacy entry point: family from the item's own type
pub fn assign_legacy<R: Rng>(
    ctx: &LootContext<'_>,
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    rng: &mut R,
) -> bool {
    assign_magic(ctx, item, profile, &mut LegacyStrategy, rng)
}

/// Roll-based entry point. Restrictions may set `roll.heritage`.
pub fn assign_for_roll<R: Rng>(
    ctx: &LootContext<'_>,
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    roll: &mut TreasureRoll,
    rng: &mut R,
) -> bool {
    assign_magic(ctx, item, profile, &mut RollStrategy::new(roll), rng)
}
