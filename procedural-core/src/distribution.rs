//! Spell count distribution.
//!
//! Decides how many plain spells and how many cantrips of each grade an item
//! receives. Draw order is fixed (plain chance, minor, major, epic,
//! legendary) so seeded runs stay reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::LootConfig;
use crate::constants::{
    EPIC_CANTRIP_MIN_TIER, LEGENDARY_CANTRIP_MIN_TIER, MAX_PLAIN_SPELLS, NON_CANTRIP_CHANCE_MAX,
    NON_CANTRIP_LADDER,
};
use crate::item::TreasureProfile;
use crate::rng;

/// Number of spells per category for one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDistribution {
    pub plain: u32,
    pub minor: u32,
    pub major: u32,
    pub epic: u32,
    pub legendary: u32,
}

impl SpellDistribution {
    pub fn cantrips(&self) -> u32 {
        self.minor + self.major + self.epic + self.legendary
    }

    pub fn total(&self) -> u32 {
        self.plain + self.cantrips()
    }
}

/// Plain spell count for a non-cantrip chance draw in `[1, 100000]`
pub fn plain_spell_count(chance: i32) -> u32 {
    NON_CANTRIP_LADDER
        .iter()
        .find(|(bound, _)| chance <= *bound)
        .map(|(_, count)| *count)
        .unwrap_or(MAX_PLAIN_SPELLS)
}

// Each step's threshold; a success sets the count to the step number.
const MINOR_T1: &[u32] = &[100];
const MINOR_T2_3: &[u32] = &[50, 250];
const MINOR_T4_5: &[u32] = &[50, 250, 1000];
const MINOR_T6_PLUS: &[u32] = &[50, 250, 1000, 5000];

const MAJOR_T1: &[u32] = &[];
const MAJOR_T2: &[u32] = &[500];
const MAJOR_T3: &[u32] = &[500, 10_000];
const MAJOR_T4_6: &[u32] = &[500, 5000];
const MAJOR_T7_PLUS: &[u32] = &[500, 5000, 15_000];

const EPIC_LADDER: &[u32] = &[100, 1000, 10_000, 100_000];
const LEGENDARY_LADDER: &[u32] = &[100, 500];

fn minor_ladder(tier: u32) -> &'static [u32] {
    match tier {
        1 => MINOR_T1,
        2 | 3 => MINOR_T2_3,
        4 | 5 => MINOR_T4_5,
        _ => MINOR_T6_PLUS,
    }
}

fn major_ladder(tier: u32) -> &'static [u32] {
    match tier {
        1 => MAJOR_T1,
        2 => MAJOR_T2,
        3 => MAJOR_T3,
        4..=6 => MAJOR_T4_6,
        _ => MAJOR_T7_PLUS,
    }
}

/// Multiplier applied to every ladder bound.
///
/// `1 - loot_quality_mod` when the config toggle is on and the modifier is
/// strictly inside (0, 1), otherwise 1.
pub fn quality_modifier(profile: &TreasureProfile, config: &LootConfig) -> f64 {
    let q = profile.loot_quality_mod() as f64;
    if config.loot_quality_mod && q > 0.0 && q < 1.0 {
        1.0 - q
    } else {
        1.0
    }
}

/// Run a cantrip ladder. A later success overwrites an earlier one.
fn roll_ladder<R: Rng + ?Sized>(rng: &mut R, ladder: &[u32], drop_rate: f64, quality_mod: f64) -> u32 {
    let drop_rate_mod = 1.0 / drop_rate;
    let mut count = 0;
    for (step, &threshold) in ladder.iter().enumerate() {
        let bound = (threshold as f64 * drop_rate_mod * quality_mod) as i32;
        if rng::next_int(rng, 1, bound) == 1 {
            count = step as u32 + 1;
        }
    }
    count
}

fn roll_minor<R: Rng + ?Sized>(rng: &mut R, tier: u32, rate: f64, qm: f64) -> u32 {
    if rate <= 0.0 {
        return 0;
    }
    roll_ladder(rng, minor_ladder(tier), rate, qm)
}

fn roll_major<R: Rng + ?Sized>(rng: &mut R, tier: u32, rate: f64, qm: f64) -> u32 {
    if rate <= 0.0 {
        return 0;
    }
    roll_ladder(rng, major_ladder(tier), rate, qm)
}

fn roll_epic<R: Rng + ?Sized>(rng: &mut R, tier: u32, rate: f64, qm: f64) -> u32 {
    if tier < EPIC_CANTRIP_MIN_TIER || rate <= 0.0 {
        return 0;
    }
    // one in four items never gets a shot at epics
    if rng::next_int(rng, 1, 4) > 1 {
        roll_ladder(rng, EPIC_LADDER, rate, qm)
    } else {
        0
    }
}

fn roll_legendary<R: Rng + ?Sized>(rng: &mut R, tier: u32, rate: f64, qm: f64) -> u32 {
    if tier < LEGENDARY_CANTRIP_MIN_TIER || rate <= 0.0 {
        return 0;
    }
    roll_ladder(rng, LEGENDARY_LADDER, rate, qm)
}

/// Roll the full distribution for one item
pub fn roll_spell_distribution<R: Rng + ?Sized>(
    profile: &TreasureProfile,
    config: &LootConfig,
    rng: &mut R,
) -> SpellDistribution {
    let tier = profile.tier();
    let qm = quality_modifier(profile, config);

    let non_cantrip_chance = rng::next_int(rng, 1, NON_CANTRIP_CHANCE_MAX);
    let minor = roll_minor(rng, tier, config.minor_cantrip_drop_rate, qm);
    let major = roll_major(rng, tier, config.major_cantrip_drop_rate, qm);
    let epic = roll_epic(rng, tier, config.epic_cantrip_drop_rate, qm);
    let legendary = roll_legendary(rng, tier, config.legendary_cantrip_drop_rate, qm);

    let dist = SpellDistribution {
        plain: plain_spell_count(non_cantrip_chance),
        minor,
        major,
        epic,
        legendary,
    };
    tracing::trace!(tier, ?dist, "spell distribution rolled");
    dist
}

// =====================================================
// Tier bands
// =====================================================

/// Lowest spell tier (1-based) for a treasure tier
pub fn low_spell_tier(tier: u32) -> u32 {
    match tier {
        1 => 1,
        2 => 3,
        3 => 4,
        4 => 5,
        5 | 6 => 6,
        _ => 7,
    }
}

/// Highest spell tier (1-based) for a treasure tier, reachable by the column roll
pub fn high_spell_tier(tier: u32) -> u32 {
    match tier {
        1 => 3,
        2 => 5,
        3 | 4 => 6,
        5 | 6 => 7,
        _ => 8,
    }
}

/// Uniform 0-based tier column in `low - 1 ..= high - 1` for `tier`
pub fn roll_tier_column<R: Rng + ?Sized>(tier: u32, rng: &mut R) -> usize {
    let low = low_spell_tier(tier) as i32;
    let high = high_spell_tier(tier) as i32;
    rng::next_int(rng, low - 1, high - 1) as usize
}
