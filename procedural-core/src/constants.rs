//! Centralized itemization constants for the loot procedural core.
//!
//! Eliminates magic numbers duplicated across the distribution, derived
//! attribute and restriction stages. Per-family spell lists remain in
//! `spells::families` as the single source of truth.

// =====================================================
// Treasure tiers
// =====================================================

/// Lowest treasure tier
pub const MIN_TIER: u32 = 1;

/// Highest treasure tier (also the number of spell power columns)
pub const MAX_TIER: u32 = 8;

/// Number of tier variants every item spell progression must carry
pub const NUM_SPELL_TIERS: usize = 8;

/// Number of cantrip grades (minor, major, epic, legendary)
pub const NUM_CANTRIP_GRADES: usize = 4;

// =====================================================
// Spell distribution
// =====================================================

/// Upper bound (inclusive) of the non-cantrip chance draw
pub const NON_CANTRIP_CHANCE_MAX: i32 = 100_000;

/// Cumulative non-cantrip ladder: (inclusive upper bound, plain spell count).
/// Anything above the last bound yields `MAX_PLAIN_SPELLS`.
pub const NON_CANTRIP_LADDER: [(i32, u32); 6] = [
    (46_410, 1),
    (73_450, 2),
    (91_300, 3),
    (98_175, 4),
    (99_700, 5),
    (99_935, 6),
];

/// Plain spell count when the chance draw exceeds every ladder bound
pub const MAX_PLAIN_SPELLS: u32 = 7;

/// Lowest tier that can roll epic cantrips
pub const EPIC_CANTRIP_MIN_TIER: u32 = 7;

/// Lowest tier that can roll legendary cantrips
pub const LEGENDARY_CANTRIP_MIN_TIER: u32 = 8;

// =====================================================
// Mana
// =====================================================

/// Legacy max mana roll range per tier (tier 1 first)
pub const ITEM_MAX_MANA_RANGES: [(i32, i32); 8] = [
    (200, 400),
    (400, 600),
    (600, 800),
    (800, 1000),
    (1000, 1200),
    (1200, 1400),
    (1400, 1600),
    (1600, 1800),
];

/// Mana rate numerator: rate = -1 / ceil(MANA_RATE_SECONDS / maxBaseMana)
pub const MANA_RATE_SECONDS: f32 = 1200.0;

/// Innate spells must be castable this many times from the pool
pub const INNATE_SPELL_CASTS: i32 = 5;

// =====================================================
// Spellcraft & difficulty
// =====================================================

/// Spellcraft never exceeds this value
pub const MAX_SPELLCRAFT: i32 = 370;

/// Spellcraft variance applied to most categories: [min, max)
pub const SPELLCRAFT_VARIANCE: (f32, f32) = (0.9, 1.1);

/// Wield difficulty is divided by this before being subtracted from difficulty
pub const WIELD_DIFFICULTY_DIVISOR: f32 = 3.0;

/// Heritage restriction reduces arcane lore by this fraction
pub const HERITAGE_ARCANE_REDUCTION: f32 = 0.2;

/// Each allegiance rank required lowers arcane lore by this much
pub const ALLEGIANCE_ARCANE_FACTOR: f32 = 10.0;

// =====================================================
// Restriction chances
// =====================================================

/// Skill level limit sits this far above the spellcraft
pub const SKILL_LIMIT_SPELLCRAFT_BONUS: i32 = 20;

/// Chance that non-cloth armor receives a skill limit
pub const ARMOR_SKILL_LIMIT_CHANCE: f32 = 0.55;

/// Missile defense skill limits are scaled down by this factor
pub const MISSILE_DEFENSE_LIMIT_SCALE: f32 = 0.7;

/// Chance of a heritage requirement
pub const HERITAGE_REQUIREMENT_CHANCE: f32 = 0.05;

/// Chance of an allegiance requirement on crowns
pub const CROWN_ALLEGIANCE_CHANCE: f32 = 0.25;

/// Chance of an allegiance requirement on everything else
pub const ALLEGIANCE_REQUIREMENT_CHANCE: f32 = 0.05;
