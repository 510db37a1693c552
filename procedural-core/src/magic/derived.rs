//! Derived magic attributes: mana pool, mana rate, spellcraft, difficulty.
//!
//! Two families of formulas live side by side. The legacy ones only know
//! the profile tier and the item type; the `_for_roll` ones key off the
//! treasure-roll category. Both are kept exactly as tuned, they are not
//! interchangeable.

use rand::Rng;

use super::context::WorkmanshipTable;
use crate::constants::{
    ALLEGIANCE_ARCANE_FACTOR, HERITAGE_ARCANE_REDUCTION, INNATE_SPELL_CASTS, ITEM_MAX_MANA_RANGES,
    MANA_RATE_SECONDS, MAX_SPELLCRAFT, SPELLCRAFT_VARIANCE, WIELD_DIFFICULTY_DIVISOR,
};
use crate::item::{GeneratedItem, ItemType, TreasureRoll, WieldRequirement};
use crate::rng;
use crate::ruleset::Ruleset;
use crate::spells::{SpellInfo, SpellMetadata};

fn known_spells<'a>(
    item: &'a GeneratedItem,
    spells: &'a dyn SpellMetadata,
) -> impl Iterator<Item = &'a SpellInfo> + 'a {
    item.all_spells().filter_map(move |id| {
        let info = spells.spell(id);
        if info.is_none() {
            tracing::warn!(item = %item.name, spell = %id, "spell missing from metadata, ignored");
        }
        info
    })
}

// =====================================================
// Mana
// =====================================================

/// Highest base mana over innate, spellbook and proc spells; 0 if none
pub fn max_base_mana(item: &GeneratedItem, spells: &dyn SpellMetadata) -> i32 {
    known_spells(item, spells)
        .map(|s| s.base_mana as i32)
        .max()
        .unwrap_or(0)
}

/// Mana drained per second (always negative)
pub fn calculate_mana_rate(max_base_mana: i32) -> f32 {
    let mana = max_base_mana.max(1) as f32;
    -1.0 / (MANA_RATE_SECONDS / mana).ceil()
}

/// Legacy max mana: per-tier range times the number of spells
pub fn roll_item_max_mana<R: Rng + ?Sized>(tier: u32, num_spells: u32, rng: &mut R) -> i32 {
    let index = (tier.max(1) as usize - 1).min(ITEM_MAX_MANA_RANGES.len() - 1);
    let (min, max) = ITEM_MAX_MANA_RANGES[index];
    rng::next_int(rng, min, max) * num_spells as i32
}

/// Mana ceiling for the roll-based formula.
/// An innate spell must be castable several times from a full pool.
pub fn max_spell_mana(item: &GeneratedItem, spells: &dyn SpellMetadata, max_base_mana: i32) -> i32 {
    let castable = item
        .spell_did
        .and_then(|id| spells.spell(id))
        .map(|s| s.base_mana as i32 * INNATE_SPELL_CASTS)
        .unwrap_or(0);
    max_base_mana.max(castable)
}

/// Roll-based max mana: `ceil(ceiling * workmanship * range)`.
/// Unknown categories are logged and get a pool of 1.
pub fn roll_item_max_mana_for_roll<R: Rng + ?Sized>(
    item: &GeneratedItem,
    roll: &TreasureRoll,
    max_spell_mana: i32,
    workmanship: &dyn WorkmanshipTable,
    rng: &mut R,
) -> i32 {
    let modifier = workmanship.modifier(item.item_workmanship.unwrap_or(1));

    let (min, max) = if roll.is_clothing() || roll.is_armor() || roll.is_weapon() || roll.is_dinnerware() {
        (6, 15)
    } else if roll.is_jewelry() {
        // crowns included
        (12, 20)
    } else if roll.is_gem() {
        (1, 1)
    } else {
        tracing::error!(
            item = %item.name,
            category = ?roll.item_type,
            max_spell_mana,
            "roll_item_max_mana: unknown item type"
        );
        return 1;
    };

    let draw = rng::next_int(rng, min, max);
    (max_spell_mana as f32 * modifier * draw as f32).ceil() as i32
}

// =====================================================
// Spell power & spellcraft
// =====================================================

pub fn spell_power(spell: &SpellInfo, ruleset: Ruleset) -> u32 {
    ruleset
        .coefficients()
        .power_table
        .power(spell.power, spell.level)
}

/// Highest ruleset power over innate, spellbook and proc spells
pub fn max_spell_power(item: &GeneratedItem, spells: &dyn SpellMetadata, ruleset: Ruleset) -> i32 {
    known_spells(item, spells)
        .map(|s| spell_power(s, ruleset) as i32)
        .max()
        .unwrap_or(0)
}

fn finish_spellcraft(max_power: i32, variance: f32) -> i32 {
    let spellcraft = (max_power as f32 * variance).ceil() as i32;
    spellcraft.min(MAX_SPELLCRAFT)
}

/// Legacy spellcraft, variance by item type
pub fn roll_spellcraft<R: Rng + ?Sized>(
    item: &GeneratedItem,
    spells: &dyn SpellMetadata,
    ruleset: Ruleset,
    rng: &mut R,
) -> i32 {
    let max_power = max_spell_power(item, spells, ruleset);
    let (min, max) = match item.item_type {
        ItemType::Armor
        | ItemType::Clothing
        | ItemType::Jewelry
        | ItemType::MeleeWeapon
        | ItemType::MissileWeapon
        | ItemType::Caster => SPELLCRAFT_VARIANCE,
        _ => (1.0, 1.0),
    };
    finish_spellcraft(max_power, rng::next_float(rng, min, max))
}

/// Roll-based spellcraft, variance by treasure-roll category
pub fn roll_spellcraft_for_roll<R: Rng + ?Sized>(
    item: &GeneratedItem,
    roll: &TreasureRoll,
    spells: &dyn SpellMetadata,
    ruleset: Ruleset,
    rng: &mut R,
) -> i32 {
    let max_power = max_spell_power(item, spells, ruleset);
    let (min, max) = if roll.is_clothing()
        || roll.is_armor()
        || roll.is_weapon()
        || roll.is_jewelry()
        || roll.is_dinnerware()
    {
        SPELLCRAFT_VARIANCE
    } else {
        if !roll.is_gem() {
            tracing::error!(item = %item.name, category = ?roll.item_type, "roll_spellcraft: unknown item type");
        }
        (1.0, 1.0)
    };
    finish_spellcraft(max_power, rng::next_float(rng, min, max))
}

// =====================================================
// Difficulty
// =====================================================

/// Wield difficulty share subtracted from difficulty (raw skill requirements only)
fn wield_factor(item: &GeneratedItem) -> f32 {
    match (item.wield_difficulty, item.wield_requirements) {
        (Some(difficulty), Some(WieldRequirement::RawSkill)) => {
            difficulty as f32 / WIELD_DIFFICULTY_DIVISOR
        }
        _ => 0.0,
    }
}

/// Legacy item difficulty from spellcraft, spell count and high-grade cantrips
pub fn roll_item_difficulty<R: Rng + ?Sized>(
    item: &GeneratedItem,
    epics: u32,
    legendaries: u32,
    rng: &mut R,
) -> i32 {
    let mut num_spells = item.spellbook.len() as f32;
    if item.proc_spell.is_some() {
        num_spells += 1.0;
    }

    let spell_addon_chance = num_spells * (20.0 / (num_spells + 2.0));
    let spell_addon = rng::next_float(rng, 1.0, spell_addon_chance) * num_spells;

    let epic_addon = if epics > 0 {
        rng::next_int(rng, 1, 5) * epics as i32
    } else {
        0
    };
    let legendary_addon = if legendaries > 0 {
        rng::next_int(rng, 5, 10) * legendaries as i32
    } else {
        0
    };

    let spellcraft = item.item_spellcraft.unwrap_or(0) as f32;
    let base = (spellcraft - wield_factor(item)).max(0.0);

    (base + spell_addon + epic_addon as f32 + legendary_addon as f32).floor() as i32
}

/// Arcane lore requirement, computed after every restriction has been applied
pub fn calculate_arcane_lore(item: &GeneratedItem, roll: &TreasureRoll, ruleset: Ruleset) -> i32 {
    let spellcraft = item.item_spellcraft.unwrap_or(0) as f32;

    let skill_level_factor = match item.item_skill_level_limit {
        Some(limit) if limit > 0 => {
            limit as f32 / ruleset.coefficients().skill_level_divisor as f32
        }
        _ => 0.0,
    };

    let mut arcane = spellcraft - skill_level_factor;

    if let Some(rank) = item.item_allegiance_rank_limit.filter(|r| *r > 0) {
        arcane -= rank as f32 * ALLEGIANCE_ARCANE_FACTOR;
    }

    if item.heritage_group.is_some() {
        arcane -= arcane * HERITAGE_ARCANE_REDUCTION;
    }

    let arcane = arcane.max(0.0);
    (arcane + roll.item_difficulty).floor() as i32
}
