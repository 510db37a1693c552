//! Per-family spell and cantrip tables.
//!
//! Five item families share the same table layout: an 8-column spell table
//! and a 4-column cantrip table. [`FamilyTables::global`] builds all of them
//! once from the built-in catalog; custom progressions go through
//! [`FamilyTables::build`].

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::catalog::*;
use super::{SpellCatalog, SpellId, SpellLevelProgression, SpellTable};
use crate::constants::{NUM_CANTRIP_GRADES, NUM_SPELL_TIERS};

/// Item family that owns a spell table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellFamily {
    Melee,
    Missile,
    Armor,
    Caster,
    Jewelry,
}

impl SpellFamily {
    pub fn all() -> [SpellFamily; 5] {
        [
            SpellFamily::Melee,
            SpellFamily::Missile,
            SpellFamily::Armor,
            SpellFamily::Caster,
            SpellFamily::Jewelry,
        ]
    }

    fn index(self) -> usize {
        match self {
            SpellFamily::Melee => 0,
            SpellFamily::Missile => 1,
            SpellFamily::Armor => 2,
            SpellFamily::Caster => 3,
            SpellFamily::Jewelry => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpellFamily::Melee => "melee",
            SpellFamily::Missile => "missile",
            SpellFamily::Armor => "armor",
            SpellFamily::Caster => "caster",
            SpellFamily::Jewelry => "jewelry",
        }
    }

    /// Base item spells (tier 1 ids) in table row order
    pub fn spell_bases(self) -> &'static [SpellId] {
        match self {
            SpellFamily::Melee => &[
                STRENGTH_SELF,
                ENDURANCE_SELF,
                COORDINATION_SELF,
                QUICKNESS_SELF,
                BLOOD_DRINKER_SELF,
                DEFENDER_SELF,
                HEART_SEEKER_SELF,
                SWIFT_KILLER_SELF,
                DIRTY_FIGHTING_MASTERY_SELF,
                DUAL_WIELD_MASTERY_SELF,
                RECKLESSNESS_MASTERY_SELF,
                SNEAK_ATTACK_MASTERY_SELF,
            ],
            SpellFamily::Missile => &[
                STRENGTH_SELF,
                ENDURANCE_SELF,
                COORDINATION_SELF,
                QUICKNESS_SELF,
                BLOOD_DRINKER_SELF,
                DEFENDER_SELF,
                HEART_SEEKER_SELF,
                SWIFT_KILLER_SELF,
                DIRTY_FIGHTING_MASTERY_SELF,
                RECKLESSNESS_MASTERY_SELF,
                SNEAK_ATTACK_MASTERY_SELF,
            ],
            SpellFamily::Armor => &[
                STRENGTH_SELF,
                ENDURANCE_SELF,
                COORDINATION_SELF,
                QUICKNESS_SELF,
                FOCUS_SELF,
                WILLPOWER_SELF,
                ARMOR_SELF,
                ACID_PROTECTION_SELF,
                FIRE_PROTECTION_SELF,
                COLD_PROTECTION_SELF,
                LIGHTNING_PROTECTION_SELF,
                BLADE_PROTECTION_SELF,
                BLUDGEON_PROTECTION_SELF,
                PIERCING_PROTECTION_SELF,
                MELEE_DEFENSE_SELF,
                MISSILE_DEFENSE_SELF,
                MAGIC_RESISTANCE_SELF,
                REGENERATION_SELF,
                REJUVENATION_SELF,
                IMPENETRABILITY,
                PIERCING_BANE,
                BLUDGEON_BANE,
                BLADE_BANE,
                ACID_BANE,
                FLAME_BANE,
                FROST_BANE,
                LIGHTNING_BANE,
            ],
            SpellFamily::Caster => &[
                FOCUS_SELF,
                WILLPOWER_SELF,
                HERMETIC_LINK_SELF,
                SPIRIT_DRINKER_SELF,
                DEFENDER_SELF,
                CREATURE_ENCHANTMENT_MASTERY_SELF,
                ITEM_ENCHANTMENT_MASTERY_SELF,
                LIFE_MAGIC_MASTERY_SELF,
                WAR_MAGIC_MASTERY_SELF,
                MANA_CONVERSION_MASTERY_SELF,
                MANA_RENEWAL_SELF,
            ],
            SpellFamily::Jewelry => &[
                STRENGTH_SELF,
                ENDURANCE_SELF,
                COORDINATION_SELF,
                QUICKNESS_SELF,
                FOCUS_SELF,
                WILLPOWER_SELF,
                ARMOR_SELF,
                ACID_PROTECTION_SELF,
                FIRE_PROTECTION_SELF,
                COLD_PROTECTION_SELF,
                LIGHTNING_PROTECTION_SELF,
                BLADE_PROTECTION_SELF,
                BLUDGEON_PROTECTION_SELF,
                PIERCING_PROTECTION_SELF,
                REGENERATION_SELF,
                REJUVENATION_SELF,
                MANA_RENEWAL_SELF,
                CREATURE_ENCHANTMENT_MASTERY_SELF,
                ITEM_ENCHANTMENT_MASTERY_SELF,
                LIFE_MAGIC_MASTERY_SELF,
                WAR_MAGIC_MASTERY_SELF,
                MANA_CONVERSION_MASTERY_SELF,
                MELEE_DEFENSE_SELF,
                MISSILE_DEFENSE_SELF,
                MAGIC_RESISTANCE_SELF,
            ],
        }
    }

    /// Item spells left out of the creature-life list
    pub fn exclusions(self) -> &'static [SpellId] {
        match self {
            SpellFamily::Melee | SpellFamily::Missile => &[
                BLOOD_DRINKER_SELF,
                DEFENDER_SELF,
                HEART_SEEKER_SELF,
                SWIFT_KILLER_SELF,
            ],
            SpellFamily::Caster => &[HERMETIC_LINK_SELF, SPIRIT_DRINKER_SELF, DEFENDER_SELF],
            SpellFamily::Armor => &[
                IMPENETRABILITY,
                PIERCING_BANE,
                BLUDGEON_BANE,
                BLADE_BANE,
                ACID_BANE,
                FLAME_BANE,
                FROST_BANE,
                LIGHTNING_BANE,
            ],
            SpellFamily::Jewelry => &[],
        }
    }

    /// Base cantrips (minor grade ids) in table row order
    pub fn cantrip_bases(self) -> &'static [SpellId] {
        match self {
            SpellFamily::Melee => &[
                CANTRIP_STRENGTH,
                CANTRIP_ENDURANCE,
                CANTRIP_COORDINATION,
                CANTRIP_QUICKNESS,
                CANTRIP_BLOOD_THIRST,
                CANTRIP_DEFENDER,
                CANTRIP_HEART_THIRST,
                CANTRIP_SWIFT_HUNTER,
                CANTRIP_DIRTY_FIGHTING_PROWESS,
                CANTRIP_DUAL_WIELD_APTITUDE,
                CANTRIP_RECKLESSNESS_PROWESS,
                CANTRIP_SNEAK_ATTACK_PROWESS,
                CANTRIP_INVULNERABILITY,
            ],
            SpellFamily::Missile => &[
                CANTRIP_STRENGTH,
                CANTRIP_ENDURANCE,
                CANTRIP_COORDINATION,
                CANTRIP_QUICKNESS,
                CANTRIP_BLOOD_THIRST,
                CANTRIP_DEFENDER,
                CANTRIP_HEART_THIRST,
                CANTRIP_SWIFT_HUNTER,
                CANTRIP_DIRTY_FIGHTING_PROWESS,
                CANTRIP_RECKLESSNESS_PROWESS,
                CANTRIP_SNEAK_ATTACK_PROWESS,
                CANTRIP_IMPREGNABILITY,
            ],
            SpellFamily::Armor => &[
                CANTRIP_STRENGTH,
                CANTRIP_ENDURANCE,
                CANTRIP_COORDINATION,
                CANTRIP_QUICKNESS,
                CANTRIP_FOCUS,
                CANTRIP_WILLPOWER,
                CANTRIP_IMPENETRABILITY,
                CANTRIP_ACID_BANE,
                CANTRIP_FLAME_BANE,
                CANTRIP_FROST_BANE,
                CANTRIP_STORM_BANE,
                CANTRIP_BLADE_BANE,
                CANTRIP_BLUDGEON_BANE,
                CANTRIP_PIERCING_BANE,
                CANTRIP_ARMOR,
                CANTRIP_ACID_WARD,
                CANTRIP_FLAME_WARD,
                CANTRIP_FROST_WARD,
                CANTRIP_STORM_WARD,
                CANTRIP_SLASHING_WARD,
                CANTRIP_BLUDGEONING_WARD,
                CANTRIP_PIERCING_WARD,
                CANTRIP_INVULNERABILITY,
                CANTRIP_IMPREGNABILITY,
                CANTRIP_MAGIC_RESISTANCE,
                CANTRIP_REGENERATION,
                CANTRIP_REJUVENATION,
            ],
            SpellFamily::Caster => &[
                CANTRIP_FOCUS,
                CANTRIP_WILLPOWER,
                CANTRIP_HERMETIC_LINK,
                CANTRIP_SPIRIT_THIRST,
                CANTRIP_DEFENDER,
                CANTRIP_CREATURE_ENCHANTMENT_APTITUDE,
                CANTRIP_ITEM_ENCHANTMENT_APTITUDE,
                CANTRIP_LIFE_MAGIC_APTITUDE,
                CANTRIP_WAR_MAGIC_APTITUDE,
                CANTRIP_MANA_CONVERSION_PROWESS,
                CANTRIP_MANA_GAIN,
            ],
            SpellFamily::Jewelry => &[
                CANTRIP_STRENGTH,
                CANTRIP_ENDURANCE,
                CANTRIP_COORDINATION,
                CANTRIP_QUICKNESS,
                CANTRIP_FOCUS,
                CANTRIP_WILLPOWER,
                CANTRIP_ARMOR,
                CANTRIP_ACID_WARD,
                CANTRIP_FLAME_WARD,
                CANTRIP_FROST_WARD,
                CANTRIP_STORM_WARD,
                CANTRIP_SLASHING_WARD,
                CANTRIP_BLUDGEONING_WARD,
                CANTRIP_PIERCING_WARD,
                CANTRIP_REGENERATION,
                CANTRIP_REJUVENATION,
                CANTRIP_MANA_GAIN,
                CANTRIP_CREATURE_ENCHANTMENT_APTITUDE,
                CANTRIP_ITEM_ENCHANTMENT_APTITUDE,
                CANTRIP_LIFE_MAGIC_APTITUDE,
                CANTRIP_WAR_MAGIC_APTITUDE,
                CANTRIP_MANA_CONVERSION_PROWESS,
                CANTRIP_INVULNERABILITY,
                CANTRIP_IMPREGNABILITY,
                CANTRIP_MAGIC_RESISTANCE,
            ],
        }
    }
}

/// Spell + cantrip table for one family
#[derive(Debug, Clone)]
pub struct FamilySpells {
    pub spells: SpellTable,
    pub cantrips: SpellTable,
}

/// All family tables plus the Impenetrability line
#[derive(Debug, Clone)]
pub struct FamilyTables {
    families: Vec<FamilySpells>,
    impenetrability: Vec<SpellId>,
}

static GLOBAL_TABLES: OnceLock<FamilyTables> = OnceLock::new();

impl FamilyTables {
    /// Shared tables built from [`SpellCatalog::global`], built exactly once
    pub fn global() -> &'static FamilyTables {
        GLOBAL_TABLES.get_or_init(|| {
            let _span = crate::logging::TimingSpan::new("build_family_tables");
            Self::build(SpellCatalog::global())
        })
    }

    /// Build every family table from `progression`
    pub fn build(progression: &dyn SpellLevelProgression) -> Self {
        let families = SpellFamily::all()
            .iter()
            .map(|&family| {
                let name = family.as_str();
                FamilySpells {
                    spells: SpellTable::build(
                        name,
                        family.spell_bases(),
                        family.exclusions(),
                        progression,
                        NUM_SPELL_TIERS,
                    ),
                    cantrips: SpellTable::build(
                        &format!("{}_cantrips", name),
                        family.cantrip_bases(),
                        &[],
                        progression,
                        NUM_CANTRIP_GRADES,
                    ),
                }
            })
            .collect();

        let impenetrability = match progression.spell_levels(IMPENETRABILITY) {
            Some(levels) if levels.len() == NUM_SPELL_TIERS => levels.to_vec(),
            other => {
                tracing::error!(
                    found = other.map(|l| l.len()).unwrap_or(0),
                    "impenetrability progression unusable, armor will not be topped up"
                );
                Vec::new()
            }
        };

        Self {
            families,
            impenetrability,
        }
    }

    pub fn family(&self, family: SpellFamily) -> &FamilySpells {
        &self.families[family.index()]
    }

    /// The 8 Impenetrability tier variants, or empty if the line failed to build
    pub fn impenetrability(&self) -> &[SpellId] {
        &self.impenetrability
    }

    /// Total failed rows across every table
    pub fn failed_row_count(&self) -> usize {
        self.families
            .iter()
            .map(|f| f.spells.failed_bases().len() + f.cantrips.failed_bases().len())
            .sum()
    }
}
