//! Built-in spell catalog.
//!
//! Item spell lines carry 8 tier variants, cantrip lines carry 4 grades
//! (minor, major, epic, legendary). Ids are derived from the line number so
//! the base constants below double as progression keys.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{SpellId, SpellInfo, SpellLevelProgression, SpellMetadata};
use crate::constants::{NUM_CANTRIP_GRADES, NUM_SPELL_TIERS};

// =====================================================
// Item spell lines (tier 1 ids)
// =====================================================

pub const STRENGTH_SELF: SpellId = SpellId::item(1, 1);
pub const ENDURANCE_SELF: SpellId = SpellId::item(2, 1);
pub const COORDINATION_SELF: SpellId = SpellId::item(3, 1);
pub const QUICKNESS_SELF: SpellId = SpellId::item(4, 1);
pub const FOCUS_SELF: SpellId = SpellId::item(5, 1);
pub const WILLPOWER_SELF: SpellId = SpellId::item(6, 1);

pub const BLOOD_DRINKER_SELF: SpellId = SpellId::item(7, 1);
pub const DEFENDER_SELF: SpellId = SpellId::item(8, 1);
pub const HEART_SEEKER_SELF: SpellId = SpellId::item(9, 1);
pub const SWIFT_KILLER_SELF: SpellId = SpellId::item(10, 1);
pub const HERMETIC_LINK_SELF: SpellId = SpellId::item(11, 1);
pub const SPIRIT_DRINKER_SELF: SpellId = SpellId::item(12, 1);

pub const DIRTY_FIGHTING_MASTERY_SELF: SpellId = SpellId::item(13, 1);
pub const DUAL_WIELD_MASTERY_SELF: SpellId = SpellId::item(14, 1);
pub const RECKLESSNESS_MASTERY_SELF: SpellId = SpellId::item(15, 1);
pub const SNEAK_ATTACK_MASTERY_SELF: SpellId = SpellId::item(16, 1);

pub const IMPENETRABILITY: SpellId = SpellId::item(17, 1);
pub const PIERCING_BANE: SpellId = SpellId::item(18, 1);
pub const BLUDGEON_BANE: SpellId = SpellId::item(19, 1);
pub const BLADE_BANE: SpellId = SpellId::item(20, 1);
pub const ACID_BANE: SpellId = SpellId::item(21, 1);
pub const FLAME_BANE: SpellId = SpellId::item(22, 1);
pub const FROST_BANE: SpellId = SpellId::item(23, 1);
pub const LIGHTNING_BANE: SpellId = SpellId::item(24, 1);

pub const ARMOR_SELF: SpellId = SpellId::item(25, 1);
pub const ACID_PROTECTION_SELF: SpellId = SpellId::item(26, 1);
pub const FIRE_PROTECTION_SELF: SpellId = SpellId::item(27, 1);
pub const COLD_PROTECTION_SELF: SpellId = SpellId::item(28, 1);
pub const LIGHTNING_PROTECTION_SELF: SpellId = SpellId::item(29, 1);
pub const BLADE_PROTECTION_SELF: SpellId = SpellId::item(30, 1);
pub const BLUDGEON_PROTECTION_SELF: SpellId = SpellId::item(31, 1);
pub const PIERCING_PROTECTION_SELF: SpellId = SpellId::item(32, 1);

pub const REGENERATION_SELF: SpellId = SpellId::item(33, 1);
pub const REJUVENATION_SELF: SpellId = SpellId::item(34, 1);
pub const MANA_RENEWAL_SELF: SpellId = SpellId::item(35, 1);

pub const CREATURE_ENCHANTMENT_MASTERY_SELF: SpellId = SpellId::item(36, 1);
pub const ITEM_ENCHANTMENT_MASTERY_SELF: SpellId = SpellId::item(37, 1);
pub const LIFE_MAGIC_MASTERY_SELF: SpellId = SpellId::item(38, 1);
pub const WAR_MAGIC_MASTERY_SELF: SpellId = SpellId::item(39, 1);
pub const MANA_CONVERSION_MASTERY_SELF: SpellId = SpellId::item(40, 1);

pub const MELEE_DEFENSE_SELF: SpellId = SpellId::item(41, 1);
pub const MISSILE_DEFENSE_SELF: SpellId = SpellId::item(42, 1);
pub const MAGIC_RESISTANCE_SELF: SpellId = SpellId::item(43, 1);

// on-hit procs
pub const STAMINA_TO_MANA_SELF: SpellId = SpellId::item(44, 1);
pub const MANA_TO_STAMINA_SELF: SpellId = SpellId::item(45, 1);
pub const MANA_TO_HEALTH_SELF: SpellId = SpellId::item(46, 1);
pub const DRAIN_MANA: SpellId = SpellId::item(47, 1);
pub const DRAIN_STAMINA: SpellId = SpellId::item(48, 1);
pub const DRAIN_HEALTH: SpellId = SpellId::item(49, 1);
pub const MANA_BOOST_SELF: SpellId = SpellId::item(50, 1);
pub const REVITALIZE_SELF: SpellId = SpellId::item(51, 1);
pub const HEAL_SELF: SpellId = SpellId::item(52, 1);

const ITEM_LINES: &[(u32, &str)] = &[
    (1, "Strength Self"),
    (2, "Endurance Self"),
    (3, "Coordination Self"),
    (4, "Quickness Self"),
    (5, "Focus Self"),
    (6, "Willpower Self"),
    (7, "Blood Drinker Self"),
    (8, "Defender Self"),
    (9, "Heart Seeker Self"),
    (10, "Swift Killer Self"),
    (11, "Hermetic Link Self"),
    (12, "Spirit Drinker Self"),
    (13, "Dirty Fighting Mastery Self"),
    (14, "Dual Wield Mastery Self"),
    (15, "Recklessness Mastery Self"),
    (16, "Sneak Attack Mastery Self"),
    (17, "Impenetrability"),
    (18, "Piercing Bane"),
    (19, "Bludgeon Bane"),
    (20, "Blade Bane"),
    (21, "Acid Bane"),
    (22, "Flame Bane"),
    (23, "Frost Bane"),
    (24, "Lightning Bane"),
    (25, "Armor Self"),
    (26, "Acid Protection Self"),
    (27, "Fire Protection Self"),
    (28, "Cold Protection Self"),
    (29, "Lightning Protection Self"),
    (30, "Blade Protection Self"),
    (31, "Bludgeon Protection Self"),
    (32, "Piercing Protection Self"),
    (33, "Regeneration Self"),
    (34, "Rejuvenation Self"),
    (35, "Mana Renewal Self"),
    (36, "Creature Enchantment Mastery Self"),
    (37, "Item Enchantment Mastery Self"),
    (38, "Life Magic Mastery Self"),
    (39, "War Magic Mastery Self"),
    (40, "Mana Conversion Mastery Self"),
    (41, "Melee Defense Self"),
    (42, "Missile Defense Self"),
    (43, "Magic Resistance Self"),
    (44, "Stamina to Mana Self"),
    (45, "Mana to Stamina Self"),
    (46, "Mana to Health Self"),
    (47, "Drain Mana"),
    (48, "Drain Stamina"),
    (49, "Drain Health"),
    (50, "Mana Boost Self"),
    (51, "Revitalize Self"),
    (52, "Heal Self"),
];

// =====================================================
// Cantrip lines (minor grade ids)
// =====================================================

pub const CANTRIP_STRENGTH: SpellId = SpellId::cantrip(1, 1);
pub const CANTRIP_ENDURANCE: SpellId = SpellId::cantrip(2, 1);
pub const CANTRIP_COORDINATION: SpellId = SpellId::cantrip(3, 1);
pub const CANTRIP_QUICKNESS: SpellId = SpellId::cantrip(4, 1);
pub const CANTRIP_FOCUS: SpellId = SpellId::cantrip(5, 1);
pub const CANTRIP_WILLPOWER: SpellId = SpellId::cantrip(6, 1);
pub const CANTRIP_BLOOD_THIRST: SpellId = SpellId::cantrip(7, 1);
pub const CANTRIP_DEFENDER: SpellId = SpellId::cantrip(8, 1);
pub const CANTRIP_HEART_THIRST: SpellId = SpellId::cantrip(9, 1);
pub const CANTRIP_SWIFT_HUNTER: SpellId = SpellId::cantrip(10, 1);
pub const CANTRIP_HERMETIC_LINK: SpellId = SpellId::cantrip(11, 1);
pub const CANTRIP_SPIRIT_THIRST: SpellId = SpellId::cantrip(12, 1);
pub const CANTRIP_IMPENETRABILITY: SpellId = SpellId::cantrip(13, 1);
pub const CANTRIP_ACID_BANE: SpellId = SpellId::cantrip(14, 1);
pub const CANTRIP_FLAME_BANE: SpellId = SpellId::cantrip(15, 1);
pub const CANTRIP_FROST_BANE: SpellId = SpellId::cantrip(16, 1);
pub const CANTRIP_STORM_BANE: SpellId = SpellId::cantrip(17, 1);
pub const CANTRIP_BLADE_BANE: SpellId = SpellId::cantrip(18, 1);
pub const CANTRIP_BLUDGEON_BANE: SpellId = SpellId::cantrip(19, 1);
pub const CANTRIP_PIERCING_BANE: SpellId = SpellId::cantrip(20, 1);
pub const CANTRIP_ARMOR: SpellId = SpellId::cantrip(21, 1);
pub const CANTRIP_ACID_WARD: SpellId = SpellId::cantrip(22, 1);
pub const CANTRIP_FLAME_WARD: SpellId = SpellId::cantrip(23, 1);
pub const CANTRIP_FROST_WARD: SpellId = SpellId::cantrip(24, 1);
pub const CANTRIP_STORM_WARD: SpellId = SpellId::cantrip(25, 1);
pub const CANTRIP_SLASHING_WARD: SpellId = SpellId::cantrip(26, 1);
pub const CANTRIP_BLUDGEONING_WARD: SpellId = SpellId::cantrip(27, 1);
pub const CANTRIP_PIERCING_WARD: SpellId = SpellId::cantrip(28, 1);
pub const CANTRIP_REGENERATION: SpellId = SpellId::cantrip(29, 1);
pub const CANTRIP_REJUVENATION: SpellId = SpellId::cantrip(30, 1);
pub const CANTRIP_MANA_GAIN: SpellId = SpellId::cantrip(31, 1);
pub const CANTRIP_CREATURE_ENCHANTMENT_APTITUDE: SpellId = SpellId::cantrip(32, 1);
pub const CANTRIP_ITEM_ENCHANTMENT_APTITUDE: SpellId = SpellId::cantrip(33, 1);
pub const CANTRIP_LIFE_MAGIC_APTITUDE: SpellId = SpellId::cantrip(34, 1);
pub const CANTRIP_WAR_MAGIC_APTITUDE: SpellId = SpellId::cantrip(35, 1);
pub const CANTRIP_MANA_CONVERSION_PROWESS: SpellId = SpellId::cantrip(36, 1);
pub const CANTRIP_INVULNERABILITY: SpellId = SpellId::cantrip(37, 1);
pub const CANTRIP_IMPREGNABILITY: SpellId = SpellId::cantrip(38, 1);
pub const CANTRIP_MAGIC_RESISTANCE: SpellId = SpellId::cantrip(39, 1);
pub const CANTRIP_DIRTY_FIGHTING_PROWESS: SpellId = SpellId::cantrip(40, 1);
pub const CANTRIP_DUAL_WIELD_APTITUDE: SpellId = SpellId::cantrip(41, 1);
pub const CANTRIP_RECKLESSNESS_PROWESS: SpellId = SpellId::cantrip(42, 1);
pub const CANTRIP_SNEAK_ATTACK_PROWESS: SpellId = SpellId::cantrip(43, 1);

const CANTRIP_LINES: &[(u32, &str)] = &[
    (1, "Strength"),
    (2, "Endurance"),
    (3, "Coordination"),
    (4, "Quickness"),
    (5, "Focus"),
    (6, "Willpower"),
    (7, "Blood Thirst"),
    (8, "Defender"),
    (9, "Heart Thirst"),
    (10, "Swift Hunter"),
    (11, "Hermetic Link"),
    (12, "Spirit Thirst"),
    (13, "Impenetrability"),
    (14, "Acid Bane"),
    (15, "Flame Bane"),
    (16, "Frost Bane"),
    (17, "Storm Bane"),
    (18, "Blade Bane"),
    (19, "Bludgeon Bane"),
    (20, "Piercing Bane"),
    (21, "Armor"),
    (22, "Acid Ward"),
    (23, "Flame Ward"),
    (24, "Frost Ward"),
    (25, "Storm Ward"),
    (26, "Slashing Ward"),
    (27, "Bludgeoning Ward"),
    (28, "Piercing Ward"),
    (29, "Regeneration"),
    (30, "Rejuvenation"),
    (31, "Mana Gain"),
    (32, "Creature Enchantment Aptitude"),
    (33, "Item Enchantment Aptitude"),
    (34, "Life Magic Aptitude"),
    (35, "War Magic Aptitude"),
    (36, "Mana Conversion Prowess"),
    (37, "Invulnerability"),
    (38, "Impregnability"),
    (39, "Magic Resistance"),
    (40, "Dirty Fighting Prowess"),
    (41, "Dual Wield Aptitude"),
    (42, "Recklessness Prowess"),
    (43, "Sneak Attack Prowess"),
];

// per tier 1-8: (base mana, power, formula level)
const ITEM_TIER_STATS: [(u32, u32, u32); NUM_SPELL_TIERS] = [
    (10, 1, 1),
    (20, 50, 2),
    (30, 100, 3),
    (40, 150, 4),
    (50, 200, 5),
    (60, 250, 6),
    (70, 300, 7),
    (80, 400, 7),
];

// per grade minor/major/epic/legendary: (base mana, power, formula level)
const CANTRIP_GRADE_STATS: [(u32, u32, u32); NUM_CANTRIP_GRADES] =
    [(10, 100, 4), (15, 200, 6), (20, 300, 7), (25, 400, 7)];

const GRADE_NAMES: [&str; NUM_CANTRIP_GRADES] = ["Minor", "Major", "Epic", "Legendary"];

const ROMAN: [&str; NUM_SPELL_TIERS] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];

/// In-memory spell metadata + level progression
#[derive(Debug, Clone, Default)]
pub struct SpellCatalog {
    spells: HashMap<SpellId, SpellInfo>,
    progressions: HashMap<SpellId, Vec<SpellId>>,
}

static BUILTIN: OnceLock<SpellCatalog> = OnceLock::new();

impl SpellCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared built-in catalog, built on first use
    pub fn global() -> &'static SpellCatalog {
        BUILTIN.get_or_init(Self::builtin)
    }

    /// Build the built-in catalog
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        for &(line, name) in ITEM_LINES {
            let levels: Vec<SpellId> = (1..=NUM_SPELL_TIERS as u32)
                .map(|tier| SpellId::item(line, tier))
                .collect();
            for (i, id) in levels.iter().enumerate() {
                let (base_mana, power, level) = ITEM_TIER_STATS[i];
                catalog.insert_spell(SpellInfo {
                    id: *id,
                    name: format!("{} {}", name, ROMAN[i]),
                    base_mana,
                    power,
                    level,
                });
            }
            catalog.set_progression(levels[0], levels);
        }

        for &(line, name) in CANTRIP_LINES {
            let grades: Vec<SpellId> = (1..=NUM_CANTRIP_GRADES as u32)
                .map(|grade| SpellId::cantrip(line, grade))
                .collect();
            for (i, id) in grades.iter().enumerate() {
                let (base_mana, power, level) = CANTRIP_GRADE_STATS[i];
                catalog.insert_spell(SpellInfo {
                    id: *id,
                    name: format!("{} {}", GRADE_NAMES[i], name),
                    base_mana,
                    power,
                    level,
                });
            }
            catalog.set_progression(grades[0], grades);
        }

        catalog
    }

    pub fn insert_spell(&mut self, info: SpellInfo) {
        self.spells.insert(info.id, info);
    }

    /// Set (or replace) the progression of a base spell
    pub fn set_progression(&mut self, base: SpellId, levels: Vec<SpellId>) {
        self.progressions.insert(base, levels);
    }

    pub fn remove_progression(&mut self, base: SpellId) -> Option<Vec<SpellId>> {
        self.progressions.remove(&base)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SpellInfo> {
        self.spells.values().find(|s| s.name == name)
    }
}

impl SpellMetadata for SpellCatalog {
    fn spell(&self, id: SpellId) -> Option<&SpellInfo> {
        self.spells.get(&id)
    }
}

impl SpellLevelProgression for SpellCatalog {
    fn spell_levels(&self, base: SpellId) -> Option<&[SpellId]> {
        self.progressions.get(&base).map(|v| v.as_slice())
    }
}
