//! Spell assignment pipeline.
//!
//! distribution -> plain spells -> armor Impenetrability -> cantrips ->
//! (mundane revert | magical marker + derived attributes).
//!
//! The two strategies differ only in how the family is resolved, what
//! counts as the item's spell total, and which derived formulas run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::LootContext;
use super::derived;
use super::restrictions::{self, RestrictionOutcome};
use crate::distribution::{self, SpellDistribution};
use crate::item::{GeneratedItem, ItemType, TreasureProfile, TreasureRoll, UiEffects, WeenieType};
use crate::rng;
use crate::spells::{SpellFamily, SpellId, SpellTable};

/// Summary of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellAssignment {
    pub family: SpellFamily,
    pub distribution: SpellDistribution,
    /// Spell total used by the derived formulas
    pub num_spells: u32,
    pub mundane: bool,
    /// Only set by the roll-based strategy
    pub restrictions: Option<RestrictionOutcome>,
}

/// Category-specific half of the pipeline
pub trait MagicStrategy {
    /// Family tables for this item, `None` aborts the pipeline
    fn family(&self, item: &GeneratedItem) -> Option<SpellFamily>;

    /// Armor always carries an Impenetrability spell
    fn is_armor(&self, item: &GeneratedItem) -> bool;

    fn is_cloth_armor(&self) -> bool;

    fn spell_count(&self, distribution: &SpellDistribution, item: &GeneratedItem) -> u32;

    /// Fill mana pool, spellcraft and difficulty on a magical item
    fn apply_derived<R: Rng>(
        &mut self,
        ctx: &LootContext<'_>,
        item: &mut GeneratedItem,
        profile: &TreasureProfile,
        distribution: &SpellDistribution,
        max_base_mana: i32,
        rng: &mut R,
    ) -> Option<RestrictionOutcome>;
}

// =====================================================
// Legacy (profile only)
// =====================================================

/// Family by weenie type, shields use the armor tables
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyStrategy;

impl MagicStrategy for LegacyStrategy {
    fn family(&self, item: &GeneratedItem) -> Option<SpellFamily> {
        if item.is_shield {
            return Some(SpellFamily::Armor);
        }
        match item.weenie_type {
            WeenieType::Clothing => Some(SpellFamily::Armor),
            WeenieType::Caster => Some(SpellFamily::Caster),
            WeenieType::Generic => Some(SpellFamily::Jewelry),
            WeenieType::MeleeWeapon => Some(SpellFamily::Melee),
            WeenieType::MissileLauncher => Some(SpellFamily::Missile),
            _ => None,
        }
    }

    fn is_armor(&self, item: &GeneratedItem) -> bool {
        item.item_type == ItemType::Armor
    }

    fn is_cloth_armor(&self) -> bool {
        false
    }

    fn spell_count(&self, distribution: &SpellDistribution, _item: &GeneratedItem) -> u32 {
        distribution.total()
    }

    fn apply_derived<R: Rng>(
        &mut self,
        ctx: &LootContext<'_>,
        item: &mut GeneratedItem,
        profile: &TreasureProfile,
        distribution: &SpellDistribution,
        _max_base_mana: i32,
        rng: &mut R,
    ) -> Option<RestrictionOutcome> {
        let ruleset = ctx.config.world_ruleset;

        let max_mana = derived::roll_item_max_mana(profile.tier(), distribution.total(), rng);
        item.item_max_mana = Some(max_mana);
        item.item_cur_mana = Some(max_mana);

        item.item_spellcraft = Some(derived::roll_spellcraft(item, ctx.spells, ruleset, rng));
        item.item_difficulty = Some(derived::roll_item_difficulty(
            item,
            distribution.epic,
            distribution.legendary,
            rng,
        ));
        None
    }
}

// =====================================================
// Current (treasure roll)
// =====================================================

/// Family by treasure-roll category. Restriction stages may write the
/// roll's heritage, hence the exclusive borrow.
#[derive(Debug)]
pub struct RollStrategy<'r> {
    pub roll: &'r mut TreasureRoll,
}

impl<'r> RollStrategy<'r> {
    pub fn new(roll: &'r mut TreasureRoll) -> Self {
        Self { roll }
    }
}

impl MagicStrategy for RollStrategy<'_> {
    fn family(&self, _item: &GeneratedItem) -> Option<SpellFamily> {
        let roll = &*self.roll;
        if roll.is_armor() || roll.is_clothing() {
            Some(SpellFamily::Armor)
        } else if roll.is_melee_weapon() {
            Some(SpellFamily::Melee)
        } else if roll.is_missile_weapon() {
            Some(SpellFamily::Missile)
        } else if roll.is_caster() {
            Some(SpellFamily::Caster)
        } else if roll.is_jewelry() || roll.is_gem() || roll.is_dinnerware() {
            Some(SpellFamily::Jewelry)
        } else {
            None
        }
    }

    fn is_armor(&self, _item: &GeneratedItem) -> bool {
        self.roll.is_armor()
    }

    fn is_cloth_armor(&self) -> bool {
        self.roll.is_cloth_armor()
    }

    fn spell_count(&self, _distribution: &SpellDistribution, item: &GeneratedItem) -> u32 {
        item.spellbook.len() as u32
    }

    fn apply_derived<R: Rng>(
        &mut self,
        ctx: &LootContext<'_>,
        item: &mut GeneratedItem,
        profile: &TreasureProfile,
        _distribution: &SpellDistribution,
        max_base_mana: i32,
        rng: &mut R,
    ) -> Option<RestrictionOutcome> {
        let ruleset = ctx.config.world_ruleset;

        let ceiling = derived::max_spell_mana(item, ctx.spells, max_base_mana);
        let max_mana =
            derived::roll_item_max_mana_for_roll(item, self.roll, ceiling, ctx.workmanship, rng);
        item.item_max_mana = Some(max_mana);
        item.item_cur_mana = Some(max_mana);

        item.item_spellcraft = Some(derived::roll_spellcraft_for_roll(
            item,
            self.roll,
            ctx.spells,
            ruleset,
            rng,
        ));

        Some(restrictions::add_activation_requirements(
            ctx, item, profile, self.roll, rng,
        ))
    }
}

// =====================================================
// Pipeline
// =====================================================

/// Run the whole pipeline. Returns false (item untouched) when no family
/// table applies to the item.
pub fn assign_magic<S: MagicStrategy, R: Rng>(
    ctx: &LootContext<'_>,
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    strategy: &mut S,
    rng: &mut R,
) -> bool {
    assign_magic_with_report(ctx, item, profile, strategy, rng).is_some()
}

/// Same as [`assign_magic`] but reports what was rolled
pub fn assign_magic_with_report<S: MagicStrategy, R: Rng>(
    ctx: &LootContext<'_>,
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    strategy: &mut S,
    rng: &mut R,
) -> Option<SpellAssignment> {
    let Some(family) = strategy.family(item) else {
        tracing::debug!(item = %item.name, weenie_type = ?item.weenie_type, "no spell family, item left mundane");
        return None;
    };
    let tables = ctx.tables.family(family);
    let tier = profile.tier();

    let dist = distribution::roll_spell_distribution(profile, ctx.config, rng);

    add_plain_spells(item, &tables.spells, tier, dist.plain, rng);

    if strategy.is_armor(item) {
        ensure_impenetrability(item, ctx.tables.impenetrability(), tier, rng);
    }

    add_cantrips(item, &tables.cantrips, &dist, rng);

    let num_spells = strategy.spell_count(&dist, item);
    let mut assignment = SpellAssignment {
        family,
        distribution: dist,
        num_spells,
        mundane: false,
        restrictions: None,
    };

    if num_spells == 0 && item.spell_did.is_none() && item.proc_spell.is_none() {
        revert_to_mundane(item, strategy.is_cloth_armor());
        assignment.mundane = true;
    } else {
        mark_magical(item);

        let max_base_mana = derived::max_base_mana(item, ctx.spells);
        item.mana_rate = Some(derived::calculate_mana_rate(max_base_mana));

        assignment.restrictions =
            strategy.apply_derived(ctx, item, profile, &dist, max_base_mana, rng);
    }

    tracing::debug!(
        item = %item.name,
        family = family.as_str(),
        tier,
        spells = item.spellbook.len(),
        spellcraft = ?item.item_spellcraft,
        difficulty = ?item.item_difficulty,
        "magic assigned"
    );
    Some(assignment)
}

// =====================================================
// Shared selection helpers
// =====================================================

/// Pick `count` rows without replacement, each at a random column in the
/// tier band. Stops early once every row has been used.
pub fn add_plain_spells<R: Rng + ?Sized>(
    item: &mut GeneratedItem,
    table: &SpellTable,
    tier: u32,
    count: u32,
    rng: &mut R,
) {
    let mut remaining: Vec<usize> = (0..table.row_count()).collect();

    for _ in 0..count {
        if remaining.is_empty() {
            tracing::warn!(item = %item.name, table = table.name(), "spell rows exhausted");
            break;
        }
        let idx = rng::next_index(rng, remaining.len());
        let col = distribution::roll_tier_column(tier, rng);
        let row = remaining.remove(idx);
        if let Some(spell) = table.get(row, col) {
            item.spellbook.add(spell);
        }
    }
}

/// Armor gets one Impenetrability spell unless any tier of it is already known
pub fn ensure_impenetrability<R: Rng + ?Sized>(
    item: &mut GeneratedItem,
    line: &[SpellId],
    tier: u32,
    rng: &mut R,
) {
    if line.is_empty() {
        return;
    }
    if line.iter().any(|spell| item.spellbook.contains(*spell)) {
        return;
    }
    let col = distribution::roll_tier_column(tier, rng);
    if let Some(spell) = line.get(col) {
        item.spellbook.add(*spell);
    }
}

/// Cantrips share one remaining-row pool across every grade.
/// Minors use column 0, majors 1, epics 2, legendaries 3.
pub fn add_cantrips<R: Rng + ?Sized>(
    item: &mut GeneratedItem,
    table: &SpellTable,
    dist: &SpellDistribution,
    rng: &mut R,
) {
    if dist.cantrips() == 0 {
        return;
    }

    let mut remaining: Vec<usize> = (0..table.row_count()).collect();
    let grades = [dist.minor, dist.major, dist.epic, dist.legendary];

    for (col, &count) in grades.iter().enumerate() {
        for _ in 0..count {
            if remaining.is_empty() {
                tracing::warn!(item = %item.name, table = table.name(), "cantrip rows exhausted");
                return;
            }
            let idx = rng::next_index(rng, remaining.len());
            let row = remaining.remove(idx);
            if let Some(spell) = table.get(row, col) {
                item.spellbook.add(spell);
            }
        }
    }
}

/// Clear every magic field. Cloth armor also drops its wield requirement.
pub fn revert_to_mundane(item: &mut GeneratedItem, cloth_armor: bool) {
    item.item_mana_cost = None;
    item.item_max_mana = None;
    item.item_cur_mana = None;
    item.mana_rate = None;
    item.item_spellcraft = None;
    item.item_difficulty = None;

    if cloth_armor {
        item.wield_requirements = None;
        item.wield_skill_type = None;
        item.wield_difficulty = None;
    }
}

/// Elemental effects win over the generic magical marker
pub fn mark_magical(item: &mut GeneratedItem) {
    if item.ui_effects.is_none() {
        item.ui_effects = Some(UiEffects::Magical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LootConfig;
    use crate::item::{Skill, TreasureItemType, WieldRequirement};
    use crate::spells::FamilyTables;

    fn ctx(config: &LootConfig) -> LootContext<'_> {
        LootContext::with_defaults(config)
    }

    #[test]
    fn test_legacy_family_resolution() {
        let legacy = LegacyStrategy;
        let mut item = GeneratedItem::new("Hat", WeenieType::Clothing, ItemType::Clothing);
        assert_eq!(legacy.family(&item), Some(SpellFamily::Armor));
        item.weenie_type = WeenieType::Gem;
        assert_eq!(legacy.family(&item), None);
        item.is_shield = true;
        assert_eq!(legacy.family(&item), Some(SpellFamily::Armor));

        let sword = GeneratedItem::new("Sword", WeenieType::MeleeWeapon, ItemType::MeleeWeapon);
        assert_eq!(legacy.family(&sword), Some(SpellFamily::Melee));
        let bow = GeneratedItem::new("Bow", WeenieType::MissileLauncher, ItemType::MissileWeapon);
        assert_eq!(legacy.family(&bow), Some(SpellFamily::Missile));
    }

    #[test]
    fn test_roll_family_resolution() {
        let cases = [
            (TreasureItemType::MeleeWeapon, Some(SpellFamily::Melee)),
            (TreasureItemType::MissileWeapon, Some(SpellFamily::Missile)),
            (TreasureItemType::Caster, Some(SpellFamily::Caster)),
            (TreasureItemType::Jewelry, Some(SpellFamily::Jewelry)),
            (TreasureItemType::Clothing, Some(SpellFamily::Armor)),
            (
                TreasureItemType::Armor {
                    cloth: false,
                    shield: true,
                },
                Some(SpellFamily::Armor),
            ),
            (TreasureItemType::Other, None),
        ];
        let item = GeneratedItem::default();
        for (item_type, expected) in cases {
            let mut roll = TreasureRoll::new(item_type);
            let strategy = RollStrategy::new(&mut roll);
            assert_eq!(strategy.family(&item), expected, "{:?}", item_type);
        }
    }

    #[test]
    fn test_unmapped_item_left_untouched() {
        let config = LootConfig::default();
        let mut item = GeneratedItem::new("Apple", WeenieType::Food, ItemType::Food);
        let before = item.clone();
        let profile = TreasureProfile::new(5, 0.0).unwrap();
        let mut rng = rng::seeded(1);
        assert!(!assign_magic(&ctx(&config), &mut item, &profile, &mut LegacyStrategy, &mut rng));
        assert_eq!(item, before);
    }

    #[test]
    fn test_plain_spells_distinct_rows() {
        let table = &FamilyTables::global().family(SpellFamily::Melee).spells;
        let mut rng = rng::seeded(2);
        for _ in 0..200 {
            let mut item = GeneratedItem::default();
            add_plain_spells(&mut item, table, 8, 7, &mut rng);
            assert_eq!(item.spellbook.len(), 7);
            let mut bases: Vec<SpellId> = item
                .spellbook
                .iter()
                .map(|s| {
                    table
                        .rows()
                        .iter()
                        .find(|r| r.levels.contains(&s))
                        .unwrap()
                        .base
                })
                .collect();
            bases.sort();
            bases.dedup();
            assert_eq!(bases.len(), 7);
        }
    }

    #[test]
    fn test_plain_spells_stop_when_rows_exhausted() {
        let table = &FamilyTables::global().family(SpellFamily::Caster).spells;
        let mut item = GeneratedItem::default();
        let mut rng = rng::seeded(3);
        add_plain_spells(&mut item, table, 3, 50, &mut rng);
        assert_eq!(item.spellbook.len(), table.row_count());
    }

    #[test]
    fn test_impenetrability_added_once() {
        let line = FamilyTables::global().impenetrability();
        let mut rng = rng::seeded(4);
        let mut item = GeneratedItem::default();
        ensure_impenetrability(&mut item, line, 4, &mut rng);
        assert_eq!(item.spellbook.as_slice(), &[line[4]]);
        ensure_impenetrability(&mut item, line, 8, &mut rng);
        assert_eq!(item.spellbook.len(), 1);

        let mut preset = GeneratedItem::default();
        preset.spellbook.add(line[1]);
        ensure_impenetrability(&mut preset, line, 8, &mut rng);
        assert_eq!(preset.spellbook.len(), 1);
    }

    #[test]
    fn test_cantrip_grade_columns() {
        let table = &FamilyTables::global().family(SpellFamily::Jewelry).cantrips;
        let dist = SpellDistribution {
            plain: 0,
            minor: 2,
            major: 1,
            epic: 1,
            legendary: 1,
        };
        let mut rng = rng::seeded(5);
        let mut item = GeneratedItem::default();
        add_cantrips(&mut item, table, &dist, &mut rng);
        let grades: Vec<u32> = item.spellbook.iter().map(|s| s.0 % 10).collect();
        assert_eq!(grades, vec![1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_revert_to_mundane() {
        let mut item = GeneratedItem::new("Robe", WeenieType::Clothing, ItemType::Clothing);
        item.item_max_mana = Some(500);
        item.mana_rate = Some(-0.1);
        item.item_spellcraft = Some(100);
        item.wield_requirements = Some(WieldRequirement::Level);
        item.wield_skill_type = Some(Skill::MeleeDefense);
        item.wield_difficulty = Some(50);

        let mut kept = item.clone();
        revert_to_mundane(&mut kept, false);
        assert!(kept.item_max_mana.is_none() && kept.mana_rate.is_none());
        assert_eq!(kept.wield_difficulty, Some(50));

        revert_to_mundane(&mut item, true);
        assert!(item.item_spellcraft.is_none());
        assert!(item.wield_requirements.is_none());
        assert!(item.wield_skill_type.is_none());
        assert!(item.wield_difficulty.is_none());
    }

    #[test]
    fn test_elemental_marker_kept() {
        let mut item = GeneratedItem::default();
        item.ui_effects = Some(UiEffects::Fire);
        mark_magical(&mut item);
        assert_eq!(item.ui_effects, Some(UiEffects::Fire));

        let mut plain = GeneratedItem::default();
        mark_magical(&mut plain);
        assert_eq!(plain.ui_effects, Some(UiEffects::Magical));
    }

    #[test]
    fn test_legacy_armor_gets_impenetrability() {
        let config = LootConfig::default();
        let ctx = ctx(&config);
        let line = ctx.tables.impenetrability();
        let mut rng = rng::seeded(6);
        for tier in 1..=8 {
            let profile = TreasureProfile::new(tier, 0.0).unwrap();
            let mut item = GeneratedItem::new("Hauberk", WeenieType::Clothing, ItemType::Armor);
            assert!(assign_magic(&ctx, &mut item, &profile, &mut LegacyStrategy, &mut rng));
            let impen = line.iter().filter(|s| item.spellbook.contains(**s)).count();
            assert_eq!(impen, 1, "tier {}", tier);
        }
    }

    #[test]
    fn test_legacy_fields_populated() {
        let config = LootConfig::default();
        let ctx = ctx(&config);
        let profile = TreasureProfile::new(4, 0.0).unwrap();
        let mut rng = rng::seeded(7);
        let mut item = GeneratedItem::new("Wand", WeenieType::Caster, ItemType::Caster);
        let report =
            assign_magic_with_report(&ctx, &mut item, &profile, &mut LegacyStrategy, &mut rng).unwrap();
        assert_eq!(report.family, SpellFamily::Caster);
        assert_eq!(report.num_spells, report.distribution.total());
        assert!(report.restrictions.is_none());
        let max = item.item_max_mana.unwrap();
        assert!(max >= 800 * report.num_spells as i32);
        assert_eq!(item.item_cur_mana, Some(max));
        assert!(item.mana_rate.unwrap() < 0.0);
        assert!(item.item_spellcraft.unwrap() <= 370);
        assert!(item.item_difficulty.is_some());
        assert_eq!(item.ui_effects, Some(UiEffects::Magical));
    }
}
