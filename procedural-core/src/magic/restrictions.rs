//! Activation requirements: skill/level limits, heritage and allegiance
//! restrictions, and the final arcane lore difficulty.
//!
//! Stages run in a fixed order and each one is gated by the world ruleset.
//! Arcane lore is always computed last since every earlier stage lowers it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::{AllegianceRankTable, LootContext};
use super::derived;
use crate::constants::{
    ALLEGIANCE_REQUIREMENT_CHANCE, ARMOR_SKILL_LIMIT_CHANCE, CROWN_ALLEGIANCE_CHANCE,
    HERITAGE_REQUIREMENT_CHANCE, MISSILE_DEFENSE_LIMIT_SCALE, SKILL_LIMIT_SPELLCRAFT_BONUS,
};
use crate::item::{GeneratedItem, Heritage, Skill, TreasureProfile, TreasureRoll, WieldRequirement};
use crate::rng;
use crate::ruleset::Ruleset;

/// Which restriction stages fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionOutcome {
    pub skill_limit: bool,
    pub heritage: bool,
    pub allegiance: bool,
}

impl RestrictionOutcome {
    pub fn any(&self) -> bool {
        self.skill_limit || self.heritage || self.allegiance
    }
}

/// Apply every restriction stage allowed by the ruleset, then set
/// `item_difficulty` to the arcane lore requirement.
pub fn add_activation_requirements<R: Rng>(
    ctx: &LootContext<'_>,
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    roll: &mut TreasureRoll,
    rng: &mut R,
) -> RestrictionOutcome {
    let ruleset = ctx.config.world_ruleset;
    let coefficients = ruleset.coefficients();
    let mut outcome = RestrictionOutcome::default();

    if coefficients.skill_limit_gate {
        outcome.skill_limit = try_mutate_skill_limit(item, roll, ruleset, rng);
    }

    if coefficients.heritage_gate {
        outcome.heritage = try_mutate_heritage_requirement(item, roll, rng);
        outcome.allegiance =
            try_mutate_allegiance_requirement(item, profile, roll, ctx.allegiance, rng);
    }

    item.item_difficulty = Some(derived::calculate_arcane_lore(item, roll, ruleset));

    tracing::trace!(item = %item.name, ?outcome, difficulty = ?item.item_difficulty, "activation requirements");
    outcome
}

/// Whether this roll gets a skill limit at all.
/// Melee and missile weapons always do, non-cloth armor 55% of the time.
pub fn roll_item_skill_limit<R: Rng + ?Sized>(roll: &TreasureRoll, rng: &mut R) -> bool {
    if roll.is_melee_weapon() || roll.is_missile_weapon() {
        true
    } else if roll.is_armor() && !roll.is_cloth_armor() {
        rng::next_float(rng, 0.0, 1.0) < ARMOR_SKILL_LIMIT_CHANCE
    } else {
        false
    }
}

pub fn try_mutate_skill_limit<R: Rng + ?Sized>(
    item: &mut GeneratedItem,
    roll: &TreasureRoll,
    ruleset: Ruleset,
    rng: &mut R,
) -> bool {
    if !roll_item_skill_limit(roll, rng) {
        return false;
    }

    let mut limit = item.item_spellcraft.unwrap_or(0) + SKILL_LIMIT_SPELLCRAFT_BONUS;

    let skill = if roll.is_melee_weapon() || roll.is_missile_weapon() {
        if ruleset.coefficients().raw_skill_limit_boost
            && item.wield_requirements == Some(WieldRequirement::RawSkill)
        {
            if let Some(wield_difficulty) = item.wield_difficulty.filter(|d| *d > limit) {
                limit = wield_difficulty + rng::next_int(rng, 5, 20);
            }
        }
        item.weapon_skill
    } else if roll.is_armor() {
        if rng::next_float(rng, 0.0, 1.0) < 0.5 {
            Some(Skill::MeleeDefense)
        } else {
            limit = (limit as f32 * MISSILE_DEFENSE_LIMIT_SCALE) as i32;
            Some(Skill::MissileDefense)
        }
    } else {
        tracing::error!(item = %item.name, category = ?roll.item_type, "skill limit: unknown item type");
        return false;
    };

    item.item_skill_level_limit = Some(limit);
    item.item_skill_limit = skill;
    true
}

pub fn try_mutate_heritage_requirement<R: Rng + ?Sized>(
    item: &mut GeneratedItem,
    roll: &mut TreasureRoll,
    rng: &mut R,
) -> bool {
    if !item.has_spell_source() {
        return false;
    }
    if rng::next_float(rng, 0.0, 1.0) >= HERITAGE_REQUIREMENT_CHANCE {
        return false;
    }

    let heritage = match roll.heritage {
        Some(heritage) => heritage,
        None => {
            let all = Heritage::all();
            let picked = all[rng::next_int(rng, 1, all.len() as i32) as usize - 1];
            roll.heritage = Some(picked);
            picked
        }
    };

    item.heritage_group = Some(heritage);
    item.item_heritage_group_restriction = Some(heritage.label().to_string());
    true
}

pub fn try_mutate_allegiance_requirement<R: Rng>(
    item: &mut GeneratedItem,
    profile: &TreasureProfile,
    roll: &TreasureRoll,
    ranks: &dyn AllegianceRankTable,
    rng: &mut R,
) -> bool {
    if !item.has_spell_source() {
        return false;
    }

    // crowns carry allegiance requirements more often
    let chance = if roll.is_crown() {
        CROWN_ALLEGIANCE_CHANCE
    } else {
        ALLEGIANCE_REQUIREMENT_CHANCE
    };
    if rng::next_float(rng, 0.0, 1.0) >= chance {
        return false;
    }

    item.item_allegiance_rank_limit = Some(ranks.roll_rank(profile.tier(), rng));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LootConfig;
    use crate::item::{ItemType, TreasureItemKind, TreasureItemType, WeenieType};
    use crate::magic::context::TierAllegianceRanks;
    use crate::spells::SpellId;

    fn enchanted(name: &str) -> GeneratedItem {
        let mut item = GeneratedItem::new(name, WeenieType::MeleeWeapon, ItemType::MeleeWeapon);
        item.spellbook.add(SpellId::item(1, 4));
        item.item_spellcraft = Some(150);
        item
    }

    fn plate() -> TreasureRoll {
        TreasureRoll::new(TreasureItemType::Armor {
            cloth: false,
            shield: false,
        })
    }

    #[test]
    fn test_weapons_always_get_skill_limit() {
        let mut rng = rng::seeded(1);
        let roll = TreasureRoll::new(TreasureItemType::MissileWeapon);
        let mut item = enchanted("Bow");
        item.weapon_skill = Some(Skill::MissileWeapons);
        assert!(try_mutate_skill_limit(&mut item, &roll, Ruleset::EoR, &mut rng));
        assert_eq!(item.item_skill_level_limit, Some(170));
        assert_eq!(item.item_skill_limit, Some(Skill::MissileWeapons));
    }

    #[test]
    fn test_cloth_and_jewelry_never_get_skill_limit() {
        let mut rng = rng::seeded(2);
        let robe = TreasureRoll::new(TreasureItemType::Armor {
            cloth: true,
            shield: false,
        });
        let ring = TreasureRoll::new(TreasureItemType::Jewelry);
        for _ in 0..100 {
            assert!(!roll_item_skill_limit(&robe, &mut rng));
            assert!(!roll_item_skill_limit(&ring, &mut rng));
        }
    }

    #[test]
    fn test_armor_skill_limit_rate_and_scaling() {
        let mut rng = rng::seeded(3);
        let roll = plate();
        let mut hits = 0;
        for _ in 0..4000 {
            let mut item = enchanted("Breastplate");
            if try_mutate_skill_limit(&mut item, &roll, Ruleset::EoR, &mut rng) {
                hits += 1;
                match item.item_skill_limit {
                    Some(Skill::MeleeDefense) => assert_eq!(item.item_skill_level_limit, Some(170)),
                    Some(Skill::MissileDefense) => assert_eq!(
                        item.item_skill_level_limit,
                        Some((170.0 * MISSILE_DEFENSE_LIMIT_SCALE) as i32)
                    ),
                    other => panic!("unexpected skill {:?}", other),
                }
            }
        }
        let rate = hits as f32 / 4000.0;
        assert!((rate - 0.55).abs() < 0.04, "armor skill limit rate {}", rate);
    }

    #[test]
    fn test_custom_dm_raw_skill_boost() {
        let mut rng = rng::seeded(4);
        let roll = TreasureRoll::new(TreasureItemType::MeleeWeapon);
        let mut item = enchanted("Axe");
        item.wield_requirements = Some(WieldRequirement::RawSkill);
        item.wield_difficulty = Some(300);
        assert!(try_mutate_skill_limit(&mut item, &roll, Ruleset::CustomDM, &mut rng));
        let limit = item.item_skill_level_limit.unwrap();
        assert!((305..=320).contains(&limit));

        let mut eor_item = enchanted("Axe");
        eor_item.wield_requirements = Some(WieldRequirement::RawSkill);
        eor_item.wield_difficulty = Some(300);
        assert!(try_mutate_skill_limit(&mut eor_item, &roll, Ruleset::EoR, &mut rng));
        assert_eq!(eor_item.item_skill_level_limit, Some(170));
    }

    #[test]
    fn test_heritage_needs_spell_source() {
        let mut rng = rng::seeded(5);
        let mut roll = plate();
        let mut item = GeneratedItem::new("Plain", WeenieType::Clothing, ItemType::Armor);
        for _ in 0..500 {
            assert!(!try_mutate_heritage_requirement(&mut item, &mut roll, &mut rng));
        }
        assert!(roll.heritage.is_none());
    }

    #[test]
    fn test_heritage_writes_roll_and_label() {
        let mut rng = rng::seeded(6);
        let mut fired = 0;
        for _ in 0..2000 {
            let mut roll = plate();
            let mut item = enchanted("Helm");
            if try_mutate_heritage_requirement(&mut item, &mut roll, &mut rng) {
                fired += 1;
                let heritage = roll.heritage.unwrap();
                assert_eq!(item.heritage_group, Some(heritage));
                assert_eq!(item.item_heritage_group_restriction.as_deref(), Some(heritage.label()));
            }
        }
        assert!(fired > 40 && fired < 170, "heritage fired {}", fired);
    }

    #[test]
    fn test_heritage_keeps_preset_roll_heritage() {
        let mut rng = rng::seeded(7);
        for _ in 0..2000 {
            let mut roll = plate().with_heritage(Heritage::Gharundim);
            let mut item = enchanted("Helm");
            if try_mutate_heritage_requirement(&mut item, &mut roll, &mut rng) {
                assert_eq!(item.item_heritage_group_restriction.as_deref(), Some("Gharu'ndim"));
            }
        }
    }

    #[test]
    fn test_crowns_get_allegiance_more_often() {
        let ranks = TierAllegianceRanks::new();
        let profile = TreasureProfile::new(5, 0.0).unwrap();
        let crown = TreasureRoll::new(TreasureItemType::Jewelry).with_kind(TreasureItemKind::Crown);
        let ring = TreasureRoll::new(TreasureItemType::Jewelry);
        let mut rng = rng::seeded(8);
        let mut count = |roll: &TreasureRoll| {
            (0..4000)
                .filter(|_| {
                    let mut item = enchanted("Crown");
                    try_mutate_allegiance_requirement(&mut item, &profile, roll, &ranks, &mut rng)
                })
                .count()
        };
        let crowns = count(&crown);
        let rings = count(&ring);
        assert!(crowns > rings * 3, "crowns {} rings {}", crowns, rings);
    }

    #[test]
    fn test_eor_skips_heritage_and_allegiance() {
        let config = LootConfig::default();
        let ctx = LootContext::with_defaults(&config);
        let profile = TreasureProfile::new(6, 0.0).unwrap();
        let mut rng = rng::seeded(9);
        for _ in 0..1000 {
            let mut roll = TreasureRoll::new(TreasureItemType::Jewelry).with_kind(TreasureItemKind::Crown);
            let mut item = enchanted("Crown");
            let outcome = add_activation_requirements(&ctx, &mut item, &profile, &mut roll, &mut rng);
            assert!(!outcome.heritage && !outcome.allegiance);
            assert!(item.item_allegiance_rank_limit.is_none());
            assert!(item.item_difficulty.is_some());
        }
    }

    #[test]
    fn test_infiltration_skips_skill_limit() {
        let config = LootConfig {
            world_ruleset: Ruleset::Infiltration,
            ..LootConfig::default()
        };
        let ctx = LootContext::with_defaults(&config);
        let profile = TreasureProfile::new(6, 0.0).unwrap();
        let mut rng = rng::seeded(10);
        let mut roll = TreasureRoll::new(TreasureItemType::MeleeWeapon);
        let mut item = enchanted("Sword");
        let outcome = add_activation_requirements(&ctx, &mut item, &profile, &mut roll, &mut rng);
        assert!(!outcome.skill_limit);
        assert!(item.item_skill_level_limit.is_none());
    }
}
