//! Melee weapon extras: chance-rolled weapon spells and on-hit procs.

use std::sync::OnceLock;

use rand::Rng;

use super::catalog::*;
use super::SpellId;
use crate::chance::{ChanceTable, ChanceTableKind};
use crate::item::TreasureProfile;
use crate::rng;
use crate::ruleset::Ruleset;

/// Weapon spells rolled independently: (base spell, threshold)
pub fn weapon_spell_chances(ruleset: Ruleset) -> &'static [(SpellId, f32)] {
    const DEFAULT: &[(SpellId, f32)] = &[
        (DEFENDER_SELF, 0.25),
        (BLOOD_DRINKER_SELF, 1.0),
        (SWIFT_KILLER_SELF, 0.30),
        (HEART_SEEKER_SELF, 0.25),
    ];
    const CUSTOM_DM: &[(SpellId, f32)] = &[(DEFENDER_SELF, 0.25), (HEART_SEEKER_SELF, 0.25)];

    match ruleset {
        Ruleset::CustomDM => CUSTOM_DM,
        _ => DEFAULT,
    }
}

/// Roll each weapon spell on its own interval draw.
/// Returns the tier 1 ids of the spells that hit, in list order.
pub fn roll_weapon_spells<R: Rng + ?Sized>(
    profile: &TreasureProfile,
    ruleset: Ruleset,
    rng: &mut R,
) -> Vec<SpellId> {
    weapon_spell_chances(ruleset)
        .iter()
        .filter(|(_, chance)| rng::next_interval(rng, profile.loot_quality_mod()) < *chance)
        .map(|(spell, _)| *spell)
        .collect()
}

const PROC_WEIGHTS: [(SpellId, f32); 9] = [
    (STAMINA_TO_MANA_SELF, 2.0),
    (MANA_TO_STAMINA_SELF, 2.0),
    (MANA_TO_HEALTH_SELF, 2.0),
    (DRAIN_MANA, 2.0),
    (DRAIN_STAMINA, 2.0),
    (DRAIN_HEALTH, 2.0),
    (MANA_BOOST_SELF, 1.0),
    (REVITALIZE_SELF, 1.0),
    (HEAL_SELF, 1.0),
];

/// Weight assigned to "no proc"
const NO_PROC_WEIGHT: f32 = 150.0;

static MELEE_PROCS: OnceLock<ChanceTable<Option<SpellId>>> = OnceLock::new();
static MELEE_PROCS_CERTAIN: OnceLock<ChanceTable<SpellId>> = OnceLock::new();

/// Proc table where most rolls yield nothing
pub fn melee_procs() -> &'static ChanceTable<Option<SpellId>> {
    MELEE_PROCS.get_or_init(|| {
        let entries = std::iter::once((None, NO_PROC_WEIGHT))
            .chain(PROC_WEIGHTS.iter().map(|&(spell, w)| (Some(spell), w)))
            .collect();
        ChanceTable::from_static(ChanceTableKind::Weight, entries)
    })
}

/// Proc table that always yields a proc
pub fn melee_procs_certain() -> &'static ChanceTable<SpellId> {
    MELEE_PROCS_CERTAIN
        .get_or_init(|| ChanceTable::from_static(ChanceTableKind::Weight, PROC_WEIGHTS.to_vec()))
}

pub fn roll_melee_proc<R: Rng + ?Sized>(profile: &TreasureProfile, rng: &mut R) -> Option<SpellId> {
    melee_procs()
        .roll(rng, profile.loot_quality_mod())
        .copied()
        .flatten()
}

/// Same seed, same proc
pub fn pseudo_random_roll_melee_proc(seed: u64) -> Option<SpellId> {
    melee_procs_certain().roll_deterministic(seed).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> TreasureProfile {
        TreasureProfile::new(4, 0.0).unwrap()
    }

    #[test]
    fn test_builtin_proc_tables_valid() {
        let procs: Vec<_> = melee_procs().entries().to_vec();
        assert!(ChanceTable::weighted(procs).is_ok());
        assert!(ChanceTable::weighted(PROC_WEIGHTS.to_vec()).is_ok());
        assert!((melee_procs().total_weight() - 165.0).abs() < 1e-3);
        assert!((melee_procs_certain().total_weight() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_custom_dm_weapon_list() {
        let list = weapon_spell_chances(Ruleset::CustomDM);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|(s, _)| *s != BLOOD_DRINKER_SELF));
        assert_eq!(weapon_spell_chances(Ruleset::EoR).len(), 4);
    }

    #[test]
    fn test_blood_drinker_always_hits_at_zero_quality() {
        let mut rng = rng::seeded(31);
        for _ in 0..200 {
            let spells = roll_weapon_spells(&profile(), Ruleset::EoR, &mut rng);
            assert!(spells.contains(&BLOOD_DRINKER_SELF));
        }
    }

    #[test]
    fn test_weapon_spells_keep_list_order() {
        let mut rng = rng::seeded(8);
        let order = weapon_spell_chances(Ruleset::EoR);
        for _ in 0..200 {
            let spells = roll_weapon_spells(&profile(), Ruleset::EoR, &mut rng);
            let positions: Vec<_> = spells
                .iter()
                .map(|s| order.iter().position(|(o, _)| o == s).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_procs_are_rare() {
        let mut rng = rng::seeded(1234);
        let hits = (0..10_000)
            .filter(|_| roll_melee_proc(&profile(), &mut rng).is_some())
            .count();
        // 15 / 165 ~ 9%
        assert!((600..1300).contains(&hits), "proc hits {}", hits);
    }

    #[test]
    fn test_pseudo_random_proc_is_stable() {
        for seed in 0..100u64 {
            let first = pseudo_random_roll_melee_proc(seed);
            assert!(first.is_some());
            assert_eq!(pseudo_random_roll_melee_proc(seed), first);
        }
    }
}
