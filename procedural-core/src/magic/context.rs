//! Read-only collaborators consulted by the pipeline.

use std::sync::OnceLock;

use rand::RngCore;

use crate::chance::{ChanceTable, ChanceTableKind};
use crate::config::LootConfig;
use crate::constants::MAX_TIER;
use crate::spells::{FamilyTables, SpellCatalog, SpellMetadata};

/// Allegiance rank requirement source
pub trait AllegianceRankTable: Send + Sync {
    fn roll_rank(&self, tier: u32, rng: &mut dyn RngCore) -> i32;
}

/// Workmanship to max-mana multiplier
pub trait WorkmanshipTable: Send + Sync {
    fn modifier(&self, workmanship: i32) -> f32;
}

/// Per-tier weighted allegiance ranks. Higher tiers reach higher ranks.
#[derive(Debug, Clone)]
pub struct TierAllegianceRanks {
    tables: Vec<ChanceTable<i32>>,
}

const MAX_ALLEGIANCE_RANK: i32 = 10;

impl TierAllegianceRanks {
    pub fn new() -> Self {
        let tables = (1..=MAX_TIER as i32)
            .map(|tier| {
                let top = (tier + 2).min(MAX_ALLEGIANCE_RANK);
                // rank 1 is the most common, each rank above it rarer
                let entries = (1..=top).map(|rank| (rank, (top - rank + 1) as f32)).collect();
                ChanceTable::from_static(ChanceTableKind::Weight, entries)
            })
            .collect();
        Self { tables }
    }

    pub fn table(&self, tier: u32) -> Option<&ChanceTable<i32>> {
        self.tables.get(tier.checked_sub(1)? as usize)
    }
}

impl Default for TierAllegianceRanks {
    fn default() -> Self {
        Self::new()
    }
}

impl AllegianceRankTable for TierAllegianceRanks {
    fn roll_rank(&self, tier: u32, rng: &mut dyn RngCore) -> i32 {
        let clamped = tier.clamp(1, MAX_TIER);
        self.table(clamped)
            .and_then(|t| t.roll(rng, 0.0).copied())
            .unwrap_or(1)
    }
}

/// 1.0 at workmanship 1, +0.1 per point up to workmanship 10
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearWorkmanship;

impl WorkmanshipTable for LinearWorkmanship {
    fn modifier(&self, workmanship: i32) -> f32 {
        1.0 + 0.1 * (workmanship.clamp(1, 10) - 1) as f32
    }
}

static DEFAULT_ALLEGIANCE: OnceLock<TierAllegianceRanks> = OnceLock::new();
static DEFAULT_WORKMANSHIP: LinearWorkmanship = LinearWorkmanship;

/// Everything the pipeline reads besides the item and the profile
#[derive(Clone, Copy)]
pub struct LootContext<'a> {
    pub config: &'a LootConfig,
    pub spells: &'a dyn SpellMetadata,
    pub tables: &'a FamilyTables,
    pub allegiance: &'a dyn AllegianceRankTable,
    pub workmanship: &'a dyn WorkmanshipTable,
}

impl<'a> LootContext<'a> {
    pub fn new(
        config: &'a LootConfig,
        spells: &'a dyn SpellMetadata,
        tables: &'a FamilyTables,
        allegiance: &'a dyn AllegianceRankTable,
        workmanship: &'a dyn WorkmanshipTable,
    ) -> Self {
        Self {
            config,
            spells,
            tables,
            allegiance,
            workmanship,
        }
    }

    /// Built-in catalog, shared family tables and default collaborators
    pub fn with_defaults(config: &'a LootConfig) -> Self {
        Self {
            config,
            spells: SpellCatalog::global(),
            tables: FamilyTables::global(),
            allegiance: DEFAULT_ALLEGIANCE.get_or_init(TierAllegianceRanks::new),
            workmanship: &DEFAULT_WORKMANSHIP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn test_allegiance_tables_valid() {
        let ranks = TierAllegianceRanks::new();
        for tier in 1..=MAX_TIER {
            let table = ranks.table(tier).unwrap();
            assert!(ChanceTable::weighted(table.entries().to_vec()).is_ok());
        }
        assert!(ranks.table(0).is_none());
        assert!(ranks.table(9).is_none());
    }

    #[test]
    fn test_allegiance_rank_bounds() {
        let ranks = TierAllegianceRanks::new();
        let mut rng = rng::seeded(6);
        for _ in 0..500 {
            let low = ranks.roll_rank(1, &mut rng);
            assert!((1..=3).contains(&low));
            let high = ranks.roll_rank(8, &mut rng);
            assert!((1..=MAX_ALLEGIANCE_RANK).contains(&high));
        }
    }

    #[test]
    fn test_linear_workmanship() {
        let w = LinearWorkmanship;
        assert!((w.modifier(1) - 1.0).abs() < 1e-6);
        assert!((w.modifier(6) - 1.5).abs() < 1e-6);
        assert!((w.modifier(10) - 1.9).abs() < 1e-6);
        assert!((w.modifier(0) - 1.0).abs() < 1e-6);
        assert!((w.modifier(42) - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_context_defaults() {
        let config = LootConfig::default();
        let ctx = LootContext::with_defaults(&config);
        assert!(ctx.spells.spell(crate::spells::catalog::STRENGTH_SELF).is_some());
        assert!(!ctx.tables.impenetrability().is_empty());
    }
}
