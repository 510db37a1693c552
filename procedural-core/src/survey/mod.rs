//! Monte-Carlo Itemization Survey
//!
//! Itemizes a large batch of items for one tier and summarizes what came
//! out: how many spells items carry, how often each cantrip grade shows up,
//! how many items fell back to mundane, and the spellcraft/difficulty spread.
//! Uses rayon for parallel execution across CPU cores.
//!
//! Every item gets its own generator seeded from `derive_seed(base_seed, i)`,
//! so a report depends only on its config, never on thread scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::distribution::SpellDistribution;
use crate::error::{LootError, LootResult};
use crate::item::{
    GeneratedItem, ItemType, TreasureItemKind, TreasureItemType, TreasureProfile, TreasureRoll,
    WeenieType,
};
use crate::magic::{self, LegacyStrategy, LootContext, RollStrategy};
use crate::rng;

/// Spellbook sizes above this land in the last histogram bucket
pub const HISTOGRAM_BUCKETS: usize = 16;

/// Item template the survey itemizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyCategory {
    MeleeWeapon,
    MissileWeapon,
    Caster,
    Armor,
    ClothArmor,
    Shield,
    Jewelry,
    Crown,
    Clothing,
}

impl SurveyCategory {
    pub fn all() -> [SurveyCategory; 9] {
        [
            SurveyCategory::MeleeWeapon,
            SurveyCategory::MissileWeapon,
            SurveyCategory::Caster,
            SurveyCategory::Armor,
            SurveyCategory::ClothArmor,
            SurveyCategory::Shield,
            SurveyCategory::Jewelry,
            SurveyCategory::Crown,
            SurveyCategory::Clothing,
        ]
    }

    /// Fresh item and treasure roll for this category
    pub fn template(self) -> (GeneratedItem, TreasureRoll) {
        let armor = |cloth, shield| TreasureItemType::Armor { cloth, shield };
        match self {
            SurveyCategory::MeleeWeapon => (
                GeneratedItem::new("Longsword", WeenieType::MeleeWeapon, ItemType::MeleeWeapon),
                TreasureRoll::new(TreasureItemType::MeleeWeapon),
            ),
            SurveyCategory::MissileWeapon => (
                GeneratedItem::new("Longbow", WeenieType::MissileLauncher, ItemType::MissileWeapon),
                TreasureRoll::new(TreasureItemType::MissileWeapon),
            ),
            SurveyCategory::Caster => (
                GeneratedItem::new("Orb", WeenieType::Caster, ItemType::Caster),
                TreasureRoll::new(TreasureItemType::Caster),
            ),
            SurveyCategory::Armor => (
                GeneratedItem::new("Chainmail Hauberk", WeenieType::Clothing, ItemType::Armor),
                TreasureRoll::new(armor(false, false)),
            ),
            SurveyCategory::ClothArmor => (
                GeneratedItem::new("Robe", WeenieType::Clothing, ItemType::Armor),
                TreasureRoll::new(armor(true, false)),
            ),
            SurveyCategory::Shield => {
                let mut item = GeneratedItem::new("Kite Shield", WeenieType::Generic, ItemType::Armor);
                item.is_shield = true;
                (item, TreasureRoll::new(armor(false, true)))
            }
            SurveyCategory::Jewelry => (
                GeneratedItem::new("Necklace", WeenieType::Generic, ItemType::Jewelry),
                TreasureRoll::new(TreasureItemType::Jewelry),
            ),
            SurveyCategory::Crown => (
                GeneratedItem::new("Crown", WeenieType::Generic, ItemType::Jewelry),
                TreasureRoll::new(TreasureItemType::Jewelry).with_kind(TreasureItemKind::Crown),
            ),
            SurveyCategory::Clothing => (
                GeneratedItem::new("Shirt", WeenieType::Clothing, ItemType::Clothing),
                TreasureRoll::new(TreasureItemType::Clothing),
            ),
        }
    }
}

/// Which pipeline entry point the survey drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurveyMode {
    Legacy,
    #[default]
    TreasureRoll,
}

/// Configuration for a survey run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub tier: u32,
    pub quality_mod: f32,
    pub item_count: u64,
    pub base_seed: u64,
    pub mode: SurveyMode,
    /// Cycled in order; item `i` uses `categories[i % len]`
    pub categories: Vec<SurveyCategory>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            tier: 5,
            quality_mod: 0.0,
            item_count: 10_000,
            base_seed: 42,
            mode: SurveyMode::default(),
            categories: SurveyCategory::all().to_vec(),
        }
    }
}

/// Cantrip grade totals across the whole survey
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CantripTotals {
    pub minor: u64,
    pub major: u64,
    pub epic: u64,
    pub legendary: u64,
}

/// Aggregated survey results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    pub tier: u32,
    pub mode: SurveyMode,
    pub total_items: u64,
    /// Items the pipeline refused (no family for the category)
    pub skipped_items: u64,
    /// `spell_count_histogram[n]` = items with `n` spellbook entries
    pub spell_count_histogram: Vec<u64>,
    pub cantrips: CantripTotals,
    pub mundane_items: u64,
    pub avg_spells: f32,
    pub avg_spellcraft: f32,
    pub max_spellcraft: i32,
    pub avg_difficulty: f32,
    pub armor_items: u64,
    pub armor_with_impenetrability: u64,
    pub restricted_items: u64,
}

impl SurveyReport {
    /// Share of armor items carrying an Impenetrability spell (1.0 when none rolled)
    pub fn impenetrability_coverage(&self) -> f32 {
        if self.armor_items == 0 {
            1.0
        } else {
            self.armor_with_impenetrability as f32 / self.armor_items as f32
        }
    }
}

/// What happened to one surveyed item
#[derive(Debug, Clone, Copy)]
struct ItemOutcome {
    assigned: bool,
    spells: usize,
    distribution: SpellDistribution,
    mundane: bool,
    spellcraft: Option<i32>,
    difficulty: Option<i32>,
    armor: bool,
    impenetrable: bool,
    restricted: bool,
}

fn itemize_one(
    ctx: &LootContext<'_>,
    profile: &TreasureProfile,
    category: SurveyCategory,
    mode: SurveyMode,
    seed: u64,
) -> ItemOutcome {
    let mut rng = rng::seeded(seed);
    let (mut item, mut roll) = category.template();
    let armor = roll.is_armor();

    let report = match mode {
        SurveyMode::Legacy => {
            magic::assign_magic_with_report(ctx, &mut item, profile, &mut LegacyStrategy, &mut rng)
        }
        SurveyMode::TreasureRoll => magic::assign_magic_with_report(
            ctx,
            &mut item,
            profile,
            &mut RollStrategy::new(&mut roll),
            &mut rng,
        ),
    };

    let impenetrable = ctx
        .tables
        .impenetrability()
        .iter()
        .any(|spell| item.spellbook.contains(*spell));

    ItemOutcome {
        assigned: report.is_some(),
        spells: item.spellbook.len(),
        distribution: report.map(|r| r.distribution).unwrap_or_default(),
        mundane: report.map(|r| r.mundane).unwrap_or(false),
        spellcraft: item.item_spellcraft,
        difficulty: item.item_difficulty,
        armor,
        impenetrable,
        restricted: report
            .and_then(|r| r.restrictions)
            .map(|r| r.any())
            .unwrap_or(false),
    }
}

/// Run a survey with rayon parallelism
pub fn run_survey(ctx: &LootContext<'_>, config: &SurveyConfig) -> LootResult<SurveyReport> {
    let profile = TreasureProfile::new(config.tier, config.quality_mod)?;
    if config.categories.is_empty() {
        return Err(LootError::EmptySurvey);
    }

    let _span = crate::logging::TimingSpan::new("run_survey");
    let categories = &config.categories;

    let outcomes: Vec<ItemOutcome> = (0..config.item_count)
        .into_par_iter()
        .map(|i| {
            let category = categories[(i % categories.len() as u64) as usize];
            let seed = rng::derive_seed(config.base_seed, i);
            itemize_one(ctx, &profile, category, config.mode, seed)
        })
        .collect();

    let report = summarize(config, &outcomes);
    tracing::info!(
        tier = report.tier,
        items = report.total_items,
        mundane = report.mundane_items,
        avg_spells = report.avg_spells,
        "survey complete"
    );
    Ok(report)
}

/// Fold per-item outcomes into a report
fn summarize(config: &SurveyConfig, outcomes: &[ItemOutcome]) -> SurveyReport {
    let mut histogram = vec![0u64; HISTOGRAM_BUCKETS + 1];
    let mut cantrips = CantripTotals::default();
    let mut skipped = 0;
    let mut mundane = 0;
    let mut armor_items = 0;
    let mut armor_with_impenetrability = 0;
    let mut restricted = 0;
    let mut spell_sum = 0u64;
    let mut spellcraft_sum = 0i64;
    let mut spellcraft_count = 0u64;
    let mut max_spellcraft = 0;
    let mut difficulty_sum = 0i64;
    let mut difficulty_count = 0u64;

    for outcome in outcomes {
        if !outcome.assigned {
            skipped += 1;
            continue;
        }
        histogram[outcome.spells.min(HISTOGRAM_BUCKETS)] += 1;
        spell_sum += outcome.spells as u64;

        let d = &outcome.distribution;
        cantrips.minor += d.minor as u64;
        cantrips.major += d.major as u64;
        cantrips.epic += d.epic as u64;
        cantrips.legendary += d.legendary as u64;

        if outcome.mundane {
            mundane += 1;
        }
        if outcome.armor {
            armor_items += 1;
            if outcome.impenetrable {
                armor_with_impenetrability += 1;
            }
        }
        if outcome.restricted {
            restricted += 1;
        }
        if let Some(sc) = outcome.spellcraft {
            spellcraft_sum += sc as i64;
            spellcraft_count += 1;
            max_spellcraft = max_spellcraft.max(sc);
        }
        if let Some(diff) = outcome.difficulty {
            difficulty_sum += diff as i64;
            difficulty_count += 1;
        }
    }

    let assigned = outcomes.len() as u64 - skipped;
    let mean = |sum: f64, n: u64| if n == 0 { 0.0 } else { (sum / n as f64) as f32 };

    SurveyReport {
        tier: config.tier,
        mode: config.mode,
        total_items: outcomes.len() as u64,
        skipped_items: skipped,
        spell_count_histogram: histogram,
        cantrips,
        mundane_items: mundane,
        avg_spells: mean(spell_sum as f64, assigned),
        avg_spellcraft: mean(spellcraft_sum as f64, spellcraft_count),
        max_spellcraft,
        avg_difficulty: mean(difficulty_sum as f64, difficulty_count),
        armor_items,
        armor_with_impenetrability,
        restricted_items: restricted,
    }
}
