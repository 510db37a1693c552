use criterion::{black_box, criterion_group, criterion_main, Criterion};

use loot_core::config::LootConfig;
use loot_core::distribution::roll_spell_distribution;
use loot_core::item::{GeneratedItem, ItemType, TreasureItemType, TreasureProfile, TreasureRoll, WeenieType};
use loot_core::magic::{self, LootContext};
use loot_core::rng;
use loot_core::spells::{melee, FamilyTables, SpellCatalog};
use loot_core::survey::{self, SurveyConfig};

fn bench_distribution(c: &mut Criterion) {
    let config = LootConfig::default();
    let profile = TreasureProfile::new(8, 0.2).unwrap();
    let mut rng = rng::seeded(42);

    c.bench_function("roll_spell_distribution_t8", |b| {
        b.iter(|| roll_spell_distribution(black_box(&profile), &config, &mut rng))
    });
}

fn bench_chance_tables(c: &mut Criterion) {
    let profile = TreasureProfile::new(6, 0.0).unwrap();
    let mut rng = rng::seeded(7);

    c.bench_function("roll_melee_proc", |b| {
        b.iter(|| melee::roll_melee_proc(black_box(&profile), &mut rng))
    });

    c.bench_function("pseudo_random_roll_melee_proc", |b| {
        b.iter(|| melee::pseudo_random_roll_melee_proc(black_box(12345)))
    });
}

fn bench_tables(c: &mut Criterion) {
    let catalog = SpellCatalog::builtin();
    c.bench_function("build_family_tables", |b| {
        b.iter(|| FamilyTables::build(black_box(&catalog)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let config = LootConfig::default();
    let ctx = LootContext::with_defaults(&config);
    let profile = TreasureProfile::new(7, 0.0).unwrap();
    let mut rng = rng::seeded(99);

    c.bench_function("assign_legacy_melee", |b| {
        b.iter(|| {
            let mut item = GeneratedItem::new("Sword", WeenieType::MeleeWeapon, ItemType::MeleeWeapon);
            magic::assign_legacy(&ctx, &mut item, &profile, &mut rng);
            item
        })
    });

    c.bench_function("assign_for_roll_armor", |b| {
        b.iter(|| {
            let mut item = GeneratedItem::new("Hauberk", WeenieType::Clothing, ItemType::Armor);
            let mut roll = TreasureRoll::new(TreasureItemType::Armor {
                cloth: false,
                shield: false,
            });
            magic::assign_for_roll(&ctx, &mut item, &profile, &mut roll, &mut rng);
            item
        })
    });
}

fn bench_survey(c: &mut Criterion) {
    let config = LootConfig::default();
    let ctx = LootContext::with_defaults(&config);
    let survey_config = SurveyConfig {
        item_count: 1_000,
        tier: 8,
        ..SurveyConfig::default()
    };

    let mut group = c.benchmark_group("survey");
    group.sample_size(20);
    group.bench_function("survey_1k_t8", |b| {
        b.iter(|| survey::run_survey(&ctx, black_box(&survey_config)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_distribution,
    bench_chance_tables,
    bench_tables,
    bench_pipeline,
    bench_survey,
);
criterion_main!(benches);
