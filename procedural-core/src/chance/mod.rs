//! Weighted chance tables.
//!
//! A table is an ordered list of `(outcome, weight)` pairs in one of two modes:
//! - Weight: outcome probability = weight / total weight
//! - Chance: each weight is a literal probability threshold, checked in order
//!
//! Declaration order is significant in both modes: it is the cumulative
//! boundary order for weight rolls and the tie-break for chance rolls.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng;

/// How a table interprets its weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanceTableKind {
    Weight,
    Chance,
}

/// Table construction failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChanceTableError {
    #[error("chance table has no entries")]
    Empty,
    #[error("weight table total must be positive, got {0}")]
    NonPositiveTotal(f32),
    #[error("entry {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f32 },
}

/// Ordered outcome table, immutable after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "RawChanceTable<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct ChanceTable<T> {
    kind: ChanceTableKind,
    entries: Vec<(T, f32)>,
    total_weight: f32,
}

/// Serialized form. The total is recomputed on load, never trusted.
#[derive(Deserialize)]
struct RawChanceTable<T> {
    kind: ChanceTableKind,
    entries: Vec<(T, f32)>,
}

impl<T> TryFrom<RawChanceTable<T>> for ChanceTable<T> {
    type Error = ChanceTableError;

    fn try_from(raw: RawChanceTable<T>) -> Result<Self, Self::Error> {
        match raw.kind {
            ChanceTableKind::Weight => Self::weighted(raw.entries),
            ChanceTableKind::Chance => Self::chance(raw.entries),
        }
    }
}

impl<T> ChanceTable<T> {
    /// Build a weight-proportional table
    pub fn weighted(entries: Vec<(T, f32)>) -> Result<Self, ChanceTableError> {
        Self::validate_entries(&entries)?;
        let total_weight: f32 = entries.iter().map(|(_, w)| *w).sum();
        if !(total_weight > 0.0) || !total_weight.is_finite() {
            return Err(ChanceTableError::NonPositiveTotal(total_weight));
        }
        Ok(Self {
            kind: ChanceTableKind::Weight,
            entries,
            total_weight,
        })
    }

    /// Build a chance (independent threshold) table
    pub fn chance(entries: Vec<(T, f32)>) -> Result<Self, ChanceTableError> {
        Self::validate_entries(&entries)?;
        let total_weight = entries.iter().map(|(_, w)| *w).sum();
        Ok(Self {
            kind: ChanceTableKind::Chance,
            entries,
            total_weight,
        })
    }

    /// Built-in tables whose entries are compile-time literals.
    /// Their validity is asserted by the owning module's tests.
    pub(crate) fn from_static(kind: ChanceTableKind, entries: Vec<(T, f32)>) -> Self {
        let total_weight = entries.iter().map(|(_, w)| *w).sum();
        Self {
            kind,
            entries,
            total_weight,
        }
    }

    fn validate_entries(entries: &[(T, f32)]) -> Result<(), ChanceTableError> {
        if entries.is_empty() {
            return Err(ChanceTableError::Empty);
        }
        for (index, (_, weight)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ChanceTableError::InvalidWeight {
                    index,
                    weight: *weight,
                });
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> ChanceTableKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn entries(&self) -> &[(T, f32)] {
        &self.entries
    }

    /// Roll the table.
    ///
    /// Weight tables ignore `quality_mod` and always return an outcome.
    /// Chance tables delegate to [`ChanceTable::roll_interval`].
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R, quality_mod: f32) -> Option<&T> {
        match self.kind {
            ChanceTableKind::Weight => self.pick_weighted(rng.gen::<f32>()),
            ChanceTableKind::Chance => self.roll_interval(rng, quality_mod),
        }
    }

    /// Independent-threshold roll: the draw is uniform in `[0, 1)` scaled by
    /// `1 + quality_mod`, and the first outcome (in declaration order) whose
    /// threshold exceeds it wins.
    pub fn roll_interval<R: Rng + ?Sized>(&self, rng: &mut R, quality_mod: f32) -> Option<&T> {
        let draw = rng::next_interval(rng, quality_mod);
        self.first_over(draw)
    }

    /// Pure function of `seed`: the same seed always yields the same outcome,
    /// independent of any thread generator.
    pub fn roll_deterministic(&self, seed: u64) -> Option<&T> {
        let mut rng = rng::seeded(seed);
        self.roll(&mut rng, 0.0)
    }

    /// Weighted pick for a unit draw in `[0, 1)`
    fn pick_weighted(&self, unit: f32) -> Option<&T> {
        let draw = unit * self.total_weight;
        let mut cumulative = 0.0;
        for (outcome, weight) in &self.entries {
            cumulative += weight;
            if cumulative > draw {
                return Some(outcome);
            }
        }
        // float rounding can push the draw onto the total; take the last live entry
        self.entries
            .iter()
            .rev()
            .find(|(_, weight)| *weight > 0.0)
            .or_else(|| self.entries.last())
            .map(|(outcome, _)| outcome)
    }

    fn first_over(&self, draw: f32) -> Option<&T> {
        self.entries
            .iter()
            .find(|(_, threshold)| draw < *threshold)
            .map(|(outcome, _)| outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn colors() -> ChanceTable<&'static str> {
        ChanceTable::weighted(vec![("red", 1.0), ("green", 2.0), ("blue", 7.0)]).unwrap()
    }

    #[test]
    fn test_weighted_rejects_empty() {
        let result = ChanceTable::<u32>::weighted(vec![]);
        assert_eq!(result.unwrap_err(), ChanceTableError::Empty);
    }

    #[test]
    fn test_weighted_rejects_zero_total() {
        let result = ChanceTable::weighted(vec![(1u32, 0.0), (2, 0.0)]);
        assert!(matches!(result, Err(ChanceTableError::NonPositiveTotal(_))));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let result = ChanceTable::weighted(vec![(1u32, 3.0), (2, -1.0)]);
        assert_eq!(
            result.unwrap_err(),
            ChanceTableError::InvalidWeight {
                index: 1,
                weight: -1.0
            }
        );
    }

    #[test]
    fn test_chance_allows_zero_thresholds() {
        let table = ChanceTable::chance(vec![(1u32, 0.0)]).unwrap();
        let mut rng = rng::seeded(1);
        assert_eq!(table.roll(&mut rng, 0.0), None);
    }

    #[test]
    fn test_pick_weighted_boundaries() {
        let table = colors();
        assert_eq!(table.pick_weighted(0.0), Some(&"red"));
        assert_eq!(table.pick_weighted(0.099), Some(&"red"));
        assert_eq!(table.pick_weighted(0.1), Some(&"green"));
        assert_eq!(table.pick_weighted(0.29), Some(&"green"));
        assert_eq!(table.pick_weighted(0.31), Some(&"blue"));
        assert_eq!(table.pick_weighted(0.9999), Some(&"blue"));
    }

    #[test]
    fn test_weighted_distribution() {
        let table = colors();
        let mut rng = rng::seeded(2024);
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..20_000 {
            *counts.entry(*table.roll(&mut rng, 0.0).unwrap()).or_default() += 1;
        }
        let blue = counts["blue"] as f32 / 20_000.0;
        let red = counts["red"] as f32 / 20_000.0;
        assert!((blue - 0.7).abs() < 0.03, "blue share {}", blue);
        assert!((red - 0.1).abs() < 0.02, "red share {}", red);
    }

    #[test]
    fn test_weighted_ignores_quality() {
        let table = colors();
        let mut a = rng::seeded(8);
        let mut b = rng::seeded(8);
        for _ in 0..100 {
            assert_eq!(table.roll(&mut a, 0.0), table.roll(&mut b, 0.9));
        }
    }

    #[test]
    fn test_interval_first_match_wins() {
        let table = ChanceTable::chance(vec![("rare", 0.1), ("common", 0.9)]).unwrap();
        assert_eq!(table.first_over(0.05), Some(&"rare"));
        assert_eq!(table.first_over(0.5), Some(&"common"));
        assert_eq!(table.first_over(0.95), None);
    }

    #[test]
    fn test_interval_quality_reduces_hits() {
        let table = ChanceTable::chance(vec![(true, 0.5)]).unwrap();
        let mut rng = rng::seeded(77);
        let hits_plain = (0..10_000)
            .filter(|_| table.roll_interval(&mut rng, 0.0).is_some())
            .count();
        let hits_quality = (0..10_000)
            .filter(|_| table.roll_interval(&mut rng, 1.0).is_some())
            .count();
        assert!(
            hits_quality < hits_plain,
            "quality {} vs plain {}",
            hits_quality,
            hits_plain
        );
    }

    #[test]
    fn test_roll_deterministic_repeatable() {
        let table = colors();
        for seed in 0..50u64 {
            let first = table.roll_deterministic(seed);
            for _ in 0..5 {
                assert_eq!(table.roll_deterministic(seed), first);
            }
        }
    }

    #[test]
    fn test_table_serialization() {
        let table = colors();
        let json = serde_json::to_string(&table).unwrap();
        let restored: ChanceTable<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.kind(), ChanceTableKind::Weight);
        assert!((restored.total_weight() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deserialize_recomputes_total() {
        let json = r#"{"kind":"Weight","entries":[["a",1.0],["b",3.0]],"total_weight":999.0}"#;
        let table: ChanceTable<String> = serde_json::from_str(json).unwrap();
        assert!((table.total_weight() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deserialize_rejects_invalid_tables() {
        let empty = r#"{"kind":"Weight","entries":[],"total_weight":0.0}"#;
        assert!(serde_json::from_str::<ChanceTable<u32>>(empty).is_err());
        let zero = r#"{"kind":"Weight","entries":[[1,0.0]],"total_weight":1.0}"#;
        assert!(serde_json::from_str::<ChanceTable<u32>>(zero).is_err());
        let negative = r#"{"kind":"Chance","entries":[[1,-0.5]]}"#;
        assert!(serde_json::from_str::<ChanceTable<u32>>(negative).is_err());
    }

    #[test]
    fn test_pick_weighted_on_empty_entries_is_none() {
        let table: ChanceTable<u32> = ChanceTable::from_static(ChanceTableKind::Weight, vec![]);
        assert_eq!(table.pick_weighted(0.5), None);
        assert_eq!(table.roll_deterministic(3), None);
    }
}
