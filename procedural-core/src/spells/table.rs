//! Tiered spell tables.
//!
//! One row per base spell, one column per tier (or cantrip grade). Rows whose
//! progression cannot be resolved are left out of the selectable set, so any
//! row index below [`SpellTable::row_count`] is always safe to read.

use serde::Serialize;

use super::{SpellId, SpellLevelProgression};

/// A base spell together with its resolved tier variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellRow {
    pub base: SpellId,
    pub levels: Vec<SpellId>,
}

/// Why a base spell did not make it into a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowFailure {
    MissingProgression,
    WrongWidth { expected: usize, found: usize },
}

/// Fixed rows x columns spell table for one family
#[derive(Debug, Clone, Serialize)]
pub struct SpellTable {
    name: String,
    width: usize,
    rows: Vec<SpellRow>,
    creature_life: Vec<SpellId>,
    failed: Vec<(SpellId, RowFailure)>,
}

impl SpellTable {
    /// Build a table from `bases`.
    ///
    /// Every base must resolve to exactly `width` tier variants; the ones that
    /// don't are logged and omitted. `exclusions` only affects the
    /// [`creature_life`](Self::creature_life) list.
    pub fn build(
        name: &str,
        bases: &[SpellId],
        exclusions: &[SpellId],
        progression: &dyn SpellLevelProgression,
        width: usize,
    ) -> Self {
        let mut rows = Vec::with_capacity(bases.len());
        let mut failed = Vec::new();

        for &base in bases {
            match progression.spell_levels(base) {
                Some(levels) if levels.len() == width => rows.push(SpellRow {
                    base,
                    levels: levels.to_vec(),
                }),
                Some(levels) => {
                    tracing::error!(
                        table = name,
                        spell = %base,
                        expected = width,
                        found = levels.len(),
                        "spell progression has wrong tier count, row omitted"
                    );
                    failed.push((
                        base,
                        RowFailure::WrongWidth {
                            expected: width,
                            found: levels.len(),
                        },
                    ));
                }
                None => {
                    tracing::error!(
                        table = name,
                        spell = %base,
                        "spell progression missing, row omitted"
                    );
                    failed.push((base, RowFailure::MissingProgression));
                }
            }
        }

        let creature_life = rows
            .iter()
            .map(|r| r.base)
            .filter(|b| !exclusions.contains(b))
            .collect();

        tracing::debug!(table = name, rows = rows.len(), failed = failed.len(), "spell table built");

        Self {
            name: name.to_string(),
            width,
            rows,
            creature_life,
            failed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of selectable rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SpellRow] {
        &self.rows
    }

    /// Spell at `(row, col)`, both 0-based
    pub fn get(&self, row: usize, col: usize) -> Option<SpellId> {
        self.rows.get(row).and_then(|r| r.levels.get(col)).copied()
    }

    /// True if any cell of the table holds `spell`
    pub fn contains(&self, spell: SpellId) -> bool {
        self.rows.iter().any(|r| r.levels.contains(&spell))
    }

    /// Bases of the built rows minus the family exclusion set
    pub fn creature_life(&self) -> &[SpellId] {
        &self.creature_life
    }

    /// Bases that were dropped at build time
    pub fn failed_bases(&self) -> &[(SpellId, RowFailure)] {
        &self.failed
    }
}
