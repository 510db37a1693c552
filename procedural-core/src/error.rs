//! Crate-level error type for fallible setup APIs.
//!
//! Itemization itself never fails: unrecognized categories and broken table
//! rows are logged and degraded. Only construction of profiles, configs and
//! chance tables reports errors.

use thiserror::Error;

use crate::chance::ChanceTableError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum LootError {
    #[error("treasure tier {0} outside 1..=8")]
    InvalidTier(u32),
    #[error("loot quality modifier {0} outside [0, 1)")]
    InvalidQualityMod(f32),
    #[error("survey has no item categories")]
    EmptySurvey,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ChanceTable(#[from] ChanceTableError),
}

pub type LootResult<T> = Result<T, LootError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LootError::InvalidTier(9).to_string(),
            "treasure tier 9 outside 1..=8"
        );
        let err: LootError = ChanceTableError::Empty.into();
        assert_eq!(err.to_string(), "chance table has no entries");
    }
}
