use serde::{Deserialize, Serialize};

use crate::{CoreError, Flags};

pub const BOX_INTERVALS_DAYS: [i64; 5] = [7, 4, 3, 2, 1];
pub const BOX_THRESHOLDS: [i64; 5] = [80, 60, 40, 20, 0];

pub const MAX_INTERVAL_DAYS: i64 = 36_500;
pub const MAX_WEIGHT: i64 = 1_000_000;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoreWeights {
    pub right: i64,
    pub wrong: i64,
    pub hints: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            right: 10,
            wrong: 5,
            hints: 2,
        }
    }
}

impl ScoreWeights {
    pub fn score(&self, flags: &Flags) -> i64 {
        i64::from(flags.right)
            .saturating_mul(self.right)
            .saturating_sub(i64::from(flags.wrong).saturating_mul(self.wrong))
            .saturating_sub(i64::from(flags.hints).saturating_mul(self.hints))
    }

    fn in_range(&self) -> bool {
        [self.right, self.wrong, self.hints]
            .iter()
            .all(|w| (0..=MAX_WEIGHT).contains(w))
    }
}

// Box 0 is the best-scoring tier and gets the longest interval.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BoxPolicy {
    pub intervals_days: Vec<i64>,
    pub thresholds: Vec<i64>,
    pub weights: ScoreWeights,
}

impl Default for BoxPolicy {
    fn default() -> Self {
        Self {
            intervals_days: BOX_INTERVALS_DAYS.to_vec(),
            thresholds: BOX_THRESHOLDS.to_vec(),
            weights: ScoreWeights::default(),
        }
    }
}

impl BoxPolicy {
    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        let policy: BoxPolicy =
            serde_json::from_str(s).map_err(|_| CoreError::Invalid("malformed policy json"))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.thresholds.is_empty() {
            return Err(CoreError::Invalid("policy needs at least one box"));
        }
        if self.thresholds.len() != self.intervals_days.len() {
            return Err(CoreError::Invalid("thresholds and intervals differ in length"));
        }
        if self.thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(CoreError::Invalid("thresholds must be strictly descending"));
        }
        if self.intervals_days.iter().any(|d| *d < 1) {
            return Err(CoreError::Invalid("intervals must be at least one day"));
        }
        if self.intervals_days.iter().any(|d| *d > MAX_INTERVAL_DAYS) {
            return Err(CoreError::Invalid("interval exceeds the maximum"));
        }
        if !self.weights.in_range() {
            return Err(CoreError::Invalid("weights must be between 0 and the maximum"));
        }
        Ok(())
    }

    pub fn box_count(&self) -> usize {
        self.thresholds.len()
    }

    pub fn last_box(&self) -> usize {
        self.box_count().saturating_sub(1)
    }

    /// Scores below every threshold land in the last box.
    pub fn box_for_score(&self, score: i64) -> usize {
        self.thresholds
            .iter()
            .position(|t| score >= *t)
            .unwrap_or_else(|| self.last_box())
    }

    pub fn interval_for_box(&self, index: usize) -> i64 {
        self.intervals_days
            .get(index)
            .or(self.intervals_days.last())
            .copied()
            .unwrap_or(1)
    }
}
