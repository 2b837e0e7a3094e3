use crate::{BoxPolicy, Card, Flags};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Satisfactory,
    NeedsRework,
}

impl Rating {
    pub fn from_score(score: i64) -> Self {
        Self::for_score(score, &BoxPolicy::default())
    }

    /// Bands follow the policy's boxes; the last box is always `NeedsRework`.
    pub fn for_score(score: i64, policy: &BoxPolicy) -> Self {
        let index = policy.box_for_score(score);
        if index == policy.last_box() {
            return Rating::NeedsRework;
        }
        match index {
            0 => Rating::Excellent,
            1 => Rating::Good,
            2 => Rating::Average,
            _ => Rating::Satisfactory,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Satisfactory => "Satisfactory",
            Rating::NeedsRework => "Need to Rework",
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TopicTally {
    pub right: u32,
    pub wrong: u32,
    pub hints: u32,
    pub score: i64,
    pub rating: Rating,
}

impl Default for TopicTally {
    fn default() -> Self {
        Self {
            right: 0,
            wrong: 0,
            hints: 0,
            score: 0,
            rating: Rating::NeedsRework,
        }
    }
}

impl TopicTally {
    fn add(&mut self, flags: &Flags) {
        self.right = self.right.saturating_add(flags.right);
        self.wrong = self.wrong.saturating_add(flags.wrong);
        self.hints = self.hints.saturating_add(flags.hints);
    }

    fn rescore(&mut self, policy: &BoxPolicy) {
        self.score = policy
            .weights
            .score(&Flags::new(self.right, self.wrong, self.hints));
        self.rating = Rating::for_score(self.score, policy);
    }
}

pub fn scoreboard(cards: &[Card], policy: &BoxPolicy) -> BTreeMap<String, TopicTally> {
    let mut board: BTreeMap<String, TopicTally> = BTreeMap::new();
    for c in cards {
        board.entry(c.topic.clone()).or_default().add(&c.flags);
    }
    for tally in board.values_mut() {
        tally.rescore(policy);
    }
    board
}

pub fn topics(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .map(|c| c.topic.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
