use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

pub type CardId = Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Right,
    Wrong,
    #[serde(alias = "hints", alias = "hint_used")]
    Hint,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Right, Outcome::Wrong, Outcome::Hint];

    pub fn as_key(&self) -> &'static str {
        match self {
            Outcome::Right => "right",
            Outcome::Wrong => "wrong",
            Outcome::Hint => "hints",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(Outcome::Right),
            "wrong" => Ok(Outcome::Wrong),
            "hints" | "hint_used" | "hint" => Ok(Outcome::Hint),
            _ => Err(CoreError::Invalid("unknown outcome kind")),
        }
    }
}

// `hint_used` and `hints` both count as hints.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Flags {
    pub right: u32,
    pub wrong: u32,
    pub hints: u32,
}

impl Flags {
    pub fn new(right: u32, wrong: u32, hints: u32) -> Self {
        Self { right, wrong, hints }
    }

    pub fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Right => self.right,
            Outcome::Wrong => self.wrong,
            Outcome::Hint => self.hints,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.add(outcome, 1);
    }

    fn add(&mut self, outcome: Outcome, n: u32) {
        let slot = match outcome {
            Outcome::Right => &mut self.right,
            Outcome::Wrong => &mut self.wrong,
            Outcome::Hint => &mut self.hints,
        };
        *slot = slot.saturating_add(n);
    }
}

impl From<BTreeMap<String, u32>> for Flags {
    fn from(map: BTreeMap<String, u32>) -> Self {
        let mut flags = Flags::default();
        for (key, count) in map {
            if let Ok(outcome) = key.parse::<Outcome>() {
                flags.add(outcome, count);
            }
        }
        flags
    }
}

impl From<Flags> for BTreeMap<String, u32> {
    fn from(flags: Flags) -> Self {
        Outcome::ALL
            .iter()
            .map(|o| (o.as_key().to_string(), flags.count(*o)))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Unscheduled,
    Due,
    Upcoming,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub author_id: String,
    pub topic: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(
        author_id: impl Into<String>,
        topic: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author_id.into(),
            topic: topic.into(),
            question: question.into(),
            answer: answer.into(),
            hint: None,
            timestamp: Some(Utc::now()),
            flags: Flags::default(),
            next_review_date: None,
        }
    }

    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.next_review_date
            .map(|d| d.date_naive() <= today)
            .unwrap_or(false)
    }

    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        match self.next_review_date {
            None => DueStatus::Unscheduled,
            Some(_) if self.is_due_on(today) => DueStatus::Due,
            Some(_) => DueStatus::Upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_either_hint_key() {
        let a: Flags = serde_json::from_str(r#"{"right": 2, "hints": 3}"#).unwrap();
        let b: Flags = serde_json::from_str(r#"{"right": 2, "hint_used": 3}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Flags::new(2, 0, 3));
    }

    #[test]
    fn flags_sum_both_hint_keys_and_ignore_unknown() {
        let f: Flags =
            serde_json::from_str(r#"{"hints": 1, "hint_used": 2, "skipped": 9}"#).unwrap();
        assert_eq!(f, Flags::new(0, 0, 3));
    }

    #[test]
    fn flags_serialize_canonical_keys() {
        let v = serde_json::to_value(Flags::new(1, 2, 3)).unwrap();
        assert_eq!(v, serde_json::json!({"right": 1, "wrong": 2, "hints": 3}));
    }

    #[test]
    fn card_without_flags_or_dates_deserializes() {
        let raw = serde_json::json!({
            "id": Uuid::new_v4(),
            "author_id": "ana",
            "topic": "rust",
            "question": "q",
            "answer": "a"
        });
        let card: Card = serde_json::from_value(raw).unwrap();
        assert_eq!(card.flags, Flags::default());
        assert!(card.timestamp.is_none());
        assert!(card.next_review_date.is_none());
    }

    #[test]
    fn outcome_parse() {
        assert_eq!("Right".parse::<Outcome>(), Ok(Outcome::Right));
        assert_eq!("hint_used".parse::<Outcome>(), Ok(Outcome::Hint));
        assert!("maybe".parse::<Outcome>().is_err());
    }
}
