use crate::{BoxPolicy, Card, CoreError};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Only ever writes `next_review_date` on the borrowed cards.
pub struct Scheduler<'a> {
    cards: &'a mut [Card],
    policy: BoxPolicy,
}

impl<'a> Scheduler<'a> {
    pub fn new(cards: &'a mut [Card]) -> Self {
        Self {
            cards,
            policy: BoxPolicy::default(),
        }
    }

    pub fn with_policy(cards: &'a mut [Card], policy: BoxPolicy) -> Result<Self, CoreError> {
        policy.validate()?;
        Ok(Self { cards, policy })
    }

    pub fn policy(&self) -> &BoxPolicy {
        &self.policy
    }

    pub fn cards(&self) -> &[Card] {
        &*self.cards
    }

    pub fn compute_score(&self, card: &Card) -> i64 {
        self.policy.weights.score(&card.flags)
    }

    pub fn determine_box(&self, card: &Card) -> usize {
        self.policy.box_for_score(self.compute_score(card))
    }

    pub fn least_scored_box(&self) -> usize {
        self.policy.last_box()
    }

    pub fn calculate_next_review_date(&self, card: &Card) -> DateTime<Utc> {
        self.calculate_next_review_date_at(card, Utc::now())
    }

    pub fn calculate_next_review_date_at(&self, card: &Card, now: DateTime<Utc>) -> DateTime<Utc> {
        next_review_at(&self.policy, card, now)
    }

    pub fn schedule_cards(&mut self) -> &[Card] {
        self.schedule_cards_at(Utc::now())
    }

    pub fn schedule_cards_at(&mut self, now: DateTime<Utc>) -> &[Card] {
        let policy = &self.policy;
        for card in self.cards.iter_mut() {
            let next = next_review_at(policy, card, now);
            trace!(card = %card.id, %next, "stamped next review");
            card.next_review_date = Some(next);
        }
        debug!(count = self.cards.len(), "scheduled cards");
        &*self.cards
    }

    pub fn pick_cards(&self) -> Vec<&Card> {
        self.pick_cards_on(Utc::now().date_naive())
    }

    pub fn pick_cards_on(&self, today: NaiveDate) -> Vec<&Card> {
        let due = self.due_cards_on(today);
        if due.is_empty() {
            debug!(%today, "nothing due, falling back to least-scored box");
            return self.pick_from_least_scored_box();
        }
        due
    }

    pub fn due_cards_on(&self, today: NaiveDate) -> Vec<&Card> {
        let mut groups: BTreeMap<DateTime<Utc>, Vec<&Card>> = BTreeMap::new();
        for card in self.cards.iter() {
            if let Some(at) = card.next_review_date {
                if at.date_naive() <= today {
                    groups.entry(at).or_default().push(card);
                }
            }
        }
        debug!(%today, groups = groups.len(), "grouped due cards");
        groups.into_values().flatten().collect()
    }

    /// Oldest first; cards without a creation time lead.
    pub fn pick_from_least_scored_box(&self) -> Vec<&Card> {
        let worst = self.least_scored_box();
        let mut picked: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| self.determine_box(c) == worst)
            .collect();
        picked.sort_by_key(|c| c.timestamp);
        debug!(count = picked.len(), worst, "picked from least-scored box");
        picked
    }
}

fn next_review_at(policy: &BoxPolicy, card: &Card, now: DateTime<Utc>) -> DateTime<Utc> {
    let days = policy.interval_for_box(policy.box_for_score(policy.weights.score(&card.flags)));
    now + Duration::days(days)
}
