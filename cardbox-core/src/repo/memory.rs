use crate::{Card, CardId, CardQuery, CoreError, Outcome, Scheduler};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::debug;

// Each call holds the lock for its whole read-modify-write.
#[derive(Default)]
pub struct MemoryRepo {
    cards: RwLock<Vec<Card>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: RwLock::new(cards),
        }
    }
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn add_card(&self, card: Card) -> Result<Card, CoreError> {
        let mut v = self.cards.write();
        if v.iter().any(|c| c.id == card.id) {
            return Err(CoreError::Conflict("card id already exists"));
        }
        v.push(card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        self.cards
            .read()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(CoreError::NotFound("card"))
    }

    async fn list_cards(&self, query: &CardQuery) -> Result<Vec<Card>, CoreError> {
        Ok(self
            .cards
            .read()
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    async fn update_card(&self, card: &Card) -> Result<Card, CoreError> {
        let mut v = self.cards.write();
        let Some(slot) = v.iter_mut().find(|c| c.id == card.id) else {
            return Err(CoreError::NotFound("card"));
        };
        *slot = card.clone();
        Ok(card.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        let mut v = self.cards.write();
        let before = v.len();
        v.retain(|c| c.id != id);
        if v.len() == before {
            return Err(CoreError::NotFound("card"));
        }
        Ok(())
    }

    async fn topics(&self, author_id: Option<&str>) -> Result<Vec<String>, CoreError> {
        let v = self.cards.read();
        let set: BTreeSet<String> = v
            .iter()
            .filter(|c| author_id.map(|a| c.author_id == a).unwrap_or(true))
            .map(|c| c.topic.clone())
            .collect();
        Ok(set.into_iter().collect())
    }

    async fn record_outcome(&self, id: CardId, outcome: Outcome) -> Result<Card, CoreError> {
        let mut v = self.cards.write();
        let Some(card) = v.iter_mut().find(|c| c.id == id) else {
            return Err(CoreError::NotFound("card"));
        };
        card.flags.record(outcome);
        debug!(card = %id, %outcome, count = card.flags.count(outcome), "recorded outcome");
        Ok(card.clone())
    }

    async fn save_schedule(&self, cards: &[Card]) -> Result<usize, CoreError> {
        let mut v = self.cards.write();
        let mut stored = 0;
        for incoming in cards {
            if let Some(card) = v.iter_mut().find(|c| c.id == incoming.id) {
                card.next_review_date = incoming.next_review_date;
                stored += 1;
            }
        }
        Ok(stored)
    }

    async fn reschedule(&self, query: &CardQuery) -> Result<Vec<Card>, CoreError> {
        let mut v = self.cards.write();
        let mut subset: Vec<Card> = v.iter().filter(|c| query.matches(c)).cloned().collect();
        Scheduler::new(&mut subset).schedule_cards();
        for (card, stamped) in v.iter_mut().filter(|c| query.matches(c)).zip(&subset) {
            card.next_review_date = stamped.next_review_date;
        }
        debug!(count = subset.len(), "rescheduled stored cards");
        Ok(subset)
    }
}
