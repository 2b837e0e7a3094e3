use crate::{Card, CardId, CoreError, Outcome, Scheduler};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryRepo;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub author_id: Option<String>,
    /// Matched case-insensitively.
    pub topic: Option<String>,
}

impl CardQuery {
    pub fn author(author_id: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
            topic: None,
        }
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn matches(&self, card: &Card) -> bool {
        let author_ok = self
            .author_id
            .as_deref()
            .map(|a| card.author_id == a)
            .unwrap_or(true);
        let topic_ok = self
            .topic
            .as_deref()
            .map(|t| crate::filters::topic_matches(&card.topic, &t.trim().to_lowercase()))
            .unwrap_or(true);
        author_ok && topic_ok
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    // Cards
    async fn add_card(&self, card: Card) -> Result<Card, CoreError>;
    async fn get_card(&self, id: CardId) -> Result<Card, CoreError>;
    /// Matching cards in insertion order.
    async fn list_cards(&self, query: &CardQuery) -> Result<Vec<Card>, CoreError>;
    async fn update_card(&self, card: &Card) -> Result<Card, CoreError>;
    async fn delete_card(&self, id: CardId) -> Result<(), CoreError>;
    async fn topics(&self, author_id: Option<&str>) -> Result<Vec<String>, CoreError>;

    // Review bookkeeping
    async fn record_outcome(&self, id: CardId, outcome: Outcome) -> Result<Card, CoreError>;
    /// Writes back `next_review_date` for every known card; returns how many were stored.
    async fn save_schedule(&self, cards: &[Card]) -> Result<usize, CoreError>;
    /// Stamps every card matching `query` from its stored flags, atomically
    /// with respect to `record_outcome`.
    async fn reschedule(&self, query: &CardQuery) -> Result<Vec<Card>, CoreError>;
}

pub async fn pick_for<R: Repository + ?Sized>(
    repo: &R,
    query: &CardQuery,
) -> Result<Vec<Card>, CoreError> {
    let mut cards = repo.list_cards(query).await?;
    let picked: Vec<Card> = Scheduler::new(&mut cards)
        .pick_cards()
        .into_iter()
        .cloned()
        .collect();
    Ok(picked)
}
