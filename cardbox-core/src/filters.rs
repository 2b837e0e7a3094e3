use crate::{Card, DueStatus};
use chrono::NaiveDate;

pub fn filter_by_author(cards: &[Card], author_id: &str) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.author_id == author_id)
        .cloned()
        .collect()
}

pub fn filter_by_topic(cards: &[Card], topic: &str) -> Vec<Card> {
    let q = topic.trim().to_lowercase();
    cards
        .iter()
        .filter(|c| topic_matches(&c.topic, &q))
        .cloned()
        .collect()
}

pub fn filter_by_due(cards: &[Card], today: NaiveDate, want: DueStatus) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.due_status(today) == want)
        .cloned()
        .collect()
}

pub(crate) fn topic_matches(topic: &str, lowered_query: &str) -> bool {
    topic.trim().to_lowercase() == lowered_query
}
