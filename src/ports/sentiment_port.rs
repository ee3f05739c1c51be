//! Text sentiment scoring port.

use crate::domain::sentiment::Sentiment;

pub trait SentimentPort {
    fn score(&self, text: &str) -> Sentiment;
}
