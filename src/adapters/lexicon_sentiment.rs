//! Pattern-lexicon sentiment scorer.
//!
//! Each lexicon word carries a polarity, a subjectivity and an intensity.
//! Scoring walks the lower-cased word tokens:
//! - an intensifier directly before a scored word multiplies that word's
//!   polarity and subjectivity by its intensity, and is not scored itself
//! - a negation ("not", "never", "no", "...n't") multiplies the next scored
//!   word's polarity by -0.5
//! - the text's score is the mean over scored words, clamped to
//!   [-1, 1] x [0, 1]; text with no lexicon words scores (0, 0)

use crate::domain::sentiment::Sentiment;
use crate::ports::sentiment_port::SentimentPort;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub polarity: f64,
    pub subjectivity: f64,
    pub intensity: f64,
}

impl Entry {
    const fn new(polarity: f64, subjectivity: f64) -> Self {
        Self {
            polarity,
            subjectivity,
            intensity: 1.0,
        }
    }

    const fn intensifier(polarity: f64, subjectivity: f64, intensity: f64) -> Self {
        Self {
            polarity,
            subjectivity,
            intensity,
        }
    }

    fn is_intensifier(&self) -> bool {
        self.intensity != 1.0
    }
}

const NEGATION_FACTOR: f64 = -0.5;

const NEGATIONS: [&str; 5] = ["not", "never", "no", "nor", "without"];

// (word, polarity, subjectivity); market-news vocabulary
const WORDS: &[(&str, f64, f64)] = &[
    ("impressive", 1.0, 1.0),
    ("excellent", 1.0, 1.0),
    ("outstanding", 0.5, 0.75),
    ("great", 0.8, 0.75),
    ("good", 0.7, 0.6),
    ("strong", 0.433, 0.733),
    ("positive", 0.227, 0.545),
    ("bullish", 0.5, 0.6),
    ("optimistic", 0.5, 0.75),
    ("record", 0.2, 0.3),
    ("new", 0.136, 0.455),
    ("stable", 0.2, 0.4),
    ("significantly", 0.375, 0.875),
    ("rise", 0.2, 0.3),
    ("rises", 0.2, 0.3),
    ("rising", 0.2, 0.3),
    ("gain", 0.2, 0.3),
    ("gains", 0.2, 0.3),
    ("surge", 0.4, 0.5),
    ("surges", 0.4, 0.5),
    ("soars", 0.5, 0.6),
    ("boost", 0.3, 0.4),
    ("boosts", 0.3, 0.4),
    ("beat", 0.3, 0.4),
    ("beats", 0.3, 0.4),
    ("profit", 0.3, 0.4),
    ("profits", 0.3, 0.4),
    ("growth", 0.3, 0.3),
    ("upgrade", 0.4, 0.4),
    ("upgraded", 0.4, 0.4),
    ("bad", -0.7, 0.667),
    ("poor", -0.4, 0.6),
    ("weak", -0.375, 0.625),
    ("terrible", -1.0, 1.0),
    ("negative", -0.3, 0.4),
    ("bearish", -0.5, 0.6),
    ("pessimistic", -0.5, 0.75),
    ("disappointing", -0.6, 0.7),
    ("risky", -0.3, 0.7),
    ("volatile", -0.2, 0.6),
    ("drop", -0.2, 0.3),
    ("drops", -0.2, 0.3),
    ("fall", -0.2, 0.3),
    ("falls", -0.2, 0.3),
    ("decline", -0.2, 0.3),
    ("declines", -0.2, 0.3),
    ("plunge", -0.5, 0.6),
    ("plunges", -0.5, 0.6),
    ("loss", -0.3, 0.4),
    ("losses", -0.3, 0.4),
    ("miss", -0.3, 0.4),
    ("misses", -0.3, 0.4),
    ("downgrade", -0.4, 0.4),
    ("downgraded", -0.4, 0.4),
    ("lawsuit", -0.4, 0.5),
    ("challenges", -0.1, 0.3),
    ("concerns", -0.2, 0.4),
];

// (word, polarity, subjectivity, intensity)
const INTENSIFIERS: &[(&str, f64, f64, f64)] = &[
    ("very", 0.2, 0.3, 1.3),
    ("really", 0.2, 0.2, 1.2),
    ("extremely", 0.0, 0.5, 1.5),
    ("highly", 0.16, 0.54, 1.3),
    ("slightly", -0.167, 0.167, 0.5),
    ("somewhat", 0.0, 0.2, 0.7),
];

pub struct LexiconSentiment {
    lexicon: HashMap<&'static str, Entry>,
}

impl LexiconSentiment {
    pub fn new() -> Self {
        let mut lexicon: HashMap<&'static str, Entry> = WORDS
            .iter()
            .map(|&(w, p, s)| (w, Entry::new(p, s)))
            .collect();
        lexicon.extend(
            INTENSIFIERS
                .iter()
                .map(|&(w, p, s, i)| (w, Entry::intensifier(p, s, i))),
        );
        Self { lexicon }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(|t| t.trim_matches('\'').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn is_negation(token: &str) -> bool {
        NEGATIONS.contains(&token) || token.ends_with("n't")
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentPort for LexiconSentiment {
    fn score(&self, text: &str) -> Sentiment {
        let tokens = Self::tokenize(text);
        let mut scored: Vec<(f64, f64)> = Vec::new();
        let mut negate = false;
        let mut intensity = 1.0;

        for (i, token) in tokens.iter().enumerate() {
            if Self::is_negation(token) {
                negate = true;
                continue;
            }

            let Some(entry) = self.lexicon.get(token.as_str()) else {
                intensity = 1.0;
                continue;
            };

            let next_scored = tokens
                .get(i + 1)
                .is_some_and(|next| self.lexicon.contains_key(next.as_str()));
            if entry.is_intensifier() && next_scored {
                intensity *= entry.intensity;
                continue;
            }

            let mut polarity = entry.polarity * intensity;
            let subjectivity = entry.subjectivity * intensity;
            if negate {
                polarity *= NEGATION_FACTOR;
            }
            scored.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));

            negate = false;
            intensity = 1.0;
        }

        if scored.is_empty() {
            return Sentiment {
                polarity: 0.0,
                subjectivity: 0.0,
            };
        }

        let n = scored.len() as f64;
        Sentiment {
            polarity: scored.iter().map(|(p, _)| p).sum::<f64>() / n,
            subjectivity: scored.iter().map(|(_, s)| s).sum::<f64>() / n,
        }
    }
}
