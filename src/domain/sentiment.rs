//! Headline sentiment: canned sample headlines, per-headline scores and the
//! overall polarity label.

use crate::ports::sentiment_port::SentimentPort;
use std::fmt;

/// Scorer output for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// -1.0 (negative) ..= 1.0 (positive)
    pub polarity: f64,
    /// 0.0 (factual) ..= 1.0 (opinion)
    pub subjectivity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineSentiment {
    pub headline: String,
    pub polarity: f64,
    pub subjectivity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSummary {
    pub mean_polarity: f64,
    pub mean_subjectivity: f64,
    pub label: SentimentLabel,
}

impl SentimentSummary {
    /// Means over all headlines. No headlines summarises to a neutral zero.
    pub fn from_scores(scores: &[HeadlineSentiment]) -> Self {
        if scores.is_empty() {
            return Self {
                mean_polarity: 0.0,
                mean_subjectivity: 0.0,
                label: SentimentLabel::Neutral,
            };
        }

        let n = scores.len() as f64;
        let mean_polarity = scores.iter().map(|s| s.polarity).sum::<f64>() / n;
        let mean_subjectivity = scores.iter().map(|s| s.subjectivity).sum::<f64>() / n;

        Self {
            mean_polarity,
            mean_subjectivity,
            label: SentimentLabel::from_polarity(mean_polarity),
        }
    }

    pub fn overall_line(&self) -> String {
        format!(
            "Overall Sentiment: {} (Polarity: {:.2})",
            self.label, self.mean_polarity
        )
    }

    pub fn subjectivity_line(&self) -> String {
        format!(
            "Average Subjectivity: {:.2} (Higher values indicate more opinion-based news)",
            self.mean_subjectivity
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReport {
    pub headlines: Vec<HeadlineSentiment>,
    pub summary: SentimentSummary,
}

/// Static demo headlines; there is no news feed behind them.
pub fn sample_headlines(ticker: &str) -> Vec<String> {
    vec![
        format!("{ticker} reports impressive quarterly earnings, stock rises."),
        format!("Stock prices for {ticker} drop after disappointing earnings report."),
        format!("New product launch by {ticker} boosts stock price significantly."),
        format!("{ticker} faces regulatory challenges, stock declines."),
    ]
}

pub fn score_headlines(scorer: &dyn SentimentPort, headlines: &[String]) -> Vec<HeadlineSentiment> {
    headlines
        .iter()
        .map(|headline| {
            let Sentiment {
                polarity,
                subjectivity,
            } = scorer.score(headline);
            HeadlineSentiment {
                headline: headline.clone(),
                polarity,
                subjectivity,
            }
        })
        .collect()
}

pub fn analyze_headlines(scorer: &dyn SentimentPort, ticker: &str) -> SentimentReport {
    let headlines = score_headlines(scorer, &sample_headlines(ticker));
    let summary = SentimentSummary::from_scores(&headlines);
    SentimentReport { headlines, summary }
}
