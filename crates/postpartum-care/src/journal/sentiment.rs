use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::lexicon::PolarityAnalyzer;

/// Polarity above this is positive, below its negation negative.
pub const POLARITY_THRESHOLD: f64 = 0.2;

const NEGATIVE_KEYWORDS: [&str; 6] = ["hate", "not feeling", "sad", "depressed", "anxious", "tired"];
const POSITIVE_KEYWORDS: [&str; 6] = ["happy", "good", "great", "excited", "joy", "love"];

const KEYWORD_POSITIVE_CONFIDENCE: f64 = 0.85;
const KEYWORD_NEGATIVE_CONFIDENCE: f64 = 0.80;
const KEYWORD_NEUTRAL_CONFIDENCE: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classifier verdict. `confidence` is always on the unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, confidence }
    }

    pub fn confidence_on(&self, scale: ConfidenceScale) -> f64 {
        scale.express(self.confidence)
    }
}

/// How a strategy natively reports confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceScale {
    Unit,
    Percent,
}

impl ConfidenceScale {
    pub fn express(self, unit_confidence: f64) -> f64 {
        match self {
            Self::Unit => unit_confidence,
            Self::Percent => (unit_confidence * 1000.0).round() / 10.0,
        }
    }
}

/// Selectable classification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStrategy {
    Polarity,
    Keyword,
}

impl ClassifierStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "polarity" => Some(Self::Polarity),
            "keyword" => Some(Self::Keyword),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polarity => "polarity",
            Self::Keyword => "keyword",
        }
    }

    pub const fn native_scale(self) -> ConfidenceScale {
        match self {
            Self::Polarity => ConfidenceScale::Unit,
            Self::Keyword => ConfidenceScale::Percent,
        }
    }

    pub fn classifier(self) -> Arc<dyn SentimentClassifier> {
        match self {
            Self::Polarity => Arc::new(PolarityClassifier::default()),
            Self::Keyword => Arc::new(KeywordClassifier),
        }
    }
}

impl fmt::Display for ClassifierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps free text to a sentiment. Implementations must be pure: equal input, equal output.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;

    fn strategy(&self) -> ClassifierStrategy;
}

/// Lexicon polarity in [-1, 1], thresholded at ±0.2; confidence is `|polarity|`, or
/// `1 - |polarity|` for neutral text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityClassifier {
    analyzer: PolarityAnalyzer,
}

impl PolarityClassifier {
    pub fn label_polarity(polarity: f64) -> Sentiment {
        let magnitude = polarity.abs();
        if polarity > POLARITY_THRESHOLD {
            Sentiment::new(SentimentLabel::Positive, magnitude)
        } else if polarity < -POLARITY_THRESHOLD {
            Sentiment::new(SentimentLabel::Negative, magnitude)
        } else {
            Sentiment::new(SentimentLabel::Neutral, 1.0 - magnitude)
        }
    }
}

impl SentimentClassifier for PolarityClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        Self::label_polarity(self.analyzer.polarity(text))
    }

    fn strategy(&self) -> ClassifierStrategy {
        ClassifierStrategy::Polarity
    }
}

/// Counts which fixed keywords appear in the lower-cased text; the larger set wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    fn matches(text: &str, keywords: &[&str]) -> usize {
        keywords
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .count()
    }
}

impl SentimentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let positive = Self::matches(&lowered, &POSITIVE_KEYWORDS);
        let negative = Self::matches(&lowered, &NEGATIVE_KEYWORDS);

        if negative > positive {
            Sentiment::new(SentimentLabel::Negative, KEYWORD_NEGATIVE_CONFIDENCE)
        } else if positive > negative {
            Sentiment::new(SentimentLabel::Positive, KEYWORD_POSITIVE_CONFIDENCE)
        } else {
            Sentiment::new(SentimentLabel::Neutral, KEYWORD_NEUTRAL_CONFIDENCE)
        }
    }

    fn strategy(&self) -> ClassifierStrategy {
        ClassifierStrategy::Keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parse_is_case_insensitive() {
        assert_eq!(
            ClassifierStrategy::parse(" Keyword "),
            Some(ClassifierStrategy::Keyword)
        );
        assert_eq!(
            ClassifierStrategy::parse("POLARITY"),
            Some(ClassifierStrategy::Polarity)
        );
        assert_eq!(ClassifierStrategy::parse("vader"), None);
    }

    #[test]
    fn polarity_thresholds_are_exclusive() {
        assert_eq!(
            PolarityClassifier::label_polarity(0.2).label,
            SentimentLabel::Neutral
        );
        assert_eq!(
            PolarityClassifier::label_polarity(-0.2).label,
            SentimentLabel::Neutral
        );
        assert_eq!(
            PolarityClassifier::label_polarity(0.21).label,
            SentimentLabel::Positive
        );

        let neutral = PolarityClassifier::label_polarity(0.0);
        assert_eq!(neutral.confidence, 1.0);
        let negative = PolarityClassifier::label_polarity(-0.75);
        assert_eq!(negative.label, SentimentLabel::Negative);
        assert_eq!(negative.confidence, 0.75);
    }

    #[test]
    fn keyword_ties_are_neutral() {
        let sentiment = KeywordClassifier.classify("Happy but tired");
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
        assert_eq!(sentiment.confidence_on(ConfidenceScale::Percent), 70.0);
    }

    #[test]
    fn keyword_counts_each_word_once() {
        let sentiment = KeywordClassifier.classify("sad sad sad but happy and good");
        assert_eq!(sentiment.label, SentimentLabel::Positive);
    }

    #[test]
    fn percent_scale_rounds_to_one_decimal() {
        assert_eq!(ConfidenceScale::Percent.express(0.8), 80.0);
        assert_eq!(ConfidenceScale::Percent.express(0.12345), 12.3);
        assert_eq!(ConfidenceScale::Unit.express(0.5), 0.5);
    }

    #[test]
    fn labels_serialize_lowercase_and_display_capitalized() {
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Negative).expect("serialize"),
            "\"negative\""
        );
        assert_eq!(SentimentLabel::Negative.to_string(), "Negative");
        assert_eq!(
            SentimentLabel::parse(SentimentLabel::Neutral.as_str()),
            Some(SentimentLabel::Neutral)
        );
        assert_eq!(SentimentLabel::parse("Neutral"), None);
    }
}
