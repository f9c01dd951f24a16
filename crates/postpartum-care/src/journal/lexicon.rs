/// Word-level polarity scores in [-1, 1].
const POLARITY_LEXICON: &[(&str, f64)] = &[
    ("happy", 0.8),
    ("great", 0.8),
    ("good", 0.7),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("excited", 0.4),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("calm", 0.3),
    ("peaceful", 0.3),
    ("relaxed", 0.4),
    ("rested", 0.4),
    ("grateful", 0.6),
    ("thankful", 0.6),
    ("blessed", 0.6),
    ("proud", 0.8),
    ("hopeful", 0.5),
    ("content", 0.4),
    ("supported", 0.4),
    ("confident", 0.5),
    ("fine", 0.4),
    ("sad", -0.5),
    ("tired", -0.4),
    ("exhausted", -0.6),
    ("depressed", -0.6),
    ("anxious", -0.25),
    ("worried", -0.5),
    ("scared", -0.5),
    ("afraid", -0.6),
    ("lonely", -0.5),
    ("alone", -0.3),
    ("hopeless", -0.8),
    ("worthless", -0.8),
    ("miserable", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("hate", -0.8),
    ("angry", -0.5),
    ("upset", -0.5),
    ("overwhelmed", -0.5),
    ("stressed", -0.5),
    ("guilty", -0.5),
    ("crying", -0.4),
    ("numb", -0.4),
    ("empty", -0.1),
    ("irritable", -0.4),
    ("frustrated", -0.6),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("totally", 1.4),
    ("completely", 1.4),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "cant", "can't", "cannot", "isnt", "isn't", "wasnt",
    "wasn't", "didnt", "didn't", "havent", "haven't", "aren't", "arent",
];

const NEGATION_FACTOR: f64 = -0.5;
const NEGATION_WINDOW: usize = 2;

/// Lexicon-backed polarity scorer.
///
/// Each sentiment word contributes its lexicon score, scaled by a directly preceding
/// intensifier and flipped (at half strength) by a negation up to two words back, not
/// counting the intensifier. The text polarity is the mean of the contributions, or 0.0 when no word carries sentiment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityAnalyzer;

impl PolarityAnalyzer {
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut contributions = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let Some(mut score) = lookup(POLARITY_LEXICON, token) else {
                continue;
            };

            let mut window = NEGATION_WINDOW;
            let previous = index.checked_sub(1).map(|i| tokens[i].as_str());
            if let Some(multiplier) = previous.and_then(|word| lookup(INTENSIFIERS, word)) {
                score *= multiplier;
                window += 1;
            }

            let start = index.saturating_sub(window);
            if tokens[start..index].iter().any(|word| is_negation(word)) {
                score *= NEGATION_FACTOR;
            }

            contributions.push(score.clamp(-1.0, 1.0));
        }

        if contributions.is_empty() {
            return 0.0;
        }

        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|token| !token.is_empty())
        .map(|token| token.trim_matches('\'').to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|(_, value)| *value)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn averages_sentiment_words() {
        let analyzer = PolarityAnalyzer;
        approx(analyzer.polarity("I feel happy and great"), 0.8);
        approx(analyzer.polarity("I feel sad and tired"), -0.45);
    }

    #[test]
    fn no_sentiment_words_is_zero() {
        approx(PolarityAnalyzer.polarity("The baby slept from nine until two"), 0.0);
    }

    #[test]
    fn negation_flips_at_half_strength() {
        approx(PolarityAnalyzer.polarity("I am not happy today"), -0.4);
        approx(PolarityAnalyzer.polarity("I don't feel good"), -0.35);
    }

    #[test]
    fn intensifiers_scale_and_clamp() {
        approx(PolarityAnalyzer.polarity("so very sad"), -0.65);
        approx(PolarityAnalyzer.polarity("extremely wonderful"), 1.0);
        approx(PolarityAnalyzer.polarity("not very happy"), -0.52);
    }

    #[test]
    fn tokenizer_ignores_case_and_punctuation() {
        assert_eq!(
            tokenize("HAPPY, 'really' tired!!"),
            vec!["happy", "really", "tired"]
        );
    }
}
