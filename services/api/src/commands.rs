use clap::Args;
use postpartum_care::config::AppConfig;
use postpartum_care::error::AppError;
use postpartum_care::journal::{validate_entry, ClassifierStrategy, SentimentClassifier};
use postpartum_care::screening::{
    get_question, score, AnswerSheet, ScreeningOutcome, MAX_TOTAL_SCORE,
};
use postpartum_care::support::emergency_contacts;

use crate::infra::parse_strategy;

#[derive(Args, Debug)]
pub(crate) struct ScreeningScoreArgs {
    /// Ten comma-separated answer values in question order, e.g. 0,1,2,3,0,1,2,3,0,0
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) answers: Vec<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct JournalClassifyArgs {
    /// Text to classify (at least 10 characters)
    #[arg(long)]
    pub(crate) text: String,
    /// Classification strategy: polarity or keyword (defaults to APP_SENTIMENT_STRATEGY or polarity)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<ClassifierStrategy>,
}

pub(crate) fn run_screening_score(args: ScreeningScoreArgs) -> Result<(), AppError> {
    let sheet = AnswerSheet::from_ordered(args.answers)?;
    let outcome = score(&sheet)?;
    render_outcome(&outcome);
    Ok(())
}

fn render_outcome(outcome: &ScreeningOutcome) {
    let category = outcome.category();
    println!("EPDS screening result");
    println!("  Total score: {}/{}", outcome.total_score(), MAX_TOTAL_SCORE);
    println!("  Question 10 score: {}", outcome.q10_score());
    println!("  Category: {} ({})", category.label(), category.as_str());
    println!("\n{}", category.guidance());

    println!("\nAnswers:");
    for (number, value) in outcome.responses() {
        let answer = get_question(u32::from(number))
            .ok()
            .and_then(|question| question.option_for(value))
            .map(|option| option.text)
            .unwrap_or("-");
        println!("  Q{number:>2}: {value} - {answer}");
    }

    if category.is_urgent() {
        println!("\nPlease reach out for support now:");
        for contact in emergency_contacts() {
            println!(
                "  {}: {} ({})",
                contact.name, contact.number, contact.description
            );
        }
    }
}

pub(crate) fn run_journal_classify(args: JournalClassifyArgs) -> Result<(), AppError> {
    let strategy = resolve_strategy(args.strategy)?;

    let text = validate_entry(&args.text)?;
    let sentiment = strategy.classifier().classify(text);
    let native_scale = strategy.native_scale();

    println!("Sentiment: {}", sentiment.label);
    println!("  Strategy: {strategy}");
    println!("  Confidence: {:.2}", sentiment.confidence);
    println!(
        "  Native confidence ({:?}): {}",
        native_scale,
        sentiment.confidence_on(native_scale)
    );
    Ok(())
}

/// An explicit `--strategy` wins; otherwise the configured strategy applies, and a bad
/// `APP_SENTIMENT_STRATEGY` is reported the same way `serve` reports it.
fn resolve_strategy(explicit: Option<ClassifierStrategy>) -> Result<ClassifierStrategy, AppError> {
    match explicit {
        Some(strategy) => Ok(strategy),
        None => Ok(AppConfig::load()?.journal.sentiment_strategy),
    }
}
