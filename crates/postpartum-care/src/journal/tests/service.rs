use std::sync::Arc;

use chrono::NaiveDate;

use super::common::*;
use crate::journal::{
    AnalysisRepository, ClassifierStrategy, JournalService, JournalServiceError,
    JournalValidationError, SentimentLabel,
};
use crate::pagination::PageRequest;

#[tokio::test]
async fn keyword_strategy_reports_percent_confidence() {
    let (service, _) = build_service(ClassifierStrategy::Keyword);

    let happy = service
        .analyze(MAYA, "I feel happy and great")
        .await
        .expect("analyzes");
    assert_eq!(happy.label(), SentimentLabel::Positive);
    let view = service.result_view(happy);
    assert_eq!(view.native_confidence, 85.0);
    assert_eq!(view.confidence, 0.85);
    assert!(view.support_contacts.is_empty());

    let sad = service
        .analyze(MAYA, "I feel sad and tired")
        .await
        .expect("analyzes");
    assert_eq!(sad.label(), SentimentLabel::Negative);
    let view = service.result_view(sad);
    assert_eq!(view.native_confidence, 80.0);
    assert_eq!(view.support_contacts.len(), 5);
}

#[tokio::test]
async fn polarity_strategy_uses_unit_scale() {
    let (service, _) = build_service(ClassifierStrategy::Polarity);
    let analysis = service
        .analyze(MAYA, "I feel happy and great")
        .await
        .expect("analyzes");
    assert_eq!(analysis.label(), SentimentLabel::Positive);

    let view = service.result_view(analysis);
    assert!((view.native_confidence - 0.8).abs() < 1e-9);
    assert_eq!(view.word_count, 5);
    assert_eq!(view.reading_time_minutes, 1);
}

#[tokio::test]
async fn classification_is_idempotent() {
    for strategy in [ClassifierStrategy::Polarity, ClassifierStrategy::Keyword] {
        let (service, _) = build_service(strategy);
        let text = "Not feeling great, but the baby smiled at me today";
        let first = service.analyze(MAYA, text).await.expect("first");
        let second = service.analyze(MAYA, text).await.expect("second");
        assert_eq!(first.sentiment, second.sentiment);
        assert_ne!(first.id, second.id);
    }
}

#[tokio::test]
async fn short_entries_are_rejected_before_storage() {
    let (service, repository) = build_service(ClassifierStrategy::Polarity);
    let error = service.analyze(MAYA, "  tired  ").await.expect_err("too short");
    assert!(matches!(
        error,
        JournalServiceError::Validation(JournalValidationError::TooShort { actual: 5, .. })
    ));
    assert!(repository.for_user(MAYA).await.expect("query").is_empty());
}

#[tokio::test]
async fn history_is_newest_first_and_scoped_to_user() {
    let (service, _) = build_service(ClassifierStrategy::Keyword);
    for minute in 0..12 {
        service
            .analyze_at(
                MAYA,
                &format!("entry number {minute} was a really good day"),
                at_minute(minute),
            )
            .await
            .expect("analyzes");
    }
    service
        .analyze_at(NOOR, "someone else's private entry", at_minute(30))
        .await
        .expect("analyzes");

    let first = service
        .history(MAYA, PageRequest::first())
        .await
        .expect("history");
    assert_eq!(first.total, 12);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);
    assert_eq!(first.items[0].text_preview, "entry number 11 was a reall...");

    let second = service
        .history(MAYA, PageRequest::new(2, 10))
        .await
        .expect("history");
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next);

    let beyond = service
        .history(MAYA, PageRequest::new(9, 10))
        .await
        .expect("history");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 12);
}

#[tokio::test]
async fn dashboard_counts_labels_and_keeps_five_recent() {
    let (service, _) = build_service(ClassifierStrategy::Keyword);
    let entries = [
        "I feel happy and great",
        "Such a good morning with joy",
        "I feel sad and tired",
        "The pediatrician visit was at ten",
        "Love this little one so much",
        "Anxious about going back to work",
        "We went for a walk in the park",
    ];
    for (minute, text) in entries.iter().enumerate() {
        service
            .analyze_at(MAYA, text, at_minute(minute as u32))
            .await
            .expect("analyzes");
    }

    let today = NaiveDate::from_ymd_opt(2025, 4, 14).expect("valid date");
    let dashboard = service.dashboard(MAYA, today).await.expect("dashboard");
    assert_eq!(dashboard.total_analyses, 7);
    assert_eq!(dashboard.counts.positive, 3);
    assert_eq!(dashboard.counts.negative, 2);
    assert_eq!(dashboard.counts.neutral, 2);
    assert_eq!(dashboard.recent.len(), 5);
    assert_eq!(dashboard.recent[0].text_preview, "We went for a walk in the park");
    assert_eq!(dashboard.weekly.positive, 30);
    assert_eq!(dashboard.weekly.neutral, 10);
    assert_eq!(dashboard.weekly.negative, 6);
}

#[tokio::test]
async fn repository_failures_surface() {
    let service = JournalService::new(
        Arc::new(UnavailableRepository),
        ClassifierStrategy::Polarity,
    );
    assert!(matches!(
        service.analyze(MAYA, "a perfectly long entry").await,
        Err(JournalServiceError::Repository(_))
    ));
}
