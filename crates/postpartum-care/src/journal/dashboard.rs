use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Analysis, AnalysisSummary};
use super::sentiment::SentimentLabel;
use crate::support::daily_tip_for;

pub const RECENT_ANALYSES: usize = 5;

const POSITIVE_BAR_CAP: usize = 70;
const NEUTRAL_BAR_CAP: usize = 20;
const NEGATIVE_BAR_CAP: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn tally<'a, I>(analyses: I) -> Self
    where
        I: IntoIterator<Item = &'a Analysis>,
    {
        analyses
            .into_iter()
            .fold(Self::default(), |mut counts, analysis| {
                match analysis.label() {
                    SentimentLabel::Positive => counts.positive += 1,
                    SentimentLabel::Neutral => counts.neutral += 1,
                    SentimentLabel::Negative => counts.negative += 1,
                }
                counts
            })
    }
}

/// Bar heights for the weekly mood chart. Each label grows at its own rate up to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyBars {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl From<SentimentCounts> for WeeklyBars {
    fn from(counts: SentimentCounts) -> Self {
        Self {
            positive: (counts.positive * 10).min(POSITIVE_BAR_CAP),
            neutral: (counts.neutral * 5).min(NEUTRAL_BAR_CAP),
            negative: (counts.negative * 3).min(NEGATIVE_BAR_CAP),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalDashboard {
    pub total_analyses: usize,
    pub counts: SentimentCounts,
    pub recent: Vec<AnalysisSummary>,
    pub weekly: WeeklyBars,
    pub daily_tip: &'static str,
}

impl JournalDashboard {
    /// `analyses` must already be newest first.
    pub fn build(analyses: &[Analysis], today: NaiveDate) -> Self {
        let counts = SentimentCounts::tally(analyses);
        Self {
            total_analyses: analyses.len(),
            counts,
            recent: analyses
                .iter()
                .take(RECENT_ANALYSES)
                .map(AnalysisSummary::from)
                .collect(),
            weekly: WeeklyBars::from(counts),
            daily_tip: daily_tip_for(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_bars_cap_per_label() {
        let bars = WeeklyBars::from(SentimentCounts {
            positive: 3,
            neutral: 2,
            negative: 1,
        });
        assert_eq!(
            bars,
            WeeklyBars {
                positive: 30,
                neutral: 10,
                negative: 3
            }
        );

        let capped = WeeklyBars::from(SentimentCounts {
            positive: 9,
            neutral: 9,
            negative: 9,
        });
        assert_eq!(
            capped,
            WeeklyBars {
                positive: 70,
                neutral: 20,
                negative: 10
            }
        );
    }

    #[test]
    fn empty_dashboard_still_has_a_tip() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let dashboard = JournalDashboard::build(&[], today);
        assert_eq!(dashboard.total_analyses, 0);
        assert!(dashboard.recent.is_empty());
        assert_eq!(dashboard.weekly.positive, 0);
        assert_eq!(dashboard.daily_tip, daily_tip_for(today));
    }
}
