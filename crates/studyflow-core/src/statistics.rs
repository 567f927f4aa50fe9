//! Per-tag performance analytics over graded questions.
//!
//! Questions with several tags count toward each of them; the overall
//! totals count every answered question exactly once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Correct/answered counters for one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagIndicator {
    pub tag: String,
    pub correct_count: u32,
    pub answered_count: u32,
    /// Share of answered questions graded correct, 0-100.
    pub percentage: f64,
    pub incorrect_count: u32,
}

/// Performance band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl Performance {
    /// Band for a 0-100 percentage: 80, 60 and 40 are the lower bounds.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Excellent
        } else if percentage >= 60.0 {
            Self::Good
        } else if percentage >= 40.0 {
            Self::Fair
        } else {
            Self::NeedsWork
        }
    }

    /// Portuguese display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excelente",
            Self::Good => "Bom",
            Self::Fair => "Regular",
            Self::NeedsWork => "Precisa melhorar",
        }
    }

    /// Display colour. Fair shares the low band's red.
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#4CAF50",
            Self::Good => "#FF9800",
            Self::Fair | Self::NeedsWork => "#f44336",
        }
    }
}

/// Label of the performance band a percentage falls into.
pub fn performance_label(percentage: f64) -> &'static str {
    Performance::from_percentage(percentage).label()
}

impl TagIndicator {
    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage)
    }

    fn new(tag: String, correct_count: u32, answered_count: u32) -> Self {
        let percentage = if answered_count > 0 {
            correct_count as f64 / answered_count as f64 * 100.0
        } else {
            0.0
        };
        Self {
            tag,
            correct_count,
            answered_count,
            percentage,
            incorrect_count: answered_count - correct_count,
        }
    }
}

/// Aggregate analytics for a study flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyAnalytics {
    pub total_questions: u32,
    pub total_answered: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    /// Tag indicators, best performance first.
    pub indicators: Vec<TagIndicator>,
    /// Time spent in milliseconds, as reported by the caller.
    #[serde(default)]
    pub time_spent_ms: u64,
}

impl StudyAnalytics {
    /// Returns `true` if at least one question has been answered.
    pub fn has_answers(&self) -> bool {
        self.total_answered > 0
    }

    /// Overall share of answered questions graded correct, 0-100.
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            return 0.0;
        }
        self.total_correct as f64 / self.total_answered as f64 * 100.0
    }

    pub fn formatted_time(&self) -> String {
        format_time_spent(self.time_spent_ms)
    }
}

/// Compute tag indicators and totals for a list of questions.
pub fn compute_analytics(questions: &[Question], time_spent_ms: u64) -> StudyAnalytics {
    let mut per_tag: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    let mut total_answered = 0u32;
    let mut total_correct = 0u32;

    for q in questions {
        if let Some(correct) = q.verdict() {
            total_answered += 1;
            total_correct += u32::from(correct);
        }
        for tag in &q.tags {
            let entry = per_tag.entry(tag.as_str()).or_default();
            if let Some(correct) = q.verdict() {
                entry.0 += u32::from(correct);
                entry.1 += 1;
            }
        }
    }

    let mut indicators: Vec<TagIndicator> = per_tag
        .into_iter()
        .map(|(tag, (correct, answered))| TagIndicator::new(tag.to_string(), correct, answered))
        .collect();
    // BTreeMap order gives the tag-name tie break; sort_by is stable.
    indicators.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    StudyAnalytics {
        total_questions: questions.len() as u32,
        total_answered,
        total_correct,
        total_incorrect: total_answered - total_correct,
        indicators,
        time_spent_ms,
    }
}

/// Questions still waiting for an answer.
pub fn pending(questions: &[Question]) -> impl Iterator<Item = &Question> {
    questions.iter().filter(|q| !q.answered)
}

/// Questions that carry a verdict.
pub fn answered(questions: &[Question]) -> impl Iterator<Item = &Question> {
    questions.iter().filter(|q| q.answered)
}

/// Returns `true` when no question is left unanswered.
pub fn is_complete(questions: &[Question]) -> bool {
    pending(questions).next().is_none()
}

/// Render milliseconds as `1h 5m`, `3m 20s` or `42s`.
pub fn format_time_spent(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
