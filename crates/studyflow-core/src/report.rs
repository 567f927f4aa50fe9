//! Study report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Question;
use crate::statistics::{compute_analytics, StudyAnalytics};

/// A snapshot of a study flow's questions and analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The study flow this report covers, passed in by the caller.
    #[serde(default)]
    pub studyflow_id: Option<String>,
    pub questions: Vec<Question>,
    pub analytics: StudyAnalytics,
}

impl StudyReport {
    /// Build a report from the current state of a question list.
    pub fn new(studyflow_id: Option<String>, questions: Vec<Question>, time_spent_ms: u64) -> Self {
        let analytics = compute_analytics(&questions, time_spent_ms);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            studyflow_id,
            questions,
            analytics,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: StudyReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
