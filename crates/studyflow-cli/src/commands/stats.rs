//! The `studyflow stats` command.

use std::path::PathBuf;

use anyhow::Result;

use studyflow_core::report::StudyReport;
use studyflow_core::statistics::StudyAnalytics;

use crate::config::load_config_from;

pub fn execute(
    questions_path: PathBuf,
    time_spent_ms: u64,
    format: Option<String>,
    studyflow_id: Option<String>,
    save_report: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let format = format.unwrap_or_else(|| config.default_format.clone());
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}', expected text or json"
    );

    let questions = studyflow_core::ingest::load_questions(&questions_path)?
        .into_iter()
        .flat_map(|batch| batch.questions)
        .collect();

    let studyflow_id = studyflow_id.or_else(|| config.studyflow_id.clone());
    let report = StudyReport::new(studyflow_id, questions, time_spent_ms);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report.analytics)?),
        _ => print_summary(&report.analytics),
    }

    if save_report {
        if report.studyflow_id.is_none() {
            tracing::warn!("saving report without a studyflow id");
        }
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        let path = config.output_dir.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(analytics: &StudyAnalytics) {
    use comfy_table::{Cell, Table};

    if !analytics.has_answers() {
        println!(
            "No answered questions yet ({} pending).",
            analytics.total_questions
        );
        return;
    }

    println!(
        "Answered: {}/{}  Correct: {}  Incorrect: {}  Accuracy: {:.1}%",
        analytics.total_answered,
        analytics.total_questions,
        analytics.total_correct,
        analytics.total_incorrect,
        analytics.accuracy()
    );
    if analytics.time_spent_ms > 0 {
        println!("Time spent: {}", analytics.formatted_time());
    }

    let mut table = Table::new();
    table.set_header(vec!["Tag", "Correct", "Incorrect", "Answered", "Score", "Performance"]);

    for indicator in &analytics.indicators {
        table.add_row(vec![
            Cell::new(&indicator.tag),
            Cell::new(indicator.correct_count),
            Cell::new(indicator.incorrect_count),
            Cell::new(indicator.answered_count),
            Cell::new(format!("{:.1}%", indicator.percentage)),
            Cell::new(indicator.performance().label()),
        ]);
    }

    println!("\n{table}");
}
