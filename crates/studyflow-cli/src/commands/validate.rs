//! The `studyflow validate` command.

use std::path::PathBuf;

use anyhow::Result;

use studyflow_core::statistics::pending;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let batches = studyflow_core::ingest::load_questions(&questions_path)?;

    let mut total_warnings = 0;

    for batch in &batches {
        println!(
            "Question file: {} ({} questions, {} pending)",
            batch.source.display(),
            batch.questions.len(),
            pending(&batch.questions).count()
        );

        let warnings = studyflow_core::ingest::validate_questions(&batch.questions);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
