//! The `studyflow grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studyflow_core::grading::{feedback, grade};
use studyflow_core::ingest::{load_question_file, update_question_file};
use studyflow_core::model::{AnswerValue, QuestionType};
use studyflow_core::options::true_false_label_value;

pub fn execute(
    questions_path: PathBuf,
    id: String,
    answer: Option<String>,
    save: bool,
) -> Result<()> {
    let batch = load_question_file(&questions_path)?;
    tracing::debug!(
        "loaded {} questions from {}",
        batch.questions.len(),
        questions_path.display()
    );

    let mut question = batch
        .questions
        .into_iter()
        .find(|q| q.id == id)
        .with_context(|| format!("question {id} not found in {}", questions_path.display()))?;

    let answer = answer.map(|text| match question.question_type {
        QuestionType::TrueFalse => {
            true_false_label_value(&text).map_or(AnswerValue::Text(text), AnswerValue::Bool)
        }
        _ => AnswerValue::Text(text),
    });
    let submission = grade(&mut question, answer)?;

    println!("{}", serde_json::to_string(&submission)?);
    if let Some(message) = feedback(&question) {
        eprintln!("{message}");
    }

    if save {
        update_question_file(&questions_path, &question)?;
        eprintln!("Saved: {}", questions_path.display());
    }

    Ok(())
}
