//! Grade a small quiz programmatically.
//!
//! ```bash
//! cargo run -p studyflow-core --example grade_quiz
//! ```

use std::path::Path;

use studyflow_core::grading::{feedback, grade, option_views};
use studyflow_core::ingest::parse_question_batch_str;
use studyflow_core::model::AnswerValue;
use studyflow_core::statistics::compute_analytics;

const RECORDS: &str = r#"[
  {"id": "q1", "type": "MULTIPLE_CHOICE", "question": "Capital of the UK?",
   "expectedAnswer": "London", "answers": "[Paris, London, Rome]", "tags": "geo"},
  {"id": "q2", "type": "TRUE_FALSE", "question": "Water boils at 100C at sea level.",
   "expectedAnswer": "true", "tags": "physics"},
  {"id": "q3", "type": "SHORT_ANSWER", "question": "Capital of France?",
   "expectedAnswer": "Paris", "tags": "geo"}
]"#;

fn main() -> anyhow::Result<()> {
    let mut questions = parse_question_batch_str(RECORDS, Path::new("inline.json"))?;
    let answers = [
        AnswerValue::from("C"),
        AnswerValue::Bool(true),
        AnswerValue::from("  paris "),
    ];

    for (question, answer) in questions.iter_mut().zip(answers) {
        let submission = grade(question, Some(answer))?;
        println!("{}", serde_json::to_string(&submission)?);
        if let Some(message) = feedback(question) {
            println!("  {message}");
        }
        for view in option_views(question) {
            let marker = match (view.selected, view.correct) {
                (true, true) => "[x] correct",
                (true, false) => "[x]",
                (false, true) => "[ ] correct",
                (false, false) => "[ ]",
            };
            println!("  {}. {} {marker}", view.letter, view.text);
        }
    }

    let analytics = compute_analytics(&questions, 0);
    println!(
        "{}/{} correct ({:.0}%)",
        analytics.total_correct,
        analytics.total_answered,
        analytics.accuracy()
    );

    Ok(())
}
