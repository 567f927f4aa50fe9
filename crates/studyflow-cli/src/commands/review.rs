//! The `studyflow review` command.

use std::path::PathBuf;

use anyhow::Result;

use studyflow_core::grading::option_views;
use studyflow_core::model::Question;
use studyflow_core::statistics::answered;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let batches = studyflow_core::ingest::load_questions(&questions_path)?;

    let mut shown = 0usize;
    for batch in &batches {
        for question in answered(&batch.questions) {
            print_question(question);
            shown += 1;
        }
    }

    if shown == 0 {
        println!("No answered questions yet.");
    }

    Ok(())
}

fn print_question(question: &Question) {
    let verdict = if question.is_correct {
        "CORRECT"
    } else {
        "INCORRECT"
    };
    println!(
        "[{verdict}] {} ({}) {}",
        question.id,
        question.question_type.label(),
        question.prompt
    );

    let views = option_views(question);
    if views.is_empty() {
        let user = question
            .user_answer
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("    your answer: {user}");
        println!("    expected:    {}", question.expected_answer);
    } else {
        for view in views {
            let mut markers = Vec::new();
            if view.selected {
                markers.push("your answer");
            }
            if view.correct {
                markers.push("correct");
            }
            let suffix = if markers.is_empty() {
                String::new()
            } else {
                format!("  <- {}", markers.join(", "))
            };
            println!("    {}. {}{suffix}", view.letter, view.text);
        }
    }

    if !question.tags.is_empty() {
        println!("    tags: {}", question.tags.join(", "));
    }
    if let Some(at) = question.last_reviewed_at {
        println!("    reviewed: {}", at.format("%Y-%m-%d %H:%M"));
    }
    println!();
}
