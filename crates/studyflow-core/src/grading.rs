//! Grading decisions and answer highlighting.
//!
//! All text comparisons are canonical: surrounding whitespace and letter
//! case are ignored. Every function here is pure except [`grade`] and
//! [`grade_at`], which record the verdict on the question they are given.

use chrono::{DateTime, Utc};

use crate::error::GradeError;
use crate::ingest::normalize_answer;
use crate::model::{AnswerValue, GradeSubmission, Question, QuestionType};
use crate::options::{letter_of, option_for_letter, TRUE_FALSE_OPTIONS};

const CORRECT_FEEDBACK: &str = "Correto! Muito bem!";

/// Canonical comparison form of a piece of text.
pub fn canonical(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Canonical equality of two strings.
pub fn same_answer(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

/// Check that `answer` counts as a response for this question type.
///
/// True/false accepts any present value, including `false`. Every other
/// type needs text that is non-empty after trimming.
pub fn validate_answer(
    question: &Question,
    answer: Option<&AnswerValue>,
) -> Result<(), GradeError> {
    let missing = match (question.question_type, answer) {
        (_, None) => true,
        (QuestionType::TrueFalse, Some(_)) => false,
        (_, Some(value)) => value.is_blank(),
    };

    if missing {
        return Err(GradeError::MissingAnswer {
            question_id: question.id.clone(),
        });
    }
    Ok(())
}

/// Decide correctness of `answer` against the question's expected answer.
///
/// Does not validate or mutate anything. An absent answer is never correct.
/// A multiple-choice letter that names no option is incorrect even when the
/// expected answer is empty; it is not compared as empty selected text.
pub fn decide(question: &Question, answer: Option<&AnswerValue>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match question.question_type {
        QuestionType::MultipleChoice => {
            let letter = match answer {
                AnswerValue::Text(s) => s.as_str(),
                AnswerValue::Bool(_) => "",
            };
            // An unresolvable letter is "no selection", which is never correct.
            match option_for_letter(&question.options, letter) {
                Some(selected) => same_answer(selected, &question.expected_answer.as_text()),
                None => false,
            }
        }
        QuestionType::TrueFalse => answer.as_bool() == question.expected_answer.as_bool(),
        QuestionType::ShortAnswer | QuestionType::FillInTheBlank => {
            same_answer(&answer.as_text(), &question.expected_answer.as_text())
        }
    }
}

/// Decide correctness of the answer currently stored on the question.
pub fn evaluate(question: &Question) -> bool {
    decide(question, question.user_answer.as_ref())
}

/// Grade a submission, stamping the review time with the current clock.
pub fn grade(
    question: &mut Question,
    answer: Option<AnswerValue>,
) -> Result<GradeSubmission, GradeError> {
    grade_at(question, answer, Utc::now())
}

/// Grade a submission and record the verdict on `question`.
///
/// String `"true"`/`"false"` answers are coerced to booleans first, and
/// true/false answers are always stored as booleans. On rejection the
/// question is left unmodified.
pub fn grade_at(
    question: &mut Question,
    answer: Option<AnswerValue>,
    now: DateTime<Utc>,
) -> Result<GradeSubmission, GradeError> {
    if question.answered {
        return Err(GradeError::AlreadyAnswered {
            question_id: question.id.clone(),
        });
    }

    let answer = match answer.map(normalize_answer) {
        Some(value) => {
            validate_answer(question, Some(&value))?;
            value
        }
        None => {
            return Err(GradeError::MissingAnswer {
                question_id: question.id.clone(),
            })
        }
    };
    let answer = match question.question_type {
        QuestionType::TrueFalse => AnswerValue::Bool(answer.as_bool()),
        _ => answer,
    };

    let correct = decide(question, Some(&answer));
    question.user_answer = Some(answer.clone());
    question.is_correct = correct;
    question.answered = true;
    question.last_reviewed_at = Some(now);

    tracing::info!(
        question_id = %question.id,
        question_type = %question.question_type,
        correct,
        "recorded verdict"
    );

    Ok(GradeSubmission {
        id: question.id.clone(),
        user_answer: answer,
        correct,
    })
}

/// User-facing message for a graded question. `None` before grading.
pub fn feedback(question: &Question) -> Option<String> {
    let correct = question.verdict()?;
    if correct {
        Some(CORRECT_FEEDBACK.to_string())
    } else {
        Some(format!(
            "Incorreto. A resposta correta é: {}",
            question.expected_answer
        ))
    }
}

/// The options as they are displayed for this question.
pub fn displayed_options(question: &Question) -> Vec<String> {
    match question.question_type {
        QuestionType::TrueFalse => TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect(),
        QuestionType::MultipleChoice => question.options.clone(),
        QuestionType::ShortAnswer | QuestionType::FillInTheBlank => Vec::new(),
    }
}

/// Whether the displayed option at `index` is the user's selection.
///
/// Multiple choice matches by letter; true/false by branch, where index 0
/// is `true`. Always `false` for free-text types or without an answer.
pub fn is_user_selection(question: &Question, index: usize) -> bool {
    let Some(answer) = &question.user_answer else {
        return false;
    };

    match question.question_type {
        QuestionType::MultipleChoice => match answer {
            AnswerValue::Text(letter) => *letter == letter_of(index).to_string(),
            AnswerValue::Bool(_) => false,
        },
        QuestionType::TrueFalse => index < 2 && answer.as_bool() == (index == 0),
        QuestionType::ShortAnswer | QuestionType::FillInTheBlank => false,
    }
}

/// Whether the displayed option at `index` is the correct one.
pub fn is_correct_option(question: &Question, index: usize) -> bool {
    match question.question_type {
        QuestionType::MultipleChoice => question
            .options
            .get(index)
            .is_some_and(|option| same_answer(option, &question.expected_answer.as_text())),
        QuestionType::TrueFalse => index < 2 && question.expected_answer.as_bool() == (index == 0),
        QuestionType::ShortAnswer | QuestionType::FillInTheBlank => false,
    }
}

/// One rendered option with its highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: char,
    pub text: String,
    pub selected: bool,
    pub correct: bool,
}

/// Build highlight state for every displayed option of a question.
pub fn option_views(question: &Question) -> Vec<OptionView> {
    displayed_options(question)
        .into_iter()
        .enumerate()
        .map(|(index, text)| OptionView {
            letter: letter_of(index),
            text,
            selected: is_user_selection(question, index),
            correct: is_correct_option(question, index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn capitals() -> Question {
        Question::new(
            "mc-1",
            QuestionType::MultipleChoice,
            "Capital of the UK?",
            "London",
        )
        .with_options(["Paris", "London", "Rome"])
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn multiple_choice_correct_letter() {
        let mut q = capitals();
        let dto = grade_at(&mut q, Some("B".into()), fixed_now()).unwrap();
        assert!(dto.correct);
        assert!(q.answered);
        assert!(q.is_correct);
        assert_eq!(q.last_reviewed_at, Some(fixed_now()));
        assert_eq!(q.user_answer, Some(AnswerValue::Text("B".into())));
    }

    #[test]
    fn multiple_choice_wrong_letter() {
        let mut q = capitals();
        let dto = grade_at(&mut q, Some("C".into()), fixed_now()).unwrap();
        assert!(!dto.correct);
        assert!(q.answered);
    }

    #[test]
    fn multiple_choice_out_of_range_letter() {
        let mut q = capitals();
        let dto = grade_at(&mut q, Some("Z".into()), fixed_now()).unwrap();
        assert!(!dto.correct);
        assert!(q.answered);
    }

    #[test]
    fn multiple_choice_out_of_range_with_empty_expected() {
        let mut q = Question::new("mc-2", QuestionType::MultipleChoice, "?", "")
            .with_options(["a"]);
        assert!(!grade_at(&mut q, Some("Q".into()), fixed_now()).unwrap().correct);
    }

    #[test]
    fn multiple_choice_comparison_is_canonical() {
        let mut q = Question::new("mc-3", QuestionType::MultipleChoice, "?", "  london ")
            .with_options(["Paris", "LONDON"]);
        assert!(grade_at(&mut q, Some("B".into()), fixed_now()).unwrap().correct);
    }

    #[test]
    fn true_false_explicit_false_is_graded() {
        let mut q = Question::new("tf-1", QuestionType::TrueFalse, "Sky is green", true);
        let dto = grade_at(&mut q, Some(false.into()), fixed_now()).unwrap();
        assert!(!dto.correct);
        assert!(q.answered);
        assert_eq!(q.user_answer, Some(AnswerValue::Bool(false)));
    }

    #[test]
    fn true_false_absent_is_rejected() {
        let mut q = Question::new("tf-2", QuestionType::TrueFalse, "Sky is blue", true);
        let err = grade_at(&mut q, None, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            GradeError::MissingAnswer {
                question_id: "tf-2".into()
            }
        );
        assert!(!q.answered);
        assert!(q.user_answer.is_none());
        assert!(q.last_reviewed_at.is_none());
    }

    #[test]
    fn true_false_string_answers_become_booleans() {
        let mut q = Question::new("tf-3", QuestionType::TrueFalse, "Water is wet", "true");
        let dto = grade_at(&mut q, Some("True".into()), fixed_now()).unwrap();
        assert!(dto.correct);
        assert_eq!(dto.user_answer, AnswerValue::Bool(true));
    }

    #[test]
    fn short_answer_is_whitespace_and_case_insensitive() {
        let mut q = Question::new("sa-1", QuestionType::ShortAnswer, "Capital of France?", "Paris");
        assert!(grade_at(&mut q, Some("  paris ".into()), fixed_now()).unwrap().correct);
    }

    #[test]
    fn fill_in_blank_empty_is_rejected() {
        let mut q = Question::new("fb-1", QuestionType::FillInTheBlank, "2 + 2 = __", "4");
        let err = grade_at(&mut q, Some("".into()), fixed_now()).unwrap_err();
        assert!(err.is_recoverable());
        let err = grade_at(&mut q, Some("   ".into()), fixed_now()).unwrap_err();
        assert!(matches!(err, GradeError::MissingAnswer { .. }));
        assert!(!q.answered);
    }

    #[test]
    fn regrading_is_refused() {
        let mut q = capitals();
        grade_at(&mut q, Some("C".into()), fixed_now()).unwrap();
        let err = grade_at(&mut q, Some("B".into()), fixed_now()).unwrap_err();
        assert!(matches!(err, GradeError::AlreadyAnswered { .. }));
        assert!(!q.is_correct);
    }

    #[test]
    fn feedback_messages() {
        let mut q = Question::new("sa-2", QuestionType::ShortAnswer, "?", "Paris");
        assert_eq!(feedback(&q), None);
        grade_at(&mut q, Some("Rome".into()), fixed_now()).unwrap();
        assert_eq!(
            feedback(&q).unwrap(),
            "Incorreto. A resposta correta é: Paris"
        );
    }

    #[test]
    fn highlighting_multiple_choice() {
        let mut q = capitals();
        grade_at(&mut q, Some("C".into()), fixed_now()).unwrap();
        let views = option_views(&q);
        assert_eq!(views.len(), 3);
        assert!(views[2].selected);
        assert!(!views[1].selected);
        assert!(views[1].correct);
        assert!(!views[2].correct);
        assert_eq!(views[1].letter, 'B');
    }

    #[test]
    fn highlighting_true_false_branches() {
        let mut q = Question::new("tf-4", QuestionType::TrueFalse, "?", false);
        grade_at(&mut q, Some(true.into()), fixed_now()).unwrap();
        assert!(is_user_selection(&q, 0));
        assert!(!is_user_selection(&q, 1));
        assert!(!is_correct_option(&q, 0));
        assert!(is_correct_option(&q, 1));
        assert!(!is_correct_option(&q, 2));
    }

    #[test]
    fn highlighting_without_answer_selects_nothing() {
        let q = Question::new("tf-5", QuestionType::TrueFalse, "?", true);
        assert!(!is_user_selection(&q, 0));
        assert!(!is_user_selection(&q, 1));
    }

    #[test]
    fn free_text_has_no_options() {
        let q = Question::new("sa-3", QuestionType::ShortAnswer, "?", "x");
        assert!(option_views(&q).is_empty());
        assert!(!is_correct_option(&q, 0));
    }
}
