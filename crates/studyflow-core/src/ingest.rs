//! Question record ingestion.
//!
//! Turns loosely-typed question records (as served by the study-flow
//! backend) into canonical [`Question`] values, and loads batches of them
//! from JSON files and directories. Unexpected shapes are defaulted with a
//! warning; only unreadable files and non-JSON content are errors.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::grading::evaluate;
use crate::model::{AnswerValue, Question, QuestionType};
use crate::options::{parse_options, split_tags, value_to_text, RawOptions};

/// One question record as it arrives from the backend.
///
/// Every field is optional and untyped; [`normalize`] decides what each
/// shape means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestionRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type")]
    pub question_type: Value,
    #[serde(default)]
    pub expected_answer: Value,
    #[serde(default)]
    pub answers: Value,
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub answered: Value,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub last_reviewed_at: Value,
    #[serde(default)]
    pub user_answer: Value,
    #[serde(default)]
    pub is_correct: Value,
    #[serde(default)]
    pub correct: Value,
}

/// Coerce the exact strings `"true"` and `"false"` to booleans.
///
/// Anything else, including `"True"`, keeps its representation.
pub fn normalize_answer(value: AnswerValue) -> AnswerValue {
    match value {
        AnswerValue::Text(s) if s == "true" => AnswerValue::Bool(true),
        AnswerValue::Text(s) if s == "false" => AnswerValue::Bool(false),
        other => other,
    }
}

/// Read an answer from an untyped field. `null` means no answer.
pub fn answer_from_value(value: &Value) -> Option<AnswerValue> {
    let answer = match value {
        Value::Null => return None,
        Value::Bool(b) => AnswerValue::Bool(*b),
        Value::String(s) => AnswerValue::Text(s.clone()),
        other => AnswerValue::Text(value_to_text(other)),
    };
    Some(normalize_answer(answer))
}

/// Normalize one raw record into a canonical question.
pub fn normalize(record: &RawQuestionRecord) -> Question {
    let id = text_field(&record.id);
    let question_type = question_type_field(&id, &record.question_type);

    let raw_options = match &record.answers {
        Value::Null => RawOptions::Text("[]".to_string()),
        Value::String(s) => RawOptions::Text(s.clone()),
        Value::Array(items) => RawOptions::List(items.iter().map(value_to_text).collect()),
        other => {
            tracing::warn!(question_id = %id, "ignoring options of unexpected shape: {other}");
            RawOptions::List(Vec::new())
        }
    };
    let options = parse_options(&raw_options, question_type);

    let mut expected_answer =
        answer_from_value(&record.expected_answer).unwrap_or(AnswerValue::Text(String::new()));
    let mut user_answer = answer_from_value(&record.user_answer);
    if question_type == QuestionType::TrueFalse {
        expected_answer = AnswerValue::Bool(expected_answer.as_bool());
        user_answer = user_answer.map(|a| AnswerValue::Bool(a.as_bool()));
    }

    let answered = matches!(record.answered, Value::Bool(true));

    let mut question = Question {
        id,
        question_type,
        prompt: text_field(&record.question),
        options,
        expected_answer,
        user_answer,
        answered,
        is_correct: false,
        tags: tags_field(&record.tags),
        last_reviewed_at: timestamp_field(&record.last_reviewed_at),
    };

    if answered {
        question.is_correct = stored_verdict(&record.is_correct)
            .or_else(|| stored_verdict(&record.correct))
            .unwrap_or_else(|| evaluate(&question));
    }

    question
}

fn text_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_to_text(other),
    }
}

fn question_type_field(id: &str, value: &Value) -> QuestionType {
    match value.as_str().map(str::parse::<QuestionType>) {
        Some(Ok(t)) => t,
        Some(Err(e)) => {
            tracing::warn!(question_id = %id, "{e}, treating as SHORT_ANSWER");
            QuestionType::ShortAnswer
        }
        None => {
            tracing::warn!(question_id = %id, "missing question type, treating as SHORT_ANSWER");
            QuestionType::ShortAnswer
        }
    }
}

fn tags_field(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_tags(s),
        Value::Array(items) => items
            .iter()
            .map(|v| value_to_text(v).trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn stored_verdict(value: &Value) -> Option<bool> {
    match answer_from_value(value)? {
        AnswerValue::Bool(b) => Some(b),
        AnswerValue::Text(_) => None,
    }
}

fn timestamp_field(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let parsed = parse_timestamp(s);
            if parsed.is_none() {
                tracing::warn!("unparseable lastReviewedAt: {s:?}");
            }
            parsed
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Parse an RFC 3339 timestamp, or a zone-less one taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Questions loaded from one source file.
#[derive(Debug, Clone)]
pub struct QuestionBatch {
    pub source: PathBuf,
    pub questions: Vec<Question>,
}

/// Parse a JSON array of question records.
///
/// Elements that are not objects are skipped with a warning so one bad
/// record does not abort the batch.
pub fn parse_question_batch_str(content: &str, source_path: &Path) -> Result<Vec<Question>> {
    let parsed: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let Value::Array(records) = parsed else {
        anyhow::bail!(
            "expected a JSON array of questions: {}",
            source_path.display()
        );
    };

    let mut questions = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawQuestionRecord>(record) {
            Ok(raw) => questions.push(normalize(&raw)),
            Err(e) => {
                tracing::warn!(
                    "skipping record #{position} in {}: {e}",
                    source_path.display()
                );
            }
        }
    }

    Ok(questions)
}

/// Load a single JSON question file.
pub fn load_question_file(path: &Path) -> Result<QuestionBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    Ok(QuestionBatch {
        source: path.to_path_buf(),
        questions: parse_question_batch_str(&content, path)?,
    })
}

/// Recursively load all `.json` question files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionBatch>> {
    let mut batches = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            batches.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load_question_file(&path) {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(batches)
}

/// Load a question file, or every question file under a directory.
pub fn load_questions(path: &Path) -> Result<Vec<QuestionBatch>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![load_question_file(path)?])
    }
}

/// Write questions back out in canonical form.
///
/// The output is itself a valid input for [`load_question_file`].
pub fn save_question_file(path: &Path, questions: &[Question]) -> Result<()> {
    let json = serde_json::to_string_pretty(questions).context("failed to serialize questions")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write questions to {}", path.display()))?;
    Ok(())
}

/// Replace the record for `question` in an existing question file.
///
/// Only the first object whose `id` matches is touched: its canonical
/// fields are overwritten and unknown fields kept. Every other element,
/// including records the loader skips or defaults, is written back as it
/// was read. Fails if no record matches.
pub fn update_question_file(path: &Path, question: &Question) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))?;
    let Value::Array(mut records) = parsed else {
        anyhow::bail!("expected a JSON array of questions: {}", path.display());
    };

    let slot = records
        .iter_mut()
        .find(|record| {
            record
                .get("id")
                .is_some_and(|id| text_field(id) == question.id)
        })
        .with_context(|| {
            format!(
                "question {} not found in {}",
                question.id,
                path.display()
            )
        })?;
    let updated = serde_json::to_value(question).context("failed to serialize question")?;
    match updated {
        Value::Object(canonical) if slot.is_object() => {
            if let Some(fields) = slot.as_object_mut() {
                fields.extend(canonical);
            }
        }
        other => *slot = other,
    }

    let json = serde_json::to_string_pretty(&records).context("failed to serialize questions")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write questions to {}", path.display()))?;
    Ok(())
}

/// A warning from question batch validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a batch for data problems that grading will silently absorb.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for q in questions {
        let warn = |message: String| ValidationWarning {
            question_id: (!q.id.is_empty()).then(|| q.id.clone()),
            message,
        };

        if q.id.is_empty() {
            warnings.push(warn("question has no id".into()));
        } else if !seen_ids.insert(q.id.as_str()) {
            warnings.push(warn(format!("duplicate question ID: {}", q.id)));
        }

        if q.prompt.trim().is_empty() {
            warnings.push(warn("prompt is empty".into()));
        }

        if q.question_type == QuestionType::MultipleChoice {
            if q.options.is_empty() {
                warnings.push(warn("multiple choice question has no options".into()));
            } else {
                let expected = q.expected_answer.as_text();
                if !q
                    .options
                    .iter()
                    .any(|o| crate::grading::same_answer(o, &expected))
                {
                    warnings.push(warn(format!(
                        "expected answer {expected:?} is not among the options"
                    )));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawQuestionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn string_booleans_normalized() {
        assert_eq!(normalize_answer("true".into()), AnswerValue::Bool(true));
        assert_eq!(normalize_answer("false".into()), AnswerValue::Bool(false));
        assert_eq!(normalize_answer("True".into()), AnswerValue::Text("True".into()));
        assert_eq!(normalize_answer(true.into()), AnswerValue::Bool(true));
    }

    #[test]
    fn true_false_record() {
        let q = normalize(&record(json!({
            "id": "tf-1",
            "type": "TRUE_FALSE",
            "expectedAnswer": "false",
            "answers": "[\"Sim\", \"Nao\"]",
            "question": "The sun is cold",
            "answered": false,
            "tags": "physics, stars"
        })));
        assert_eq!(q.expected_answer, AnswerValue::Bool(false));
        assert_eq!(q.options, vec!["Verdadeiro", "Falso"]);
        assert_eq!(q.tags, vec!["physics", "stars"]);
        assert!(q.user_answer.is_none());
        assert!(!q.answered);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let q = normalize(&record(json!({"type": "SHORT_ANSWER"})));
        assert_eq!(q.id, "");
        assert_eq!(q.prompt, "");
        assert_eq!(q.expected_answer, AnswerValue::Text(String::new()));
        assert!(q.options.is_empty());
        assert!(q.tags.is_empty());
        assert!(!q.answered);
        assert!(q.last_reviewed_at.is_none());
    }

    #[test]
    fn unknown_type_falls_back_to_short_answer() {
        let q = normalize(&record(json!({"id": "x", "type": "ESSAY"})));
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
        let q = normalize(&record(json!({"id": "y"})));
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
    }

    #[test]
    fn server_list_string_options() {
        let q = normalize(&record(json!({
            "id": 42,
            "type": "MULTIPLE_CHOICE",
            "expectedAnswer": "London",
            "answers": "[Paris, London, Rome]"
        })));
        assert_eq!(q.id, "42");
        assert_eq!(q.options, vec!["Paris", "London", "Rome"]);
    }

    #[test]
    fn answered_record_prefers_stored_verdict() {
        let q = normalize(&record(json!({
            "id": "mc",
            "type": "MULTIPLE_CHOICE",
            "expectedAnswer": "London",
            "answers": ["Paris", "London"],
            "answered": true,
            "userAnswer": "A",
            "correct": true
        })));
        assert!(q.is_correct);

        let q = normalize(&record(json!({
            "id": "mc",
            "type": "MULTIPLE_CHOICE",
            "expectedAnswer": "London",
            "answers": ["Paris", "London"],
            "answered": true,
            "userAnswer": "A",
            "isCorrect": false,
            "correct": true
        })));
        assert!(!q.is_correct);
    }

    #[test]
    fn answered_record_without_verdict_is_recomputed() {
        let q = normalize(&record(json!({
            "id": "tf",
            "type": "TRUE_FALSE",
            "expectedAnswer": "true",
            "answered": true,
            "userAnswer": "true"
        })));
        assert_eq!(q.user_answer, Some(AnswerValue::Bool(true)));
        assert!(q.is_correct);

        let q = normalize(&record(json!({
            "id": "sa",
            "type": "SHORT_ANSWER",
            "expectedAnswer": "Paris",
            "answered": true
        })));
        assert!(!q.is_correct);
    }

    #[test]
    fn unanswered_record_ignores_verdict_fields() {
        let q = normalize(&record(json!({
            "id": "sa",
            "type": "SHORT_ANSWER",
            "expectedAnswer": "Paris",
            "correct": true
        })));
        assert!(!q.is_correct);
        assert_eq!(q.verdict(), None);
    }

    #[test]
    fn timestamps() {
        let rfc = parse_timestamp("2025-03-01T12:00:00Z").unwrap();
        let naive = parse_timestamp("2025-03-01T12:00:00.000").unwrap();
        assert_eq!(rfc, naive);
        assert!(parse_timestamp("yesterday").is_none());

        let q = normalize(&record(json!({"id": "t", "lastReviewedAt": "not a date"})));
        assert!(q.last_reviewed_at.is_none());
    }

    #[test]
    fn batch_skips_non_object_records() {
        let content = r#"[{"id": "a", "type": "SHORT_ANSWER"}, 7, {"id": "b"}]"#;
        let qs = parse_question_batch_str(content, Path::new("batch.json")).unwrap();
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[1].id, "b");
    }

    #[test]
    fn batch_rejects_non_array() {
        assert!(parse_question_batch_str("{}", Path::new("x.json")).is_err());
        assert!(parse_question_batch_str("not json", Path::new("x.json")).is_err());
    }

    #[test]
    fn save_and_reload_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut q = Question::new("q1", QuestionType::TrueFalse, "Is it?", true);
        q.tags = vec!["logic".into()];
        let path = dir.path().join("nested").join("set.json");
        save_question_file(&path, &[q.clone()]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let batches = load_questions(dir.path()).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].questions[0].id, "q1");
        assert_eq!(batches[0].questions[0].expected_answer, AnswerValue::Bool(true));
        assert_eq!(batches[0].questions[0].tags, vec!["logic"]);
    }

    #[test]
    fn update_rewrites_only_the_matching_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        std::fs::write(
            &path,
            r#"[{"id": "mc", "type": "MULTIPLE_CHOICE", "expectedAnswer": "B",
                 "answers": "[A, B]", "studyflowId": "s1"},
                "legacy-row",
                {"id": "essay", "type": "ESSAY", "studyflowId": "s1"}]"#,
        )
        .unwrap();

        let mut q = load_question_file(&path).unwrap().questions.remove(0);
        q.answered = true;
        q.user_answer = Some("B".into());
        q.is_correct = true;
        update_question_file(&path, &q).unwrap();

        let records: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["answered"], true);
        assert_eq!(records[0]["userAnswer"], "B");
        assert_eq!(records[0]["studyflowId"], "s1");
        assert_eq!(records[1], "legacy-row");
        assert_eq!(records[2]["type"], "ESSAY");
        assert_eq!(records[2]["studyflowId"], "s1");

        let missing = Question::new("nope", QuestionType::ShortAnswer, "?", "x");
        assert!(update_question_file(&path, &missing).is_err());
    }

    #[test]
    fn validation_warnings() {
        let qs = vec![
            Question::new("dup", QuestionType::ShortAnswer, "One", "a"),
            Question::new("dup", QuestionType::ShortAnswer, "  ", "a"),
            Question::new("mc", QuestionType::MultipleChoice, "Pick", "Z").with_options(["A", "B"]),
            Question::new("mc-empty", QuestionType::MultipleChoice, "Pick", "A"),
        ];
        let warnings = validate_questions(&qs);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("prompt is empty")));
        assert!(warnings.iter().any(|w| w.message.contains("not among the options")));
        assert!(warnings.iter().any(|w| w.message.contains("no options")));
    }
}
