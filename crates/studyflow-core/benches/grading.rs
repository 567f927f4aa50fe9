use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use studyflow_core::grading::{decide, grade_at, option_views};
use studyflow_core::model::{AnswerValue, Question, QuestionType};
use studyflow_core::statistics::compute_analytics;

fn capitals() -> Question {
    Question::new("mc", QuestionType::MultipleChoice, "Capital of the UK?", "London")
        .with_options(["Paris", "London", "Rome", "Berlin"])
        .with_tags(["geo", "europe"])
}

fn bench_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide");

    let mc = capitals();
    let tf = Question::new("tf", QuestionType::TrueFalse, "?", true);
    let sa = Question::new("sa", QuestionType::ShortAnswer, "?", "Paris");
    let letter = AnswerValue::from("B");
    let boolean = AnswerValue::Bool(false);
    let text = AnswerValue::from("  paris ");

    group.bench_function("multiple_choice", |b| {
        b.iter(|| decide(black_box(&mc), Some(black_box(&letter))))
    });

    group.bench_function("true_false", |b| {
        b.iter(|| decide(black_box(&tf), Some(black_box(&boolean))))
    });

    group.bench_function("short_answer", |b| {
        b.iter(|| decide(black_box(&sa), Some(black_box(&text))))
    });

    group.finish();
}

fn bench_grade_and_review(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_and_review");
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    group.bench_function("grade_at", |b| {
        b.iter(|| {
            let mut q = capitals();
            grade_at(black_box(&mut q), Some("C".into()), now)
        })
    });

    let mut graded = capitals();
    grade_at(&mut graded, Some("B".into()), now).unwrap();
    group.bench_function("option_views", |b| {
        b.iter(|| option_views(black_box(&graded)))
    });

    let batch: Vec<Question> = (0..500)
        .map(|i| {
            let mut q = capitals();
            q.id = format!("q{i}");
            let letter = if i % 2 == 0 { "B" } else { "A" };
            grade_at(&mut q, Some(letter.into()), now).unwrap();
            q
        })
        .collect();
    group.bench_function("analytics_500", |b| {
        b.iter(|| compute_analytics(black_box(&batch), 0))
    });

    group.finish();
}

criterion_group!(benches, bench_decide, bench_grade_and_review);
criterion_main!(benches);
