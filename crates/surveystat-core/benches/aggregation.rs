use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use serde_json::json;
use surveystat_core::model::{Answer, Question, QuestionType, ResponseRecord, SurveyDefinition};
use surveystat_core::statistics::{compute_statistics, compute_statistics_from_raw};

fn make_survey() -> SurveyDefinition {
    SurveyDefinition::new("bench", "Benchmark")
        .with_question(
            Question::new("rating", "Rate us", QuestionType::Rating).required(true),
        )
        .with_question(
            Question::new("channels", "Where did you hear about us?", QuestionType::MultiChoice)
                .with_options(["web", "friend", "ad", "event"]),
        )
        .with_question(Question::new("comment", "Anything else?", QuestionType::FreeText))
}

fn make_responses(n: usize) -> Vec<ResponseRecord> {
    let channels = ["web", "friend", "ad", "event"];
    (0..n)
        .map(|i| {
            let mut r = ResponseRecord::new("bench")
                .with_answer("rating", (i % 5 + 1) as i64)
                .with_answer(
                    "channels",
                    Answer::multi([channels[i % 4], channels[(i + 1) % 4]]),
                );
            if i % 3 == 0 {
                r = r.with_answer("comment", format!("comment {}", i % 50));
            }
            if i % 2 == 0 {
                r = r.with_completion_time((i % 120) as f64);
            }
            r
        })
        .collect()
}

fn bench_compute_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_statistics");
    let survey = make_survey();

    for n in [10usize, 1_000, 10_000] {
        let responses = make_responses(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &responses, |b, responses| {
            b.iter(|| compute_statistics(black_box(&survey), black_box(responses)))
        });
    }

    group.finish();
}

fn bench_from_raw(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_statistics_from_raw");
    let survey = make_survey();
    let raw: Vec<serde_json::Value> = (0..1_000)
        .map(|i| {
            json!({
                "id": format!("r{i}"),
                "surveyId": "bench",
                "answers": {"rating": i % 5 + 1, "channels": ["web", "ad"]},
                "completionTime": i % 90
            })
        })
        .collect();

    group.bench_function("1000", |b| {
        b.iter(|| compute_statistics_from_raw(black_box(&survey), black_box(&raw)))
    });

    group.finish();
}

criterion_group!(benches, bench_compute_statistics, bench_from_raw);
criterion_main!(benches);
