use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examsim_core::model::{AnswerOption, Question};
use examsim_core::scoring::{domain_breakdown, score};
use examsim_core::session::AnswerTracker;

fn make_bank(n: usize) -> Vec<Question> {
    (0..n)
        .map(|id| Question {
            id,
            domain: format!("1.{}", id % 3 + 1),
            task: String::new(),
            reference: String::new(),
            text: format!("Question {id}"),
            options: ['A', 'B', 'C', 'D', 'E']
                .into_iter()
                .map(|letter| AnswerOption {
                    letter,
                    text: letter.to_string(),
                })
                .collect(),
            correct: vec!["A".into(), "C".into()],
            correct_count: 2,
            hint: String::new(),
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    let bank = make_bank(110);
    let mut answers = AnswerTracker::new();
    for q in bank.iter().step_by(2) {
        answers.toggle(q.id, 'A');
        answers.toggle(q.id, 'C');
    }

    group.bench_function("full_exam", |b| {
        b.iter(|| score(black_box(&bank), black_box(&answers)))
    });

    group.bench_function("unanswered", |b| {
        let empty = AnswerTracker::new();
        b.iter(|| score(black_box(&bank), black_box(&empty)))
    });

    group.bench_function("domain_breakdown", |b| {
        b.iter(|| domain_breakdown(black_box(&bank), black_box(&answers)))
    });

    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
