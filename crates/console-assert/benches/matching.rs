//! Expectation checking benchmarks.
#![allow(missing_docs)]

use std::hint::black_box;

use console_assert::{Expectation, Matcher};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn transcript(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("city{i}:{}", i % 10)).collect()
}

fn bench_matchers(c: &mut Criterion) {
    let line = "Hintertupfingen:3 reached after 42 moves";
    let matchers = [
        ("exact", Matcher::exact(line)),
        ("prefix", Matcher::starts_with("Hinter")),
        ("contains", Matcher::contains("reached")),
        ("glob", Matcher::glob("Hinter*:? reached *")),
        ("regex", Matcher::regex(r"\d+ moves$").unwrap()),
        (
            "predicate",
            Matcher::predicate("a long line", |s: &str| s.len() > 20),
        ),
    ];

    let mut group = c.benchmark_group("matcher");
    for (name, matcher) in &matchers {
        group.bench_function(*name, |b| b.iter(|| matcher.matches(black_box(line))));
    }
    group.finish();
}

fn bench_ordered_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_check");

    for size in &[10, 100, 1000] {
        let actual = transcript(*size);
        let expectation = Expectation::ordered_exact(actual.clone());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| expectation.check(black_box(&actual)));
        });
    }

    group.finish();
}

fn bench_first_mismatch(c: &mut Criterion) {
    let actual = transcript(1000);
    let mut expected = actual.clone();
    expected[1] = "WRONG".to_string();
    let expectation = Expectation::ordered_exact(expected);

    c.bench_function("ordered_check_early_mismatch", |b| {
        b.iter(|| expectation.check(black_box(&actual)));
    });
}

criterion_group!(
    benches,
    bench_matchers,
    bench_ordered_check,
    bench_first_mismatch
);
criterion_main!(benches);
