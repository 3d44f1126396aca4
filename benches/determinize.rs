use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use determinize::{prelude::*, random};

fn subset_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset construction");
    for size in [4, 8, 12] {
        let nfa = random::generate_random_nfa(size as u64, 2, size, 0.2, 0.05);
        group.bench_with_input(BenchmarkId::from_parameter(size), &nfa, |b, nfa| {
            b.iter(|| black_box(nfa.to_dfa()))
        });
    }
    group.finish();
}

fn minimization(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimization");
    for size in [16, 64, 256] {
        let dfa = random::generate_random_dfa(size as u64, 3, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dfa, |b, dfa| {
            b.iter(|| black_box(dfa.minimize()))
        });
    }
    group.finish();
}

fn acceptance(c: &mut Criterion) {
    let nfa = random::generate_random_nfa(3, 2, 10, 0.2, 0.05);
    let words = random::generate_random_words(3, nfa.alphabet(), 0, 64, 100);
    nfa.dfa();
    c.bench_function("nfa acceptance through cached dfa", |b| {
        b.iter(|| words.iter().filter(|w| nfa.accepts(*w)).count())
    });
}

criterion_group!(benches, subset_construction, minimization, acceptance);
criterion_main!(benches);
