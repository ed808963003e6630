//! Benchmarks for dict-cracker
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_queue_operations(c: &mut Criterion) {
    use dict_cracker::crack::{BoundedQueue, Dequeued};
    use dict_cracker::dictionary::Word;

    c.bench_function("queue_enqueue_dequeue", |b| {
        let queue = BoundedQueue::new(10_000, 1);
        let word = Word::new("benchmark").unwrap();

        b.iter(|| {
            let mut batch = vec![word.clone()];
            queue.enqueue_batch(&mut batch).unwrap();
            match queue.dequeue_one() {
                Dequeued::Word(w) => black_box(w),
                Dequeued::EndOfWork => unreachable!(),
            };
        })
    });
}

fn benchmark_expand(c: &mut Criterion) {
    use dict_cracker::crack::expand;

    c.bench_function("expand_word", |b| {
        b.iter(|| black_box(expand(black_box(b"lollipop"))))
    });
}

fn benchmark_word_search(c: &mut Criterion) {
    use dict_cracker::crack::{expand, Matcher};
    use dict_cracker::hash::sha256;

    // Miss: every candidate is hashed
    let matcher = Matcher::new(sha256(b"not-a-candidate"));

    c.bench_function("hash_all_variants", |b| {
        b.iter(|| {
            let variants = expand(black_box(b"password"));
            black_box(matcher.find(&variants))
        })
    });
}

criterion_group!(benches, benchmark_queue_operations, benchmark_expand, benchmark_word_search);
criterion_main!(benches);
