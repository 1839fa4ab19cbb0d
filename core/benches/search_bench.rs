use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use search_core::{DocumentStatus, ExecutionPolicy, SearchServer};

const WORDS: [&str; 24] = [
    "cat", "dog", "bird", "city", "river", "white", "black", "fluffy", "tail", "collar", "rat", "pet",
    "funny", "nasty", "curly", "hair", "big", "small", "sparrow", "groomed", "starling", "eye",
    "in", "with",
];

fn build_server(documents: usize) -> SearchServer {
    let mut server = SearchServer::new("in with").expect("valid stop words");
    let mut state: u64 = 42;
    for id in 0..documents {
        let text: Vec<&str> = (0..12)
            .map(|_| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                WORDS[(state >> 33) as usize % WORDS.len()]
            })
            .collect();
        server
            .add_document(id as i32, &text.join(" "), DocumentStatus::Actual, &[1, 2, 3])
            .expect("valid document");
    }
    server
}

fn bench_find_top_documents(c: &mut Criterion) {
    let server = build_server(10_000);
    let query = "white cat fluffy tail curly hair -nasty -rat big sparrow";
    for (name, policy) in [("find_top_sequential", ExecutionPolicy::Sequential), ("find_top_parallel", ExecutionPolicy::Parallel)] {
        c.bench_function(name, |b| {
            b.iter(|| server.find_top_documents_with(policy, query, &DocumentStatus::Actual))
        });
    }
}

fn bench_remove_document(c: &mut Criterion) {
    for (name, policy) in [("remove_sequential", ExecutionPolicy::Sequential), ("remove_parallel", ExecutionPolicy::Parallel)] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || build_server(1_000),
                |mut server| {
                    for id in 0..1_000 {
                        let _ = server.remove_document_with(policy, id);
                    }
                    server
                },
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, bench_find_top_documents, bench_remove_document);
criterion_main!(benches);
