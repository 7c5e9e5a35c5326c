use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rackr::engine::dictionary::Dictionary;
use rackr::engine::search::{SearchRequest, find_words};

fn request(pattern: &str, starts_with: Option<&str>) -> SearchRequest {
    SearchRequest {
        pattern: pattern.to_string(),
        search_id: 1,
        starts_with: starts_with.map(str::to_string),
        ends_with: None,
    }
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("dictionary build (bundled list)", |b| {
        b.iter(Dictionary::embedded)
    });
}

fn bench_search(c: &mut Criterion) {
    let dictionary = Dictionary::embedded();
    let cases = [
        ("plain rack", request("AELRST", None)),
        ("two blanks", request("RE??TS", None)),
        ("all blanks", request("???????", None)),
        ("prefix constraint", request("CARE", Some("S"))),
    ];

    let mut group = c.benchmark_group("find_words");
    for (name, req) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| find_words(black_box(&dictionary), black_box(req)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
