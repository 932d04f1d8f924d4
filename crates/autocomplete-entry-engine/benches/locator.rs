use autocomplete_entry_engine::autocomplete::locate;
use criterion::{Criterion, criterion_group, criterion_main};

fn long_line(words: usize) -> String {
    let mut line = String::new();
    for i in 0..words {
        line.push_str(&format!("word{i} "));
    }
    line.push_str("<>wor");
    line
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator");

    for words in [10, 1_000] {
        let line = long_line(words);
        let caret = line.chars().count();
        group.bench_function(format!("locate_{words}_words"), |b| {
            b.iter(|| {
                std::hint::black_box(locate(
                    std::hint::black_box(&line),
                    |_| None,
                    caret,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_locate);
criterion_main!(benches);
