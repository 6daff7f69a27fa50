use std::hint::black_box;
use std::io::Cursor;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use withenv::{Line, Origin, classify_line, parse_reader};

const MIXED_LINES: [&str; 8] = [
    "# database settings",
    "DATABASE_URL=postgres://app:secret@db:5432/app?sslmode=disable",
    "",
    "   ",
    "log_level=debug",
    "123BAD=value",
    "  # indented",
    "EMPTY=",
];

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_mixed_lines", |b| {
        b.iter(|| {
            MIXED_LINES
                .iter()
                .filter(|line| matches!(classify_line(black_box(line)), Line::Entry { .. }))
                .count()
        });
    });
}

fn bench_parse_reader(c: &mut Criterion) {
    let input = env_file(5_000);
    let mut group = c.benchmark_group("parse_reader");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("five_thousand_entries", |b| {
        b.iter(|| {
            parse_reader(Cursor::new(black_box(input.as_bytes())), &Origin::Stdin)
                .expect("parse should succeed")
        });
    });
    group.finish();
}

fn env_file(entries: usize) -> String {
    let mut content = String::new();
    for idx in 0..entries {
        if idx % 10 == 0 {
            content.push_str("# section\n\n");
        }
        content.push_str(&format!("VAR_{idx}=value={idx}\n"));
    }
    content
}

criterion_group!(benches, bench_classify, bench_parse_reader);
criterion_main!(benches);
