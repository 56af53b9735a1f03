//! Benchmarks for trend extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zeitgeist::trends::{parse_trends, BlockStrategy, TrendExtractor};

const LABELED: &str = "\
## Cultural analysis

Trend 1: Quiet Luxury
Understated wealth signals taste. The driver is status anxiety among Millennials.

Trend 2: Dopamine Dressing
Bold colours as mood management, growing on social feeds.

Trend 3: Micro-Retirement
Workers take deliberate breaks between jobs because burnout is the norm.
";

fn extract_benchmark(c: &mut Criterion) {
    let numbered: String = (1..=5)
        .map(|i| format!("{i}. Trend Number {i}\nA description with enough words to scan.\n"))
        .collect();
    let prose = "No structure at all, just a long paragraph of analysis. ".repeat(40);

    c.bench_function("parse_labeled", |b| b.iter(|| parse_trends(black_box(LABELED))));
    c.bench_function("parse_numbered", |b| b.iter(|| parse_trends(black_box(&numbered))));
    c.bench_function("parse_fallback", |b| b.iter(|| parse_trends(black_box(&prose))));

    let numbered_only = TrendExtractor::new().with_strategies(vec![BlockStrategy::NumberedList]);
    c.bench_function("parse_numbered_only", |b| {
        b.iter(|| numbered_only.parse(black_box(&numbered)))
    });
}

criterion_group!(benches, extract_benchmark);
criterion_main!(benches);
