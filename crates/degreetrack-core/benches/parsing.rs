use criterion::{black_box, criterion_group, criterion_main, Criterion};

use degreetrack_core::parser::{parse_catalog_str, parse_plan_str};

fn bench_catalog_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_parsing");

    let small = generate_catalog_toml(10);
    let medium = generate_catalog_toml(100);
    let large = generate_catalog_toml(500);

    group.bench_function("10_courses", |b| {
        b.iter(|| parse_catalog_str(black_box(&small), black_box("bench.toml".as_ref())))
    });

    group.bench_function("100_courses", |b| {
        b.iter(|| parse_catalog_str(black_box(&medium), black_box("bench.toml".as_ref())))
    });

    group.bench_function("500_courses", |b| {
        b.iter(|| parse_catalog_str(black_box(&large), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_plan_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_parsing");

    let typical = generate_plan_toml(20);
    let large = generate_plan_toml(200);

    group.bench_function("20_records", |b| {
        b.iter(|| parse_plan_str(black_box(&typical), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_records", |b| {
        b.iter(|| parse_plan_str(black_box(&large), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn generate_catalog_toml(n: usize) -> String {
    let groups = ["A1", "A2", "A3", "A4", "A5"];
    let mut s = String::new();
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[courses]]
id = "course_{i}"
code = "C-{i:03}"
title = "Course {i}"
credits = 6
group = "{group}"
frequency = "WS"
language = "en"
description = "Benchmark course number {i}"
"#,
            group = groups[i % groups.len()]
        ));
    }
    s
}

fn generate_plan_toml(n: usize) -> String {
    let mut s = String::from(
        r#"[profile]
student = "bench"
start_term = "WS"
start_year = 2025
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[records]]
id = "r{i}"
course = "course_{i}"
status = "{status}"
term = "{term}"
year = {year}
"#,
            status = if i % 3 == 0 { "passed" } else { "planned" },
            term = if i % 2 == 0 { "WS" } else { "SS" },
            year = 2025 + (i / 2) as i32
        ));
    }
    s
}

criterion_group!(benches, bench_catalog_parsing, bench_plan_parsing);
criterion_main!(benches);
