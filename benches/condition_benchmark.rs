//! Benchmarks for condition scanning, assembly and report evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use report_rule_core::condition::cache::{clear_cache, get_or_parse};
use report_rule_core::condition::parser::parse;
use report_rule_core::condition::{check, scan, FieldItem, FieldValue};
use report_rule_core::report::{Record, Report};

const CONDITIONS: &[&str] = &[
    "status = approved",
    "status = approved and priority >= 3",
    "owner = \"team a\" || owner = \"team b\"",
    "(risk = high or (risk = medium and tags = 2)) && status != rejected",
    "a = 1 and b = 2 or c = 3 and d = 4 or e = 5 and f = 6",
];

fn record(i: usize) -> Record {
    let status = ["draft", "approved", "rejected"][i % 3];
    let risk = (i % 3) as i64;
    Record::new(format!("specs/area{}/item{}.req", i % 7, i))
        .with_field("status", FieldValue::Text(status.to_string()))
        .with_field("priority", FieldValue::Number((i % 5) as f64))
        .with_field(
            "risk",
            FieldValue::Choice {
                index: risk,
                label: ["low", "medium", "high"][risk as usize].to_string(),
            },
        )
        .with_field("tags", FieldValue::Checks(vec![FieldItem::new((i % 4) as i64, "tag")]))
}

fn create_report() -> Report {
    let entries: Vec<String> = (0..50)
        .map(|i| {
            let condition = CONDITIONS[i % CONDITIONS.len()].replace('"', "\\\"");
            format!(
                r#"{{ "name": "Entry {i}", "rules": [
                    {{ "extension": "req", "bounds": "specs/area{}/*", "condition": "{condition}" }},
                    {{ "condition": "priority > {}" }}
                ] }}"#,
                i % 7,
                i % 5
            )
        })
        .collect();
    let json = format!(r#"{{ "entries": [{}] }}"#, entries.join(","));
    Report::from_json(&json).unwrap()
}

fn benchmark_scanning(c: &mut Criterion) {
    c.bench_function("condition_scan", |b| {
        b.iter(|| {
            for cond in CONDITIONS {
                let _ = black_box(scan(cond));
            }
        })
    });

    c.bench_function("condition_parse", |b| {
        b.iter(|| {
            for cond in CONDITIONS {
                let _ = black_box(parse(cond));
            }
        })
    });
}

fn benchmark_cache(c: &mut Criterion) {
    c.bench_function("condition_cache_cold", |b| {
        b.iter(|| {
            clear_cache();
            for cond in CONDITIONS {
                let _ = black_box(get_or_parse(cond));
            }
        })
    });

    c.bench_function("condition_cache_warm", |b| {
        for cond in CONDITIONS {
            let _ = get_or_parse(cond);
        }

        b.iter(|| {
            for cond in CONDITIONS {
                let _ = black_box(get_or_parse(cond));
            }
        })
    });
}

fn benchmark_evaluation(c: &mut Criterion) {
    let trees: Vec<_> = CONDITIONS.iter().map(|cond| parse(cond).unwrap()).collect();
    let records: Vec<_> = (0..100).map(record).collect();

    c.bench_function("condition_check", |b| {
        b.iter(|| {
            for tree in &trees {
                for record in &records {
                    black_box(check(tree, record));
                }
            }
        })
    });

    let report = create_report();
    c.bench_function("report_entries_for", |b| {
        b.iter(|| {
            for record in &records {
                black_box(report.entries_for(record));
            }
        })
    });
}

criterion_group!(benches, benchmark_scanning, benchmark_cache, benchmark_evaluation);
criterion_main!(benches);
