use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rulr_rules::{BoolOp, Facts, Value, combine, evaluate, parse_rule, render_diagram};

const SIMPLE: &str = "age > 30";
const COMPLEX: &str = "(age > 30 AND department = 'Sales') OR (salary >= 50000 AND \
                       (level = 'senior' OR tenure > 5)) OR region = 'EMEA'";

fn test_facts() -> Facts {
    Facts::from([
        ("age".to_owned(), Value::Int(35)),
        ("department".to_owned(), Value::from("Marketing")),
        ("salary".to_owned(), Value::Int(60000)),
        ("level".to_owned(), Value::from("junior")),
        ("tenure".to_owned(), Value::Int(7)),
        ("region".to_owned(), Value::from("APAC")),
    ])
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_simple_rule", |b| {
        b.iter(|| black_box(parse_rule(black_box(SIMPLE))));
    });
    c.bench_function("parse_complex_rule", |b| {
        b.iter(|| black_box(parse_rule(black_box(COMPLEX))));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let facts = test_facts();
    let simple = parse_rule(SIMPLE).expect("simple rule should parse");
    let complex = parse_rule(COMPLEX).expect("complex rule should parse");

    c.bench_function("eval_simple_rule", |b| {
        b.iter(|| black_box(evaluate(black_box(&simple), &facts)));
    });
    c.bench_function("eval_complex_rule", |b| {
        b.iter(|| black_box(evaluate(black_box(&complex), &facts)));
    });
}

fn bench_render(c: &mut Criterion) {
    let complex = parse_rule(COMPLEX).expect("complex rule should parse");
    c.bench_function("render_complex_diagram", |b| {
        b.iter(|| black_box(render_diagram(black_box(&complex))));
    });
}

fn bench_combine(c: &mut Criterion) {
    let rules = [SIMPLE, COMPLEX, "tenure < 2", "department = 'Sales'"];
    c.bench_function("combine_four_rules", |b| {
        b.iter(|| black_box(combine(black_box(&rules[..]), BoolOp::Or)));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_evaluate,
    bench_render,
    bench_combine,
);
criterion_main!(benches);
