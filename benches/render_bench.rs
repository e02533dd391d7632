//! Compilation Benchmark
//!
//! Measures parse, prune and render throughput over synthetic namespaces.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use extdts::features::FeatureKind;
use extdts::{CompileOptions, Compiler, RawFeatureTables};

// =============================================================================
// Test Sources
// =============================================================================

const OVERLOADED_SOURCE: &str = r#"{
    "namespace": "tabs",
    "functions": [{
        "name": "query",
        "parameters": [
            {"name": "a", "type": "string", "optional": true},
            {"name": "b", "type": "string", "optional": true},
            {"name": "c", "type": "integer", "optional": true},
            {"name": "d", "type": "boolean"}
        ],
        "returns_async": {"name": "callback", "parameters": [{"name": "result", "type": "string"}]}
    }]
}"#;

/// Generate `namespaces` schema texts, each with `members` types and as many
/// async functions.
fn generate_schemas(namespaces: usize, members: usize) -> Vec<String> {
    (0..namespaces)
        .map(|n| {
            let mut source = String::with_capacity(members * 400);
            source.push_str(&format!("{{\"namespace\": \"ns{n}\", \"types\": ["));
            for m in 0..members {
                if m > 0 {
                    source.push(',');
                }
                source.push_str(&format!(
                    "{{\"id\": \"T{m}\", \"type\": \"object\", \"properties\": {{\
                     \"name\": {{\"type\": \"string\", \"description\": \"Name {m}.\"}},\
                     \"count\": {{\"type\": \"integer\", \"optional\": true}},\
                     \"tags\": {{\"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}}}"
                ));
            }
            source.push_str("], \"functions\": [");
            for m in 0..members {
                if m > 0 {
                    source.push(',');
                }
                source.push_str(&format!(
                    "{{\"name\": \"get{m}\", \"parameters\": [\
                     {{\"name\": \"id\", \"type\": \"string\", \"optional\": true}}],\
                     \"returns_async\": {{\"name\": \"callback\", \"parameters\": [\
                     {{\"name\": \"value\", \"$ref\": \"T{m}\"}}]}}}}"
                ));
            }
            source.push_str("]}");
            source
        })
        .collect()
}

fn compiler(namespaces: usize) -> Compiler {
    let mut tables = RawFeatureTables::new();
    let api = (0..namespaces)
        .map(|n| (format!("ns{n}"), serde_json::json!({"channel": "stable"})))
        .chain([("tabs".to_string(), serde_json::json!({"channel": "stable"}))])
        .collect::<serde_json::Map<_, _>>();
    if let Err(err) = tables.load_value(FeatureKind::Api, serde_json::Value::Object(api)) {
        panic!("invalid benchmark features: {err}");
    }
    Compiler::new(tables, CompileOptions::default())
}

// =============================================================================
// Benchmarks
// =============================================================================

/// Benchmark: one function with three left-optional parameters
fn bench_overload_expansion(c: &mut Criterion) {
    let compiler = compiler(0);
    c.bench_function("compile_overloaded", |b| {
        b.iter(|| black_box(compiler.compile_json(&[OVERLOADED_SOURCE])))
    });
}

/// Benchmark: full pipeline throughput for various sizes
fn bench_compile_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_throughput");

    for (namespaces, members) in [(1, 10), (10, 10), (20, 50)] {
        let schemas = generate_schemas(namespaces, members);
        let bytes: usize = schemas.iter().map(String::len).sum();
        let label = format!("{namespaces}ns_{members}members");
        let compiler = compiler(namespaces);

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("compile", &label), &schemas, |b, schemas| {
            let texts: Vec<&str> = schemas.iter().map(String::as_str).collect();
            b.iter(|| black_box(compiler.compile_json(&texts)))
        });
    }

    group.finish();
}

/// Benchmark: rendering alone, with parsing and pruning done up front
fn bench_render_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_only");

    for namespaces in [1, 10, 50] {
        let schemas = generate_schemas(namespaces, 20);
        let texts: Vec<&str> = schemas.iter().map(String::as_str).collect();
        let compiler = compiler(namespaces);
        let Ok(parsed) = compiler.parse(&texts) else {
            panic!("invalid benchmark schemas");
        };
        let Ok(pruned) = compiler.prune(parsed) else {
            panic!("benchmark features rejected");
        };

        group.bench_with_input(BenchmarkId::new("render", namespaces), &pruned, |b, pruned| {
            b.iter(|| black_box(compiler.render(pruned, None)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_overload_expansion,
    bench_compile_throughput,
    bench_render_only
);
criterion_main!(benches);
