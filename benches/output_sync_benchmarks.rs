use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use markdown_preview_ls::chunk::{locate_chunk, plan_output_edit, OUTPUT_CLOSE, OUTPUT_OPEN};
use markdown_preview_ls::{modify_source, MemoryHost};
use std::hint::black_box;
use std::path::Path;

fn generate_markdown(chunks: usize, with_output: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(chunks * 16);

    for i in 0..chunks {
        lines.push(format!("## Section {}", i));
        lines.push(String::new());
        lines.push("Some prose describing the computation below.".to_string());
        lines.push(String::new());
        lines.push("```python {cmd=true}".to_string());
        lines.push(format!("print({} * 2)", i));
        lines.push("```".to_string());
        if with_output {
            lines.push(OUTPUT_OPEN.to_string());
            lines.push(String::new());
            lines.push(format!("{}", i * 2));
            lines.push(String::new());
            lines.push(OUTPUT_CLOSE.to_string());
        }
        lines.push(String::new());
    }

    lines
}

fn bench_locate_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_chunk");

    for chunks in [10, 100, 1000].iter() {
        let lines = generate_markdown(*chunks, true);
        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(BenchmarkId::new("chunks", chunks), &lines, |b, lines| {
            b.iter(|| black_box(locate_chunk(lines, chunks - 1)))
        });
    }
    group.finish();
}

fn bench_plan_output_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_output_edit");

    for chunks in [10, 100, 1000].iter() {
        let fresh = generate_markdown(*chunks, false);
        group.bench_with_input(BenchmarkId::new("create", chunks), &fresh, |b, lines| {
            b.iter(|| black_box(plan_output_edit(lines, chunks - 1, "result")))
        });

        let synced = generate_markdown(*chunks, true);
        let last = (chunks - 1) * 2;
        group.bench_with_input(BenchmarkId::new("unchanged", chunks), &synced, |b, lines| {
            b.iter(|| black_box(plan_output_edit(lines, chunks - 1, &last.to_string())))
        });
    }
    group.finish();
}

fn bench_modify_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("modify_source");

    for chunks in [10, 100, 1000].iter() {
        let lines = generate_markdown(*chunks, true);
        group.bench_with_input(BenchmarkId::new("replace", chunks), &lines, |b, lines| {
            b.iter_batched(
                || {
                    let mut host = MemoryHost::new();
                    host.open("/bench/doc.md", lines.clone());
                    host
                },
                |mut host| {
                    black_box(modify_source(
                        &mut host,
                        Path::new("/bench/doc.md"),
                        chunks / 2,
                        "updated\noutput",
                    ))
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_locate_chunk,
    bench_plan_output_edit,
    bench_modify_source
);
criterion_main!(benches);
