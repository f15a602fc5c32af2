use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use finrag_ingest::document::{
    Document, IngestionPipeline, SplitterConfig, TextSplitter, splitter::split_sentences,
};
use std::hint::black_box;

fn generate_text(size: usize) -> String {
    let paragraph = "Section 80C allows a deduction of up to 1.5 lakh rupees. \
                     Eligible instruments include PPF, ELSS and life insurance premiums.\n";
    paragraph.repeat(size / paragraph.len() + 1)[..size].to_string()
}

fn generate_sectioned(sections: usize) -> String {
    (1..=sections)
        .map(|i| format!("Chapter {i}\n{}", generate_text(2_000)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sentence_splitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_sentences");

    for size in [1_000, 10_000, 100_000] {
        let input = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("ascii", size), &input, |b, input| {
            b.iter(|| split_sentences(black_box(input)));
        });
    }

    group.finish();
}

fn chunk_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_text");
    let splitter = TextSplitter::new(SplitterConfig {
        chunk_size: 800,
        chunk_overlap: 100,
    });

    for size in [10_000, 100_000] {
        let input = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("800_100", size), &input, |b, input| {
            b.iter(|| splitter.chunk_text(black_box(input)));
        });
    }

    group.finish();
}

fn section_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_records");
    let pipeline = IngestionPipeline::new(TextSplitter::new(SplitterConfig::default()), "bench");
    let doc = Document::new(generate_sectioned(20), "data/SEBI/Booklet.txt");

    group.bench_function("20_sections", |b| {
        b.iter(|| black_box(pipeline.records(black_box(&doc))));
    });

    group.finish();
}

criterion_group!(benches, sentence_splitting, chunk_text, section_records);
criterion_main!(benches);
