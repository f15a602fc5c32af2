use std::path::Path;

use finrag_ingest::document::{
    ChunkStrategy, DocumentLoader, IngestionPipeline, LoaderRegistry, SplitterConfig, TextLoader,
    TextSplitter,
};
use finrag_ingest::{JsonlSink, MemorySink};
use serde_json::Value;

const COLLECTION: &str = "finance_docs";

fn pipeline() -> IngestionPipeline {
    IngestionPipeline::new(
        TextSplitter::new(SplitterConfig {
            chunk_size: 120,
            chunk_overlap: 20,
        }),
        COLLECTION,
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn corpus() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "RBI/Financial Literacy for Farmers.txt",
        "Open a savings account.\nSection 1 Kisan Credit Card\nThe card gives short-term credit. \
         Interest subvention applies on timely repayment.",
    );
    write(
        root,
        "SEBI/PPT-7-Mar2023.md",
        "# Investor awareness\nChapter 1\nDiversify across asset classes.",
    );
    write(
        root,
        "AMFI/NAVAll.txt",
        "Scheme Code;Scheme Name;Net Asset Value\n100027;Sample Fund Growth;45.12",
    );
    write(root, "SEBI/logo.png", "not text");
    write(root, ".cache/hidden.txt", "Skipped because hidden.");
    dir
}

#[tokio::test]
async fn ingest_dir_tags_and_chunks_every_supported_file() {
    let dir = corpus();
    let mut sink = MemorySink::default();

    let report = pipeline()
        .ingest_dir(dir.path(), &LoaderRegistry::default(), &mut sink)
        .await
        .unwrap();

    assert_eq!(report.files_scanned, 4);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.documents, 3);
    assert_eq!(report.chunks, sink.records.len());

    let by_source = |source: &str| -> Vec<_> {
        sink.records
            .iter()
            .filter(|r| r.metadata["source"] == source)
            .collect()
    };

    let rbi = by_source("RBI");
    assert!(rbi.len() >= 2);
    assert!(rbi.iter().all(|r| r.metadata["category"] == "Literacy"));
    assert!(rbi.iter().all(|r| r.metadata["audience"] == "Farmers"));
    assert!(rbi.iter().any(|r| r.metadata["section_title"] == "Section 1 Kisan Credit Card"));

    let sebi = by_source("SEBI");
    assert_eq!(sebi[0].metadata["ppt_id"], 7);
    assert_eq!(sebi[0].metadata["date"], "Mar2023");
    assert_eq!(sebi[0].metadata["content_type"], "text/markdown");

    let amfi = by_source("AMFI");
    assert_eq!(amfi[0].metadata["category"], "Data");

    assert!(sink.records.iter().all(|r| r.collection == COLLECTION));
    assert!(sink.records.iter().all(|r| r.text.chars().count() <= 120));
}

#[tokio::test]
async fn ingest_dir_is_deterministic() {
    let dir = corpus();
    let mut first = MemorySink::default();
    let mut second = MemorySink::default();

    let p = pipeline();
    let registry = LoaderRegistry::default();
    p.ingest_dir(dir.path(), &registry, &mut first).await.unwrap();
    p.ingest_dir(dir.path(), &registry, &mut second).await.unwrap();

    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn oversized_files_are_counted_as_failed() {
    let dir = corpus();
    let mut sink = MemorySink::default();

    let report = pipeline()
        .ingest_dir(dir.path(), &LoaderRegistry::with_max_file_size(10), &mut sink)
        .await
        .unwrap();

    assert_eq!(report.files_failed, 3);
    assert_eq!(report.chunks, 0);
    assert!(sink.records.is_empty());
}

#[tokio::test]
async fn ingest_dir_writes_jsonl() {
    let dir = corpus();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("processed/chunks.jsonl");

    let mut sink = JsonlSink::create(&path).unwrap();
    let report = pipeline()
        .ingest_dir(dir.path(), &LoaderRegistry::default(), &mut sink)
        .await
        .unwrap();
    drop(sink);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), report.chunks);
    assert!(lines.iter().all(|l| l["metadata"]["content_hash"].is_string()));
}

#[tokio::test]
async fn load_and_ingest_single_file_with_sentence_strategy() {
    let dir = corpus();
    let path = dir.path().join("RBI/Financial Literacy for Farmers.txt");

    let mut sink = MemorySink::default();
    let count = pipeline()
        .with_strategy(ChunkStrategy::Sentences)
        .load_and_ingest(&TextLoader::default(), &path, &mut sink)
        .await
        .unwrap();

    assert_eq!(count, sink.records.len());
    assert!(count > 0);
    assert!(
        sink.records
            .iter()
            .all(|r| !r.metadata.contains_key("section_title"))
    );
}

#[tokio::test]
async fn text_loader_rejects_missing_file() {
    let result = TextLoader::default()
        .load(Path::new("/nonexistent/finrag/missing.txt"))
        .await;
    assert!(result.is_err());
}
