//! Structured datasets written by the scrapers (`tax_rules.json`,
//! `investment_options.json`, `budgeting_rules.json`).
//!
//! Tax entries carry long free text and are sentence-chunked; investment
//! options and budgeting rules are rendered into one labelled block each.

use std::fmt::Write as _;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::document::{ChunkRecord, DocumentError, TextSplitter};
use crate::sink::ChunkSink;

pub const TAX_COLLECTION: &str = "tax_rules";
pub const INVESTMENT_COLLECTION: &str = "investment_options";
pub const BUDGET_COLLECTION: &str = "budgeting_rules";

pub const TAX_FILE: &str = "tax_rules.json";
pub const INVESTMENT_FILE: &str = "investment_options.json";
pub const BUDGET_FILE: &str = "budgeting_rules.json";

/// Tax entries at or below this many characters are not worth embedding.
pub const DEFAULT_MIN_CONTENT_LEN: usize = 100;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRecord {
    pub title: Option<String>,
    pub content: String,
    pub source_url: Option<String>,
    pub source_file: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub year: Option<String>,
    pub extracted_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentOption {
    pub name: String,
    pub category: String,
    pub risk_level: String,
    pub liquidity: String,
    pub expected_return_range: String,
    pub tax_treatment: String,
    pub minimum_investment: f64,
    pub lock_in_period: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub suitable_for: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetRule {
    pub rule_name: String,
    pub category: String,
    pub description: String,
    pub detailed_explanation: String,
    pub applicability: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub source: Option<String>,
    pub popularity_score: Option<u8>,
}

fn or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_owned()
}

fn or_unknown_str(value: &str) -> &str {
    if value.is_empty() { UNKNOWN } else { value }
}

impl TaxRecord {
    fn source(&self) -> String {
        or_unknown(self.source_url.as_deref().or(self.source_file.as_deref()))
    }
}

impl InvestmentOption {
    /// Labelled text block embedded for retrieval.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Investment: {}", self.name);
        let _ = writeln!(out, "Category: {}", self.category);
        let _ = writeln!(out, "Risk Level: {}", self.risk_level);
        let _ = writeln!(out, "Liquidity: {}", self.liquidity);
        let _ = writeln!(out, "Expected Returns: {}", self.expected_return_range);
        let _ = writeln!(out, "Tax Treatment: {}", self.tax_treatment);
        let _ = writeln!(out, "Minimum Investment: ₹{}", self.minimum_investment);
        let _ = writeln!(out, "Lock-in Period: {}", self.lock_in_period);
        let _ = writeln!(out, "\nDescription: {}", self.description);
        let _ = writeln!(out, "\nPros: {}", self.pros.join(", "));
        let _ = writeln!(out, "Cons: {}", self.cons.join(", "));
        let _ = write!(out, "\nSuitable For: {}", self.suitable_for);
        out
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("name".into(), json!(or_unknown_str(&self.name)));
        m.insert("category".into(), json!(or_unknown_str(&self.category)));
        m.insert("risk_level".into(), json!(or_unknown_str(&self.risk_level)));
        m.insert("liquidity".into(), json!(or_unknown_str(&self.liquidity)));
        m.insert("type".into(), json!("investment"));
        m.insert(
            "source".into(),
            json!(self.source.as_deref().unwrap_or("Investment data")),
        );
        m.insert("minimum_investment".into(), json!(self.minimum_investment));
        m.insert(
            "expected_return_range".into(),
            json!(or_unknown_str(&self.expected_return_range)),
        );
        m
    }
}

impl BudgetRule {
    /// Labelled text block embedded for retrieval.
    #[must_use]
    pub fn render(&self) -> String {
        let score = self
            .popularity_score
            .map_or_else(|| UNKNOWN.to_owned(), |s| s.to_string());
        let mut out = String::new();
        let _ = writeln!(out, "Rule: {}", self.rule_name);
        let _ = writeln!(out, "Category: {}", self.category);
        let _ = writeln!(out, "\nDescription: {}", self.description);
        let _ = writeln!(out, "\nDetailed Explanation: {}", self.detailed_explanation);
        let _ = writeln!(out, "\nApplicability: {}", self.applicability);
        let _ = writeln!(out, "\nAdvantages: {}", self.pros.join(", "));
        let _ = writeln!(out, "Disadvantages: {}", self.cons.join(", "));
        let _ = writeln!(out, "\nSource: {}", self.source.as_deref().unwrap_or_default());
        let _ = write!(out, "Popularity Score: {score}/10");
        out
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("rule_name".into(), json!(or_unknown_str(&self.rule_name)));
        m.insert("category".into(), json!(or_unknown_str(&self.category)));
        m.insert("type".into(), json!("budgeting_rule"));
        m.insert(
            "source".into(),
            json!(self.source.as_deref().unwrap_or("Budgeting data")),
        );
        m.insert(
            "applicability".into(),
            json!(or_unknown_str(&self.applicability)),
        );
        m.insert(
            "popularity_score".into(),
            json!(self.popularity_score.unwrap_or(0)),
        );
        m
    }
}

/// Read a JSON array of records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub tax_chunks: usize,
    pub investment_options: usize,
    pub budgeting_rules: usize,
    /// Dataset files that were not present.
    pub missing: Vec<String>,
}

pub struct RecordIngestor {
    splitter: TextSplitter,
    min_content_len: usize,
}

impl RecordIngestor {
    #[must_use]
    pub fn new(splitter: TextSplitter) -> Self {
        Self {
            splitter,
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
        }
    }

    #[must_use]
    pub fn with_min_content_len(mut self, min_content_len: usize) -> Self {
        self.min_content_len = min_content_len;
        self
    }

    /// Sentence-chunk every substantial tax entry.
    #[must_use]
    pub fn tax_records(&self, items: &[TaxRecord]) -> Vec<ChunkRecord> {
        let mut out = Vec::new();
        for (item_index, item) in items.iter().enumerate() {
            let original_length = item.content.chars().count();
            if original_length <= self.min_content_len {
                continue;
            }
            let title = or_unknown(item.title.as_deref());
            for (chunk_index, text) in self.splitter.chunk_text(&item.content).into_iter().enumerate() {
                let mut metadata = Map::new();
                metadata.insert("title".into(), json!(title));
                metadata.insert("source".into(), json!(item.source()));
                metadata.insert(
                    "type".into(),
                    json!(item.kind.as_deref().unwrap_or("tax")),
                );
                metadata.insert("year".into(), json!(or_unknown(item.year.as_deref())));
                metadata.insert(
                    "extracted_date".into(),
                    json!(or_unknown(item.extracted_date.as_deref())),
                );
                metadata.insert("chunk_index".into(), json!(chunk_index));
                metadata.insert("original_length".into(), json!(original_length));

                let key = format!("{TAX_COLLECTION}#{item_index}#{title}#{chunk_index}");
                out.push(ChunkRecord {
                    id: ChunkRecord::stable_id(&key),
                    collection: TAX_COLLECTION.to_owned(),
                    text,
                    metadata,
                });
            }
        }
        out
    }

    #[must_use]
    pub fn investment_records(&self, items: &[InvestmentOption]) -> Vec<ChunkRecord> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| ChunkRecord {
                id: ChunkRecord::stable_id(&format!("{INVESTMENT_COLLECTION}#{i}#{}", item.name)),
                collection: INVESTMENT_COLLECTION.to_owned(),
                text: item.render(),
                metadata: item.metadata(),
            })
            .collect()
    }

    #[must_use]
    pub fn budget_records(&self, items: &[BudgetRule]) -> Vec<ChunkRecord> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| ChunkRecord {
                id: ChunkRecord::stable_id(&format!("{BUDGET_COLLECTION}#{i}#{}", item.rule_name)),
                collection: BUDGET_COLLECTION.to_owned(),
                text: item.render(),
                metadata: item.metadata(),
            })
            .collect()
    }

    /// Ingest every dataset present in `dir`. Missing files are reported, not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or the sink fails.
    pub fn ingest_processed_dir<S>(&self, dir: &Path, sink: &mut S) -> Result<RecordReport, DocumentError>
    where
        S: ChunkSink + ?Sized,
    {
        let mut report = RecordReport::default();

        if let Some(items) = load_optional::<TaxRecord>(dir, TAX_FILE, &mut report)? {
            let records = self.tax_records(&items);
            sink.write(&records)?;
            report.tax_chunks = records.len();
            tracing::info!(chunks = records.len(), "ingested tax document chunks");
        }
        if let Some(items) = load_optional::<InvestmentOption>(dir, INVESTMENT_FILE, &mut report)? {
            let records = self.investment_records(&items);
            sink.write(&records)?;
            report.investment_options = records.len();
            tracing::info!(options = records.len(), "ingested investment options");
        }
        if let Some(items) = load_optional::<BudgetRule>(dir, BUDGET_FILE, &mut report)? {
            let records = self.budget_records(&items);
            sink.write(&records)?;
            report.budgeting_rules = records.len();
            tracing::info!(rules = records.len(), "ingested budgeting rules");
        }

        sink.flush()?;
        Ok(report)
    }
}

fn load_optional<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    report: &mut RecordReport,
) -> Result<Option<Vec<T>>, DocumentError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::error!(path = %path.display(), "data file not found");
        report.missing.push(file.to_owned());
        return Ok(None);
    }
    load_json(&path).map(Some)
}
