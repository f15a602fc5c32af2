//! Filename-driven metadata tagging for regulator publications.
//!
//! Documents are filed under a directory named after the publishing body
//! (`RBI`, `SEBI`, `AMFI`). Each body has an ordered list of rules; the
//! first rule whose predicate accepts the filename fills in the record.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_AUDIENCE: &str = "General";

static AUDIENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)for\s+([A-Za-z ]+)").expect("audience regex is valid"));

static PPT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PPT-(\d+)").expect("ppt id regex is valid"));

static MONTH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*[ _-]?\d{2,4}")
        .expect("month date regex is valid")
});

/// Structured tags derived from a document's location and filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Upper-cased name of the parent directory.
    pub source: String,
    pub category: String,
    pub topic: String,
    pub audience: String,
    pub ppt_id: Option<u64>,
    pub date: Option<String>,
    pub filename: String,
    pub page_number: Option<u32>,
}

impl MetadataRecord {
    fn defaults(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_uppercase())
            .unwrap_or_default();

        Self {
            source,
            category: DEFAULT_CATEGORY.to_owned(),
            topic: stem.replace(['_', '-'], " "),
            audience: DEFAULT_AUDIENCE.to_owned(),
            ppt_id: None,
            date: None,
            filename,
            page_number: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page_number = page;
        self
    }

    /// Flat key/value form merged into chunk payloads.
    #[must_use]
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("source".into(), json!(self.source));
        fields.insert("category".into(), json!(self.category));
        fields.insert("topic".into(), json!(self.topic));
        fields.insert("audience".into(), json!(self.audience));
        fields.insert("ppt_id".into(), json!(self.ppt_id));
        fields.insert("date".into(), json!(self.date));
        fields.insert("filename".into(), json!(self.filename));
        fields.insert("page_number".into(), json!(self.page_number));
        fields
    }
}

/// One entry of the classification table.
pub struct ClassifierRule {
    /// Upper-cased directory name this rule applies to.
    pub source: &'static str,
    pub matches: fn(&str) -> bool,
    pub apply: fn(&str, &mut MetadataRecord),
}

impl std::fmt::Debug for ClassifierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRule")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

fn rbi_literacy(name: &str, record: &mut MetadataRecord) {
    record.category = "Literacy".into();
    if let Some(m) = AUDIENCE_RE.captures(name).and_then(|c| c.get(1)) {
        record.audience = m.as_str().trim().to_owned();
    }
}

fn rbi_msme_guide(_name: &str, record: &mut MetadataRecord) {
    record.category = "Guide".into();
    record.topic = "Financing Needs of Micro and Small Enterprises".into();
}

fn sebi_ppt(name: &str, record: &mut MetadataRecord) {
    record.category = "PPT".into();
    record.ppt_id = PPT_ID_RE
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());
    record.date = MONTH_DATE_RE.find(name).map(|m| m.as_str().to_owned());
}

fn sebi_guide(name: &str, record: &mut MetadataRecord) {
    record.category = "Guide".into();
    if name.contains("Beginners") {
        record.audience = "Beginners".into();
    } else if name.contains("Advance") {
        record.audience = "Advanced".into();
    } else if name.to_lowercase().contains("intermediate") {
        record.audience = "Intermediate".into();
    }
}

/// Classification rules in priority order. Within a source the first match wins.
pub static DEFAULT_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        source: "RBI",
        matches: |n| n.to_uppercase().contains("FINANCIAL LITERACY"),
        apply: rbi_literacy,
    },
    ClassifierRule {
        source: "RBI",
        matches: |n| n.contains("Financing needs"),
        apply: rbi_msme_guide,
    },
    ClassifierRule {
        source: "SEBI",
        matches: |n| n.to_uppercase().starts_with("PPT-"),
        apply: sebi_ppt,
    },
    ClassifierRule {
        source: "SEBI",
        matches: |n| n.contains("Mutual-Fund") || n.to_lowercase().contains("beginners"),
        apply: sebi_guide,
    },
    ClassifierRule {
        source: "SEBI",
        matches: |n| n.contains("Booklet"),
        apply: |_, r| r.category = "Booklet".into(),
    },
    ClassifierRule {
        source: "SEBI",
        matches: |n| n.to_lowercase().contains("brochure"),
        apply: |_, r| r.category = "Brochure".into(),
    },
    ClassifierRule {
        source: "AMFI",
        matches: |n| n.contains("Strategy"),
        apply: |_, r| r.category = "Report".into(),
    },
    ClassifierRule {
        source: "AMFI",
        matches: |n| n.contains("NAVAll"),
        apply: |_, r| r.category = "Data".into(),
    },
];

#[derive(Debug, Clone, Copy)]
pub struct MetadataClassifier {
    rules: &'static [ClassifierRule],
}

impl Default for MetadataClassifier {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES,
        }
    }
}

impl MetadataClassifier {
    #[must_use]
    pub fn with_rules(rules: &'static [ClassifierRule]) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn classify(&self, path: &Path) -> MetadataRecord {
        let mut record = MetadataRecord::defaults(path);
        let name = record.filename.clone();

        if let Some(rule) = self
            .rules
            .iter()
            .filter(|r| r.source == record.source)
            .find(|r| (r.matches)(&name))
        {
            (rule.apply)(&name, &mut record);
        }

        tracing::debug!(
            source = %record.source,
            category = %record.category,
            audience = %record.audience,
            ppt_id = ?record.ppt_id,
            date = ?record.date,
            filename = %record.filename,
            "classified document"
        );
        record
    }
}
