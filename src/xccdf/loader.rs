//! Benchmark/profile document loader (JSON).
//!
//! The document nests groups and rules the way the benchmark does:
//!
//! ```json
//! {
//!   "benchmark": {
//!     "id": "xccdf_org.example_benchmark_demo",
//!     "title": [{ "lang": "en-US", "text": "Demo" }],
//!     "values": [{ "id": "v", "title": [], "type": "number", "instances": [{ "value": "5" }] }],
//!     "content": [{ "kind": "group", "id": "g", "title": [], "content": [{ "kind": "rule", "id": "r", "title": [] }] }]
//!   },
//!   "profile": { "id": "p", "title": [{ "lang": "en-US", "text": "Default Profile" }] }
//! }
//! ```

use super::{Benchmark, Profile, ValueInstance};
use crate::error::ConfigError;
use crate::models::{TextSet, ValueType};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct DocumentFile {
    pub benchmark: BenchmarkEntry,
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkEntry {
    pub id: String,
    #[serde(default)]
    pub title: TextSet,
    #[serde(default)]
    pub description: TextSet,
    #[serde(default)]
    pub values: Vec<ValueEntry>,
    #[serde(default)]
    pub content: Vec<ContentEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ValueEntry {
    pub id: String,
    #[serde(default)]
    pub title: TextSet,
    #[serde(default)]
    pub description: TextSet,
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub instances: Vec<ValueInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentEntry {
    Group(GroupEntry),
    Rule(RuleEntry),
}

#[derive(Debug, Deserialize)]
pub struct GroupEntry {
    pub id: String,
    #[serde(default)]
    pub title: TextSet,
    #[serde(default)]
    pub description: TextSet,
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(default)]
    pub values: Vec<ValueEntry>,
    #[serde(default)]
    pub content: Vec<ContentEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub title: TextSet,
    #[serde(default)]
    pub description: TextSet,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

/// Load a benchmark and the profile to tailor from a JSON file.
pub fn load_document(path: &Path) -> Result<(Benchmark, Profile), ConfigError> {
    validate_document_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!("Document not found at: {}", path.display()))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    parse_document(&content)
}

/// Parse a document from its JSON text.
pub fn parse_document(content: &str) -> Result<(Benchmark, Profile), ConfigError> {
    let file: DocumentFile = serde_json::from_str(content).map_err(ConfigError::InvalidJson)?;
    let benchmark = build_benchmark(file.benchmark)?;
    log::debug!(
        "[Loader] Loaded benchmark '{}' ({} items), profile '{}'",
        benchmark.id(),
        benchmark.len(),
        file.profile.id
    );
    Ok((benchmark, file.profile))
}

/// Validate document path (.json extension required).
pub fn validate_document_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Document path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => Ok(()),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Document must have .json extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Document must have .json extension".to_string(),
        )),
    }
}

fn build_benchmark(doc: BenchmarkEntry) -> Result<Benchmark, ConfigError> {
    let mut benchmark = Benchmark::new(&doc.id, doc.title);
    benchmark
        .set_description(&doc.id, doc.description)
        .map_err(invalid)?;
    add_values(&mut benchmark, &doc.id, doc.values)?;
    add_content(&mut benchmark, &doc.id, doc.content)?;
    Ok(benchmark)
}

fn add_values(
    benchmark: &mut Benchmark,
    parent: &str,
    values: Vec<ValueEntry>,
) -> Result<(), ConfigError> {
    for value in values {
        benchmark
            .add_value(parent, &value.id, value.title, value.value_type)
            .map_err(invalid)?;
        benchmark
            .set_description(&value.id, value.description)
            .map_err(invalid)?;
        for instance in value.instances {
            benchmark
                .add_instance(&value.id, instance.selector.as_deref(), &instance.value)
                .map_err(invalid)?;
        }
    }
    Ok(())
}

fn add_content(
    benchmark: &mut Benchmark,
    parent: &str,
    content: Vec<ContentEntry>,
) -> Result<(), ConfigError> {
    for entry in content {
        match entry {
            ContentEntry::Group(group) => {
                benchmark
                    .add_group(parent, &group.id, group.title)
                    .map_err(invalid)?;
                benchmark
                    .set_description(&group.id, group.description)
                    .map_err(invalid)?;
                benchmark
                    .set_default_selected(&group.id, group.selected)
                    .map_err(invalid)?;
                add_values(benchmark, &group.id, group.values)?;
                add_content(benchmark, &group.id, group.content)?;
            }
            ContentEntry::Rule(rule) => {
                benchmark
                    .add_rule(parent, &rule.id, rule.title)
                    .map_err(invalid)?;
                benchmark
                    .set_description(&rule.id, rule.description)
                    .map_err(invalid)?;
                benchmark
                    .set_default_selected(&rule.id, rule.selected)
                    .map_err(invalid)?;
            }
        }
    }
    Ok(())
}

fn invalid(e: crate::error::TailoringError) -> ConfigError {
    ConfigError::ValidationFailed(e.to_string())
}
