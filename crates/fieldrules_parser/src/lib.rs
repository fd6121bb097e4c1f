//! Parser for fieldrules rule definitions.
//!
//! This crate turns text into typed rule definitions in two ways:
//!
//! - the compact rule syntax (`required`, `min:3`, `excludeIf:plan,free`),
//!   see [`split_rule_spec`] and friends
//! - rule-definition documents in YAML, TOML or JSON that bind fields to
//!   lists of rule specs and optional display labels
//!
//! # Example
//!
//! ```rust
//! use fieldrules_parser::{parse_yaml, RuleSpec};
//!
//! let yaml = r#"
//! fields:
//!   email: [required, email]
//!   age: [required, integer, "min:18"]
//! labels:
//!   email: Email address
//! "#;
//!
//! let document = parse_yaml(yaml).expect("Failed to parse rules");
//! assert_eq!(document.fields["age"][2], RuleSpec::Compact("min:18".to_string()));
//! assert_eq!(document.labels["email"], "Email address");
//! ```

mod compact;

pub use compact::*;

use fieldrules_core::ConditionGroup;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during rule document parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported rule document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// One rule of a field in a rule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Compact form, e.g. `"min:3"`
    Compact(String),

    /// Conditional rule carrying a full condition tree
    Conditional {
        /// Rule id, e.g. `"excludeIf"`
        rule: String,
        /// Conditions in the front-end JSON shape
        conditions: ConditionGroup,
    },
}

impl RuleSpec {
    /// Returns the rule id of the spec.
    pub fn rule_id(&self) -> &str {
        match self {
            RuleSpec::Compact(spec) => split_rule_spec(spec).0,
            RuleSpec::Conditional { rule, .. } => rule,
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(spec: &str) -> Self {
        RuleSpec::Compact(spec.to_string())
    }
}

/// Field rules and labels loaded from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Rule specs per field, in execution order
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<RuleSpec>>,

    /// Display labels substituted into failure messages
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Parse a rule document from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RuleDocument> {
    let document: RuleDocument = serde_yaml_ng::from_str(content)?;
    Ok(document)
}

/// Parse a rule document from a TOML string.
///
/// # Example
///
/// ```rust
/// use fieldrules_parser::parse_toml;
///
/// let toml = r#"
/// [fields]
/// name = ["required", "max:80"]
///
/// [labels]
/// name = "Full name"
/// "#;
///
/// let document = parse_toml(toml).unwrap();
/// assert_eq!(document.fields["name"].len(), 2);
/// ```
pub fn parse_toml(content: &str) -> Result<RuleDocument> {
    let document: RuleDocument =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(document)
}

/// Parse a rule document from a JSON string.
pub fn parse_json(content: &str) -> Result<RuleDocument> {
    let document: RuleDocument = serde_json::from_str(content)?;
    Ok(document)
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
/// * `.json` → `DocumentFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        "json" => Ok(DocumentFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a rule document from a file with automatic format detection.
///
/// ```no_run
/// use fieldrules_parser::parse_file;
/// use std::path::Path;
///
/// let document = parse_file(Path::new("rules/signup.yml")).unwrap();
/// println!("Loaded rules for {} fields", document.fields.len());
/// ```
pub fn parse_file(path: &Path) -> Result<RuleDocument> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        DocumentFormat::Yaml => parse_yaml(&content),
        DocumentFormat::Toml => parse_toml(&content),
        DocumentFormat::Json => parse_json(&content),
    }
}
