pub mod check;
pub mod validate;

use anyhow::{Context, Result};
use fieldrules_parser::{RuleDocument, parse_file};
use std::path::Path;

/// Loads a rule definition file, detecting the format from its extension.
pub fn load_rules(rules_path: &str) -> Result<RuleDocument> {
    parse_file(Path::new(rules_path))
        .with_context(|| format!("Failed to parse rule definition file: {}", rules_path))
}
