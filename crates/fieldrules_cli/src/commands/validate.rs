use anyhow::{Context, Result};
use fieldrules_core::Values;
use fieldrules_validator::{RuleRegistry, Validator};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::commands::load_rules;
use crate::output::{self, ValidationReport};

pub fn execute(rules_path: &str, values_path: &str, strict: bool, format: &str) -> Result<()> {
    info!("Validating values: {}", values_path);
    info!("Strict mode: {}", strict);

    let document = load_rules(rules_path)?;

    let content = std::fs::read_to_string(values_path)
        .with_context(|| format!("Failed to read values file: {}", values_path))?;
    let values: Values = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse values file: {}", values_path))?;

    if format != "json" {
        output::print_info(&format!(
            "Rules loaded: {} fields, {} values",
            document.fields.len(),
            values.len()
        ));
    }

    // Values without rules never reach the validated output
    let mut unchecked: Vec<String> = values
        .keys()
        .filter(|field| !document.fields.contains_key(*field))
        .cloned()
        .collect();
    unchecked.sort();

    let registry = Arc::new(RuleRegistry::default());
    let validator = Validator::from_document(&document, values, &registry)
        .with_context(|| format!("Failed to build rules from: {}", rules_path))?;

    let mut errors: BTreeMap<String, String> = validator
        .errors()
        .context("Validation aborted")?
        .iter()
        .map(|(field, message)| (field.clone(), message.clone()))
        .collect();

    let validated = validator
        .validated()
        .context("Validation aborted")?
        .iter()
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();

    let mut warnings = Vec::new();
    for field in unchecked {
        let message = format!("No rules defined for field {}", field);
        if strict {
            errors.insert(field, message);
        } else {
            warnings.push(message);
        }
    }

    let report = ValidationReport {
        passed: errors.is_empty(),
        errors,
        warnings,
        validated,
    };

    output::print_validation_report(&report, format);

    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}
