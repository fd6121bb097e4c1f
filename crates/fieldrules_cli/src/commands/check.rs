use anyhow::{Context, Result};
use fieldrules_validator::{RuleRegistry, RuleSet};
use std::sync::Arc;
use tracing::info;

use crate::commands::load_rules;
use crate::output;

pub fn execute(rules_path: &str, format: &str) -> Result<()> {
    info!("Checking rule definitions: {}", rules_path);

    let document = load_rules(rules_path)?;
    let registry = Arc::new(RuleRegistry::default());

    // Resolving every rule surfaces unknown ids and malformed options
    let mut front_end = serde_json::Map::new();
    let mut rule_count = 0;
    for (field, specs) in &document.fields {
        let mut rule_set = RuleSet::with_registry(Arc::clone(&registry));
        rule_set
            .rules(specs)
            .with_context(|| format!("Invalid rules for field: {}", field))?;

        rule_count += rule_set.len();
        front_end.insert(field.clone(), rule_set.to_front_end_json());
    }

    if format == "json" {
        let rendered = serde_json::to_string_pretty(&front_end)
            .context("Failed to render front-end rules")?;
        println!("{}", rendered);
        return Ok(());
    }

    output::print_success("Rule definitions are valid");

    println!("\nRules Summary:");
    println!("  Fields:      {}", document.fields.len());
    println!("  Rules:       {}", rule_count);
    println!("  Labels:      {}", document.labels.len());

    println!("\nFront-end rules:");
    for (field, rules) in &front_end {
        let label = document
            .labels
            .get(field)
            .map(|label| format!(" ({})", label))
            .unwrap_or_default();
        println!("  {}{}: {}", field, label, rules);
    }

    Ok(())
}
