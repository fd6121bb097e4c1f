use colored::*;
use fieldrules_core::Value;
use serde_json::json;
use std::collections::BTreeMap;

/// Outcome of validating one value file, ready for printing.
pub struct ValidationReport {
    pub passed: bool,
    /// Failure message per field
    pub errors: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    /// Sanitized values of the fields that were kept
    pub validated: BTreeMap<String, Value>,
}

pub fn print_validation_report(report: &ValidationReport, format: &str) {
    match format {
        "json" => print_json_report(report),
        _ => print_text_report(report),
    }
}

fn print_text_report(report: &ValidationReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, (field, message)) in report.errors.iter().enumerate() {
            println!("  {}. {}: {}", i + 1, field.bold(), message.red());
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in report.warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, warning.yellow());
        }
    }

    if !report.validated.is_empty() {
        println!("\n{}", "Validated values:".bold());
        for (field, value) in &report.validated {
            println!("  {}: {}", field, value);
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total errors:   {}", report.errors.len());
    println!("  Total warnings: {}", report.warnings.len());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &ValidationReport) {
    let output = json!({
        "passed": report.passed,
        "errors": report.errors,
        "warnings": report.warnings,
        "validated": report.validated,
        "summary": {
            "error_count": report.errors.len(),
            "warning_count": report.warnings.len(),
        }
    });

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => println!("{}", rendered),
        Err(err) => print_error(&format!("Failed to render report: {}", err)),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
