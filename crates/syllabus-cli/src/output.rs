//! Terminal output formatting.

use colored::Colorize;
use syllabus_graph::ValidationReport;
use syllabus_setup::{ExecutionSummary, SetupScript};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 24;
const DESCRIPTION_WIDTH: usize = 52;

/// Print the setup scripts as a table.
pub fn print_scripts_table<'a>(scripts: impl Iterator<Item = &'a dyn SetupScript>) {
    println!(
        "{} {} {}",
        pad_right("Script", NAME_WIDTH).bold(),
        pad_right("Description", DESCRIPTION_WIDTH).bold(),
        "Depends on".bold()
    );
    println!("{}", "─".repeat(NAME_WIDTH + DESCRIPTION_WIDTH + 24));

    let mut count = 0;
    for script in scripts {
        let deps = script.depends_on();
        let deps = if deps.is_empty() {
            "-".dimmed()
        } else {
            deps.join(", ").normal()
        };
        println!(
            "{} {} {}",
            pad_right(script.name(), NAME_WIDTH).cyan(),
            pad_right(&truncate_visual(script.description(), DESCRIPTION_WIDTH - 1), DESCRIPTION_WIDTH),
            deps
        );
        count += 1;
    }

    println!();
    println!("{} script(s) available", count);
}

/// Print the outcome of a setup run.
pub fn print_summary(summary: &ExecutionSummary) {
    println!("{}", "Setup run".bold());
    println!("{}", "─".repeat(60));

    for result in &summary.results {
        let mark = if result.success { "✓".green() } else { "✗".red() };
        println!(
            "  {} {} {}",
            mark,
            pad_right(&result.name, NAME_WIDTH),
            format!("{} ms", result.duration.as_millis()).dimmed()
        );
        if let Some(error) = &result.error {
            println!("      {}", error.red());
        }
    }
    for name in &summary.skipped {
        println!("  {} {} {}", "-".dimmed(), pad_right(name, NAME_WIDTH), "skipped".yellow());
    }

    println!("{}", "─".repeat(60));
    let failed = summary.failed();
    println!(
        "  {} succeeded, {} failed, {} skipped in {} ms",
        summary.succeeded().to_string().green(),
        if failed > 0 { failed.to_string().red() } else { failed.to_string().normal() },
        summary.skipped.len(),
        summary.total_duration.as_millis()
    );
}

/// Print a graph validation report.
pub fn print_validation(report: &ValidationReport) {
    println!("{} {}", "Graph validation for".bold(), report.root_id.cyan());
    println!("{}", "─".repeat(40));

    print_kv("Root exists", &yes_no(report.root_exists));
    print_kv("Concepts", &report.concept_count.to_string());
    print_kv("CONTAINS edges", &report.contains_count.to_string());
    print_kv("Tree size", &report.tree_size.to_string());
    print_kv("Max depth", &report.max_depth.to_string());

    if !report.type_distribution.is_empty() {
        println!();
        println!("{}", "Type distribution".bold());
        for (concept_type, count) in &report.type_distribution {
            println!("  {} {}", pad_right(concept_type, 12), count.to_string().cyan());
        }
    }

    println!("{}", "─".repeat(40));
    let issues = report.issues();
    if issues.is_empty() {
        println!("{}", "Graph is healthy.".green().bold());
    } else {
        for issue in &issues {
            println!("  {} {}", "!".red().bold(), issue);
        }
    }
}

/// Print one aligned `key: value` line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {} {}", pad_right(&format!("{}:", key), 22).dimmed(), value);
}

fn yes_no(value: bool) -> String {
    if value { "yes".to_string() } else { "no".to_string() }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
