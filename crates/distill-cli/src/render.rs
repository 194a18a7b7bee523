//! Rendering of answers, retrieval sets, and populate reports

use colored::*;

use distill_core::ScoredFact;
use distill_rag::PopulateReport;

/// Print the retrieval set that backed an answer (debug mode)
pub fn print_retrieved(facts: &[ScoredFact]) {
    if facts.is_empty() {
        return;
    }

    println!("{}", "Retrieved facts:".dimmed());
    for fact in facts {
        let classes = if fact.classes.is_empty() {
            String::new()
        } else {
            format!(" [{}]", fact.classes.join(", "))
        };
        println!(
            "  {} {} {}{}",
            format!("{:.2}", fact.score).dimmed(),
            format!("({})", fact.source_file).cyan(),
            fact.fact,
            classes.yellow()
        );
    }
    println!();
}

/// Print the final answer
pub fn print_answer(answer: &str) {
    println!("{}", answer.bold());
}

/// Print the outcome of a populate run, failures last
pub fn print_report(report: &PopulateReport) {
    println!(
        "{} {} files ingested, {} facts indexed",
        "✅".green(),
        report.files_ok,
        report.facts_indexed
    );

    if !report.failures.is_empty() {
        println!(
            "{} {} file(s) skipped:",
            "⚠️".yellow(),
            report.failures.len()
        );
        for failure in &report.failures {
            println!("  {} {}: {}", "•".yellow(), failure.file, failure.error);
        }
    }
}
