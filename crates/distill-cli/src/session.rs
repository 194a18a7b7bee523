//! Interactive session loop

use colored::*;

use distill_core::{ClassifierRegistry, Result};
use distill_rag::{Pipeline, Summ};

use crate::render::{print_answer, print_report, print_retrieved};
use crate::ui::{display_banner, handle_input_with_history, print_help};

/// Options carried into an interactive session
pub struct SessionOptions {
    pub debug: bool,
    pub parallel: bool,
}

/// Run the interactive loop: `populate`, `help`, `exit`, or free-text
/// questions over the corpus.
pub async fn run_session(
    summ: &Summ,
    pipeline: &Pipeline,
    registry: &ClassifierRegistry,
    options: &SessionOptions,
) -> Result<()> {
    display_banner();

    if registry.is_empty() {
        println!(
            "{}",
            "Warning: no classifiers registered; class filters are unavailable.".yellow()
        );
    }

    let mut history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();

        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        if input_lower == "help" {
            print_help();
            continue;
        }

        if input_lower == "populate" {
            println!(
                "{} Ingesting transcripts from {}...",
                "📥".blue(),
                pipeline.dir().display()
            );
            match pipeline.populate(options.parallel).await {
                Ok(report) => print_report(&report),
                Err(e) => println!("{} Populate failed: {}", "❌".red(), e),
            }
            continue;
        }

        let corpus: Vec<String> = match pipeline.corpus() {
            Ok(corpus) => corpus.into_iter().collect(),
            Err(e) => {
                println!("{} Cannot list corpus: {}", "❌".red(), e);
                continue;
            }
        };

        println!("{} Thinking...", "🤖".blue());

        match summ.query(&input, &[], &corpus, options.debug).await {
            Ok(response) => {
                if options.debug {
                    print_retrieved(&response.retrieved);
                }
                print_answer(&response.answer);
            }
            Err(e) => {
                println!("{} Query failed: {}", "❌".red(), e);
            }
        }
    }

    Ok(())
}
