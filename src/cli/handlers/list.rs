//! List command handler.

use anyhow::{Context, Result};

use super::truncate_str;
use crate::cli::ListArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::store::{DbManager, NoteOper};

pub fn handle_list(args: &ListArgs, store: &DbManager) -> Result<()> {
    let summaries = NoteOper::list_notes(store).with_context(|| "failed to list notes")?;

    match args.format {
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("No notes found.");
            } else {
                println!(
                    "{:<26}  {:<40}  {:>6}  {:>10}",
                    "ID", "Title", "Blocks", "Modified"
                );
                println!(
                    "{:<26}  {:<40}  {:>6}  {:>10}",
                    "--------------------------",
                    "----------------------------------------",
                    "------",
                    "----------"
                );

                for summary in &summaries {
                    let title = truncate_str(&summary.title, 40);
                    let modified = summary.modified.format("%Y-%m-%d").to_string();
                    println!(
                        "{:<26}  {:<40}  {:>6}  {:>10}",
                        summary.id, title, summary.block_count, modified
                    );
                }

                println!();
                println!("{} note(s)", summaries.len());
            }
        }
        OutputFormat::Json => {
            let output = Output::new(summaries);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
