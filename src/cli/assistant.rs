//! Assistant CLI commands
//!
//! Suggestions are printed first; `--apply` posts them to the journal.

use std::path::PathBuf;

use clap::Subcommand;

use crate::assistant::{apply_suggestion, AssistantService, GeminiClient, ImageData, SuggestedEntry};
use crate::config::settings::Settings;
use crate::error::LibroResult;
use crate::models::account::find_account;
use crate::models::Posting;
use crate::storage::Storage;

use super::args::today;

/// Assistant subcommands
#[derive(Subcommand)]
pub enum AssistantCommands {
    /// Ask a question about bookkeeping
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Suggest a journal entry for a plain-language description
    Predict {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Post the suggestion to the journal
        #[arg(long)]
        apply: bool,
    },
    /// Transcribe a photographed ledger page
    ScanLedger {
        image: PathBuf,
        #[arg(long)]
        apply: bool,
    },
    /// Read a receipt or invoice
    ScanReceipt {
        image: PathBuf,
        #[arg(long)]
        apply: bool,
    },
}

fn format_parts(label: &str, parts: &[Posting]) -> String {
    parts
        .iter()
        .map(|p| {
            let name = find_account(&p.account_id)
                .map(|a| a.name)
                .unwrap_or("unknown account");
            format!("  {:<6} {:<32} {:>12}\n", label, format!("{} ({})", name, p.account_id), p.amount)
        })
        .collect()
}

fn format_suggestion(suggestion: &SuggestedEntry) -> String {
    let mut output = String::new();
    let date = suggestion
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".to_string());
    output.push_str(&format!("{}  {}  {}\n", date, suggestion.description, suggestion.amount));
    if let Some(vendor) = &suggestion.vendor {
        output.push_str(&format!("  Vendor: {}\n", vendor));
    }
    output.push_str(&format_parts("Debit", &suggestion.debit_parts));
    output.push_str(&format_parts("Credit", &suggestion.credit_parts));

    let check = suggestion.balance_check();
    if !check.can_submit() {
        output.push_str(&format!(
            "  Not balanced: debits {} / credits {}\n",
            check.debits, check.credits
        ));
    }
    output
}

fn apply_and_report(storage: &Storage, suggestion: &SuggestedEntry) -> bool {
    match apply_suggestion(storage, suggestion, today()) {
        Ok(entry) => {
            println!("  Posted as entry {}", entry.id);
            true
        }
        Err(e) => {
            println!("  Not posted: {}", e);
            false
        }
    }
}

/// Handle an assistant command
pub fn handle_assistant_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AssistantCommands,
) -> LibroResult<()> {
    let service = AssistantService::new(GeminiClient::from_env(&settings.assistant)?);

    match cmd {
        AssistantCommands::Chat { message } => {
            println!("{}", service.chat(&message.join(" "))?);
        }

        AssistantCommands::Predict { text, apply } => {
            let suggestion = service.predict_entry(&text.join(" "), today())?;
            print!("{}", format_suggestion(&suggestion));
            if apply {
                apply_and_report(storage, &suggestion);
            }
        }

        AssistantCommands::ScanLedger { image, apply } => {
            let suggestions = service.scan_ledger(ImageData::from_path(&image)?)?;
            if suggestions.is_empty() {
                println!("No entries found in the image.");
                return Ok(());
            }
            let mut posted = 0;
            for suggestion in &suggestions {
                print!("{}", format_suggestion(suggestion));
                if apply && apply_and_report(storage, suggestion) {
                    posted += 1;
                }
            }
            println!();
            if apply {
                println!("Posted {} of {} entries", posted, suggestions.len());
            } else {
                println!("{} entries found. Re-run with --apply to post them.", suggestions.len());
            }
        }

        AssistantCommands::ScanReceipt { image, apply } => {
            let suggestion = service.scan_receipt(ImageData::from_path(&image)?)?;
            print!("{}", format_suggestion(&suggestion));
            if apply {
                apply_and_report(storage, &suggestion);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_suggestion_flags_unbalanced() {
        let suggestion = SuggestedEntry {
            description: "Printer paper".into(),
            amount: Money::from_units(30),
            date: None,
            debit_parts: vec![Posting::new("acc_supplies", Money::from_units(30))],
            credit_parts: vec![Posting::new("acc_cash", Money::from_units(25))],
            vendor: Some("Paper Co".into()),
        };
        let text = format_suggestion(&suggestion);
        assert!(text.contains("today"));
        assert!(text.contains("Vendor: Paper Co"));
        assert!(text.contains("(acc_supplies)"));
        assert!(text.contains("Not balanced"));
    }
}
