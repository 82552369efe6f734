//! Banks command - list supported issuers.

use clap::Args;
use console::style;
use serde::Serialize;

use ccparse_core::Bank;

/// Arguments for the banks command.
#[derive(Args)]
pub struct BanksArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct BankEntry {
    id: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct BankList {
    banks: Vec<BankEntry>,
}

pub fn run(args: BanksArgs) -> anyhow::Result<()> {
    let list = BankList {
        banks: Bank::SUPPORTED
            .iter()
            .map(|bank| BankEntry {
                id: bank.id(),
                name: bank.display_name(),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", style("Supported banks:").bold());
    for entry in &list.banks {
        println!("  {:<6} {}", style(entry.id).cyan(), entry.name);
    }
    println!();
    println!(
        "{} Statements from other issuers are parsed with the AI fallback when an API key is configured.",
        style("ℹ").blue()
    );

    Ok(())
}
