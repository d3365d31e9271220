//! Categories command - show the effective keyword table.

use std::path::PathBuf;

use clap::Args;
use console::style;

use txtract_core::CategoryClassifier;

use super::load_config;

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// JSON category table to show instead of the configured one
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: CategoriesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let table_path = match args.table {
        Some(path) => Some(path),
        None => load_config(config_path)?.categories.table_path,
    };

    let classifier = match &table_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Category table not found: {}", path.display());
            }
            CategoryClassifier::from_file(path)?
        }
        None => CategoryClassifier::default(),
    };

    if args.json {
        println!("{}", classifier.to_json()?);
        return Ok(());
    }

    match &table_path {
        Some(path) => println!("Category table: {}", path.display()),
        None => println!("Category table: {}", style("built-in").cyan()),
    }
    println!();

    for (rank, entry) in classifier.entries().iter().enumerate() {
        println!(
            "{:>2}. {:<14} {}",
            rank + 1,
            style(entry.category.as_str()).bold(),
            entry.keywords.join(", ")
        );
    }
    println!(
        "    {:<14} {}",
        style("other").dim(),
        style("(anything unmatched)").dim()
    );

    Ok(())
}
