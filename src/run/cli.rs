use anyhow::{Context, Result};
use std::path::Path;

use crate::aggregate::Summary;
use crate::models::{parse_timestamp, Period, Transaction, TransactionFilter};
use crate::store::{parse_amount, Store};
use crate::ui::util::{format_amount, format_date, recurring_label, truncate};

pub(crate) fn as_cli(args: &[String], store: &mut Store) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], store),
        "list" | "ls" => cli_list(&args[2..], store),
        "categories" => cli_categories(store),
        "summary" | "s" => cli_summary(store),
        "export" => cli_export(&args[2..], store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("pocketbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Pocketbook - local-only personal spending tracker");
    println!();
    println!("Usage: pocketbook [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  add <amount> <category> [desc]  Record a spending transaction");
    println!("    --recurring, -r               Mark it as recurring");
    println!("    --date <YYYY-MM-DD>           Record it on another day");
    println!("  list                            List transactions");
    println!("    --category <name>             Only this category (exact match)");
    println!("    --period <7d|month|a..b>      Only this period");
    println!("  categories                      List known categories");
    println!("  summary                         Print totals and spend per category");
    println!("  export [path]                   Export transactions to CSV");
    println!("    --category, --period          Same filters as list");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Data file: $POCKETBOOK_FILE, log filter: $POCKETBOOK_LOG");
}

fn cli_add(args: &[String], store: &mut Store) -> Result<()> {
    let recurring = args.iter().any(|a| a == "--recurring" || a == "-r");
    let date = flag_value(args, "--date");
    let positional = positional_args(args);

    let [amount, category, rest @ ..] = positional.as_slice() else {
        anyhow::bail!(
            "Usage: pocketbook add <amount> <category> [description] [--recurring] [--date <YYYY-MM-DD>]"
        );
    };
    let description = rest.join(" ");

    let txn = match date {
        None => store.add_transaction(amount, category, &description, recurring)?,
        Some(raw) => {
            let timestamp = parse_timestamp(raw)
                .with_context(|| format!("Invalid date '{raw}' (use YYYY-MM-DD)"))?;
            let txn = Transaction::at(
                timestamp,
                parse_amount(amount)?,
                category.trim().to_string(),
                description.trim().to_string(),
                recurring,
            );
            store.insert(txn.clone())?;
            txn
        }
    };
    println!(
        "Saved {} in {} on {}",
        format_amount(txn.amount),
        txn.category,
        format_date(&txn.timestamp)
    );
    Ok(())
}

fn cli_list(args: &[String], store: &Store) -> Result<()> {
    let filter = parse_filter(args)?;
    let txns = store.list_transactions(&filter);
    if txns.is_empty() {
        if filter.is_empty() {
            println!("No transactions");
        } else {
            println!("No transactions for {filter}");
        }
        return Ok(());
    }

    println!(
        "{:<12} {:<18} {:>14}  {:<30} Recurring",
        "Date", "Category", "Amount", "Description"
    );
    println!("{}", "─".repeat(88));
    for txn in &txns {
        println!(
            "{:<12} {:<18} {:>14}  {:<30} {}",
            format_date(&txn.timestamp),
            truncate(&txn.category, 18),
            format_amount(txn.amount),
            truncate(&txn.description, 30),
            recurring_label(txn.recurring),
        );
    }
    println!("{}", "─".repeat(88));
    println!(
        "{} transactions, {}",
        txns.len(),
        format_amount(crate::aggregate::total_spend(txns.iter().copied()))
    );
    Ok(())
}

fn cli_categories(store: &Store) -> Result<()> {
    let categories = store.list_categories();
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    for name in categories {
        println!("{name}");
    }
    Ok(())
}

fn cli_summary(store: &Store) -> Result<()> {
    let all: Vec<_> = store.transactions().iter().collect();
    let summary = Summary::of(&all);

    println!("Pocketbook summary");
    println!("{}", "─".repeat(40));
    println!("  Total Spent: {}", format_amount(summary.total));
    println!("  Total Txns:  {}", summary.count);
    println!("  Data file:   {}", store.path().display());

    if !summary.shares.is_empty() {
        println!();
        println!("Spending by Category:");
        for share in &summary.shares {
            println!(
                "  {:<20} {:>14} {:>6.1}%",
                truncate(&share.category, 20),
                format_amount(share.amount),
                share.percent
            );
        }
    }
    Ok(())
}

fn cli_export(args: &[String], store: &Store) -> Result<()> {
    let filter = parse_filter(args)?;

    // Output path is the first argument that is neither a flag nor a flag's value
    let output_path = positional_args(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let stamp = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/pocketbook-export-{stamp}.csv")
        });

    let txns = store.list_transactions(&filter);
    if txns.is_empty() {
        println!("No transactions to export");
        return Ok(());
    }
    let count = crate::export::export_to_csv(Path::new(&output_path), &txns)?;
    println!("Exported {count} transactions to {output_path}");
    Ok(())
}

/// Build a filter from `--category <name>` and `--period <7d|month|a..b>` flags.
fn parse_filter(args: &[String]) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::default();
    if let Some(name) = flag_value(args, "--category") {
        filter = filter.with_category(name);
    }
    if let Some(raw) = flag_value(args, "--period") {
        let period = Period::parse(raw).with_context(|| {
            format!("Invalid period '{raw}' (use 7d, month or YYYY-MM-DD..YYYY-MM-DD)")
        })?;
        filter = filter.with_period(period);
    }
    Ok(filter)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither a known flag nor a flag's value.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" | "--period" | "--date" => {
                iter.next();
            }
            "--recurring" | "-r" => {}
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
