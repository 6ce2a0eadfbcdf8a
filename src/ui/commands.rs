use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, InputMode, Screen};
use crate::models::Period;
use crate::store::Store;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Pocketbook", cmd_quit, r);
    register_command!("quit", "Quit Pocketbook", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 12.50 Food Lunch), no args opens the form",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a 12.50 Food Lunch)", cmd_add, r);
    register_command!(
        "filter",
        "Filter by category (e.g. :filter Food), no args clears",
        cmd_filter,
        r
    );
    register_command!("f", "Filter by category (e.g. :f Food)", cmd_filter, r);
    register_command!(
        "period",
        "Filter by period: 7d, month, or YYYY-MM-DD..YYYY-MM-DD",
        cmd_period,
        r
    );
    register_command!("p", "Filter by period (e.g. :p 7d)", cmd_period, r);
    register_command!("clear", "Clear all filters", cmd_clear, r);
    register_command!(
        "export",
        "Export shown transactions to CSV (e.g. :export ~/spending.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, store)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Inline `:add` arguments: `<amount> <category> [description...] [--recurring]`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct QuickAdd {
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) recurring: bool,
}

pub(crate) fn parse_quick_add(args: &str) -> Option<QuickAdd> {
    let mut recurring = false;
    let words: Vec<&str> = args
        .split_whitespace()
        .filter(|w| {
            let flag = matches!(*w, "--recurring" | "-r");
            recurring |= flag;
            !flag
        })
        .collect();
    let (amount, rest) = words.split_first()?;
    let (category, description) = rest.split_first()?;
    Some(QuickAdd {
        amount: amount.to_string(),
        category: category.to_string(),
        description: description.join(" "),
        recurring,
    })
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(store);
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh(store);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.open_form();
        return Ok(());
    }
    let Some(quick) = parse_quick_add(args) else {
        app.set_status("Usage: :add <amount> <category> [description] [--recurring]");
        return Ok(());
    };
    app.form.amount = quick.amount;
    app.form.category = quick.category;
    app.form.description = quick.description;
    app.form.recurring = quick.recurring;
    // A failed inline add drops into the form so the input can be fixed
    if !app.submit_form(store) {
        app.input_mode = InputMode::Adding;
    }
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.filter.category = None;
        app.set_status("Category filter cleared");
    } else {
        if !app.categories.iter().any(|c| c == args) {
            app.set_status(format!("No transactions in category '{args}' yet"));
        } else {
            app.set_status(format!("Filtering by category: {args}"));
        }
        app.filter.category = Some(args.to_string());
    }
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh(store);
    Ok(())
}

fn cmd_period(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.filter.period = None;
        app.set_status("Period filter cleared");
    } else {
        match Period::parse(args) {
            Some(period) => {
                app.filter.period = Some(period);
                app.set_status(format!("Showing {period}"));
            }
            None => {
                app.set_status("Invalid period. Use 7d, month, or YYYY-MM-DD..YYYY-MM-DD");
                return Ok(());
            }
        }
    }
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh(store);
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    app.filter = Default::default();
    app.refresh(store);
    app.set_status("Filters cleared");
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(format!("{home}/pocketbook-export.csv"))
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };

    let shown: Vec<&crate::models::Transaction> = app.transactions.iter().collect();
    match crate::export::export_to_csv(&path, &shown) {
        Ok(count) => app.set_status(format!("Exported {count} transactions to {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}
