use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{BudgetReport, LedgerService, MonthlyReport, YearlyReport};
use crate::config::{Config, DEFAULT_DATABASE_PATH};
use crate::domain::{
    CategoryTotal, Transaction, TransactionFilter, TransactionType, TransactionUpdate, YearMonth,
    format_usd, parse_cents,
};
use crate::io::ExportFormat;
use crate::storage::DEFAULT_STORAGE_KEY;

/// fintrack - income, expenses and monthly budgets
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Track income and expenses, set monthly category budgets, see where the money went")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(long, env = "FINTRACK_DB", default_value = DEFAULT_DATABASE_PATH, global = true)]
    pub database: String,

    /// Storage key the ledger is kept under
    #[arg(long, env = "FINTRACK_KEY", default_value = DEFAULT_STORAGE_KEY, global = true)]
    pub key: String,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and an empty ledger
    Init,

    /// Record an income or expense
    Add {
        /// Transaction type: income or expense
        kind: String,

        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category (e.g., "Food", "Salary")
        #[arg(short, long)]
        category: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an existing transaction
    Edit {
        /// Transaction ID
        id: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List transactions, newest first
    List {
        /// Filter by type: all, income, expense
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,

        /// Filter by category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Filter by month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show total income, expenses and balance
    Summary,

    /// Show selectable categories
    Categories {
        /// Only categories for this type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export the ledger as json, text or csv
    Export {
        /// Format: json, text, csv
        format: String,

        /// Output file ("-" for stdout, defaults to the export's file name)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace the ledger with a JSON export
    Import {
        /// Input file
        input: String,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly limit for a category (replaces an existing one)
    Set {
        /// Expense category
        category: String,

        /// Monthly limit (e.g., "400" or "400.00")
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// List all budgets
    List,

    /// Show spending against each budget
    Status {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Remove a budget
    Remove {
        /// Expense category
        category: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Per-category totals for a month
    Monthly {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Month-by-month income and expenses for a year
    Yearly {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(&self.database)
            .with_storage_key(&self.key)
            .with_verbosity(self.verbose)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();
        let mut service = LedgerService::open(&config).await?;

        match self.command {
            Commands::Init => {
                service.save().await?;
                println!("Database initialized: {}", config.database_path.display());
            }

            Commands::Add {
                kind,
                amount,
                category,
                description,
                date,
            } => {
                let kind = parse_kind(&kind)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };

                let added = service
                    .add_transaction(kind, description, amount_cents, category, date)
                    .await?;
                println!(
                    "Recorded {}: {} {} on {} ({})",
                    added.kind,
                    format_usd(added.amount_cents),
                    added.category,
                    added.date,
                    added.id
                );
            }

            Commands::Edit {
                id,
                description,
                amount,
                category,
                date,
            } => {
                let update = TransactionUpdate {
                    description,
                    amount_cents: amount
                        .map(|a| parse_cents(&a))
                        .transpose()
                        .context("Invalid amount format. Use '50.00' or '50'")?,
                    category,
                    date: date.map(|d| parse_date(&d)).transpose()?,
                };
                let edited = service.edit_transaction(&id, update).await?;
                println!("Updated transaction {}", edited.id);
                print_transactions(&[&edited]);
            }

            Commands::Delete { id, yes } => {
                let Some(transaction) = service.ledger().find_transaction(&id).cloned() else {
                    println!("No transaction with id {}", id);
                    return Ok(());
                };
                print_transactions(&[&transaction]);
                if !yes && !confirm("Are you sure you want to delete this transaction?")? {
                    println!("Cancelled");
                    return Ok(());
                }
                service.delete_transaction(&id).await?;
                println!("Deleted transaction {}", id);
            }

            Commands::List {
                kind,
                category,
                month,
                limit,
            } => {
                let filter = TransactionFilter::from_selectors(
                    &kind,
                    &category,
                    month.as_deref().unwrap_or(""),
                )?;
                let mut transactions = service.list_transactions(&filter);
                if let Some(limit) = limit {
                    transactions.truncate(limit);
                }

                if transactions.is_empty() {
                    println!("No transactions found.");
                } else {
                    print_transactions(&transactions);
                }
            }

            Commands::Summary => {
                let summary = service.summary();
                println!("{:<10} {:>14}", "Income", format_usd(summary.income_total));
                println!("{:<10} {:>14}", "Expenses", format_usd(summary.expense_total));
                println!("{}", "-".repeat(25));
                println!("{:<10} {:>14}", "Balance", format_usd(summary.balance));
            }

            Commands::Categories { kind } => {
                let categories = match kind {
                    Some(kind) => service.categories(parse_kind(&kind)?),
                    None => service.filter_categories(),
                };
                for category in categories {
                    println!("{}", category);
                }
            }

            Commands::Budget(cmd) => run_budget_command(&mut service, cmd).await?,

            Commands::Report(cmd) => run_report_command(&service, cmd)?,

            Commands::Export { format, output } => {
                let format = ExportFormat::from_str(&format).with_context(|| {
                    format!("Invalid export format '{}'. Valid formats: json, text, csv", format)
                })?;
                let snapshot = service.export_snapshot(format)?;

                match output.as_deref() {
                    Some("-") => snapshot.write_to(io::stdout().lock())?,
                    path => {
                        let path = path.unwrap_or(snapshot.filename);
                        let file = File::create(path)
                            .with_context(|| format!("Failed to create output file: {}", path))?;
                        snapshot.write_to(file)?;
                        eprintln!("Exported {} ({}) to {}", format.as_str(), snapshot.mime_type, path);
                    }
                }
            }

            Commands::Import { input, dry_run } => {
                let content = std::fs::read_to_string(&input)
                    .with_context(|| format!("Failed to read input file: {}", input))?;
                let summary = service.import_snapshot(&content, dry_run).await?;

                if dry_run {
                    println!("Validation successful");
                } else {
                    println!("Import complete");
                }
                println!("  Transactions: {}", summary.transactions);
                println!("  Budgets:      {}", summary.budgets);
            }
        }

        Ok(())
    }
}

async fn run_budget_command(service: &mut LedgerService, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Set { category, amount } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '400.00' or '400'")?;
            let budget = service.upsert_budget(&category, amount_cents).await?;
            println!(
                "Budget for {} set to {} per month",
                budget.category,
                format_usd(budget.amount_cents)
            );
        }

        BudgetCommands::List => {
            let budgets = service.list_budgets();
            if budgets.is_empty() {
                println!("No budgets set. Add one with 'fintrack budget set <category> <amount>'.");
                return Ok(());
            }
            println!("{:<20} {:>14}", "CATEGORY", "MONTHLY LIMIT");
            println!("{}", "-".repeat(35));
            for budget in budgets {
                println!(
                    "{:<20} {:>14}",
                    truncate(&budget.category, 20),
                    format_usd(budget.amount_cents)
                );
            }
        }

        BudgetCommands::Status { month } => {
            let month = parse_month(month.as_deref())?;
            print_budget_report(&service.budget_report(month));
        }

        BudgetCommands::Remove { category } => {
            let budget = service.remove_budget(&category).await?;
            println!("Removed budget for {}", budget.category);
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Table,
    Json,
}

fn parse_report_format(s: &str) -> Result<ReportFormat> {
    match s.to_lowercase().as_str() {
        "table" => Ok(ReportFormat::Table),
        "json" => Ok(ReportFormat::Json),
        _ => anyhow::bail!("Invalid report format '{}'. Valid formats: table, json", s),
    }
}

fn run_report_command(service: &LedgerService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Monthly { month, format } => {
            let format = parse_report_format(&format)?;
            let report = service.monthly_report(parse_month(month.as_deref())?);
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                ReportFormat::Table => print_monthly_report(&report),
            }
        }

        ReportCommands::Yearly { year, format } => {
            let format = parse_report_format(&format)?;
            let year = year.unwrap_or_else(|| Local::now().year());
            let report = service.yearly_report(year);
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                ReportFormat::Table => print_yearly_report(&report),
            }
        }
    }

    Ok(())
}

fn print_transactions(transactions: &[&Transaction]) {
    println!(
        "{:<10}  {:<7}  {:<24}  {:<16}  {:>13}  ID",
        "DATE", "TYPE", "DESCRIPTION", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(82));
    for t in transactions {
        let sign = if t.is_income() { "+" } else { "-" };
        println!(
            "{:<10}  {:<7}  {:<24}  {:<16}  {:>13}  {}",
            t.date.format("%Y-%m-%d"),
            t.kind,
            truncate(&t.description, 24),
            truncate(&t.category, 16),
            format!("{}{}", sign, format_usd(t.amount_cents)),
            t.id
        );
    }
}

fn print_budget_report(report: &BudgetReport) {
    println!("Budgets for {}", report.month.label());
    println!();

    if report.budgets.is_empty() {
        println!("No budgets set. Add one with 'fintrack budget set <category> <amount>'.");
        return;
    }

    for progress in &report.budgets {
        println!(
            "{:<20} {} / {}",
            truncate(&progress.category, 20),
            format_usd(progress.spent),
            format_usd(progress.limit)
        );
        let filled = (progress.percentage as usize * 20) / 100;
        println!(
            "  [{}{}] {:>3}%  {} remaining{}",
            "#".repeat(filled),
            ".".repeat(20 - filled),
            progress.percentage,
            format_usd(progress.remaining),
            if progress.is_over() { "  (over budget)" } else { "" }
        );
    }
}

fn print_monthly_report(report: &MonthlyReport) {
    println!("Monthly Report: {}", report.month.label());
    println!();
    println!("Income:   {}", format_usd(report.summary.income_total));
    println!("Expenses: {}", format_usd(report.summary.expense_total));
    println!("Net:      {}", format_usd(report.summary.balance));

    print_category_totals("INCOME", &report.categories.income);
    print_category_totals("EXPENSES", &report.categories.expense);
}

fn print_category_totals(title: &str, totals: &[CategoryTotal]) {
    println!();
    println!("{:<20} {:>14} {:>6} {:>8}", title, "TOTAL", "COUNT", "PERCENT");
    println!("{}", "-".repeat(51));
    if totals.is_empty() {
        println!("(none)");
        return;
    }
    for total in totals {
        println!(
            "{:<20} {:>14} {:>6} {:>7.1}%",
            truncate(&total.category, 20),
            format_usd(total.total),
            total.count,
            total.percentage
        );
    }
}

fn print_yearly_report(report: &YearlyReport) {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    println!("Yearly Report: {}", report.series.year);
    println!();
    println!("{:<6} {:>14} {:>14} {:>14}", "MONTH", "INCOME", "EXPENSES", "NET");
    println!("{}", "-".repeat(51));

    let net = report.series.net();
    for (i, name) in MONTHS.iter().enumerate() {
        println!(
            "{:<6} {:>14} {:>14} {:>14}",
            name,
            format_usd(report.series.income[i]),
            format_usd(report.series.expense[i]),
            format_usd(net[i])
        );
    }

    println!("{}", "-".repeat(51));
    println!(
        "{:<6} {:>14} {:>14} {:>14}",
        "TOTAL",
        format_usd(report.summary.income_total),
        format_usd(report.summary.expense_total),
        format_usd(report.summary.balance)
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn parse_kind(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s)
        .with_context(|| format!("Invalid transaction type '{}'. Use income or expense", s))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", s))
}

fn parse_month(s: Option<&str>) -> Result<YearMonth> {
    match s {
        Some(s) => Ok(s.parse()?),
        None => Ok(YearMonth::current()),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
