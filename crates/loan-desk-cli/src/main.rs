mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::customers::CustomersArgs;
use commands::dues::{AllocateArgs, DueTableArgs, SelectDuesArgs};
use commands::emi::EmiArgs;
use commands::loans::LoansArgs;
use commands::payments::{PayArgs, PaymentShowArgs};
use config::DeskConfig;

/// Loan desk: EMI previews, approvals and due payments
#[derive(Parser)]
#[command(
    name = "loandesk",
    version,
    about = "Loan desk: EMI previews, approvals and due payments",
    long_about = "A CLI for a loan desk with decimal precision. Previews EMIs, selects \
                  and allocates dues locally, and registers customers, approves loans \
                  and records payments against the loan API."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Desk configuration file (YAML)
    #[arg(long, global = true, env = "LOAN_DESK_CONFIG")]
    config: Option<String>,

    /// Loan API root, e.g. http://localhost:5000/api
    #[arg(long, global = true, env = "LOAN_DESK_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the EMI and flat schedule for loan terms
    Emi(EmiArgs),
    /// Show which dues a payment mode selects
    SelectDues(SelectDuesArgs),
    /// Total selected dues and apply a settlement discount
    Allocate(AllocateArgs),
    /// List dues with their paid/late standing
    DueTable(DueTableArgs),
    /// Customer records
    Customers(CustomersArgs),
    /// Loans held at the desk
    Loans(LoansArgs),
    /// Pay dues of a loan
    Pay(PayArgs),
    /// Show a recorded payment
    PaymentShow(PaymentShowArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let config = match DeskConfig::load(cli.config.as_deref(), cli.api_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    logging::init_logging(&config.log_level, config.log_format);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::SelectDues(args) => commands::dues::run_select_dues(args),
        Commands::Allocate(args) => commands::dues::run_allocate(args),
        Commands::DueTable(args) => commands::dues::run_due_table(args, &config),
        Commands::Customers(args) => commands::customers::run_customers(args, &config),
        Commands::Loans(args) => commands::loans::run_loans(args, &config),
        Commands::Pay(args) => commands::payments::run_pay(args, &config),
        Commands::PaymentShow(args) => commands::payments::run_payment_show(args, &config),
        Commands::Version => {
            println!("loandesk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
