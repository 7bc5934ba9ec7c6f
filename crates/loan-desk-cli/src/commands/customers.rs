use clap::{Args, Subcommand};

use loan_desk_core::records::CustomerForm;
use loan_desk_core::CustomerId;

use super::{desk, today, CommandResult};
use crate::config::DeskConfig;
use crate::input;

/// Customer records
#[derive(Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Subcommand)]
pub enum CustomersCommand {
    /// List customers, optionally filtered by name or phone
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one customer
    Show { id: String },
    /// Register a customer
    Add(AddCustomerArgs),
}

/// Intake form fields
#[derive(Args)]
pub struct AddCustomerArgs {
    /// Path to JSON form (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "")]
    pub name: String,

    /// 10-digit phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub contact: String,

    #[arg(long, default_value = "")]
    pub occupation: String,

    /// Monthly income
    #[arg(long, default_value = "")]
    pub income: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub dob: String,
}

pub fn run_customers(args: CustomersArgs, config: &DeskConfig) -> CommandResult {
    match args.command {
        CustomersCommand::List { search } => {
            let mut session = desk(config)?;
            let customers = session.load_customers(search.as_deref())?;
            Ok(serde_json::to_value(customers)?)
        }
        CustomersCommand::Show { id } => {
            let mut session = desk(config)?;
            let customer = session.select_customer(&CustomerId::new(id))?;
            Ok(serde_json::to_value(customer)?)
        }
        CustomersCommand::Add(form_args) => {
            let form = match form_args.input.as_deref() {
                Some(path) => input::file::read_json(path)?,
                None => CustomerForm {
                    name: form_args.name,
                    phone: form_args.phone,
                    contact: form_args.contact,
                    occupation: form_args.occupation,
                    income: form_args.income,
                    dob: form_args.dob,
                },
            };
            let created = desk(config)?.add_customer(&form, today())?;
            Ok(serde_json::to_value(created)?)
        }
    }
}
