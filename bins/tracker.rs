use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, info, warn};

use configs::AppConfig;
use models::CustomerInput;
use service::presenter::format_money;
use service::storage::JsonFileStorage;
use service::transfer::export_file_name;
use service::{ServiceError, Tracker, TrackerSettings};

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Subscription renewal tracker")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
    /// Evaluate due dates against this day instead of the local clock (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a customer
    Add(RecordArgs),
    /// Edit the customer at a store position (see `list`)
    Edit {
        index: usize,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Remove the customer at a store position
    Remove {
        index: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List customers by due date
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show profit and renewal figures
    Dashboard,
    /// Write a JSON snapshot of every record
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace all records with a JSON snapshot
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long)]
    name: String,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    due: String,
    /// unitv | iptv | other
    #[arg(long, default_value = "")]
    service: String,
    #[arg(long, default_value = "")]
    fee: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    due: Option<String>,
    #[arg(long)]
    service: Option<String>,
    #[arg(long)]
    fee: Option<String>,
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, models::DATE_FORMAT).map_err(|e| e.to_string())
}

fn init_logging(json: bool) {
    // load .env first so RUST_LOG / CONFIG_PATH apply
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    std::panic::set_hook(Box::new(|info| {
        error!(event = "panic", message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ServiceError>() {
                Some(se) if se.is_user_facing() => warn!(code = se.code(), "{se}"),
                Some(se) => error!(code = se.code(), "{se}"),
                None => error!("{e:#}"),
            }
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().context("loading configuration")?;
    common::env::ensure_data_dir(&cfg.tracker.data_path).await?;
    let storage = JsonFileStorage::new(&cfg.tracker.data_path, cfg.tracker.storage_key.clone());
    let mut tracker = Tracker::open(storage, TrackerSettings::from_config(&cfg)).await?;
    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    info!(event = "start", data_path = %cfg.tracker.data_path, %today, "tracker ready");

    match cli.command {
        Command::Add(args) => {
            let input = CustomerInput { name: args.name, due_date: args.due, service_type: args.service, monthly_fee: args.fee };
            tracker.submit(input).await?;
            println!("Customer added.");
        }
        Command::Edit { index, fields } => {
            let mut input = tracker.edit_form(index)?;
            if let Some(name) = fields.name { input.name = name; }
            if let Some(due) = fields.due { input.due_date = due; }
            if let Some(service) = fields.service { input.service_type = service; }
            if let Some(fee) = fields.fee { input.monthly_fee = fee; }
            tracker.edit(index, input).await?;
            println!("Customer updated.");
        }
        Command::Remove { index, yes } => {
            let prompt = tracker.delete_prompt(index)?;
            if !yes && !confirm(&prompt)? {
                println!("Removal cancelled.");
                return Ok(());
            }
            let removed = tracker.delete(index).await?;
            println!("Customer \"{}\" removed.", removed.name);
        }
        Command::List { search } => {
            let rows = tracker.list(&search, today);
            if rows.is_empty() {
                println!("No customers registered yet.");
            }
            for row in rows {
                println!(
                    "[{:>3}] {:<24} {:>10}  {:<5}  {:>12}  {:<8} {}",
                    row.original_index,
                    row.name,
                    row.due_date,
                    row.service,
                    row.fee,
                    row.status.severity.as_str(),
                    row.status.label
                );
            }
        }
        Command::Dashboard => {
            let d = tracker.dashboard(today);
            println!("Monthly profit:       {}", format_money(d.monthly_profit));
            println!("Upcoming receivable:  {}", format_money(d.upcoming_receivable));
            println!("Active customers:     {}", d.active_count);
            println!("Overdue customers:    {}", d.overdue_count);
        }
        Command::Export { out } => {
            let snapshot = tracker.export()?;
            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(today)));
            tokio::fs::write(&path, snapshot).await.with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} record(s) to {}.", tracker.store().len(), path.display());
        }
        Command::Import { file, yes } => {
            let text = tokio::fs::read_to_string(&file).await.with_context(|| format!("reading {}", file.display()))?;
            let plan = tracker.prepare_import(&text)?;
            if !yes && !confirm(&plan.summary())? {
                println!("Import cancelled.");
                return Ok(());
            }
            let gained = plan.records_gained();
            tracker.confirm_import(plan).await?;
            println!("Imported {} record(s).", gained);
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} Continue? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).map_err(|e| anyhow!("reading confirmation: {e}"))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
