use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tuitionpay::application::service::PaymentService;
use tuitionpay::config::AppConfig;
use tuitionpay::domain::installment::InstallmentId;
use tuitionpay::domain::payment::{Payer, PaymentSubmission};
use tuitionpay::domain::ports::{ClockBox, FixedClock, RecordStoreBox, SystemClock};
use tuitionpay::infrastructure::in_memory::InMemoryRecordStore;
use tuitionpay::infrastructure::notifier::WriterNotifier;
use tuitionpay::interfaces::csv::record_writer::RecordWriter;
use tuitionpay::interfaces::csv::schedule_writer::ScheduleWriter;
use tuitionpay::interfaces::csv::submission_reader::SubmissionReader;
use tuitionpay::interfaces::email::confirmation::ConfirmationTemplate;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file. Uses the built-in tuition plan when omitted.
    #[arg(long, env = "TUITIONPAY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a single payment and print its confirmation.
    Pay {
        #[arg(long)]
        name: String,
        #[arg(long)]
        student_number: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        reference_number: Option<String>,
        /// Installment identifier; repeat for several.
        #[arg(long = "installment", required = true)]
        installments: Vec<String>,
        /// Amount paid, used in simple balance mode.
        #[arg(long)]
        payment_made: Option<Decimal>,
        /// Reference date for lateness (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Process every submission in a CSV file.
    Batch {
        input: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Print stored payments, most recent first, as CSV.
    History,
    /// Print the configured installment schedule as CSV.
    Schedule,
}

fn open_record_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = tuitionpay::infrastructure::rocksdb::RocksDbRecordStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryRecordStore::new()))
        }
        None => Ok(Box::new(InMemoryRecordStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tuitionpay=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path).into_diagnostic()?,
        None => AppConfig::default(),
    };

    let as_of = match &cli.command {
        Command::Pay { as_of, .. } | Command::Batch { as_of, .. } => *as_of,
        Command::History | Command::Schedule => None,
    };
    let clock: ClockBox = match as_of {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };

    let notifier = WriterNotifier::new(
        ConfirmationTemplate::new(config.institution.clone()),
        io::stdout(),
    );
    let record_store = open_record_store(cli.db_path)?;
    let service = PaymentService::new(&config, Box::new(notifier), record_store, clock)
        .into_diagnostic()?;

    match cli.command {
        Command::Pay {
            name,
            student_number,
            email,
            reference_number,
            installments,
            payment_made,
            ..
        } => {
            let mut submission = PaymentSubmission::new(
                Payer::new(name, student_number, email),
                installments.into_iter().map(InstallmentId::from).collect(),
            );
            if let Some(reference) = reference_number {
                submission = submission.with_reference_number(reference);
            }
            submission.payment_made = payment_made;

            let summary = service.process(submission).await.into_diagnostic()?;
            println!("{}", serde_json::to_string(&summary).into_diagnostic()?);
        }
        Command::Batch { input, .. } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = SubmissionReader::new(file);
            for submission in reader.submissions() {
                match submission {
                    Ok(submission) => {
                        let student = submission.payer.student_number.clone();
                        match service.process(submission).await {
                            Ok(summary) => {
                                println!(
                                    "{}",
                                    serde_json::to_string(&summary).into_diagnostic()?
                                );
                            }
                            Err(e) => {
                                error!(%student, "Error processing payment: {}", e);
                            }
                        }
                    }
                    Err(e) => {
                        error!("Error reading submission: {}", e);
                    }
                }
            }
        }
        Command::History => {
            let records = service.history().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = RecordWriter::new(stdout.lock());
            writer.write_records(&records).into_diagnostic()?;
        }
        Command::Schedule => {
            let stdout = io::stdout();
            let mut writer = ScheduleWriter::new(stdout.lock());
            writer
                .write_schedule(service.calculator())
                .into_diagnostic()?;
        }
    }

    Ok(())
}
