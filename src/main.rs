use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use webhook_reconciler::application::dispatcher::BatchDispatcher;
use webhook_reconciler::config::ReconcilerConfig;
use webhook_reconciler::domain::notification::Notification;
use webhook_reconciler::domain::payment::PaymentRecord;
use webhook_reconciler::infrastructure::in_memory::{InMemoryPaymentStore, NoopVerifier};

/// Replays a webhook notification batch against locally seeded payment
/// records and prints the per-notification outcomes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with the payment records to seed (array of records)
    payments: PathBuf,

    /// JSON file with the notification batch (array of notifications)
    notifications: PathBuf,

    /// Maximum conflict retries per notification
    #[arg(long, default_value_t = 20)]
    max_retries: u32,

    /// Maximum simultaneously in-flight reconciliations
    #[arg(long, default_value_t = 10)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let payments: Vec<PaymentRecord> =
        serde_json::from_str(&std::fs::read_to_string(&cli.payments).into_diagnostic()?)
            .into_diagnostic()?;
    let notifications: Vec<Notification> =
        serde_json::from_str(&std::fs::read_to_string(&cli.notifications).into_diagnostic()?)
            .into_diagnostic()?;

    let store = Arc::new(InMemoryPaymentStore::new());
    for payment in payments {
        store.insert(payment).await;
    }

    let config = ReconcilerConfig {
        max_retries: cli.max_retries,
        concurrency: cli.concurrency,
        ..ReconcilerConfig::default()
    };
    let dispatcher = BatchDispatcher::new(store.clone(), Arc::new(NoopVerifier), config);

    let outcomes = dispatcher.process_batch(notifications).await;
    for (index, outcome) in outcomes.iter().enumerate() {
        println!("notification {index}: {outcome}");
    }

    let records = store.all_records().await;
    println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);

    Ok(())
}
