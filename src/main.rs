use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use orderflow::application::pipeline::OrderPipeline;
use orderflow::application::workflow::{FulfillmentWorkflow, OrderRequest};
use orderflow::config::{AppConfig, ReviewPolicy};
use orderflow::domain::customer::{Customer, CustomerId};
use orderflow::domain::ports::{CustomerStoreBox, NotifierBox, OrderStoreBox};
use orderflow::infrastructure::in_memory::{InMemoryCustomerStore, InMemoryOrderStore};
use orderflow::infrastructure::notifier::LogNotifier;
use orderflow::interfaces::csv::item_reader::ItemReader;
use orderflow::interfaces::csv::receipt_writer::{ReceiptWriter, write_receipt_json};
use orderflow::payment::PaymentDispatcher;
use orderflow::telemetry;
use std::fs::File;
use std::io;
use std::path::PathBuf;

const DEMO_CUSTOMER_ID: u32 = 1001;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Order line items CSV file (product_name, price, quantity)
    items: PathBuf,

    /// Customer placing the order
    #[arg(long, default_value_t = DEMO_CUSTOMER_ID)]
    customer_id: u32,

    /// Payment method (Stripe, Credit Card, PayPal, Debit Card)
    #[arg(long, default_value = "Stripe")]
    payment_method: String,

    /// Configuration file. Defaults to orderflow.{toml,json,yaml} in the working directory, if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides pipeline.review_policy for orders flagged by the fraud rule
    #[arg(long, value_enum)]
    review_policy: Option<ReviewPolicy>,

    /// Client IP address to check against the blocklist
    #[arg(long)]
    client_ip: Option<String>,

    /// Receipt format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

/// Customer the simulated customer database knows about.
fn demo_customer() -> Customer {
    Customer::new(
        CustomerId(DEMO_CUSTOMER_ID),
        "Lee Gu",
        "lee.gu@example.com",
        "+1-555-0123",
        "123 Main St, Seattle, WA 98765",
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(policy) = cli.review_policy {
        config.pipeline.review_policy = policy;
    }
    tracing::info!(
        application = %config.application.name,
        version = %config.application.version,
        environment = %config.application.environment,
        review_policy = ?config.pipeline.review_policy,
        fraud_detection = config.pipeline.enable_fraud_detection,
        email_notifications = config.notifications.enable_email,
        "configuration loaded"
    );
    for key in config.missing_secrets() {
        tracing::warn!(key = key.name(), env = %key.env_var(), "configuration value not set");
    }

    let file = File::open(&cli.items).into_diagnostic()?;
    let items = ItemReader::new(file)
        .items()
        .collect::<std::result::Result<Vec<_>, _>>()
        .into_diagnostic()?;

    let pipeline = OrderPipeline::new(
        PaymentDispatcher::from_settings(&config.payments),
        config.pipeline,
    );
    let customers: CustomerStoreBox =
        Box::new(InMemoryCustomerStore::with_customers([demo_customer()]));
    let orders: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let notifier: NotifierBox = Box::new(LogNotifier::new(config.notifications.clone()));

    let workflow = FulfillmentWorkflow::new(pipeline, customers, orders, notifier)
        .with_email_notifications(config.notifications.enable_email);

    let summary = workflow
        .run(OrderRequest {
            customer_id: CustomerId(cli.customer_id),
            items,
            payment_method: cli.payment_method,
            client_ip: cli.client_ip,
        })
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => ReceiptWriter::new(stdout.lock())
            .write_receipt(&summary)
            .into_diagnostic()?,
        OutputFormat::Json => write_receipt_json(stdout.lock(), &summary).into_diagnostic()?,
    }

    Ok(())
}
