use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wishlist_buddy::{
    aggregator::{BudgetAggregator, WishlistAggregator},
    config::{app, database},
    core::report::{
        format_amount, format_budget_summary, format_item_line, format_progress_bar, sort_label,
    },
    errors::Result,
    store::spawn_store,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // 3. Load the application configuration
    let app_config = app::load_app_configuration()?;

    // 4. Initialize database
    let database_url = database::resolve_database_url(app_config.database_url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Connected to {}", database_url))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Start the store and build the views over it
    let (store, worker) = spawn_store(db).await?;
    let wishlist =
        WishlistAggregator::new(store.clone()).with_sort(app_config.wishlist.default_sort);
    let budget = BudgetAggregator::new(store);

    // 6. Print the report
    let prefix = &app_config.display.currency_prefix;
    println!("Wishlist ({})", sort_label(wishlist.sort()));
    let items = wishlist.view();
    if items.is_empty() {
        println!("  (empty)");
    }
    for item in &items {
        println!("  {}", format_item_line(item, prefix));
    }
    let totals = wishlist.totals();
    println!(
        "  Total saved {} of {} {}",
        format_amount(prefix, totals.total_saved),
        format_amount(prefix, totals.total_target),
        format_progress_bar(totals.overall_progress, None)
    );

    println!();
    println!("Budget");
    for line in format_budget_summary(&budget.summary(), prefix).lines() {
        println!("  {line}");
    }
    for expense in budget.expenses().iter() {
        println!("  - {}: {}", expense.name, format_amount(prefix, expense.amount));
    }

    // Dropping the last handles lets the worker finish
    drop(wishlist);
    drop(budget);
    if let Err(e) = worker.await {
        error!("Store worker panicked: {}", e);
    }
    Ok(())
}
