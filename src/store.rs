//! The persistence collaborator.
//!
//! A single background task owns the database connection and applies commands one at a time.
//! After every successful command it re-reads the affected collection and publishes it as a new
//! immutable snapshot on a `watch` channel. Subscribers always see whole collections, never
//! deltas.
//!
//! Commands are fire-and-forget. A command that fails inside the worker is logged and the
//! previous snapshot stays current.

use crate::{
    core::{budget, expense, wishlist},
    errors::{Error, Result},
    models::{BudgetSetting, Expense, NewExpense, NewWishlistItem, WishlistItem},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument};

/// An immutable copy of a whole collection.
pub type Snapshot<T> = Arc<[T]>;

/// A request to change persisted state.
#[derive(Debug)]
pub enum StoreCommand {
    /// Create a wishlist item
    InsertItem(NewWishlistItem),
    /// Replace a wishlist item, keyed by its id
    UpdateItem(WishlistItem),
    /// Atomically add to an item's saved amount
    AddSavings {
        /// Item to credit
        id: i64,
        /// Amount to add
        amount: i64,
    },
    /// Set an item's purchase flag
    SetPurchased {
        /// Item to update
        id: i64,
        /// New flag value
        purchased: bool,
    },
    /// Delete a wishlist item
    DeleteItem(i64),
    /// Record an expense
    InsertExpense(NewExpense),
    /// Delete an expense
    DeleteExpense(i64),
    /// Replace the singleton budget setting
    UpsertBudget(BudgetSetting),
    /// Resolves once every earlier command has been applied
    Sync(oneshot::Sender<()>),
}

/// Which collection a command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Items,
    Expenses,
    Budget,
}

/// Cloneable handle used to subscribe to snapshots and issue commands.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<StoreCommand>,
    items: watch::Receiver<Snapshot<WishlistItem>>,
    expenses: watch::Receiver<Snapshot<Expense>>,
    budget: watch::Receiver<Option<BudgetSetting>>,
}

impl StoreHandle {
    /// Subscribes to wishlist snapshots. The receiver starts at the current snapshot.
    #[must_use]
    pub fn subscribe_items(&self) -> watch::Receiver<Snapshot<WishlistItem>> {
        self.items.clone()
    }

    /// Subscribes to expense ledger snapshots.
    #[must_use]
    pub fn subscribe_expenses(&self) -> watch::Receiver<Snapshot<Expense>> {
        self.expenses.clone()
    }

    /// Subscribes to the budget setting. `None` until a setting has been saved.
    #[must_use]
    pub fn subscribe_budget(&self) -> watch::Receiver<Option<BudgetSetting>> {
        self.budget.clone()
    }

    /// Requests a new wishlist item.
    pub fn insert_item(&self, item: NewWishlistItem) -> Result<()> {
        self.send(StoreCommand::InsertItem(item))
    }

    /// Requests a full-record replace of a wishlist item.
    pub fn update_item(&self, item: WishlistItem) -> Result<()> {
        self.send(StoreCommand::UpdateItem(item))
    }

    /// Requests `saved_amount += amount` on an item.
    pub fn add_savings(&self, id: i64, amount: i64) -> Result<()> {
        self.send(StoreCommand::AddSavings { id, amount })
    }

    /// Requests a change of an item's purchase flag.
    pub fn set_purchased(&self, id: i64, purchased: bool) -> Result<()> {
        self.send(StoreCommand::SetPurchased { id, purchased })
    }

    /// Requests deletion of a wishlist item.
    pub fn delete_item(&self, id: i64) -> Result<()> {
        self.send(StoreCommand::DeleteItem(id))
    }

    /// Requests a new expense.
    pub fn insert_expense(&self, expense: NewExpense) -> Result<()> {
        self.send(StoreCommand::InsertExpense(expense))
    }

    /// Requests deletion of an expense.
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        self.send(StoreCommand::DeleteExpense(id))
    }

    /// Requests the budget setting be replaced.
    pub fn upsert_budget(&self, setting: BudgetSetting) -> Result<()> {
        self.send(StoreCommand::UpsertBudget(setting))
    }

    /// Waits until every command issued before this call has been applied and published.
    pub async fn sync(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(StoreCommand::Sync(done_tx))?;
        done_rx.await.map_err(|_| Error::StoreClosed)
    }

    fn send(&self, command: StoreCommand) -> Result<()> {
        self.commands.send(command).map_err(|_| Error::StoreClosed)
    }

    /// Builds a handle over raw channels with no worker behind it. The returned receiver
    /// yields every command issued through the handle.
    #[cfg(test)]
    pub(crate) fn detached(
        items: watch::Receiver<Snapshot<WishlistItem>>,
        expenses: watch::Receiver<Snapshot<Expense>>,
        budget: watch::Receiver<Option<BudgetSetting>>,
    ) -> (Self, mpsc::UnboundedReceiver<StoreCommand>) {
        let (commands, rx) = mpsc::unbounded_channel();
        (
            Self {
                commands,
                items,
                expenses,
                budget,
            },
            rx,
        )
    }
}

/// Loads the initial snapshots and spawns the store worker.
///
/// The worker runs until every [`StoreHandle`] clone has been dropped.
///
/// # Errors
/// Returns an error if the initial reads fail.
pub async fn spawn_store(db: DatabaseConnection) -> Result<(StoreHandle, JoinHandle<()>)> {
    let items = wishlist::get_all_items(&db).await?;
    let expenses = expense::get_all_expenses(&db).await?;
    let setting = budget::get_budget_setting(&db).await?;
    info!(
        "Store loaded {} wishlist items and {} expenses",
        items.len(),
        expenses.len()
    );

    let (items_tx, items_rx) = watch::channel(Snapshot::from(items));
    let (expenses_tx, expenses_rx) = watch::channel(Snapshot::from(expenses));
    let (budget_tx, budget_rx) = watch::channel(setting);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();

    let worker = StoreWorker {
        db,
        items: items_tx,
        expenses: expenses_tx,
        budget: budget_tx,
    };
    let task = tokio::spawn(worker.run(commands_rx));

    let handle = StoreHandle {
        commands: commands_tx,
        items: items_rx,
        expenses: expenses_rx,
        budget: budget_rx,
    };
    Ok((handle, task))
}

struct StoreWorker {
    db: DatabaseConnection,
    items: watch::Sender<Snapshot<WishlistItem>>,
    expenses: watch::Sender<Snapshot<Expense>>,
    budget: watch::Sender<Option<BudgetSetting>>,
}

impl StoreWorker {
    async fn run(self, mut commands: mpsc::UnboundedReceiver<StoreCommand>) {
        debug!("Store worker started");
        while let Some(command) = commands.recv().await {
            match self.apply(command).await {
                Ok(Some(collection)) => {
                    if let Err(e) = self.publish(collection).await {
                        error!("Failed to refresh {:?} snapshot: {}", collection, e);
                    }
                }
                Ok(None) => {}
                Err(e) => error!("Store command failed: {}", e),
            }
        }
        info!("Store worker stopped: all handles dropped");
    }

    #[instrument(skip(self))]
    async fn apply(&self, command: StoreCommand) -> Result<Option<Collection>> {
        let collection = match command {
            StoreCommand::InsertItem(new_item) => {
                let item = wishlist::create_item(&self.db, new_item).await?;
                info!("Added wishlist item '{}' (ID: {})", item.name, item.id);
                Collection::Items
            }
            StoreCommand::UpdateItem(item) => {
                wishlist::update_item(&self.db, &item).await?;
                Collection::Items
            }
            StoreCommand::AddSavings { id, amount } => {
                let item = wishlist::add_savings_atomic(&self.db, id, amount).await?;
                debug!("Item {} saved amount is now {}", id, item.saved_amount);
                Collection::Items
            }
            StoreCommand::SetPurchased { id, purchased } => {
                wishlist::set_purchased(&self.db, id, purchased).await?;
                Collection::Items
            }
            StoreCommand::DeleteItem(id) => {
                let removed = wishlist::delete_item(&self.db, id).await?;
                debug!("Deleted {} wishlist row(s) for ID {}", removed, id);
                Collection::Items
            }
            StoreCommand::InsertExpense(new_expense) => {
                let expense = expense::create_expense(&self.db, new_expense).await?;
                info!("Recorded expense '{}' (ID: {})", expense.name, expense.id);
                Collection::Expenses
            }
            StoreCommand::DeleteExpense(id) => {
                let removed = expense::delete_expense(&self.db, id).await?;
                debug!("Deleted {} expense row(s) for ID {}", removed, id);
                Collection::Expenses
            }
            StoreCommand::UpsertBudget(setting) => {
                budget::upsert_budget_setting(&self.db, setting).await?;
                Collection::Budget
            }
            StoreCommand::Sync(done) => {
                // Receiver may have given up waiting
                let _ = done.send(());
                return Ok(None);
            }
        };
        Ok(Some(collection))
    }

    async fn publish(&self, collection: Collection) -> Result<()> {
        match collection {
            Collection::Items => {
                let items = wishlist::get_all_items(&self.db).await?;
                self.items.send_replace(Snapshot::from(items));
            }
            Collection::Expenses => {
                let expenses = expense::get_all_expenses(&self.db).await?;
                self.expenses.send_replace(Snapshot::from(expenses));
            }
            Collection::Budget => {
                let setting = budget::get_budget_setting(&self.db).await?;
                self.budget.send_replace(setting);
            }
        }
        Ok(())
    }
}
