//! Store connection abstraction.

use async_trait::async_trait;
use sqlbatch_core::{ConnectionArguments, Result};

/// A live connection to the target store with an explicit transaction scope.
///
/// Lifecycle: `begin` opens the transaction, `execute` runs inside it,
/// `commit` ends it, and `close` releases the connection on every exit
/// path. Closing without a commit rolls the transaction back.
#[async_trait]
pub trait StoreConnection: Send {
    /// Open the explicit transaction scope. Implicit auto-commit is never
    /// used.
    async fn begin(&mut self) -> Result<()>;

    /// Send one mutating statement; returns the affected row count.
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<()>;

    /// Release the connection, rolling back if uncommitted.
    async fn close(&mut self) -> Result<()>;
}

/// Opens connections for one driver.
///
/// The credentialed path is taken iff `args.credentials()` is present;
/// otherwise the factory connects anonymously with the url alone.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + std::fmt::Debug {
    async fn connect(&self, args: &ConnectionArguments) -> Result<Box<dyn StoreConnection>>;
}
