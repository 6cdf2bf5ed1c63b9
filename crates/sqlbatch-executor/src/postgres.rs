//! PostgreSQL backend via tokio-postgres.

use async_trait::async_trait;
use sqlbatch_core::{ConnectionArguments, Error, Result};
use tokio::task::JoinHandle;
use tokio_postgres::NoTls;
use tracing::{debug, warn};

use crate::{ConnectionFactory, StoreConnection};

/// Connection factory for PostgreSQL stores.
#[derive(Debug, Default)]
pub struct PostgresFactory;

impl PostgresFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectionFactory for PostgresFactory {
    async fn connect(&self, args: &ConnectionArguments) -> Result<Box<dyn StoreConnection>> {
        let mut config: tokio_postgres::Config = args
            .url
            .parse()
            .map_err(|e: tokio_postgres::Error| Error::Connect(e.to_string()))?;
        if let Some((user, password)) = args.credentials() {
            config.user(user);
            config.password(password);
        }

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        // The connection future drives the socket until the client drops.
        let io = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "postgres connection task ended with error");
            }
        });

        debug!(url = %args.url, credentialed = args.credentials().is_some(), "connected");
        Ok(Box::new(PgConnection {
            client: Some(client),
            io,
            in_tx: false,
        }))
    }
}

struct PgConnection {
    client: Option<tokio_postgres::Client>,
    io: JoinHandle<()>,
    in_tx: bool,
}

impl PgConnection {
    fn client(&self) -> Result<&tokio_postgres::Client> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::Store("connection already closed".to_string()))
    }
}

#[async_trait]
impl StoreConnection for PgConnection {
    async fn begin(&mut self) -> Result<()> {
        self.client()?
            .batch_execute("BEGIN")
            .await
            .map_err(|e| Error::Store(e.to_string()))?;
        self.in_tx = true;
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        self.client()?
            .execute(sql, &[])
            .await
            .map_err(|e| Error::Store(e.to_string()))
    }

    async fn commit(&mut self) -> Result<()> {
        self.client()?
            .batch_execute("COMMIT")
            .await
            .map_err(|e| Error::Commit(e.to_string()))?;
        self.in_tx = false;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let mut failure = None;
        if let Some(client) = self.client.take() {
            if self.in_tx {
                // Uncommitted work must not survive the close.
                if let Err(e) = client.batch_execute("ROLLBACK").await {
                    failure = Some(Error::Cleanup(e.to_string()));
                }
                self.in_tx = false;
            }
            drop(client);
        }
        self.io.abort();
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
