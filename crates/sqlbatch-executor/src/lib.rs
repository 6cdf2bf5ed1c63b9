//! Execution backends for sqlbatch jobs.
//!
//! Provides the driver registry, the store-connection abstraction, the
//! PostgreSQL backend, and the transactional job executor.

pub mod connection;
pub mod driver;
pub mod executor;
pub mod postgres;

pub use connection::{ConnectionFactory, StoreConnection};
pub use driver::DriverRegistry;
pub use executor::SqlJobExecutor;
pub use postgres::PostgresFactory;

pub use sqlbatch_core::executor::{BatchJobExecutor, ExecutePositionTracker, InMemoryTracker};
