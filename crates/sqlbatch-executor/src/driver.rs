//! Driver registry.

use std::collections::HashMap;
use std::sync::Arc;

use sqlbatch_core::{Error, Result};

use crate::ConnectionFactory;

/// Maps a driver identifier to its connection factory.
///
/// Registration happens at startup; an unsupported driver is a
/// configuration error at lookup time, not a runtime lookup failure inside
/// the store.
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<String, Arc<dyn ConnectionFactory>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, factory: Arc<dyn ConnectionFactory>) {
        self.factories.insert(id.into(), factory);
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<dyn ConnectionFactory>> {
        self.factories
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownDriver(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlbatch_core::ConnectionArguments;

    use crate::StoreConnection;

    #[derive(Debug)]
    struct NullFactory;

    #[async_trait]
    impl ConnectionFactory for NullFactory {
        async fn connect(&self, _args: &ConnectionArguments) -> Result<Box<dyn StoreConnection>> {
            Err(Error::Connect("null factory".to_string()))
        }
    }

    #[test]
    fn test_resolve_registered_driver() {
        let mut registry = DriverRegistry::new();
        registry.register("postgres", Arc::new(NullFactory));
        assert!(registry.resolve("postgres").is_ok());
    }

    #[test]
    fn test_unknown_driver_is_an_error() {
        let registry = DriverRegistry::new();
        assert!(matches!(
            registry.resolve("oracle").unwrap_err(),
            Error::UnknownDriver(id) if id == "oracle"
        ));
    }
}
