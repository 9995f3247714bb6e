//! Connections checked out per executor call.

use rowbridge_core::{
    driver::{Connection, Driver},
    Error,
};
use deadpool::managed::{self, Metrics, Object, PoolConfig, RecycleResult};
use std::ops::{Deref, DerefMut};

/// A deadpool-managed set of driver connections.
///
/// Sized by the driver when it has a hard limit (one for an in-memory
/// SQLite database, so every call sees the same data), otherwise by
/// deadpool's default.
#[derive(Debug)]
pub struct Pool {
    inner: managed::Pool<Opener>,
}

impl Pool {
    pub fn new(driver: impl Driver) -> crate::Result<Pool> {
        let config = match driver.max_connections() {
            Some(max_size) => PoolConfig::new(max_size),
            None => PoolConfig::default(),
        };

        let opener = Opener {
            driver: Box::new(driver),
        };

        managed::Pool::builder(opener)
            .config(config)
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map(|inner| Pool { inner })
            .map_err(Error::connection_pool)
    }

    /// Waits for a free connection, opening one if the pool has room.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        match self.inner.get().await {
            Ok(object) => Ok(PoolConnection(object)),
            Err(err) => Err(Error::connection_pool(err)),
        }
    }
}

#[derive(Debug)]
struct Opener {
    driver: Box<dyn Driver>,
}

impl managed::Manager for Opener {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Box<dyn Connection>, Error> {
        self.driver.connect().await
    }

    async fn recycle(&self, _: &mut Box<dyn Connection>, _: &Metrics) -> RecycleResult<Error> {
        Ok(())
    }
}

/// A checked-out connection; returns to the pool on drop.
pub struct PoolConnection(Object<Opener>);

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Box<dyn Connection> {
        &self.0
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Box<dyn Connection> {
        &mut self.0
    }
}
