//! Schema-driven data access over an encrypted statement channel.
//!
//! A [`Client`] builds `SELECT`/push statements from field and value lists,
//! encrypts them and posts them through a [`Transport`]. The [`Service`]
//! decrypts and runs them on an [`Executor`], and loaded rows are mapped
//! onto typed entities whose changes are tracked so that pushes only write
//! what changed.

mod accessor;
pub use accessor::Accessor;

mod batch;
pub use batch::Batch;

mod client;
pub use client::{Client, Transport};

mod config;
pub use config::Config;

mod connect;

mod crypto;
pub use crypto::Cipher;

mod executor;
pub use executor::Executor;

mod pool;
pub use pool::{Pool, PoolConnection};

mod registry;
pub use registry::{Entry, Registry};

mod schema_cache;
pub use schema_cache::SchemaCache;

mod service;
pub use service::Service;

pub mod wire;

pub use rowbridge_core::{
    async_trait, driver, entity, field, mapping, schema, stmt, Entity, Error, Mapper, Result,
    Schema, Tracked,
};
pub use rowbridge_sql::{stmt::Select, Flavor, Push, Serializer};

#[cfg(feature = "sqlite")]
pub use rowbridge_driver_sqlite as sqlite;
