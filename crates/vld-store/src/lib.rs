//! vld-store
//!
//! Persistence contract for the shipment aggregate, keyed by shipment id.
//!
//! The workflow layer treats every mutation as read-modify-write: fetch the
//! current record, apply one transition in memory, persist the full updated
//! record with a single `put`. A `put` must be atomic (no torn writes); no
//! multi-key transaction is required because each shipment is mutated
//! independently.
//!
//! Two implementations ship here: [`SqliteStore`] (durable, via sqlx) and
//! [`MemoryStore`] (scenario tests and ephemeral sessions). Any key-value
//! backend satisfying [`ShipmentStore`] is substitutable.

use anyhow::Result;
use vld_schemas::Shipment;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{connect, connect_from_env, migrate, SqliteStore, ENV_DB_URL};

/// Durable key-value store for shipment aggregates.
#[async_trait::async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Upsert: full-record replace, atomic per call.
    async fn put(&self, shipment: &Shipment) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Shipment>>;

    async fn get_all(&self) -> Result<Vec<Shipment>>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
