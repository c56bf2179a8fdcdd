use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::Result;
use vld_schemas::Shipment;

use crate::ShipmentStore;

/// In-memory shipment store.
///
/// Backs scenario tests and ephemeral sessions. Same contract as the SQLite
/// store: `put` replaces the whole record, keys are shipment ids.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, Shipment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shipments (test assertions).
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ShipmentStore for MemoryStore {
    async fn put(&self, shipment: &Shipment) -> Result<()> {
        let mut map = self.inner.write().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        map.insert(shipment.id.clone(), shipment.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Shipment>> {
        let map = self.inner.read().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        Ok(map.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Shipment>> {
        let map = self.inner.read().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        Ok(map.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut map = self.inner.write().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        map.remove(id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut map = self.inner.write().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        map.clear();
        Ok(())
    }
}
