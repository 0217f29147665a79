use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use super::EntityStore;
use crate::data::{prepared, EntityData, Identity, Record};
use crate::error::GatewayError;

/// In-process collection seeded from sample data. Every call can be delayed
/// to behave like a network round trip.
#[derive(Debug)]
pub struct MemoryStore<D> {
    records: RwLock<Vec<Record<D>>>,
    latency: Duration,
}

impl<D: EntityData> MemoryStore<D> {
    pub fn new(seed: Vec<Record<D>>, latency: Duration) -> MemoryStore<D> {
        MemoryStore {
            records: RwLock::new(seed),
            latency,
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn not_found(id: Identity) -> GatewayError {
        GatewayError::NotFound { kind: D::KIND, id }
    }
}

#[rocket::async_trait]
impl<D: EntityData> EntityStore<D> for MemoryStore<D> {
    async fn get_all(&self) -> Result<Vec<Record<D>>, GatewayError> {
        self.delay().await;
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: Identity) -> Result<Option<Record<D>>, GatewayError> {
        self.delay().await;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|it| it.id == id)
            .cloned())
    }

    async fn create(&self, data: D) -> Result<Record<D>, GatewayError> {
        self.delay().await;
        let data = prepared(data)?;

        let mut records = self.records.write().await;
        let id = Identity::next_after(records.iter().map(|it| it.id))
            .ok_or(GatewayError::Exhausted { kind: D::KIND })?;
        let record = Record::new(id, data, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Identity, patch: D::Patch) -> Result<Record<D>, GatewayError> {
        self.delay().await;
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|it| it.id == id)
            .ok_or_else(|| Self::not_found(id))?;

        let updated = slot.merged(patch, Utc::now())?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Identity) -> Result<Record<D>, GatewayError> {
        self.delay().await;
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|it| it.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(records.remove(index))
    }
}
