//! CRUD access to one entity collection, independent of where the records
//! live.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::data::{
    ActivityData, CourseData, DepartmentData, EntityData, IntoIdentity, Record, StudentData,
    TeacherData,
};
use crate::data::seed::SampleData;
use crate::data::Identity;
use crate::error::GatewayError;
use crate::remote::RecordService;

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

/// Backing storage of a [`Gateway`].
#[rocket::async_trait]
pub trait EntityStore<D: EntityData>: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Record<D>>, GatewayError>;

    async fn get_by_id(&self, id: Identity) -> Result<Option<Record<D>>, GatewayError>;

    async fn create(&self, data: D) -> Result<Record<D>, GatewayError>;

    async fn update(&self, id: Identity, patch: D::Patch) -> Result<Record<D>, GatewayError>;

    async fn delete(&self, id: Identity) -> Result<Record<D>, GatewayError>;
}

pub struct Gateway<D: EntityData> {
    store: Arc<dyn EntityStore<D>>,
}

impl<D: EntityData> Clone for Gateway<D> {
    fn clone(&self) -> Self {
        Gateway {
            store: self.store.clone(),
        }
    }
}

impl<D: EntityData> Debug for Gateway<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gateway<{}>", D::KIND)
    }
}

impl<D: EntityData> Gateway<D> {
    pub fn new(store: Arc<dyn EntityStore<D>>) -> Gateway<D> {
        Gateway { store }
    }

    pub fn in_memory(seed: Vec<Record<D>>, latency: Duration) -> Gateway<D> {
        Gateway::new(Arc::new(MemoryStore::new(seed, latency)))
    }

    pub fn remote(service: Arc<dyn RecordService>) -> Gateway<D> {
        Gateway::new(Arc::new(RemoteStore::new(service)))
    }

    #[tracing::instrument(skip(self), fields(kind = %D::KIND))]
    pub async fn get_all(&self) -> Result<Vec<Record<D>>, GatewayError> {
        self.store.get_all().await
    }

    /// Record with the given identity, or `None` when there is none.
    #[tracing::instrument(skip(self, id), fields(kind = %D::KIND))]
    pub async fn get_by_id(&self, id: impl IntoIdentity) -> Result<Option<Record<D>>, GatewayError> {
        let id = id.into_identity()?;
        self.store.get_by_id(id).await
    }

    /// Stores `data` under a fresh identity. Fails with a validation error
    /// when a required field is blank.
    #[tracing::instrument(skip(self, data), fields(kind = %D::KIND))]
    pub async fn create(&self, data: D) -> Result<Record<D>, GatewayError> {
        let record = self.store.create(data).await?;
        tracing::info!("created {} {}", D::KIND.noun(), record.id);
        Ok(record)
    }

    #[tracing::instrument(skip(self, id, patch), fields(kind = %D::KIND))]
    pub async fn update(
        &self,
        id: impl IntoIdentity,
        patch: D::Patch,
    ) -> Result<Record<D>, GatewayError> {
        let id = id.into_identity()?;
        let record = self.store.update(id, patch).await?;
        tracing::info!("updated {} {}", D::KIND.noun(), id);
        Ok(record)
    }

    /// Removes a record and returns it.
    #[tracing::instrument(skip(self, id), fields(kind = %D::KIND))]
    pub async fn delete(&self, id: impl IntoIdentity) -> Result<Record<D>, GatewayError> {
        let id = id.into_identity()?;
        let record = self.store.delete(id).await?;
        tracing::info!("deleted {} {}", D::KIND.noun(), id);
        Ok(record)
    }
}

/// One gateway per entity, all on the same backing.
#[derive(Debug, Clone)]
pub struct Gateways {
    pub students: Gateway<StudentData>,
    pub teachers: Gateway<TeacherData>,
    pub departments: Gateway<DepartmentData>,
    pub courses: Gateway<CourseData>,
    pub activities: Gateway<ActivityData>,
}

impl Gateways {
    pub fn in_memory(seed: SampleData, latency: Duration) -> Gateways {
        Gateways {
            students: Gateway::in_memory(seed.students, latency),
            teachers: Gateway::in_memory(seed.teachers, latency),
            departments: Gateway::in_memory(seed.departments, latency),
            courses: Gateway::in_memory(seed.courses, latency),
            activities: Gateway::in_memory(seed.activities, latency),
        }
    }

    pub fn remote(service: Arc<dyn RecordService>) -> Gateways {
        Gateways {
            students: Gateway::remote(service.clone()),
            teachers: Gateway::remote(service.clone()),
            departments: Gateway::remote(service.clone()),
            courses: Gateway::remote(service.clone()),
            activities: Gateway::remote(service),
        }
    }
}
