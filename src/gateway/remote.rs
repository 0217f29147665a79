use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::EntityStore;
use crate::data::{prepared, EntityData, Identity, Record};
use crate::error::{GatewayError, Operation};
use crate::remote::mapping::{self, ID_FIELD};
use crate::remote::{DeletePayload, RecordQuery, RecordService, RecordsPayload};

/// Collection kept in the structured record store, one table per entity.
pub struct RemoteStore<D> {
    service: Arc<dyn RecordService>,
    query: RecordQuery,
    _data: PhantomData<fn() -> D>,
}

impl<D: EntityData> RemoteStore<D> {
    pub fn new(service: Arc<dyn RecordService>) -> RemoteStore<D> {
        RemoteStore {
            service,
            query: RecordQuery::fields(mapping::external_fields::<D>()),
            _data: PhantomData,
        }
    }

    #[inline]
    fn table(&self) -> &'static str {
        D::KIND.table()
    }

    fn decode(row: Option<Value>, op: Operation) -> Result<Record<D>, GatewayError> {
        match row {
            Some(row) => mapping::from_external(row),
            None => Err(GatewayError::remote(None, op, D::KIND)),
        }
    }

    async fn existing(&self, id: Identity) -> Result<Record<D>, GatewayError> {
        self.get_by_id(id)
            .await?
            .ok_or(GatewayError::NotFound { kind: D::KIND, id })
    }
}

#[rocket::async_trait]
impl<D: EntityData> EntityStore<D> for RemoteStore<D> {
    async fn get_all(&self) -> Result<Vec<Record<D>>, GatewayError> {
        self.service
            .fetch_records(self.table(), &self.query)
            .await
            .into_outcome(Operation::Load, D::KIND)?
            .into_rows()
            .into_iter()
            .map(mapping::from_external)
            .collect()
    }

    async fn get_by_id(&self, id: Identity) -> Result<Option<Record<D>>, GatewayError> {
        self.service
            .get_record_by_id(self.table(), id.into(), &self.query)
            .await
            .into_outcome(Operation::Load, D::KIND)?
            .into_first()
            .filter(|it| !it.is_null())
            .map(mapping::from_external)
            .transpose()
    }

    async fn create(&self, data: D) -> Result<Record<D>, GatewayError> {
        let data = prepared(data)?;
        let payload = RecordsPayload {
            records: vec![mapping::to_external(&data)?],
        };

        let created = self
            .service
            .create_record(self.table(), payload)
            .await
            .into_outcome(Operation::Save, D::KIND)?
            .into_first();
        Self::decode(created, Operation::Save)
    }

    async fn update(&self, id: Identity, patch: D::Patch) -> Result<Record<D>, GatewayError> {
        let merged = self.existing(id).await?.merged(patch, Utc::now())?;

        let mut row = mapping::to_external(&merged.data)?;
        row.insert(ID_FIELD.to_string(), Value::from(id.0));
        let payload = RecordsPayload { records: vec![row] };

        let updated = self
            .service
            .update_record(self.table(), payload)
            .await
            .into_outcome(Operation::Save, D::KIND)?
            .into_first();
        match updated {
            Some(row) => mapping::from_external(row),
            None => Ok(merged),
        }
    }

    async fn delete(&self, id: Identity) -> Result<Record<D>, GatewayError> {
        let existing = self.existing(id).await?;
        let payload = DeletePayload {
            record_ids: vec![id.into()],
        };

        self.service
            .delete_record(self.table(), payload)
            .await
            .into_outcome(Operation::Delete, D::KIND)?;
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::{json, Map, Value};

    use crate::data::{
        department, student, teacher, DepartmentData, EntityKind, Identity, StudentData,
        StudentPatch, TeacherData,
    };
    use crate::error::GatewayError;
    use crate::gateway::Gateway;
    use crate::remote::{
        DeletePayload, Envelope, RecordQuery, RecordResult, RecordService, RecordsPayload,
    };

    /// Record service keeping rows in memory, with scripted failures.
    #[derive(Default)]
    struct FakeService {
        rows: Mutex<Vec<Map<String, Value>>>,
        calls: Mutex<Vec<String>>,
        failing_envelope: Option<Envelope>,
        failing_results: Option<Vec<RecordResult>>,
    }

    impl FakeService {
        fn with_rows(rows: Vec<Value>) -> FakeService {
            FakeService {
                rows: Mutex::new(
                    rows.into_iter()
                        .filter_map(|it| match it {
                            Value::Object(map) => Some(map),
                            _ => None,
                        })
                        .collect(),
                ),
                ..Default::default()
            }
        }

        fn log(&self, call: String) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn scripted(&self) -> Option<Envelope> {
            if let Some(envelope) = &self.failing_envelope {
                return Some(envelope.clone());
            }
            self.failing_results.clone().map(Envelope::batch)
        }
    }

    #[rocket::async_trait]
    impl RecordService for FakeService {
        async fn fetch_records(&self, table: &str, _query: &RecordQuery) -> Envelope {
            self.log(format!("fetch {}", table));
            if let Some(envelope) = &self.failing_envelope {
                return envelope.clone();
            }
            let rows = self.rows.lock().expect("rows lock").clone();
            Envelope::ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
        }

        async fn get_record_by_id(&self, table: &str, id: i64, _query: &RecordQuery) -> Envelope {
            self.log(format!("get {} {}", table, id));
            let rows = self.rows.lock().expect("rows lock");
            match rows.iter().find(|it| it["Id"] == json!(id)) {
                Some(row) => Envelope::ok(Value::Object(row.clone())),
                None => Envelope {
                    success: true,
                    ..Default::default()
                },
            }
        }

        async fn create_record(&self, table: &str, payload: RecordsPayload) -> Envelope {
            self.log(format!("create {}", table));
            if let Some(envelope) = self.scripted() {
                return envelope;
            }
            let mut rows = self.rows.lock().expect("rows lock");
            let results = payload
                .records
                .into_iter()
                .map(|mut row| {
                    let id = rows.len() as i64 + 1;
                    row.insert("Id".to_string(), json!(id));
                    rows.push(row.clone());
                    RecordResult::ok(Value::Object(row))
                })
                .collect();
            Envelope::batch(results)
        }

        async fn update_record(&self, table: &str, payload: RecordsPayload) -> Envelope {
            self.log(format!("update {}", table));
            if let Some(envelope) = self.scripted() {
                return envelope;
            }
            let mut rows = self.rows.lock().expect("rows lock");
            let mut results = Vec::new();
            for row in payload.records {
                match rows.iter_mut().find(|it| it["Id"] == row["Id"]) {
                    Some(stored) => {
                        stored.extend(row);
                        results.push(RecordResult::ok(Value::Object(stored.clone())));
                    }
                    None => results.push(RecordResult::failed("no such record")),
                }
            }
            Envelope::batch(results)
        }

        async fn delete_record(&self, table: &str, payload: DeletePayload) -> Envelope {
            self.log(format!("delete {} {:?}", table, payload.record_ids));
            if let Some(envelope) = self.scripted() {
                return envelope;
            }
            let mut rows = self.rows.lock().expect("rows lock");
            rows.retain(|it| !payload.record_ids.iter().any(|id| it["Id"] == json!(id)));
            Envelope::batch(vec![RecordResult::ok(json!(payload.record_ids))])
        }
    }

    fn student_row(id: i64, name: &str) -> Value {
        json!({
            "Id": id,
            "student_id": format!("STU-{}", id),
            "Name": name,
            "gender": "Female",
            "dob": "2009-06-14",
            "class": "10th",
            "department_id": 2,
            "contact": "9822000000",
            "address": "Gangapur Road, Nashik",
            "guardian_name": "Sunita",
            "guardian_contact": "9822000001",
            "guardian_relation": "Mother",
            "admission_date": "2024-06-10",
            "CreatedOn": "2024-06-10T09:00:00Z",
            "ModifiedOn": "2024-06-10T09:00:00Z",
        })
    }

    #[rocket::async_test]
    async fn rows_map_to_records() {
        let service = Arc::new(FakeService::with_rows(vec![student_row(7, "Asha")]));
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        let all = gateway.get_all().await.expect("list must succeed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Identity(7));
        assert_eq!(all[0].data.name, "Asha");
        assert_eq!(all[0].data.department_id, "2");
        assert!(all[0].created_at.is_some());
        assert_eq!(service.calls(), vec!["fetch students"]);
    }

    #[rocket::async_test]
    async fn create_sends_external_names() {
        let service = Arc::new(FakeService::default());
        let gateway: Gateway<TeacherData> = Gateway::remote(service.clone());

        let created = gateway
            .create(teacher::complete("Kiran", &["Physics", "Maths"]))
            .await
            .expect("create must succeed");
        assert_eq!(created.id, Identity(1));
        assert_eq!(created.data.subjects, vec!["Physics", "Maths"]);

        let rows = service.rows.lock().expect("rows lock").clone();
        assert_eq!(rows[0]["subjects"], json!("Physics,Maths"));
        assert_eq!(rows[0]["department_id"], json!(1));
        assert_eq!(rows[0]["teacher_id"], json!("TCH-KIRAN"));
    }

    #[rocket::async_test]
    async fn update_reads_before_writing() {
        let service = Arc::new(FakeService::with_rows(vec![student_row(3, "Asha")]));
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        let patch = StudentPatch {
            contact: Some("9000000000".to_string()),
            ..Default::default()
        };
        let updated = gateway.update(3, patch).await.expect("update must succeed");
        assert_eq!(updated.data.contact, "9000000000");
        assert_eq!(updated.data.name, "Asha");
        assert_eq!(service.calls(), vec!["get students 3", "update students"]);
    }

    #[rocket::async_test]
    async fn missing_record_is_not_found_without_write() {
        let service = Arc::new(FakeService::default());
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        assert_eq!(
            gateway.delete(5).await,
            Err(GatewayError::NotFound {
                kind: EntityKind::Student,
                id: Identity(5)
            })
        );
        assert!(gateway
            .update(5, StudentPatch::default())
            .await
            .err()
            .map(|it| it.is_not_found())
            .unwrap_or(false));
        assert_eq!(service.calls(), vec!["get students 5", "get students 5"]);
    }

    #[rocket::async_test]
    async fn delete_returns_removed_record() {
        let service = Arc::new(FakeService::with_rows(vec![
            student_row(1, "Asha"),
            student_row(2, "Ravi"),
        ]));
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        let removed = gateway.delete("2").await.expect("delete must succeed");
        assert_eq!(removed.data.name, "Ravi");
        assert_eq!(gateway.get_by_id(2).await, Ok(None));
        assert_eq!(gateway.get_all().await.map(|it| it.len()), Ok(1));
    }

    #[rocket::async_test]
    async fn partial_failure_surfaces_first_message() {
        let service = Arc::new(FakeService {
            failing_results: Some(vec![
                RecordResult::failed("department_code must be unique"),
                RecordResult::failed("Name too long"),
            ]),
            ..Default::default()
        });
        let gateway: Gateway<DepartmentData> = Gateway::remote(service);

        let result = gateway.create(department::complete("SCI", "Science")).await;
        assert_eq!(
            result,
            Err(GatewayError::Remote {
                message: "department_code must be unique".to_string()
            })
        );
    }

    #[rocket::async_test]
    async fn failed_envelope_uses_fallback_message() {
        let service = Arc::new(FakeService {
            failing_envelope: Some(Envelope {
                success: false,
                ..Default::default()
            }),
            ..Default::default()
        });
        let gateway: Gateway<StudentData> = Gateway::remote(service);

        assert_eq!(
            gateway.get_all().await,
            Err(GatewayError::Remote {
                message: "Failed to load students".to_string()
            })
        );
        assert_eq!(
            gateway.create(student::complete("Asha", "10th")).await,
            Err(GatewayError::Remote {
                message: "Failed to save student".to_string()
            })
        );
    }

    #[rocket::async_test]
    async fn validation_happens_before_any_call() {
        let service = Arc::new(FakeService::default());
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        let result = gateway.create(StudentData::default()).await;
        assert!(matches!(result, Err(GatewayError::Validation { .. })));
        assert!(service.calls().is_empty());
    }

    #[rocket::async_test]
    async fn non_numeric_reference_fails_on_both_backings() {
        let service = Arc::new(FakeService::default());
        let remote: Gateway<StudentData> = Gateway::remote(service.clone());
        let memory: Gateway<StudentData> = Gateway::in_memory(Vec::new(), Duration::ZERO);
        let data = StudentData {
            department_id: "SCI".to_string(),
            ..student::complete("Asha", "10th")
        };

        let expected = Err(GatewayError::InvalidReference {
            kind: EntityKind::Student,
            field: "departmentId",
            value: "SCI".to_string(),
        });
        assert_eq!(remote.create(data.clone()).await, expected);
        assert_eq!(memory.create(data).await, expected);
        assert!(service.calls().is_empty());
        assert_eq!(memory.get_all().await.map(|it| it.len()), Ok(0));
    }

    #[rocket::async_test]
    async fn update_to_non_numeric_reference_is_rejected() {
        let service = Arc::new(FakeService::with_rows(vec![student_row(3, "Asha")]));
        let gateway: Gateway<StudentData> = Gateway::remote(service.clone());

        let patch = StudentPatch {
            department_id: Some("MAT".to_string()),
            ..Default::default()
        };
        let result = gateway.update(3, patch).await;
        assert!(matches!(
            result,
            Err(GatewayError::InvalidReference {
                field: "departmentId",
                ..
            })
        ));
        assert_eq!(service.calls(), vec!["get students 3"]);
    }
}
