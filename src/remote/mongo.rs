use bson::{doc, Bson, Document};
use chrono::Utc;
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Collection, Database};
use rocket::futures::TryStreamExt;
use serde_json::{Map, Value};

use super::mapping::{CREATED_FIELD, ID_FIELD, MODIFIED_FIELD};
use super::{DeletePayload, Envelope, RecordQuery, RecordResult, RecordService, RecordsPayload};

/// Record store kept in MongoDB, one collection per table.
#[derive(Debug, Clone)]
pub struct MongoRecordService {
    db: Database,
}

#[inline]
fn by_id(id: i64) -> Document {
    doc! { ID_FIELD: id }
}

fn projection(query: &RecordQuery) -> Document {
    let mut projection = doc! { "_id": 0 };
    for field in &query.fields {
        projection.insert(field.as_str(), 1);
    }
    projection
}

fn to_json(document: Document) -> Value {
    let mut value = Bson::Document(document).into_relaxed_extjson();
    if let Value::Object(map) = &mut value {
        map.remove("_id");
    }
    value
}

fn to_document(row: &Map<String, Value>) -> Result<Document, String> {
    bson::to_document(row).map_err(|e| e.to_string())
}

impl MongoRecordService {
    pub fn new(db: Database) -> MongoRecordService {
        MongoRecordService { db }
    }

    fn table(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    async fn find_row(&self, table: &str, id: i64, query: &RecordQuery) -> Result<Option<Value>, String> {
        let options = FindOneOptions::builder().projection(projection(query)).build();
        self.table(table)
            .find_one(by_id(id), options)
            .await
            .map(|it| it.map(to_json))
            .map_err(|e| e.to_string())
    }

    async fn next_id(&self, table: &str) -> Result<i64, String> {
        let options = FindOneOptions::builder()
            .sort(doc! { ID_FIELD: -1 })
            .projection(doc! { ID_FIELD: 1 })
            .build();
        let last = self
            .table(table)
            .find_one(None, options)
            .await
            .map_err(|e| e.to_string())?;

        let last_id = match last.as_ref().and_then(|it| it.get(ID_FIELD)) {
            Some(Bson::Int32(it)) => *it as i64,
            Some(Bson::Int64(it)) => *it,
            Some(Bson::Double(it)) => *it as i64,
            _ => 0,
        };
        Ok(last_id + 1)
    }

    async fn insert(&self, table: &str, mut row: Map<String, Value>) -> Result<Value, String> {
        let id = self.next_id(table).await?;
        let now = Value::String(Utc::now().to_rfc3339());
        row.insert(ID_FIELD.to_string(), Value::from(id));
        row.insert(CREATED_FIELD.to_string(), now.clone());
        row.insert(MODIFIED_FIELD.to_string(), now);

        self.table(table)
            .insert_one(to_document(&row)?, None)
            .await
            .map_err(|e| e.to_string())?;

        Ok(Value::Object(row))
    }

    async fn replace_fields(&self, table: &str, mut row: Map<String, Value>) -> Result<Value, String> {
        let id = row
            .remove(ID_FIELD)
            .and_then(|it| it.as_i64())
            .ok_or_else(|| format!("record is missing a numeric '{}'", ID_FIELD))?;
        row.insert(
            MODIFIED_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let fields = to_document(&row)?;
        let result = self
            .table(table)
            .update_one(by_id(id), doc! { "$set": fields }, None)
            .await
            .map_err(|e| e.to_string())?;
        if result.matched_count == 0 {
            return Err(format!("record {} does not exist", id));
        }

        self.find_row(table, id, &RecordQuery::default())
            .await?
            .ok_or_else(|| format!("record {} disappeared during update", id))
    }

    async fn remove(&self, table: &str, id: i64) -> Result<Value, String> {
        let result = self
            .table(table)
            .delete_one(by_id(id), None)
            .await
            .map_err(|e| e.to_string())?;
        if result.deleted_count == 0 {
            return Err(format!("record {} does not exist", id));
        }
        Ok(Value::from(id))
    }
}

#[rocket::async_trait]
impl RecordService for MongoRecordService {
    #[tracing::instrument(skip(self))]
    async fn fetch_records(&self, table: &str, query: &RecordQuery) -> Envelope {
        let options = FindOptions::builder()
            .projection(projection(query))
            .sort(doc! { ID_FIELD: 1 })
            .build();

        let cursor = match self.table(table).find(None, options).await {
            Ok(it) => it,
            Err(e) => return Envelope::failed(e),
        };

        match cursor.try_collect::<Vec<Document>>().await {
            Ok(documents) => Envelope::ok(Value::Array(
                documents.into_iter().map(to_json).collect(),
            )),
            Err(e) => Envelope::failed(e),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_record_by_id(&self, table: &str, id: i64, query: &RecordQuery) -> Envelope {
        match self.find_row(table, id, query).await {
            Ok(Some(row)) => Envelope::ok(row),
            Ok(None) => Envelope {
                success: true,
                ..Default::default()
            },
            Err(e) => Envelope::failed(e),
        }
    }

    #[tracing::instrument(skip(self, payload))]
    async fn create_record(&self, table: &str, payload: RecordsPayload) -> Envelope {
        let mut results = Vec::with_capacity(payload.records.len());
        for row in payload.records {
            results.push(match self.insert(table, row).await {
                Ok(row) => RecordResult::ok(row),
                Err(e) => RecordResult::failed(e),
            });
        }
        Envelope::batch(results)
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_record(&self, table: &str, payload: RecordsPayload) -> Envelope {
        let mut results = Vec::with_capacity(payload.records.len());
        for row in payload.records {
            results.push(match self.replace_fields(table, row).await {
                Ok(row) => RecordResult::ok(row),
                Err(e) => RecordResult::failed(e),
            });
        }
        Envelope::batch(results)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_record(&self, table: &str, payload: DeletePayload) -> Envelope {
        let mut results = Vec::with_capacity(payload.record_ids.len());
        for id in payload.record_ids {
            results.push(match self.remove(table, id).await {
                Ok(id) => RecordResult::ok(id),
                Err(e) => RecordResult::failed(e),
            });
        }
        Envelope::batch(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_hides_object_id() {
        let query = RecordQuery::fields(vec!["Id".to_string(), "Name".to_string()]);
        let projection = projection(&query);
        assert_eq!(projection.get_i32("_id").ok(), Some(0));
        assert_eq!(projection.get_i32("Name").ok(), Some(1));
    }

    #[test]
    fn documents_become_plain_json() {
        let document = doc! {
            "_id": bson::oid::ObjectId::new(),
            "Id": 3_i64,
            "Name": "Science",
        };
        let json = to_json(document);
        assert!(json.get("_id").is_none());
        assert_eq!(json["Id"], 3);
        assert_eq!(json["Name"], "Science");
    }
}
