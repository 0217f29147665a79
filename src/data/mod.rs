use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;
use crate::list::{FieldValue, Fielded};
use crate::remote::mapping::{Coercion, FieldMapping};

pub mod activity;
pub mod course;
pub mod department;
pub mod lookup;
pub mod seed;
pub mod student;
pub mod teacher;

pub use activity::{Activity, ActivityData, ActivityPatch, ActivityStatus, Participant, ParticipantKind};
pub use course::{Course, CourseData, CoursePatch};
pub use department::{Department, DepartmentData, DepartmentPatch};
pub use student::{Student, StudentData, StudentPatch};
pub use seed::SampleData;
pub use teacher::{Teacher, TeacherData, TeacherPatch};

/// Integer key of a record, unique within its collection.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Identity(pub u32);

impl Identity {
    /// Identity following `existing`'s largest one, or 1 when empty. `None`
    /// once the largest is `u32::MAX`.
    pub fn next_after(existing: impl IntoIterator<Item = Identity>) -> Option<Identity> {
        match existing.into_iter().max() {
            Some(Identity(it)) => it.checked_add(1).map(Identity),
            None => Some(Identity(1)),
        }
    }

    /// Parses a string-typed reference (foreign key) to another record.
    pub fn parse_reference(raw: &str) -> Option<Identity> {
        raw.trim().parse().ok()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Identity)
            .map_err(|_| GatewayError::InvalidIdentity(s.to_string()))
    }
}

impl From<Identity> for i64 {
    fn from(value: Identity) -> Self {
        value.0 as i64
    }
}

/// Anything a caller may use to address a record: integers or their string
/// form. Every gateway operation goes through this conversion.
pub trait IntoIdentity {
    fn into_identity(self) -> Result<Identity, GatewayError>;
}

impl IntoIdentity for Identity {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        Ok(self)
    }
}

impl IntoIdentity for u32 {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        Ok(Identity(self))
    }
}

impl IntoIdentity for i64 {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        u32::try_from(self)
            .map(Identity)
            .map_err(|_| GatewayError::InvalidIdentity(self.to_string()))
    }
}

impl IntoIdentity for i32 {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        u32::try_from(self)
            .map(Identity)
            .map_err(|_| GatewayError::InvalidIdentity(self.to_string()))
    }
}

impl IntoIdentity for &str {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        self.parse()
    }
}

impl IntoIdentity for &String {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        self.parse()
    }
}

impl IntoIdentity for String {
    fn into_identity(self) -> Result<Identity, GatewayError> {
        self.parse()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Student,
    Teacher,
    Department,
    Course,
    Activity,
}

impl EntityKind {
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Teacher => "teacher",
            EntityKind::Department => "department",
            EntityKind::Course => "course",
            EntityKind::Activity => "activity",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Teacher => "teachers",
            EntityKind::Department => "departments",
            EntityKind::Course => "courses",
            EntityKind::Activity => "activities",
        }
    }

    /// Name of the record store table holding this entity.
    pub fn table(self) -> &'static str {
        self.plural()
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Student => write!(f, "Student"),
            EntityKind::Teacher => write!(f, "Teacher"),
            EntityKind::Department => write!(f, "Department"),
            EntityKind::Course => write!(f, "Course"),
            EntityKind::Activity => write!(f, "Activity"),
        }
    }
}

/// Caller-editable part of an entity.
pub trait EntityData:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Partial update: every field optional, `None` leaves the stored value.
    type Patch: Debug + Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    const KIND: EntityKind;
    /// Fields matched by the list screen's free-text search.
    const SEARCH_FIELDS: &'static [&'static str];
    /// Attribute filters offered by the list screen as `(key, field)`.
    const FILTERS: &'static [(&'static str, &'static str)];
    const REQUIRED: &'static [&'static str];
    /// How fields are named and encoded in the remote record store.
    const REMOTE_FIELDS: &'static [FieldMapping];

    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    fn apply(&mut self, patch: Self::Patch);

    /// Drops duplicate list entries and similar noise. Runs before every
    /// create and update.
    fn normalize(&mut self) {}

    /// First required field left blank.
    fn missing_required(&self) -> Option<&'static str> {
        Self::REQUIRED
            .iter()
            .copied()
            .find(|name| self.field(name).map(|it| it.is_blank()).unwrap_or(true))
    }

    /// First reference to another record that isn't an identity, with its
    /// text.
    fn malformed_reference(&self) -> Option<(&'static str, String)> {
        Self::REMOTE_FIELDS
            .iter()
            .filter(|it| it.coercion == Coercion::Integer)
            .find_map(|it| match self.field(it.internal) {
                Some(FieldValue::Text(text))
                    if !text.trim().is_empty() && Identity::parse_reference(text).is_none() =>
                {
                    Some((it.internal, text.to_string()))
                }
                _ => None,
            })
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if let Some(field) = self.missing_required() {
            return Err(GatewayError::Validation {
                kind: Self::KIND,
                field,
            });
        }
        if let Some((field, value)) = self.malformed_reference() {
            return Err(GatewayError::InvalidReference {
                kind: Self::KIND,
                field,
                value,
            });
        }
        Ok(())
    }
}

/// Stored entity: identity, caller data and modification stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<D> {
    #[serde(rename = "Id")]
    pub id: Identity,
    #[serde(flatten)]
    pub data: D,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<D: EntityData> Record<D> {
    pub fn new(id: Identity, data: D, now: DateTime<Utc>) -> Record<D> {
        Record {
            id,
            data,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Record as it was before the timestamps were introduced, like most of
    /// the sample data.
    pub fn unstamped(id: Identity, data: D) -> Record<D> {
        Record {
            id,
            data,
            created_at: None,
            updated_at: None,
        }
    }

    /// Applies `patch` over this record. Identity and creation time are kept.
    pub fn merged(&self, patch: D::Patch, now: DateTime<Utc>) -> Result<Record<D>, GatewayError> {
        let mut data = self.data.clone();
        data.apply(patch);
        data.normalize();
        data.validate()?;

        Ok(Record {
            id: self.id,
            data,
            created_at: self.created_at,
            updated_at: Some(now),
        })
    }
}

impl<D: EntityData> Fielded for Record<D> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Id" => Some(FieldValue::Number(self.id.0 as i64)),
            other => self.data.field(other),
        }
    }
}

/// Prepares caller data for a create.
pub fn prepared<D: EntityData>(mut data: D) -> Result<D, GatewayError> {
    data.normalize();
    data.validate()?;
    Ok(data)
}

/// Sets `target` when `value` is present.
#[inline]
pub(crate) fn assign<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Trims entries, drops blanks and keeps the first of any duplicates.
pub(crate) fn dedup_strings(values: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    for value in values.drain(..) {
        let value = value.trim().to_string();
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    *values = seen;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_parse_from_strings_and_numbers() {
        assert_eq!("7".into_identity(), Ok(Identity(7)));
        assert_eq!(" 12 ".into_identity(), Ok(Identity(12)));
        assert_eq!(String::from("3").into_identity(), Ok(Identity(3)));
        assert_eq!(5u32.into_identity(), Ok(Identity(5)));
        assert_eq!(9i64.into_identity(), Ok(Identity(9)));
        assert_eq!(IntoIdentity::into_identity(1), Ok(Identity(1)));
        assert_eq!(
            IntoIdentity::into_identity(-3),
            Err(GatewayError::InvalidIdentity("-3".to_string()))
        );

        assert_eq!(
            "abc".into_identity(),
            Err(GatewayError::InvalidIdentity("abc".to_string()))
        );
        assert!("-1".into_identity().is_err());
        assert!((-1i64).into_identity().is_err());
        assert!("".into_identity().is_err());
    }

    #[test]
    fn next_identity_follows_the_largest() {
        assert_eq!(Identity::next_after(Vec::new()), Some(Identity(1)));
        assert_eq!(
            Identity::next_after(vec![Identity(4), Identity(9), Identity(2)]),
            Some(Identity(10))
        );
        assert_eq!(Identity::next_after(vec![Identity(u32::MAX)]), None);
    }

    #[test]
    fn references_parse_leniently() {
        assert_eq!(Identity::parse_reference("2"), Some(Identity(2)));
        assert_eq!(Identity::parse_reference(""), None);
        assert_eq!(Identity::parse_reference("dept-2"), None);
    }

    #[test]
    fn dedup_strings_keeps_first_occurrence() {
        let mut values = vec![
            " Physics".to_string(),
            "Chemistry".to_string(),
            "Physics".to_string(),
            "  ".to_string(),
        ];
        dedup_strings(&mut values);
        assert_eq!(values, vec!["Physics", "Chemistry"]);
    }

    #[test]
    fn record_serializes_identity_and_stamps() {
        let record = Record::unstamped(
            Identity(4),
            DepartmentData {
                name: "Science".to_string(),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&record).expect("record must serialize");
        assert_eq!(json["Id"], 4);
        assert_eq!(json["name"], "Science");
        assert!(json.get("createdAt").is_none());

        let back: Department = serde_json::from_value(json).expect("record must deserialize");
        assert_eq!(back, record);
    }
}
