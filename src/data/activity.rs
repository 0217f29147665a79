use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assign, EntityData, EntityKind, Record};
use crate::list::FieldValue;
use crate::remote::mapping::FieldMapping;

pub type Activity = Record<ActivityData>;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ActivityStatus {
    #[default]
    Planned,
    Ongoing,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Planned => "Planned",
            ActivityStatus::Ongoing => "Ongoing",
            ActivityStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Student,
    Teacher,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    #[serde(rename = "type")]
    pub kind: ParticipantKind,
    /// Identity of the student or teacher, as a string.
    pub id: String,
}

impl Participant {
    pub fn student(id: impl ToString) -> Participant {
        Participant {
            kind: ParticipantKind::Student,
            id: id.to_string(),
        }
    }

    pub fn teacher(id: impl ToString) -> Participant {
        Participant {
            kind: ParticipantKind::Teacher,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityData {
    pub activity_id: String,
    pub name: String,
    /// ISO date (`YYYY-MM-DD`) the activity takes place on.
    pub date: String,
    pub department_id: String,
    pub description: String,
    pub participants: Vec<Participant>,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
}

impl EntityData for ActivityData {
    type Patch = ActivityPatch;

    const KIND: EntityKind = EntityKind::Activity;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "activityId", "description"];
    const FILTERS: &'static [(&'static str, &'static str)] =
        &[("department", "departmentId"), ("status", "status")];
    const REQUIRED: &'static [&'static str] = &[
        "activityId",
        "name",
        "date",
        "departmentId",
        "description",
        "status",
    ];
    const REMOTE_FIELDS: &'static [FieldMapping] = &[
        FieldMapping::plain("activityId", "activity_id"),
        FieldMapping::plain("name", "Name"),
        FieldMapping::plain("date", "date"),
        FieldMapping::integer("departmentId", "department_id"),
        FieldMapping::plain("description", "description"),
        FieldMapping::json("participants", "participants"),
        FieldMapping::plain("status", "status"),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value: &str = match name {
            "status" => self.status.as_str(),
            "activityId" => &self.activity_id,
            "name" => &self.name,
            "date" => &self.date,
            "departmentId" => &self.department_id,
            "description" => &self.description,
            _ => return None,
        };
        Some(FieldValue::Text(value))
    }

    fn apply(&mut self, patch: ActivityPatch) {
        assign(&mut self.activity_id, patch.activity_id);
        assign(&mut self.name, patch.name);
        assign(&mut self.date, patch.date);
        assign(&mut self.department_id, patch.department_id);
        assign(&mut self.description, patch.description);
        assign(&mut self.participants, patch.participants);
        assign(&mut self.status, patch.status);
    }

    fn normalize(&mut self) {
        let mut unique: Vec<Participant> = Vec::with_capacity(self.participants.len());
        for participant in self.participants.drain(..) {
            if !unique.contains(&participant) {
                unique.push(participant);
            }
        }
        self.participants = unique;
    }
}

#[cfg(test)]
pub(crate) fn complete(name: &str, department_id: &str, status: ActivityStatus) -> ActivityData {
    ActivityData {
        activity_id: format!("ACT-{}", name.to_uppercase().replace(' ', "-")),
        name: name.to_string(),
        date: "2025-01-26".to_string(),
        department_id: department_id.to_string(),
        description: format!("{} for all classes", name),
        participants: Vec::new(),
        status,
    }
}
