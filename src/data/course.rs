use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assign, EntityData, EntityKind, Record};
use crate::list::FieldValue;
use crate::remote::mapping::FieldMapping;

pub type Course = Record<CourseData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseData {
    pub course_id: String,
    pub name: String,
    pub department_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_hours: Option<u32>,
    /// Identity of the teacher running the course, as a string.
    pub assigned_teacher_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_teacher_id: Option<String>,
}

impl EntityData for CourseData {
    type Patch = CoursePatch;

    const KIND: EntityKind = EntityKind::Course;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "courseId", "description"];
    const FILTERS: &'static [(&'static str, &'static str)] = &[("department", "departmentId")];
    const REQUIRED: &'static [&'static str] = &[
        "courseId",
        "name",
        "departmentId",
        "description",
        "creditHours",
        "assignedTeacherId",
    ];
    const REMOTE_FIELDS: &'static [FieldMapping] = &[
        FieldMapping::plain("courseId", "course_id"),
        FieldMapping::plain("name", "Name"),
        FieldMapping::integer("departmentId", "department_id"),
        FieldMapping::plain("description", "description"),
        FieldMapping::plain("creditHours", "credit_hours"),
        FieldMapping::integer("assignedTeacherId", "assigned_teacher_id"),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value: &str = match name {
            "creditHours" => return self.credit_hours.map(|it| FieldValue::Number(it as i64)),
            "courseId" => &self.course_id,
            "name" => &self.name,
            "departmentId" => &self.department_id,
            "description" => &self.description,
            "assignedTeacherId" => &self.assigned_teacher_id,
            _ => return None,
        };
        Some(FieldValue::Text(value))
    }

    fn apply(&mut self, patch: CoursePatch) {
        assign(&mut self.course_id, patch.course_id);
        assign(&mut self.name, patch.name);
        assign(&mut self.department_id, patch.department_id);
        assign(&mut self.description, patch.description);
        if patch.credit_hours.is_some() {
            self.credit_hours = patch.credit_hours;
        }
        assign(&mut self.assigned_teacher_id, patch.assigned_teacher_id);
    }
}
