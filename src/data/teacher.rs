use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assign, dedup_strings, EntityData, EntityKind, Record};
use crate::list::FieldValue;
use crate::remote::mapping::FieldMapping;

pub type Teacher = Record<TeacherData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherData {
    pub teacher_id: String,
    pub name: String,
    pub gender: String,
    pub department_id: String,
    /// Taught subjects in display order, without duplicates.
    pub subjects: Vec<String>,
    pub email: String,
    pub contact: String,
    pub joining_date: String,
    pub qualification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
}

impl EntityData for TeacherData {
    type Patch = TeacherPatch;

    const KIND: EntityKind = EntityKind::Teacher;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "teacherId", "email", "subjects"];
    const FILTERS: &'static [(&'static str, &'static str)] = &[("department", "departmentId")];
    const REQUIRED: &'static [&'static str] = &[
        "teacherId",
        "name",
        "gender",
        "departmentId",
        "email",
        "contact",
        "joiningDate",
        "qualification",
    ];
    const REMOTE_FIELDS: &'static [FieldMapping] = &[
        FieldMapping::plain("teacherId", "teacher_id"),
        FieldMapping::plain("name", "Name"),
        FieldMapping::plain("gender", "gender"),
        FieldMapping::integer("departmentId", "department_id"),
        FieldMapping::delimited("subjects", "subjects"),
        FieldMapping::plain("email", "email"),
        FieldMapping::plain("contact", "contact"),
        FieldMapping::plain("joiningDate", "joining_date"),
        FieldMapping::plain("qualification", "qualification"),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value: &str = match name {
            "subjects" => return Some(FieldValue::List(&self.subjects)),
            "teacherId" => &self.teacher_id,
            "name" => &self.name,
            "gender" => &self.gender,
            "departmentId" => &self.department_id,
            "email" => &self.email,
            "contact" => &self.contact,
            "joiningDate" => &self.joining_date,
            "qualification" => &self.qualification,
            _ => return None,
        };
        Some(FieldValue::Text(value))
    }

    fn apply(&mut self, patch: TeacherPatch) {
        assign(&mut self.teacher_id, patch.teacher_id);
        assign(&mut self.name, patch.name);
        assign(&mut self.gender, patch.gender);
        assign(&mut self.department_id, patch.department_id);
        assign(&mut self.subjects, patch.subjects);
        assign(&mut self.email, patch.email);
        assign(&mut self.contact, patch.contact);
        assign(&mut self.joining_date, patch.joining_date);
        assign(&mut self.qualification, patch.qualification);
    }

    fn normalize(&mut self) {
        dedup_strings(&mut self.subjects);
    }
}

#[cfg(test)]
pub(crate) fn complete(name: &str, subjects: &[&str]) -> TeacherData {
    TeacherData {
        teacher_id: format!("TCH-{}", name.to_uppercase()),
        name: name.to_string(),
        gender: "Male".to_string(),
        department_id: "1".to_string(),
        subjects: subjects.iter().map(|it| it.to_string()).collect(),
        email: format!("{}@edutrack.example", name.to_lowercase()),
        contact: "9823000000".to_string(),
        joining_date: "2018-07-01".to_string(),
        qualification: "M.Sc., B.Ed.".to_string(),
    }
}
