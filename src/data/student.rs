use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assign, EntityData, EntityKind, Record};
use crate::list::FieldValue;
use crate::remote::mapping::FieldMapping;

pub type Student = Record<StudentData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentData {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub dob: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Identity of the student's department, as a string.
    pub department_id: String,
    pub contact: String,
    pub address: String,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub guardian_relation: String,
    pub admission_date: String,
    pub profile_photo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl EntityData for StudentData {
    type Patch = StudentPatch;

    const KIND: EntityKind = EntityKind::Student;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "studentId", "contact"];
    const FILTERS: &'static [(&'static str, &'static str)] =
        &[("class", "class"), ("department", "departmentId")];
    const REQUIRED: &'static [&'static str] = &[
        "studentId",
        "name",
        "gender",
        "dob",
        "class",
        "departmentId",
        "contact",
        "address",
        "guardianName",
        "guardianContact",
        "guardianRelation",
        "admissionDate",
    ];
    const REMOTE_FIELDS: &'static [FieldMapping] = &[
        FieldMapping::plain("studentId", "student_id"),
        FieldMapping::plain("name", "Name"),
        FieldMapping::plain("gender", "gender"),
        FieldMapping::plain("dob", "dob"),
        FieldMapping::plain("class", "class"),
        FieldMapping::integer("departmentId", "department_id"),
        FieldMapping::plain("contact", "contact"),
        FieldMapping::plain("address", "address"),
        FieldMapping::plain("guardianName", "guardian_name"),
        FieldMapping::plain("guardianContact", "guardian_contact"),
        FieldMapping::plain("guardianRelation", "guardian_relation"),
        FieldMapping::plain("admissionDate", "admission_date"),
        FieldMapping::plain("profilePhoto", "profile_photo"),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value: &str = match name {
            "studentId" => &self.student_id,
            "name" => &self.name,
            "gender" => &self.gender,
            "dob" => &self.dob,
            "class" => &self.class_name,
            "departmentId" => &self.department_id,
            "contact" => &self.contact,
            "address" => &self.address,
            "guardianName" => &self.guardian_name,
            "guardianContact" => &self.guardian_contact,
            "guardianRelation" => &self.guardian_relation,
            "admissionDate" => &self.admission_date,
            "profilePhoto" => &self.profile_photo,
            _ => return None,
        };
        Some(FieldValue::Text(value))
    }

    fn apply(&mut self, patch: StudentPatch) {
        assign(&mut self.student_id, patch.student_id);
        assign(&mut self.name, patch.name);
        assign(&mut self.gender, patch.gender);
        assign(&mut self.dob, patch.dob);
        assign(&mut self.class_name, patch.class_name);
        assign(&mut self.department_id, patch.department_id);
        assign(&mut self.contact, patch.contact);
        assign(&mut self.address, patch.address);
        assign(&mut self.guardian_name, patch.guardian_name);
        assign(&mut self.guardian_contact, patch.guardian_contact);
        assign(&mut self.guardian_relation, patch.guardian_relation);
        assign(&mut self.admission_date, patch.admission_date);
        assign(&mut self.profile_photo, patch.profile_photo);
    }
}

#[cfg(test)]
pub(crate) fn complete(name: &str, class_name: &str) -> StudentData {
    StudentData {
        student_id: format!("STU-{}", name.to_uppercase()),
        name: name.to_string(),
        gender: "Female".to_string(),
        dob: "2009-06-14".to_string(),
        class_name: class_name.to_string(),
        department_id: "1".to_string(),
        contact: "9822000000".to_string(),
        address: "College Road, Nashik".to_string(),
        guardian_name: "Guardian".to_string(),
        guardian_contact: "9822000001".to_string(),
        guardian_relation: "Mother".to_string(),
        admission_date: "2024-06-10".to_string(),
        profile_photo: String::new(),
    }
}
