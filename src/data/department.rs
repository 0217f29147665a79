use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{assign, EntityData, EntityKind, Record};
use crate::list::FieldValue;
use crate::remote::mapping::FieldMapping;

pub type Department = Record<DepartmentData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentData {
    pub department_id: String,
    pub name: String,
    pub head_of_department: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_of_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityData for DepartmentData {
    type Patch = DepartmentPatch;

    const KIND: EntityKind = EntityKind::Department;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "departmentId", "headOfDepartment"];
    const FILTERS: &'static [(&'static str, &'static str)] = &[];
    const REQUIRED: &'static [&'static str] =
        &["departmentId", "name", "headOfDepartment", "description"];
    const REMOTE_FIELDS: &'static [FieldMapping] = &[
        FieldMapping::plain("departmentId", "department_code"),
        FieldMapping::plain("name", "Name"),
        FieldMapping::plain("headOfDepartment", "head_of_department"),
        FieldMapping::plain("description", "description"),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value: &str = match name {
            "departmentId" => &self.department_id,
            "name" => &self.name,
            "headOfDepartment" => &self.head_of_department,
            "description" => &self.description,
            _ => return None,
        };
        Some(FieldValue::Text(value))
    }

    fn apply(&mut self, patch: DepartmentPatch) {
        assign(&mut self.department_id, patch.department_id);
        assign(&mut self.name, patch.name);
        assign(&mut self.head_of_department, patch.head_of_department);
        assign(&mut self.description, patch.description);
    }
}

#[cfg(test)]
pub(crate) fn complete(code: &str, name: &str) -> DepartmentData {
    DepartmentData {
        department_id: code.to_string(),
        name: name.to_string(),
        head_of_department: "Dr. S. Deshmukh".to_string(),
        description: format!("{} department", name),
    }
}
