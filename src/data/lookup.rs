use serde::Serialize;
use utoipa::ToSchema;

use super::{Department, Identity, Student, Teacher};

/// Name of the department a string-typed reference points at.
pub fn department_name<'a>(departments: &'a [Department], reference: &str) -> Option<&'a str> {
    let id = Identity::parse_reference(reference)?;
    departments
        .iter()
        .find(|it| it.id == id)
        .map(|it| it.data.name.as_str())
}

/// Students and teachers belonging to one department.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHeadcount {
    #[serde(rename = "Id")]
    pub id: Identity,
    pub department_id: String,
    pub name: String,
    pub students: usize,
    pub teachers: usize,
}

fn members<'a>(department: Identity, references: impl Iterator<Item = &'a str>) -> usize {
    references
        .filter(|it| Identity::parse_reference(it) == Some(department))
        .count()
}

/// Headcount of every department, in department order.
pub fn headcounts(
    departments: &[Department],
    students: &[Student],
    teachers: &[Teacher],
) -> Vec<DepartmentHeadcount> {
    departments
        .iter()
        .map(|department| DepartmentHeadcount {
            id: department.id,
            department_id: department.data.department_id.clone(),
            name: department.data.name.clone(),
            students: members(
                department.id,
                students.iter().map(|it| it.data.department_id.as_str()),
            ),
            teachers: members(
                department.id,
                teachers.iter().map(|it| it.data.department_id.as_str()),
            ),
        })
        .collect()
}
