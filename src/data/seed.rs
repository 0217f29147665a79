//! Sample collections used by the in-memory backing.

use serde::de::DeserializeOwned;

use super::{Activity, Course, Department, Student, Teacher};
use crate::error::BackendError;

static STUDENTS: &str = include_str!("../../seed/students.json");
static TEACHERS: &str = include_str!("../../seed/teachers.json");
static DEPARTMENTS: &str = include_str!("../../seed/departments.json");
static COURSES: &str = include_str!("../../seed/courses.json");
static ACTIVITIES: &str = include_str!("../../seed/activities.json");

#[derive(Debug, Clone, Default)]
pub struct SampleData {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub activities: Vec<Activity>,
}

fn parse<T: DeserializeOwned>(source: &str) -> Result<Vec<T>, BackendError> {
    serde_json::from_str(source).map_err(BackendError::Seed)
}

impl SampleData {
    /// Sample collections bundled with the binary.
    pub fn bundled() -> Result<SampleData, BackendError> {
        Ok(SampleData {
            students: parse(STUDENTS)?,
            teachers: parse(TEACHERS)?,
            departments: parse(DEPARTMENTS)?,
            courses: parse(COURSES)?,
            activities: parse(ACTIVITIES)?,
        })
    }
}
