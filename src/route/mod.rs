use std::collections::BTreeMap;

use rocket::http::Status;
use rocket::{Build, Request, Rocket, Route};

pub mod activities;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod entity;
pub mod files;
pub mod students;
pub mod teachers;

use activities::*;
use courses::*;
use dashboard::*;
use departments::*;
use files::*;
use students::*;
use teachers::*;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::{ActivityDigest, DashboardStats, DashboardSummary};
use crate::data::lookup::DepartmentHeadcount;
use crate::data::{
    ActivityData, ActivityPatch, ActivityStatus, CourseData, CoursePatch, DepartmentData,
    DepartmentPatch, Identity, Participant, ParticipantKind, StudentData, StudentPatch,
    TeacherData, TeacherPatch,
};
use crate::resp::problem::problems::{not_found_problem, parse_problem};
use crate::resp::problem::Problem;

#[derive(OpenApi)]
#[openapi(
    paths(
        student_list,
        student_get,
        student_create,
        student_update,
        student_delete,
        teacher_list,
        teacher_get,
        teacher_create,
        teacher_update,
        teacher_delete,
        department_list,
        department_headcounts_get,
        department_get,
        department_create,
        department_update,
        department_delete,
        course_list,
        course_get,
        course_create,
        course_update,
        course_delete,
        activity_list,
        activity_get,
        activity_create,
        activity_update,
        activity_delete,
        dashboard_get
    ),
    components(schemas(
        Identity,
        StudentData,
        StudentPatch,
        TeacherData,
        TeacherPatch,
        DepartmentData,
        DepartmentPatch,
        CourseData,
        CoursePatch,
        ActivityData,
        ActivityPatch,
        ActivityStatus,
        Participant,
        ParticipantKind,
        DashboardStats,
        ActivityDigest,
        DashboardSummary,
        DepartmentHeadcount,
        Problem
    )),
    modifiers(&V1_PREFIX)
)]
pub struct ApiDocV1;

pub struct PathPrefix(pub &'static str);
static V1_PREFIX: PathPrefix = PathPrefix("/api/v1");

impl utoipa::Modify for PathPrefix {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut new_paths = BTreeMap::new();

        for (path, item) in std::mem::take(&mut openapi.paths.paths) {
            new_paths.insert(self.0.to_string() + path.as_ref(), item);
        }

        openapi.paths.paths = new_paths;
    }
}

pub fn api_v1() -> Vec<Route> {
    routes![
        student_list,
        student_get,
        student_create,
        student_update,
        student_delete,
        teacher_list,
        teacher_get,
        teacher_create,
        teacher_update,
        teacher_delete,
        department_list,
        department_headcounts_get,
        department_get,
        department_create,
        department_update,
        department_delete,
        course_list,
        course_get,
        course_create,
        course_update,
        course_delete,
        activity_list,
        activity_get,
        activity_create,
        activity_update,
        activity_delete,
        dashboard_get
    ]
}

#[catch(404)]
fn api_not_found(request: &Request<'_>) -> Problem {
    not_found_problem()
        .instance_uri(request.uri().to_string())
        .clone()
}

#[catch(400)]
fn api_bad_request() -> Problem {
    parse_problem()
}

#[catch(422)]
fn api_unprocessable() -> Problem {
    Problem::new_untyped(
        Status::UnprocessableEntity,
        "Request body doesn't describe a valid record.",
    )
}

pub fn mount_api(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/api/v1", api_v1())
        .register(
            "/api/v1",
            catchers![api_not_found, api_bad_request, api_unprocessable],
        )
        .mount(
            "/",
            SwaggerUi::new("/swagger/<_..>").url("/api/v1/openapi.json", ApiDocV1::openapi()),
        )
        .mount("/", routes![app, app_path])
}
