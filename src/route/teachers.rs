use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use super::entity;
use crate::data::{Teacher, TeacherData, TeacherPatch};
use crate::gateway::Gateways;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::PageView;

/// List teachers
///
/// Searches name, teacher ID, e-mail and taught subjects.
#[utoipa::path(
    params(
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("len" = Option<usize>, Query, description = "Page length"),
    ),
    responses(
        (status = 200, description = "Page of matching teachers"),
        (status = 502, description = "Teachers couldn't be loaded", body = Problem),
    )
)]
#[get("/teachers?<q>&<department>")]
#[tracing::instrument(skip(gateways))]
pub async fn teacher_list(
    q: Option<&str>,
    department: Option<&str>,
    paging: PageState,
    gateways: &State<Gateways>,
) -> Result<Json<PageView<Teacher>>, Problem> {
    entity::list(&gateways.teachers, q, &[("department", department)], paging).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Teacher record", body = TeacherData),
        (status = 404, description = "No teacher with this identity", body = Problem),
    )
)]
#[get("/teachers/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn teacher_get(id: &str, gateways: &State<Gateways>) -> Result<Json<Teacher>, Problem> {
    entity::get(&gateways.teachers, id).await
}

#[utoipa::path(
    request_body = TeacherData,
    responses(
        (status = 201, description = "Added teacher", body = TeacherData),
        (status = 400, description = "Required field missing", body = Problem),
    )
)]
#[post("/teachers", format = "application/json", data = "<teacher>")]
#[tracing::instrument(skip(gateways))]
pub async fn teacher_create(
    teacher: Json<TeacherData>,
    gateways: &State<Gateways>,
) -> Result<status::Created<Json<Teacher>>, Problem> {
    entity::create(&gateways.teachers, teacher).await
}

#[utoipa::path(
    request_body = TeacherPatch,
    responses(
        (status = 200, description = "Updated teacher", body = TeacherData),
        (status = 404, description = "No teacher with this identity", body = Problem),
    )
)]
#[put("/teachers/<id>", format = "application/json", data = "<patch>")]
#[tracing::instrument(skip(gateways))]
pub async fn teacher_update(
    id: &str,
    patch: Json<TeacherPatch>,
    gateways: &State<Gateways>,
) -> Result<Json<Teacher>, Problem> {
    entity::update(&gateways.teachers, id, patch).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Removed teacher", body = TeacherData),
        (status = 404, description = "No teacher with this identity", body = Problem),
    )
)]
#[delete("/teachers/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn teacher_delete(id: &str, gateways: &State<Gateways>) -> Result<Json<Teacher>, Problem> {
    entity::delete(&gateways.teachers, id).await
}
