use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use super::entity;
use crate::data::{Course, CourseData, CoursePatch};
use crate::gateway::Gateways;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::PageView;

/// List curriculum courses
#[utoipa::path(
    params(
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("len" = Option<usize>, Query, description = "Page length"),
    ),
    responses(
        (status = 200, description = "Page of matching courses"),
        (status = 502, description = "Courses couldn't be loaded", body = Problem),
    )
)]
#[get("/courses?<q>&<department>")]
#[tracing::instrument(skip(gateways))]
pub async fn course_list(
    q: Option<&str>,
    department: Option<&str>,
    paging: PageState,
    gateways: &State<Gateways>,
) -> Result<Json<PageView<Course>>, Problem> {
    entity::list(&gateways.courses, q, &[("department", department)], paging).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Course record", body = CourseData),
        (status = 404, description = "No course with this identity", body = Problem),
    )
)]
#[get("/courses/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn course_get(id: &str, gateways: &State<Gateways>) -> Result<Json<Course>, Problem> {
    entity::get(&gateways.courses, id).await
}

#[utoipa::path(
    request_body = CourseData,
    responses(
        (status = 201, description = "Added course", body = CourseData),
        (status = 400, description = "Required field missing", body = Problem),
    )
)]
#[post("/courses", format = "application/json", data = "<course>")]
#[tracing::instrument(skip(gateways))]
pub async fn course_create(
    course: Json<CourseData>,
    gateways: &State<Gateways>,
) -> Result<status::Created<Json<Course>>, Problem> {
    entity::create(&gateways.courses, course).await
}

#[utoipa::path(
    request_body = CoursePatch,
    responses(
        (status = 200, description = "Updated course", body = CourseData),
        (status = 404, description = "No course with this identity", body = Problem),
    )
)]
#[put("/courses/<id>", format = "application/json", data = "<patch>")]
#[tracing::instrument(skip(gateways))]
pub async fn course_update(
    id: &str,
    patch: Json<CoursePatch>,
    gateways: &State<Gateways>,
) -> Result<Json<Course>, Problem> {
    entity::update(&gateways.courses, id, patch).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Removed course", body = CourseData),
        (status = 404, description = "No course with this identity", body = Problem),
    )
)]
#[delete("/courses/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn course_delete(id: &str, gateways: &State<Gateways>) -> Result<Json<Course>, Problem> {
    entity::delete(&gateways.courses, id).await
}
