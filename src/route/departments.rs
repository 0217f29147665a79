use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use super::entity;
use crate::dashboard;
use crate::data::lookup::DepartmentHeadcount;
use crate::data::{Department, DepartmentData, DepartmentPatch};
use crate::gateway::Gateways;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::PageView;

/// List departments
#[utoipa::path(
    params(
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("len" = Option<usize>, Query, description = "Page length"),
    ),
    responses(
        (status = 200, description = "Page of matching departments"),
        (status = 502, description = "Departments couldn't be loaded", body = Problem),
    )
)]
#[get("/departments?<q>")]
#[tracing::instrument(skip(gateways))]
pub async fn department_list(
    q: Option<&str>,
    paging: PageState,
    gateways: &State<Gateways>,
) -> Result<Json<PageView<Department>>, Problem> {
    entity::list(&gateways.departments, q, &[], paging).await
}

/// Department headcounts
///
/// Number of students and teachers whose `departmentId` references each
/// department.
#[utoipa::path(
    responses(
        (status = 200, description = "Headcount per department", body = [DepartmentHeadcount]),
        (status = 502, description = "A collection couldn't be loaded", body = Problem),
    )
)]
#[get("/departments/headcounts")]
#[tracing::instrument(skip(gateways))]
pub async fn department_headcounts_get(
    gateways: &State<Gateways>,
) -> Result<Json<Vec<DepartmentHeadcount>>, Problem> {
    Ok(Json(dashboard::department_headcounts(gateways).await?))
}

#[utoipa::path(
    responses(
        (status = 200, description = "Department record", body = DepartmentData),
        (status = 404, description = "No department with this identity", body = Problem),
    )
)]
#[get("/departments/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn department_get(
    id: &str,
    gateways: &State<Gateways>,
) -> Result<Json<Department>, Problem> {
    entity::get(&gateways.departments, id).await
}

#[utoipa::path(
    request_body = DepartmentData,
    responses(
        (status = 201, description = "Added department", body = DepartmentData),
        (status = 400, description = "Required field missing", body = Problem),
    )
)]
#[post("/departments", format = "application/json", data = "<department>")]
#[tracing::instrument(skip(gateways))]
pub async fn department_create(
    department: Json<DepartmentData>,
    gateways: &State<Gateways>,
) -> Result<status::Created<Json<Department>>, Problem> {
    entity::create(&gateways.departments, department).await
}

#[utoipa::path(
    request_body = DepartmentPatch,
    responses(
        (status = 200, description = "Updated department", body = DepartmentData),
        (status = 404, description = "No department with this identity", body = Problem),
    )
)]
#[put("/departments/<id>", format = "application/json", data = "<patch>")]
#[tracing::instrument(skip(gateways))]
pub async fn department_update(
    id: &str,
    patch: Json<DepartmentPatch>,
    gateways: &State<Gateways>,
) -> Result<Json<Department>, Problem> {
    entity::update(&gateways.departments, id, patch).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Removed department", body = DepartmentData),
        (status = 404, description = "No department with this identity", body = Problem),
    )
)]
#[delete("/departments/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn department_delete(
    id: &str,
    gateways: &State<Gateways>,
) -> Result<Json<Department>, Problem> {
    entity::delete(&gateways.departments, id).await
}

#[cfg(test)]
mod department_endpoints {
    use rocket::http::{ContentType, Status};
    use serde_json::Value;

    use crate::route::entity::testing::client;

    #[rocket::async_test]
    async fn v1_department_list_ignores_unknown_filters() {
        let client = client().await;
        let response = client
            .get("/api/v1/departments?status=Planned")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let page: Value = response.into_json().await.expect("page must be JSON");
        assert_eq!(page["totalItems"], 4);
    }

    #[rocket::async_test]
    async fn v1_department_create_assigns_next_identity() {
        let client = client().await;
        let response = client
            .post("/api/v1/departments")
            .header(ContentType::JSON)
            .body(
                r#"{"departmentId":"ART","name":"Arts","headOfDepartment":"Mrs. Neha Sonawane","description":"Drawing, music and crafts."}"#,
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);

        let department: Value = response.into_json().await.expect("record must be JSON");
        assert_eq!(department["Id"], 5);
        assert!(department["createdAt"].is_string());

        let response = client.get("/api/v1/departments?q=arts").dispatch().await;
        let page: Value = response.into_json().await.expect("page must be JSON");
        assert_eq!(page["totalItems"], 1);
    }

    #[rocket::async_test]
    async fn v1_department_headcounts() {
        let client = client().await;
        let response = client.get("/api/v1/departments/headcounts").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let counts: Value = response.into_json().await.expect("headcounts must be JSON");
        assert_eq!(counts.as_array().map(Vec::len), Some(4));
        assert_eq!(counts[0]["departmentId"], "SCI");
        assert_eq!(counts[0]["students"], 2);
        assert_eq!(counts[0]["teachers"], 2);
        assert_eq!(counts[1]["name"], "Mathematics");
        assert_eq!(counts[1]["teachers"], 1);

        let response = client.delete("/api/v1/teachers/2").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let response = client.get("/api/v1/departments/headcounts").dispatch().await;
        let counts: Value = response.into_json().await.expect("headcounts must be JSON");
        assert_eq!(counts[1]["teachers"], 0);
    }
}
