use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use super::entity;
use crate::data::{Student, StudentData, StudentPatch};
use crate::gateway::Gateways;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::PageView;

/// List students
///
/// Searches name, student ID and contact number.
#[utoipa::path(
    params(
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("len" = Option<usize>, Query, description = "Page length"),
    ),
    responses(
        (status = 200, description = "Page of matching students"),
        (status = 502, description = "Students couldn't be loaded", body = Problem),
    )
)]
#[get("/students?<q>&<class>&<department>")]
#[tracing::instrument(skip(gateways))]
pub async fn student_list(
    q: Option<&str>,
    class: Option<&str>,
    department: Option<&str>,
    paging: PageState,
    gateways: &State<Gateways>,
) -> Result<Json<PageView<Student>>, Problem> {
    entity::list(
        &gateways.students,
        q,
        &[("class", class), ("department", department)],
        paging,
    )
    .await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Student record", body = StudentData),
        (status = 404, description = "No student with this identity", body = Problem),
    )
)]
#[get("/students/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn student_get(id: &str, gateways: &State<Gateways>) -> Result<Json<Student>, Problem> {
    entity::get(&gateways.students, id).await
}

/// Register a student
#[utoipa::path(
    request_body = StudentData,
    responses(
        (status = 201, description = "Registered student", body = StudentData),
        (status = 400, description = "Required field missing", body = Problem),
    )
)]
#[post("/students", format = "application/json", data = "<student>")]
#[tracing::instrument(skip(gateways))]
pub async fn student_create(
    student: Json<StudentData>,
    gateways: &State<Gateways>,
) -> Result<status::Created<Json<Student>>, Problem> {
    entity::create(&gateways.students, student).await
}

#[utoipa::path(
    request_body = StudentPatch,
    responses(
        (status = 200, description = "Updated student", body = StudentData),
        (status = 404, description = "No student with this identity", body = Problem),
    )
)]
#[put("/students/<id>", format = "application/json", data = "<patch>")]
#[tracing::instrument(skip(gateways))]
pub async fn student_update(
    id: &str,
    patch: Json<StudentPatch>,
    gateways: &State<Gateways>,
) -> Result<Json<Student>, Problem> {
    entity::update(&gateways.students, id, patch).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Removed student", body = StudentData),
        (status = 404, description = "No student with this identity", body = Problem),
    )
)]
#[delete("/students/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn student_delete(id: &str, gateways: &State<Gateways>) -> Result<Json<Student>, Problem> {
    entity::delete(&gateways.students, id).await
}

///////////////////////
//       TESTS
///////////////////////

#[cfg(test)]
mod student_endpoints {
    use rocket::http::{ContentType, Status};
    use serde_json::{json, Value};

    use crate::route::entity::testing::client;

    #[rocket::async_test]
    async fn v1_student_list_pages_and_filters() {
        let client = client().await;

        let response = client.get("/api/v1/students?len=4&page=2").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let page: Value = response.into_json().await.expect("page must be JSON");
        assert_eq!(page["page"], 2);
        assert_eq!(page["pageSize"], 4);
        assert_eq!(page["totalItems"], 6);
        assert_eq!(page["totalPages"], 2);
        assert_eq!(page["items"].as_array().map(Vec::len), Some(2));

        let response = client
            .get("/api/v1/students?class=10th&q=pooja")
            .dispatch()
            .await;
        let page: Value = response.into_json().await.expect("page must be JSON");
        assert_eq!(page["totalItems"], 1);
        assert_eq!(page["items"][0]["name"], "Pooja Bhosale");
    }

    #[rocket::async_test]
    async fn v1_student_page_out_of_range_is_clamped() {
        let client = client().await;
        let response = client.get("/api/v1/students?page=40").dispatch().await;
        let page: Value = response.into_json().await.expect("page must be JSON");
        assert_eq!(page["page"], 1);
    }

    #[rocket::async_test]
    async fn v1_student_crud_works() {
        let client = client().await;

        let body = json!({
            "studentId": "STU2024099",
            "name": "Asha Kale",
            "gender": "Female",
            "dob": "2010-02-02",
            "class": "8th",
            "departmentId": "2",
            "contact": "9822100099",
            "address": "Cidco, Nashik",
            "guardianName": "Ramesh Kale",
            "guardianContact": "9822200099",
            "guardianRelation": "Father",
            "admissionDate": "2025-06-16"
        });
        let response = client
            .post("/api/v1/students")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        assert_eq!(
            response.headers().get_one("Location"),
            Some("/api/v1/students/7")
        );
        let created: Value = response.into_json().await.expect("record must be JSON");
        assert_eq!(created["Id"], 7);

        let response = client
            .put("/api/v1/students/7")
            .header(ContentType::JSON)
            .body(r#"{"class":"9th"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let updated: Value = response.into_json().await.expect("record must be JSON");
        assert_eq!(updated["class"], "9th");
        assert_eq!(updated["name"], "Asha Kale");

        let response = client.delete("/api/v1/students/7").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/v1/students/7").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(response.content_type(), Some(ContentType::new("application", "problem+json")));
        let problem: Value = response.into_json().await.expect("problem must be JSON");
        assert_eq!(problem["title"], "Student not found");
        assert_eq!(problem["status"], 404);
    }

    #[rocket::async_test]
    async fn v1_student_create_requires_fields() {
        let client = client().await;
        let response = client
            .post("/api/v1/students")
            .header(ContentType::JSON)
            .body(r#"{"name":"Asha"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let problem: Value = response.into_json().await.expect("problem must be JSON");
        assert_eq!(problem["field"], "studentId");
    }

    #[rocket::async_test]
    async fn v1_student_bad_identity_is_rejected() {
        let client = client().await;
        let response = client.get("/api/v1/students/abc").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.delete("/api/v1/students/99").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }
}
