use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use super::entity;
use crate::data::{Activity, ActivityData, ActivityPatch};
use crate::gateway::Gateways;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::PageView;

/// List activities
///
/// `status` filters on `Planned`, `Ongoing` or `Completed`.
#[utoipa::path(
    params(
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("len" = Option<usize>, Query, description = "Page length"),
    ),
    responses(
        (status = 200, description = "Page of matching activities"),
        (status = 502, description = "Activities couldn't be loaded", body = Problem),
    )
)]
#[get("/activities?<q>&<department>&<status>")]
#[tracing::instrument(skip(gateways))]
pub async fn activity_list(
    q: Option<&str>,
    department: Option<&str>,
    status: Option<&str>,
    paging: PageState,
    gateways: &State<Gateways>,
) -> Result<Json<PageView<Activity>>, Problem> {
    entity::list(
        &gateways.activities,
        q,
        &[("department", department), ("status", status)],
        paging,
    )
    .await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Activity record", body = ActivityData),
        (status = 404, description = "No activity with this identity", body = Problem),
    )
)]
#[get("/activities/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn activity_get(id: &str, gateways: &State<Gateways>) -> Result<Json<Activity>, Problem> {
    entity::get(&gateways.activities, id).await
}

#[utoipa::path(
    request_body = ActivityData,
    responses(
        (status = 201, description = "Scheduled activity", body = ActivityData),
        (status = 400, description = "Required field missing", body = Problem),
    )
)]
#[post("/activities", format = "application/json", data = "<activity>")]
#[tracing::instrument(skip(gateways))]
pub async fn activity_create(
    activity: Json<ActivityData>,
    gateways: &State<Gateways>,
) -> Result<status::Created<Json<Activity>>, Problem> {
    entity::create(&gateways.activities, activity).await
}

#[utoipa::path(
    request_body = ActivityPatch,
    responses(
        (status = 200, description = "Updated activity", body = ActivityData),
        (status = 404, description = "No activity with this identity", body = Problem),
    )
)]
#[put("/activities/<id>", format = "application/json", data = "<patch>")]
#[tracing::instrument(skip(gateways))]
pub async fn activity_update(
    id: &str,
    patch: Json<ActivityPatch>,
    gateways: &State<Gateways>,
) -> Result<Json<Activity>, Problem> {
    entity::update(&gateways.activities, id, patch).await
}

#[utoipa::path(
    responses(
        (status = 200, description = "Removed activity", body = ActivityData),
        (status = 404, description = "No activity with this identity", body = Problem),
    )
)]
#[delete("/activities/<id>")]
#[tracing::instrument(skip(gateways))]
pub async fn activity_delete(
    id: &str,
    gateways: &State<Gateways>,
) -> Result<Json<Activity>, Problem> {
    entity::delete(&gateways.activities, id).await
}
