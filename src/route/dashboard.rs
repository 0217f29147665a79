use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;

use crate::dashboard::{self, DashboardSummary};
use crate::gateway::Gateways;
use crate::resp::problem::Problem;

/// Dashboard figures
///
/// Collection sizes, the five most recently updated activities and up to
/// five upcoming ones.
#[utoipa::path(
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 502, description = "A collection couldn't be loaded", body = Problem),
    )
)]
#[get("/dashboard")]
#[tracing::instrument(skip(gateways))]
pub async fn dashboard_get(gateways: &State<Gateways>) -> Result<Json<DashboardSummary>, Problem> {
    let today = Utc::now().date_naive();
    Ok(Json(dashboard::load(gateways, today).await?))
}

#[cfg(test)]
mod dashboard_endpoints {
    use rocket::http::Status;
    use serde_json::Value;

    use crate::route::entity::testing::client;

    #[rocket::async_test]
    async fn v1_dashboard_counts_sample_data() {
        let client = client().await;
        let response = client.get("/api/v1/dashboard").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let summary: Value = response.into_json().await.expect("summary must be JSON");
        assert_eq!(summary["stats"]["students"], 6);
        assert_eq!(summary["stats"]["teachers"], 5);
        assert_eq!(summary["stats"]["departments"], 4);
        assert_eq!(summary["stats"]["activities"], 4);

        let recent = summary["recentActivities"]
            .as_array()
            .expect("recent activities must be a list");
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0]["name"], "Mathematics Olympiad Preparation");
        assert_eq!(recent[0]["departmentName"], "Mathematics");
    }
}
