//! Home page figures: collection sizes, latest activity changes and upcoming
//! events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::lookup::{department_name, headcounts, DepartmentHeadcount};
use crate::data::{Activity, ActivityStatus, Department, Identity, Student, Teacher};
use crate::error::GatewayError;
use crate::gateway::Gateways;

/// Size of the recent and upcoming activity lists.
pub const DIGEST_LENGTH: usize = 5;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub students: usize,
    pub teachers: usize,
    pub departments: usize,
    pub activities: usize,
}

/// Activity as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDigest {
    #[serde(rename = "Id")]
    pub id: Identity,
    pub name: String,
    pub date: String,
    pub status: ActivityStatus,
    pub department_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActivityDigest {
    fn new(activity: &Activity, departments: &[Department]) -> ActivityDigest {
        ActivityDigest {
            id: activity.id,
            name: activity.data.name.clone(),
            date: activity.data.date.clone(),
            status: activity.data.status,
            department_id: activity.data.department_id.clone(),
            department_name: department_name(departments, &activity.data.department_id)
                .map(str::to_string),
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub recent_activities: Vec<ActivityDigest>,
    pub upcoming_events: Vec<ActivityDigest>,
}

/// Parses the leading `YYYY-MM-DD` part of a stored date.
fn activity_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|it| NaiveDate::parse_from_str(it, "%Y-%m-%d").ok())
}

pub fn summarize(
    students: &[Student],
    teachers: &[Teacher],
    departments: &[Department],
    activities: &[Activity],
    today: NaiveDate,
) -> DashboardSummary {
    let stats = DashboardStats {
        students: students.len(),
        teachers: teachers.len(),
        departments: departments.len(),
        activities: activities.len(),
    };

    // Never-updated activities sort last.
    let mut recent: Vec<&Activity> = activities.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let mut upcoming: Vec<(NaiveDate, &Activity)> = activities
        .iter()
        .filter_map(|it| activity_date(&it.data.date).map(|date| (date, it)))
        .filter(|(date, _)| *date > today)
        .collect();
    upcoming.sort_by_key(|(date, _)| *date);

    DashboardSummary {
        stats,
        recent_activities: recent
            .into_iter()
            .take(DIGEST_LENGTH)
            .map(|it| ActivityDigest::new(it, departments))
            .collect(),
        upcoming_events: upcoming
            .into_iter()
            .take(DIGEST_LENGTH)
            .map(|(_, it)| ActivityDigest::new(it, departments))
            .collect(),
    }
}

/// Loads the four collections concurrently. Any failure fails the whole
/// summary.
#[tracing::instrument(skip(gateways))]
pub async fn load(gateways: &Gateways, today: NaiveDate) -> Result<DashboardSummary, GatewayError> {
    let (students, teachers, departments, activities) = tokio::try_join!(
        gateways.students.get_all(),
        gateways.teachers.get_all(),
        gateways.departments.get_all(),
        gateways.activities.get_all(),
    )?;

    Ok(summarize(
        &students,
        &teachers,
        &departments,
        &activities,
        today,
    ))
}

/// Students and teachers per department.
pub async fn department_headcounts(
    gateways: &Gateways,
) -> Result<Vec<DepartmentHeadcount>, GatewayError> {
    let (departments, students, teachers) = tokio::try_join!(
        gateways.departments.get_all(),
        gateways.students.get_all(),
        gateways.teachers.get_all(),
    )?;
    Ok(headcounts(&departments, &students, &teachers))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::data::seed::SampleData;
    use crate::data::{activity, department, Record};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn activity_on(id: u32, date: &str, updated_day: Option<u32>) -> Activity {
        let mut data = activity::complete(&format!("Event {}", id), "1", ActivityStatus::Planned);
        data.date = date.to_string();
        Record {
            id: Identity(id),
            data,
            created_at: None,
            updated_at: updated_day.map(|d| {
                Utc.with_ymd_and_hms(2025, 1, d, 10, 0, 0)
                    .single()
                    .expect("valid timestamp")
            }),
        }
    }

    #[test]
    fn upcoming_events_are_strictly_after_today_in_date_order() {
        let activities = vec![
            activity_on(1, "2025-03-01", None),
            activity_on(2, "2025-01-10", None),
            activity_on(3, "2025-02-01", None),
            activity_on(4, "2025-01-11", None),
            activity_on(5, "not a date", None),
        ];
        let summary = summarize(&[], &[], &[], &activities, day(2025, 1, 10));

        let ids: Vec<u32> = summary.upcoming_events.iter().map(|it| it.id.0).collect();
        assert_eq!(ids, vec![4, 3, 1]);
        assert_eq!(summary.stats.activities, 5);
    }

    #[test]
    fn at_most_five_of_each() {
        let activities: Vec<Activity> = (1..=8)
            .map(|i| activity_on(i, &format!("2025-06-{:02}", i), Some(i)))
            .collect();
        let summary = summarize(&[], &[], &[], &activities, day(2025, 1, 1));

        assert_eq!(summary.upcoming_events.len(), DIGEST_LENGTH);
        assert_eq!(summary.recent_activities.len(), DIGEST_LENGTH);
        let recent: Vec<u32> = summary.recent_activities.iter().map(|it| it.id.0).collect();
        assert_eq!(recent, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn recent_activities_put_unstamped_last() {
        let activities = vec![
            activity_on(1, "2025-01-01", None),
            activity_on(2, "2025-01-01", Some(3)),
            activity_on(3, "2025-01-01", Some(9)),
        ];
        let summary = summarize(&[], &[], &[], &activities, day(2025, 1, 1));
        let recent: Vec<u32> = summary.recent_activities.iter().map(|it| it.id.0).collect();
        assert_eq!(recent, vec![3, 2, 1]);
    }

    #[test]
    fn digests_carry_department_names() {
        let departments = vec![Record::unstamped(
            Identity(1),
            department::complete("SCI", "Science"),
        )];
        let activities = vec![activity_on(1, "2025-05-01", None)];
        let summary = summarize(&[], &[], &departments, &activities, day(2025, 1, 1));

        assert_eq!(
            summary.upcoming_events[0].department_name.as_deref(),
            Some("Science")
        );
        assert_eq!(summary.stats.departments, 1);
    }

    #[rocket::async_test]
    async fn load_counts_every_collection() {
        let seed = SampleData::bundled().expect("bundled data must parse");
        let expected = DashboardStats {
            students: seed.students.len(),
            teachers: seed.teachers.len(),
            departments: seed.departments.len(),
            activities: seed.activities.len(),
        };
        let gateways = Gateways::in_memory(seed, Duration::ZERO);

        let summary = load(&gateways, day(2024, 1, 1))
            .await
            .expect("dashboard must load");
        assert_eq!(summary.stats, expected);
        assert!(summary
            .upcoming_events
            .iter()
            .all(|it| it.department_name.is_some()));
    }
}
