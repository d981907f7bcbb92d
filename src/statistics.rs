//! Submission statistics for the staff dashboard.
//!
//! Everything is scoped to a rolling seven-day window ending today.
//! Days with no submissions still appear so the chart axis is stable.

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::applications;
use crate::db::DatabaseError;
use crate::models::GradeLevel;

const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    pub m1: i64,
    pub m4: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AreaBreakdown {
    pub in_area: i64,
    pub out_of_area: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdmissionStatistics {
    pub window_days: i64,
    /// One entry per day, oldest first, today last.
    pub daily: Vec<DailyCount>,
    /// Submissions today.
    pub today: i64,
    /// Submissions across the whole window.
    pub total: i64,
    /// Per-plan counts within the window, most popular first.
    pub plans: Vec<PlanCount>,
    pub top_plan: Option<String>,
    pub area: AreaBreakdown,
    /// All applications ever stored, regardless of window.
    pub all_time: i64,
}

pub fn admission_statistics(
    conn: &Connection,
) -> Result<AdmissionStatistics, DatabaseError> {
    statistics_ending(conn, Utc::now().date_naive())
}

fn statistics_ending(
    conn: &Connection,
    today: NaiveDate,
) -> Result<AdmissionStatistics, DatabaseError> {
    let since = today - Duration::days(WINDOW_DAYS - 1);
    let since_str = since.format("%Y-%m-%d").to_string();

    let mut daily: Vec<DailyCount> = (0..WINDOW_DAYS)
        .map(|offset| DailyCount {
            date: (since + Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string(),
            m1: 0,
            m4: 0,
            total: 0,
        })
        .collect();

    for (day, grade, count) in applications::daily_counts_since(conn, &since_str)? {
        let Some(bucket) = daily.iter_mut().find(|d| d.date == day) else {
            continue;
        };
        match grade.parse::<GradeLevel>() {
            Ok(GradeLevel::M1) => bucket.m1 += count,
            Ok(GradeLevel::M4) => bucket.m4 += count,
            Err(_) => {}
        }
        bucket.total += count;
    }

    let plans: Vec<PlanCount> = applications::counts_by_study_plan(conn, &since_str)?
        .into_iter()
        .filter_map(|(name, count)| name.map(|name| PlanCount { name, count }))
        .collect();
    let top_plan = plans.first().map(|p| p.name.clone());

    let mut area = AreaBreakdown::default();
    for (kind, count) in applications::counts_by_area(conn, &since_str)? {
        match kind.as_deref() {
            Some("in_area") => area.in_area += count,
            Some("out_of_area") => area.out_of_area += count,
            _ => {}
        }
    }

    let today_str = today.format("%Y-%m-%d").to_string();
    let today_total = daily
        .iter()
        .find(|d| d.date == today_str)
        .map_or(0, |d| d.total);
    let total = daily.iter().map(|d| d.total).sum();

    Ok(AdmissionStatistics {
        window_days: WINDOW_DAYS,
        daily,
        today: today_total,
        total,
        plans,
        top_plan,
        area,
        all_time: applications::count_applications(conn)?,
    })
}
