//! Dashboard rollups, recomputed from the stores on every request.
//!
//! CTC policy: a row whose compensation text is absent or carries no
//! numeral is excluded from every CTC-based figure here (top-paid lists,
//! averages). This is deliberately stricter than the eligibility rule,
//! which reads such strings as zero; mixing the two policies inside one
//! dashboard number would skew averages toward zero.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;

use crate::jobs::domain::{Job, JobStatus};
use crate::jobs::repository::JobStore;
use crate::placements::ctc;
use crate::placements::domain::Student;
use crate::placements::repository::PlacementStore;

const TOP_RECRUITER_LIMIT: usize = 10;
const TOP_PAID_LIMIT: usize = 10;
const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPaidJob {
    pub company: String,
    pub title: String,
    pub ctc: String,
    pub ctc_lakhs: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBoardStats {
    pub total_jobs: usize,
    pub open_jobs: usize,
    pub closed_jobs: usize,
    pub recent_jobs: usize,
    pub category_breakdown: BTreeMap<&'static str, usize>,
    pub type_breakdown: BTreeMap<&'static str, usize>,
    pub top_recruiters: Vec<CompanyCount>,
    pub top_paid_jobs: Vec<TopPaidJob>,
    pub highest_ctc: Option<TopPaidJob>,
    pub average_ctc_lakhs: Option<f64>,
}

/// Board rollups for the landing dashboard.
pub fn job_board_stats(jobs: &[Job], today: DateTime<Utc>, top_limit: usize) -> JobBoardStats {
    let recent_cutoff = today - Duration::days(RECENT_WINDOW_DAYS);

    let mut category_breakdown: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut type_breakdown: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut recruiter_counts: HashMap<&str, usize> = HashMap::new();

    for job in jobs {
        *category_breakdown.entry(job.category.label()).or_insert(0) += 1;
        *type_breakdown.entry(job.job_type.label()).or_insert(0) += 1;
        *recruiter_counts.entry(job.company.as_str()).or_insert(0) += 1;
    }

    let top_recruiters = top_companies(recruiter_counts, TOP_RECRUITER_LIMIT);

    let mut paid: Vec<TopPaidJob> = jobs
        .iter()
        .filter_map(|job| {
            let text = job.ctc.as_deref()?;
            let lakhs = ctc::extract_lakhs(text)?;
            Some(TopPaidJob {
                company: job.company.clone(),
                title: job.title.clone(),
                ctc: text.to_string(),
                ctc_lakhs: lakhs,
            })
        })
        .collect();
    paid.sort_by(|a, b| {
        b.ctc_lakhs
            .partial_cmp(&a.ctc_lakhs)
            .unwrap_or(Ordering::Equal)
    });

    let average_ctc_lakhs = average(paid.iter().map(|job| job.ctc_lakhs));
    let highest_ctc = paid.first().cloned();
    paid.truncate(top_limit);

    JobBoardStats {
        total_jobs: jobs.len(),
        open_jobs: count_status(jobs, JobStatus::Open),
        closed_jobs: count_status(jobs, JobStatus::Closed),
        recent_jobs: jobs
            .iter()
            .filter(|job| job.created_at >= recent_cutoff)
            .count(),
        category_breakdown,
        type_breakdown,
        top_recruiters,
        top_paid_jobs: paid,
        highest_ctc,
        average_ctc_lakhs,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCount {
    pub department: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAverage {
    pub department: String,
    pub avg_cgpa: Option<f64>,
}

/// Average accepted CTC overall and across the best-paid 50/100/150
/// placed students. Missing tiers (fewer students than the cut) reuse
/// whatever is available, matching how the cell reports season totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcAverages {
    pub overall: Option<f64>,
    pub top_50: Option<f64>,
    pub top_100: Option<f64>,
    pub top_150: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStats {
    pub total_students: usize,
    pub placed_count: usize,
    pub placement_percentage: f64,
    pub status_breakdown: Vec<StatusCount>,
    pub department_breakdown: Vec<DepartmentCount>,
    pub avg_cgpa_by_department: Vec<DepartmentAverage>,
    pub top_recruiters: Vec<CompanyCount>,
    pub average_ctc: CtcAverages,
}

/// Season rollups for the placement dashboard. Aggregates only; no
/// per-student PII leaves this function.
pub fn placement_stats(students: &[Student]) -> PlacementStats {
    let total_students = students.len();

    let mut status_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut department_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut department_cgpa: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut recruiter_counts: HashMap<&str, usize> = HashMap::new();
    let mut placed_ctcs: Vec<f64> = Vec::new();
    let mut placed_count = 0usize;

    for student in students {
        *status_counts
            .entry(student.placement_status.label())
            .or_insert(0) += 1;
        *department_counts
            .entry(student.department.clone())
            .or_insert(0) += 1;
        if let Some(cgpa) = student.cgpa {
            let entry = department_cgpa
                .entry(student.department.clone())
                .or_insert((0.0, 0));
            entry.0 += cgpa;
            entry.1 += 1;
        }

        if student.placement_status.is_placed() {
            placed_count += 1;
            if let Some(company) = student.final_placed_company.as_deref() {
                *recruiter_counts.entry(company).or_insert(0) += 1;
            }
            if let Some(lakhs) = student
                .final_placed_ctc
                .as_deref()
                .and_then(ctc::extract_lakhs)
            {
                placed_ctcs.push(lakhs);
            }
        }
    }

    placed_ctcs.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let placement_percentage = if total_students == 0 {
        0.0
    } else {
        placed_count as f64 / total_students as f64 * 100.0
    };

    let avg_cgpa_by_department = department_counts
        .keys()
        .map(|department| DepartmentAverage {
            department: department.clone(),
            avg_cgpa: department_cgpa
                .get(department)
                .map(|(sum, count)| sum / *count as f64),
        })
        .collect();

    PlacementStats {
        total_students,
        placed_count,
        placement_percentage,
        status_breakdown: status_counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        department_breakdown: department_counts
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect(),
        avg_cgpa_by_department,
        top_recruiters: top_companies(recruiter_counts, TOP_RECRUITER_LIMIT),
        average_ctc: CtcAverages {
            overall: average(placed_ctcs.iter().copied()),
            top_50: average(placed_ctcs.iter().take(50).copied()),
            top_100: average(placed_ctcs.iter().take(100).copied()),
            top_150: average(placed_ctcs.iter().take(150).copied()),
        },
    }
}

fn count_status(jobs: &[Job], status: JobStatus) -> usize {
    jobs.iter().filter(|job| job.status == status).count()
}

fn top_companies(counts: HashMap<&str, usize>, limit: usize) -> Vec<CompanyCount> {
    let mut companies: Vec<CompanyCount> = counts
        .into_iter()
        .map(|(company, count)| CompanyCount {
            company: company.to_string(),
            count,
        })
        .collect();
    companies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.company.cmp(&b.company)));
    companies.truncate(limit);
    companies
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Shared state for the stats endpoints; reads straight from the stores.
pub struct StatsRoutes<P, J> {
    pub placements: Arc<P>,
    pub jobs: Arc<J>,
}

impl<P, J> Clone for StatsRoutes<P, J> {
    fn clone(&self) -> Self {
        Self {
            placements: self.placements.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

/// Router builder for the dashboard statistics.
pub fn stats_router<P, J>(placements: Arc<P>, jobs: Arc<J>) -> Router
where
    P: PlacementStore + 'static,
    J: JobStore + 'static,
{
    Router::new()
        .route("/api/v1/stats/jobs", get(job_stats_handler::<P, J>))
        .route("/api/v1/stats/students", get(student_stats_handler::<P, J>))
        .with_state(StatsRoutes { placements, jobs })
}

async fn job_stats_handler<P, J>(State(routes): State<StatsRoutes<P, J>>) -> Response
where
    P: PlacementStore + 'static,
    J: JobStore + 'static,
{
    match routes.jobs.list() {
        Ok(jobs) => {
            let stats = job_board_stats(&jobs, Utc::now(), TOP_PAID_LIMIT);
            (StatusCode::OK, Json(stats)).into_response()
        }
        Err(err) => store_failure(err),
    }
}

async fn student_stats_handler<P, J>(State(routes): State<StatsRoutes<P, J>>) -> Response
where
    P: PlacementStore + 'static,
    J: JobStore + 'static,
{
    match routes.placements.list_students() {
        Ok(students) => (StatusCode::OK, Json(placement_stats(&students))).into_response(),
        Err(err) => store_failure(err),
    }
}

fn store_failure(err: crate::storage::StoreError) -> Response {
    tracing::error!(error = %err, "stats query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::domain::{JobCategory, JobId, JobType};
    use crate::placements::domain::{PlacementStatus, StudentId};
    use chrono::TimeZone;

    fn job(company: &str, ctc: Option<&str>, status: JobStatus) -> Job {
        let when = Utc.with_ymd_and_hms(2026, 1, 10, 10, 0, 0).unwrap();
        Job {
            id: JobId(format!("job-{company}")),
            company: company.to_string(),
            title: "Engineer".to_string(),
            description: None,
            about_company: None,
            ctc: ctc.map(str::to_string),
            stipend: None,
            job_type: JobType::Fte,
            category: JobCategory::Core,
            status,
            location: None,
            link: None,
            apply_by: None,
            date_of_visit: None,
            hiring_starts_on: None,
            mode_of_visit: None,
            min_cgpa: None,
            min_tenth_percentage: None,
            min_twelfth_percentage: None,
            min_diploma_percentage: None,
            min_sem_percentage: None,
            max_current_arrears: None,
            max_history_arrears: None,
            gender_requirement: None,
            eligibility_branches: None,
            other_eligibility: None,
            poc_name: None,
            poc_email: None,
            poc_phone: None,
            created_at: when,
            updated_at: when,
        }
    }

    fn placed_student(roll: &str, company: &str, ctc: Option<&str>) -> Student {
        Student {
            id: StudentId(format!("stu-{roll}")),
            roll_number: roll.to_string(),
            name: roll.to_string(),
            email: None,
            mobile: None,
            department: "CSE".to_string(),
            batch: "2026".to_string(),
            section: None,
            cgpa: Some(8.0),
            current_arrears: 0,
            history_of_arrears: None,
            placement_status: PlacementStatus::Placed,
            can_sit_for_more: true,
            final_placed_company: Some(company.to_string()),
            final_placed_job_title: Some("Engineer".to_string()),
            final_placed_ctc: ctc.map(str::to_string),
            final_placed_job_type: None,
            final_placed_date: None,
        }
    }

    #[test]
    fn top_paid_jobs_exclude_rows_without_a_parseable_ctc() {
        let jobs = vec![
            job("Acme", Some("20 LPA"), JobStatus::Open),
            job("Globex", Some("8 LPA"), JobStatus::Open),
            job("Initech", None, JobStatus::Open),
        ];
        let today = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();

        let stats = job_board_stats(&jobs, today, 2);

        assert_eq!(stats.top_paid_jobs.len(), 2);
        assert_eq!(stats.top_paid_jobs[0].company, "Acme");
        assert_eq!(stats.top_paid_jobs[0].ctc_lakhs, 20.0);
        assert_eq!(stats.top_paid_jobs[1].company, "Globex");
        // The null-CTC row is excluded, not counted as zero.
        assert_eq!(stats.average_ctc_lakhs, Some(14.0));
        assert_eq!(stats.highest_ctc.as_ref().map(|job| job.ctc_lakhs), Some(20.0));
    }

    #[test]
    fn counts_follow_status_and_recency() {
        let mut old = job("Acme", None, JobStatus::Closed);
        old.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let jobs = vec![old, job("Globex", None, JobStatus::Open)];
        let today = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();

        let stats = job_board_stats(&jobs, today, 5);
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.open_jobs, 1);
        assert_eq!(stats.closed_jobs, 1);
        assert_eq!(stats.recent_jobs, 1);
        assert_eq!(stats.category_breakdown.get("CORE"), Some(&2));
    }

    #[test]
    fn placement_averages_exclude_unparseable_ctcs() {
        let students = vec![
            placed_student("1", "Acme", Some("10 LPA")),
            placed_student("2", "Acme", Some("6 LPA")),
            placed_student("3", "Globex", None),
        ];

        let stats = placement_stats(&students);
        assert_eq!(stats.placed_count, 3);
        assert_eq!(stats.average_ctc.overall, Some(8.0));
        assert_eq!(stats.average_ctc.top_50, Some(8.0));
        assert_eq!(stats.top_recruiters[0].company, "Acme");
        assert_eq!(stats.top_recruiters[0].count, 2);
    }

    #[test]
    fn percentage_handles_an_empty_roster() {
        let stats = placement_stats(&[]);
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.placement_percentage, 0.0);
        assert_eq!(stats.average_ctc.overall, None);
    }
}
