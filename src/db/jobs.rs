//! Job postings

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::Database;
use crate::error::Result;
use crate::forms::JobPosting;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub budget: i64,
    /// Client who posted the job
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A job with the number of applications it has received
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub application_count: i64,
}

impl Database {
    pub async fn create_job(&self, posting: &JobPosting, owner_id: Option<i64>) -> Result<Job> {
        let job: Job = sqlx::query_as(
            "INSERT INTO jobs (title, description, budget, owner_id, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, title, description, budget, owner_id, created_at",
        )
        .bind(&posting.title)
        .bind(&posting.description)
        .bind(posting.budget)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        tracing::info!(job_id = job.id, owner_id = ?owner_id, "Job posted");
        Ok(job)
    }

    pub async fn get_job(&self, job_id: i64) -> Result<Option<Job>> {
        let job = sqlx::query_as(
            "SELECT id, title, description, budget, owner_id, created_at FROM jobs WHERE id = ?",
        )
        .bind(job_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(job)
    }

    /// All jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as(
            "SELECT id, title, description, budget, owner_id, created_at FROM jobs \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(jobs)
    }

    /// Jobs posted by one client, newest first, with application counts
    pub async fn list_jobs_for_owner(&self, owner_id: i64) -> Result<Vec<JobSummary>> {
        let jobs = sqlx::query_as(
            "SELECT j.id, j.title, j.description, j.budget, j.owner_id, j.created_at, \
                    COUNT(a.id) AS application_count \
             FROM jobs j LEFT JOIN applications a ON a.job_id = j.id \
             WHERE j.owner_id = ? \
             GROUP BY j.id \
             ORDER BY j.created_at DESC, j.id DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;
        Ok(jobs)
    }

    pub async fn count_jobs(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
