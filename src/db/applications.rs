//! Applications submitted by freelancers

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::Database;
use crate::error::{Error, Result};
use crate::forms::Proposal;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    /// Freelancer who applied
    pub applicant_user_id: Option<i64>,
    pub applicant_name: String,
    pub proposal: String,
    pub created_at: DateTime<Utc>,
}

/// An application with the title of the job it targets
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationWithJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
}

const COLUMNS: &str = "a.id, a.job_id, a.applicant_user_id, a.applicant_name, a.proposal, a.created_at";

impl Database {
    /// Insert an application; a missing job surfaces as `JobNotFound`
    pub async fn create_application(
        &self,
        job_id: i64,
        proposal: &Proposal,
        applicant_user_id: Option<i64>,
    ) -> Result<Application> {
        let inserted = sqlx::query_as::<_, Application>(
            "INSERT INTO applications (job_id, applicant_user_id, applicant_name, proposal, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, job_id, applicant_user_id, applicant_name, proposal, created_at",
        )
        .bind(job_id)
        .bind(applicant_user_id)
        .bind(&proposal.applicant_name)
        .bind(&proposal.proposal)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await;

        match inserted {
            Ok(application) => {
                tracing::info!(
                    application_id = application.id,
                    job_id,
                    "Application submitted"
                );
                Ok(application)
            }
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(Error::JobNotFound(job_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_applications_for_job(&self, job_id: i64) -> Result<Vec<Application>> {
        let applications = sqlx::query_as(&format!(
            "SELECT {} FROM applications a WHERE a.job_id = ? ORDER BY a.created_at DESC, a.id DESC",
            COLUMNS
        ))
        .bind(job_id)
        .fetch_all(self.pool())
        .await?;
        Ok(applications)
    }

    /// Applications submitted by one freelancer, newest first
    pub async fn list_applications_for_applicant(
        &self,
        user_id: i64,
    ) -> Result<Vec<ApplicationWithJob>> {
        let applications = sqlx::query_as(&format!(
            "SELECT {}, j.title AS job_title FROM applications a \
             JOIN jobs j ON j.id = a.job_id \
             WHERE a.applicant_user_id = ? \
             ORDER BY a.created_at DESC, a.id DESC",
            COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(applications)
    }

    pub async fn count_applications(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::DatabaseConfig;
    use crate::db::users::NewUser;
    use crate::forms::JobPosting;

    fn proposal(name: &str) -> Proposal {
        Proposal {
            applicant_name: name.to_string(),
            proposal: "I can start tomorrow".to_string(),
        }
    }

    async fn seeded() -> (Database, i64, i64) {
        let db = Database::open(&DatabaseConfig::in_memory()).await.unwrap();
        let client = db
            .create_user_with_profile(
                &NewUser {
                    email: "c@x.com".to_string(),
                    password_hash: "h".to_string(),
                    first_name: "C".to_string(),
                    last_name: "Lient".to_string(),
                },
                Role::Client,
            )
            .await
            .unwrap();
        let freelancer = db
            .create_user_with_profile(
                &NewUser {
                    email: "f@x.com".to_string(),
                    password_hash: "h".to_string(),
                    first_name: "F".to_string(),
                    last_name: "Reelancer".to_string(),
                },
                Role::Freelancer,
            )
            .await
            .unwrap();
        (db, client.id, freelancer.id)
    }

    #[tokio::test]
    async fn test_apply_to_missing_job_is_not_found() {
        let (db, _, freelancer) = seeded().await;
        let err = db
            .create_application(1, &proposal("F"), Some(freelancer))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::JobNotFound(1)));
        assert_eq!(db.count_applications().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeat_applications_are_allowed() {
        let (db, client, freelancer) = seeded().await;
        let job = db
            .create_job(
                &JobPosting {
                    title: "API".to_string(),
                    description: "Build it".to_string(),
                    budget: 1000,
                },
                Some(client),
            )
            .await
            .unwrap();

        db.create_application(job.id, &proposal("F"), Some(freelancer))
            .await
            .unwrap();
        db.create_application(job.id, &proposal("F"), Some(freelancer))
            .await
            .unwrap();

        assert_eq!(db.list_applications_for_job(job.id).await.unwrap().len(), 2);

        let mine = db.list_applications_for_applicant(freelancer).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.job_title == "API"));

        let owned = db.list_jobs_for_owner(client).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].application_count, 2);
        assert!(db.list_jobs_for_owner(freelancer).await.unwrap().is_empty());
    }
}
