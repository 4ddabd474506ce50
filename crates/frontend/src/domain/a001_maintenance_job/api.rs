use async_trait::async_trait;
use contracts::domain::a001_maintenance_job::{
    ChangeStatusRequest, CreateJobDto, EmployeeAssigned, JobProgress, JobSnapshot, JobStatus,
    RegisterProgressDto, UpdateProgressDto,
};
use contracts::domain::common::{ListResponse, PaginatedResponse};

use super::reconciler::{JobSource, JobsApi};
use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub struct HttpJobsApi {
    client: ApiClient,
}

impl HttpJobsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl JobsApi for HttpJobsApi {
    async fn fetch_jobs(&self, source: JobSource) -> Result<Vec<JobSnapshot>, AppError> {
        let page: PaginatedResponse<JobSnapshot> = self.client.get_json(source.path()).await?;
        Ok(page.into_content())
    }

    async fn change_status(&self, id: i64, status: JobStatus) -> Result<JobSnapshot, AppError> {
        self.client
            .put_json(
                &format!("/jobs/change-status/{}", id),
                &ChangeStatusRequest { status },
            )
            .await
    }

    async fn create_job(&self, dto: &CreateJobDto) -> Result<JobSnapshot, AppError> {
        self.client.post_json("/jobs", dto).await
    }

    async fn update_job(&self, id: i64, dto: &CreateJobDto) -> Result<JobSnapshot, AppError> {
        self.client.put_json(&format!("/jobs/{}", id), dto).await
    }

    async fn delete_job(&self, id: i64) -> Result<(), AppError> {
        self.client.delete(&format!("/jobs/{}", id)).await
    }
}

/// Employees that can be assigned to a job
pub async fn fetch_employees(client: &ApiClient) -> Result<Vec<EmployeeAssigned>, AppError> {
    let list: ListResponse<EmployeeAssigned> = client.get_json("/employees").await?;
    Ok(list.into_vec())
}

fn progress_path(job_id: i64) -> String {
    format!("/job-progress/job/{}", job_id)
}

/// A job carries at most one progress report; the latest one wins
pub async fn fetch_progress(client: &ApiClient, job_id: i64) -> Result<Option<JobProgress>, AppError> {
    let list: ListResponse<JobProgress> = client.get_json(&progress_path(job_id)).await?;
    Ok(latest_progress(list.into_vec()))
}

fn latest_progress(reports: Vec<JobProgress>) -> Option<JobProgress> {
    reports.into_iter().max_by_key(|p| p.id)
}

pub async fn register_progress(
    client: &ApiClient,
    dto: &RegisterProgressDto,
) -> Result<JobProgress, AppError> {
    client.post_json("/job-progress", dto).await
}

pub async fn update_progress(
    client: &ApiClient,
    id: i64,
    dto: &UpdateProgressDto,
) -> Result<JobProgress, AppError> {
    client.put_json(&format!("/job-progress/{}", id), dto).await
}

pub async fn delete_progress(client: &ApiClient, id: i64) -> Result<(), AppError> {
    client.delete(&format!("/job-progress/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: i64) -> JobProgress {
        JobProgress {
            id,
            maintenance_job_id: 7,
            notes: format!("nota {}", id),
            hours_worked: 1.0,
            created_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_progress_path() {
        assert_eq!(progress_path(7), "/job-progress/job/7");
    }

    #[test]
    fn test_latest_progress_wins() {
        assert_eq!(latest_progress(Vec::new()), None);
        let latest = latest_progress(vec![report(3), report(9), report(4)]).unwrap();
        assert_eq!(latest.id, 9);
    }
}
