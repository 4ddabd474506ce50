use contracts::domain::a003_job_advice::{JobAdvice, RequestSupportDto, ReviewJobAdviceDto};
use contracts::domain::common::ListResponse;

use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub async fn fetch_job_advice(client: &ApiClient) -> Result<Vec<JobAdvice>, AppError> {
    let list: ListResponse<JobAdvice> = client.get_json("/job-advice").await?;
    Ok(list.into_vec())
}

/// Employee asks a specialist for help with a job
pub async fn request_support(client: &ApiClient, dto: &RequestSupportDto) -> Result<(), AppError> {
    client.post("/job-advice", dto).await
}

pub async fn review_job_advice(client: &ApiClient, id: i64, notes: String) -> Result<(), AppError> {
    client
        .put(&format!("/job-advice/review/{}", id), &ReviewJobAdviceDto { notes })
        .await
}
