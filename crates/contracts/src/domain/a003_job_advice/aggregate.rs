use serde::{Deserialize, Serialize};

use crate::domain::a001_maintenance_job::{EmployeeAssigned, JobSnapshot};

/// Запрос поддержки специалиста по работе
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAdvice {
    pub id: i64,
    pub maintenance_job: JobSnapshot,
    #[serde(default)]
    pub requested_by: Option<EmployeeAssigned>,
    #[serde(default)]
    pub reviewed_by: Option<EmployeeAssigned>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl JobAdvice {
    /// Reviewed requests can no longer be attended
    pub fn is_closed(&self) -> bool {
        matches!(self.status.as_str(), "FINISH" | "REVIEWED" | "CLOSED")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSupportDto {
    pub maintenance_job_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewJobAdviceDto {
    pub notes: String,
}
