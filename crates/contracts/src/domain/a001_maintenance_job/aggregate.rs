use serde::{Deserialize, Serialize};

use crate::domain::a002_vehicle::aggregate::Vehicle;
use crate::domain::common::PersonRef;

// ============================================================================
// Status / type
// ============================================================================

/// Статус работы так, как его присылает backend.
///
/// `Unrecognized` keeps whatever the server sent so that a new backend value
/// never fails deserialization of the whole job; the frontend decides how to
/// display it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Unrecognized(String),
}

impl JobStatus {
    pub fn code(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "INPROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "PENDING" => JobStatus::Pending,
            "INPROGRESS" | "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            other => JobStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        JobStatus::from_code(&value)
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Corrective,
    Preventive,
}

impl JobType {
    pub fn display_name(&self) -> &'static str {
        match self {
            JobType::Corrective => "Correctivo",
            JobType::Preventive => "Preventivo",
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialization {
    pub id: i64,
    pub name: String,
}

/// Сотрудник, назначенный на работу
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAssigned {
    pub id: i64,
    pub user: PersonRef,
    #[serde(default)]
    pub specialization: Option<Specialization>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Authoritative server-side representation of a maintenance job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: i64,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub employee_assigned: Option<EmployeeAssigned>,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: JobStatus,
    pub job_type: JobType,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<PersonRef>,
}

// ============================================================================
// Realtime events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    Created,
    Updated,
    Deleted,
}

/// Message pushed on the jobs topics: `{ "action": "...", "job": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    pub action: JobAction,
    pub job: JobSnapshot,
}

impl JobEvent {
    pub fn created(job: JobSnapshot) -> Self {
        Self { action: JobAction::Created, job }
    }

    pub fn updated(job: JobSnapshot) -> Self {
        Self { action: JobAction::Updated, job }
    }

    pub fn deleted(job: JobSnapshot) -> Self {
        Self { action: JobAction::Deleted, job }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    pub vehicle_id: i64,
    pub employee_assigned_id: i64,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub job_type: JobType,
}

impl CreateJobDto {
    /// Prefills an edit form from an existing job
    pub fn from_snapshot(job: &JobSnapshot) -> Self {
        Self {
            vehicle_id: job.vehicle.id,
            employee_assigned_id: job.employee_assigned.as_ref().map(|e| e.id).unwrap_or(0),
            description: job.description.clone(),
            start_date: job.start_date.clone(),
            end_date: job.end_date.clone(),
            job_type: job.job_type,
        }
    }

    /// Dates are ISO-8601 local date-times, so string order is time order
    pub fn validate(&self) -> Result<(), String> {
        if self.vehicle_id <= 0 {
            return Err("Seleccione un vehículo".into());
        }
        if self.employee_assigned_id <= 0 {
            return Err("Seleccione un empleado".into());
        }
        if self.description.trim().is_empty() {
            return Err("La descripción es obligatoria".into());
        }
        if self.start_date.is_empty() || self.end_date.is_empty() {
            return Err("Las fechas son obligatorias".into());
        }
        if self.end_date < self.start_date {
            return Err("La fecha de fin no puede ser anterior al inicio".into());
        }
        Ok(())
    }
}

// ============================================================================
// Progress reports
// ============================================================================

/// Отчёт сотрудника о ходе работы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub id: i64,
    pub maintenance_job_id: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub hours_worked: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<PersonRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProgressDto {
    pub maintenance_job_id: i64,
    pub notes: String,
    pub hours_worked: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressDto {
    pub notes: String,
    pub hours_worked: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "action": "updated",
        "job": {
            "id": 7,
            "vehicle": {"id": 3, "clientId": 4, "brand": "Toyota", "model": "Corolla", "year": 2019, "licensePlate": "ABC-123", "description": ""},
            "description": "Cambio de aceite",
            "startDate": "2025-01-10T08:00:00",
            "endDate": "2025-01-10T09:30:00",
            "status": "IN_PROGRESS",
            "jobType": "PREVENTIVE"
        }
    }"#;

    #[test]
    fn test_parse_event_with_status_alias() {
        let event: JobEvent = serde_json::from_str(EVENT).unwrap();
        assert_eq!(event.action, JobAction::Updated);
        assert_eq!(event.job.id, 7);
        assert_eq!(event.job.status, JobStatus::InProgress);
        assert_eq!(event.job.job_type, JobType::Preventive);
        assert!(event.job.employee_assigned.is_none());
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let status: JobStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(status, JobStatus::Unrecognized("ON_HOLD".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ON_HOLD\"");
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let raw = EVENT.replace("\"updated\"", "\"archived\"");
        assert!(serde_json::from_str::<JobEvent>(&raw).is_err());
    }

    #[test]
    fn test_change_status_request_body() {
        let body = serde_json::to_value(ChangeStatusRequest {
            status: JobStatus::Completed,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "COMPLETED"}));
    }

    fn create_dto() -> CreateJobDto {
        CreateJobDto {
            vehicle_id: 3,
            employee_assigned_id: 5,
            description: "Cambio de frenos".into(),
            start_date: "2025-02-01T08:00".into(),
            end_date: "2025-02-01T12:00".into(),
            job_type: JobType::Corrective,
        }
    }

    #[test]
    fn test_create_job_body_is_camel_case() {
        let body = serde_json::to_value(create_dto()).unwrap();
        assert_eq!(body["vehicleId"], 3);
        assert_eq!(body["employeeAssignedId"], 5);
        assert_eq!(body["jobType"], "CORRECTIVE");
    }

    #[test]
    fn test_create_job_validation() {
        assert!(create_dto().validate().is_ok());

        let mut dto = create_dto();
        dto.vehicle_id = 0;
        assert_eq!(dto.validate().unwrap_err(), "Seleccione un vehículo");

        let mut dto = create_dto();
        dto.description = "  ".into();
        assert_eq!(dto.validate().unwrap_err(), "La descripción es obligatoria");

        let mut dto = create_dto();
        dto.end_date = "2025-01-31T18:00".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_edit_prefill_from_snapshot() {
        let event: JobEvent = serde_json::from_str(EVENT).unwrap();
        let dto = CreateJobDto::from_snapshot(&event.job);
        assert_eq!(dto.vehicle_id, 3);
        assert_eq!(dto.employee_assigned_id, 0);
        assert_eq!(dto.job_type, JobType::Preventive);
        assert_eq!(dto.description, "Cambio de aceite");
    }

    #[test]
    fn test_progress_parses_with_author() {
        let raw = r#"{
            "id": 11,
            "maintenanceJobId": 7,
            "createdBy": {"id": 2, "firstname": "Ana", "lastname": "Ruiz", "email": "ana@taller.com"},
            "notes": "Pastillas cambiadas",
            "hoursWorked": 1.5,
            "createdAt": "2025-01-10T10:00:00"
        }"#;
        let progress: JobProgress = serde_json::from_str(raw).unwrap();
        assert_eq!(progress.maintenance_job_id, 7);
        assert_eq!(progress.hours_worked, 1.5);
        assert_eq!(progress.created_by.unwrap().id, 2);
    }
}
