//! Display model of a maintenance job

use contracts::domain::a001_maintenance_job::{JobSnapshot, JobStatus};

use crate::shared::date_utils::{estimated_duration, format_datetime};
use crate::shared::error::AppError;

/// Estado tal como lo ve el usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkStatus {
    Asignado,
    EnCurso,
    Finalizado,
}

impl WorkStatus {
    pub fn from_server(status: &JobStatus) -> Result<Self, AppError> {
        match status {
            JobStatus::Pending => Ok(WorkStatus::Asignado),
            JobStatus::InProgress => Ok(WorkStatus::EnCurso),
            JobStatus::Completed => Ok(WorkStatus::Finalizado),
            JobStatus::Unrecognized(raw) => Err(AppError::MappingError(format!(
                "unknown job status '{}'",
                raw
            ))),
        }
    }

    /// Unknown statuses are logged and shown as `Asignado`
    pub fn from_server_or_default(status: &JobStatus) -> Self {
        Self::from_server(status).unwrap_or_else(|e| {
            log::error!("[jobs] {}", e);
            WorkStatus::Asignado
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::Asignado => "Asignado",
            WorkStatus::EnCurso => "En curso",
            WorkStatus::Finalizado => "Finalizado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == WorkStatus::Finalizado
    }

    /// Server status an employee moves this work to next
    pub fn next(&self) -> Option<JobStatus> {
        match self {
            WorkStatus::Asignado => Some(JobStatus::InProgress),
            WorkStatus::EnCurso => Some(JobStatus::Completed),
            WorkStatus::Finalizado => None,
        }
    }
}

/// Fila de la lista de trabajos
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub id: i64,
    pub vehicle: String,
    pub job_type: &'static str,
    pub status: WorkStatus,
    pub estimated_time: String,
    pub observations: String,
    pub assigned_to: Option<String>,
    pub start_date: String,
}

impl WorkItem {
    pub fn from_snapshot(job: &JobSnapshot) -> Self {
        Self {
            id: job.id,
            vehicle: job.vehicle.label(),
            job_type: job.job_type.display_name(),
            status: WorkStatus::from_server_or_default(&job.status),
            estimated_time: estimated_duration(&job.start_date, &job.end_date),
            observations: job.description.clone(),
            assigned_to: job
                .employee_assigned
                .as_ref()
                .map(|e| e.user.full_name()),
            start_date: format_datetime(&job.start_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_maintenance_job::reconciler::tests::job;

    #[test]
    fn test_status_mapping_is_total() {
        assert_eq!(WorkStatus::from_server(&JobStatus::Pending), Ok(WorkStatus::Asignado));
        assert_eq!(WorkStatus::from_server(&JobStatus::InProgress), Ok(WorkStatus::EnCurso));
        assert_eq!(WorkStatus::from_server(&JobStatus::Completed), Ok(WorkStatus::Finalizado));
        assert_eq!(
            WorkStatus::from_server(&JobStatus::from_code("IN_PROGRESS")),
            Ok(WorkStatus::EnCurso)
        );

        let unknown = JobStatus::from_code("ON_HOLD");
        assert!(matches!(
            WorkStatus::from_server(&unknown),
            Err(AppError::MappingError(_))
        ));
        assert_eq!(WorkStatus::from_server_or_default(&unknown), WorkStatus::Asignado);
    }

    #[test]
    fn test_next_status() {
        assert_eq!(WorkStatus::Asignado.next(), Some(JobStatus::InProgress));
        assert_eq!(WorkStatus::EnCurso.next(), Some(JobStatus::Completed));
        assert_eq!(WorkStatus::Finalizado.next(), None);
    }

    #[test]
    fn test_work_item_from_snapshot() {
        let item = WorkItem::from_snapshot(&job(3, "INPROGRESS"));
        assert_eq!(item.vehicle, "Toyota Corolla (ABC-003)");
        assert_eq!(item.job_type, "Correctivo");
        assert_eq!(item.status.label(), "En curso");
        assert_eq!(item.estimated_time, "2h 30m");
    }
}
