pub mod aggregate;

pub use aggregate::{
    ChangeStatusRequest, CreateJobDto, EmployeeAssigned, JobAction, JobEvent, JobProgress,
    JobSnapshot, JobStatus, JobType, RegisterProgressDto, Specialization, UpdateProgressDto,
};
