pub mod all_jobs;
pub mod job_form;
pub mod live_jobs;
pub mod my_jobs;
pub mod progress_form;
pub mod work_table;

pub use all_jobs::AllJobs;
pub use my_jobs::MyJobs;
