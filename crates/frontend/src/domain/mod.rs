pub mod a001_maintenance_job;
pub mod a002_vehicle;
pub mod a003_job_advice;
pub mod a004_purchase_order;
pub mod a005_provider;
pub mod a006_payment_method;
