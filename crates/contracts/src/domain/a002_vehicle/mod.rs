pub mod aggregate;

pub use aggregate::{ClientJob, ClientVehicle, CreateVehicleDto, Vehicle};
