pub mod client_vehicles;
pub mod vehicle_form;
pub mod vehicle_list;

pub use client_vehicles::ClientVehicles;
pub use vehicle_list::VehicleList;
