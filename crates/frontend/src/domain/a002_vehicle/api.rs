use contracts::domain::a002_vehicle::{ClientVehicle, CreateVehicleDto, Vehicle};
use contracts::domain::common::ListResponse;

use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub async fn fetch_vehicles(client: &ApiClient) -> Result<Vec<Vehicle>, AppError> {
    let list: ListResponse<Vehicle> = client.get_json("/vehicles").await?;
    Ok(list.into_vec())
}

pub async fn create_vehicle(client: &ApiClient, dto: &CreateVehicleDto) -> Result<Vehicle, AppError> {
    client.post_json("/vehicles", dto).await
}

pub async fn update_vehicle(client: &ApiClient, id: i64, dto: &CreateVehicleDto) -> Result<(), AppError> {
    client.put(&format!("/vehicles/{}", id), dto).await
}

pub async fn delete_vehicle(client: &ApiClient, id: i64) -> Result<(), AppError> {
    client.delete(&format!("/vehicles/{}", id)).await
}

/// Vehicles of the signed-in customer with their jobs
pub async fn fetch_client_vehicles(client: &ApiClient) -> Result<Vec<ClientVehicle>, AppError> {
    let list: ListResponse<ClientVehicle> = client.get_json("/client/vehicles").await?;
    Ok(list.into_vec())
}
