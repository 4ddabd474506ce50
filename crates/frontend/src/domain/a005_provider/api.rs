use contracts::domain::a005_provider::{CreateProviderDto, Provider};
use contracts::domain::common::ListResponse;

use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub async fn fetch_providers(client: &ApiClient) -> Result<Vec<Provider>, AppError> {
    let list: ListResponse<Provider> = client.get_json("/providers").await?;
    Ok(list.into_vec())
}

pub async fn create_provider(client: &ApiClient, dto: &CreateProviderDto) -> Result<(), AppError> {
    client.post("/providers", dto).await
}

pub async fn update_provider(client: &ApiClient, id: i64, dto: &CreateProviderDto) -> Result<(), AppError> {
    client.put(&format!("/providers/{}", id), dto).await
}

pub async fn delete_provider(client: &ApiClient, id: i64) -> Result<(), AppError> {
    client.delete(&format!("/providers/{}", id)).await
}
