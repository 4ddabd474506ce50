use contracts::domain::a006_payment_method::{PaymentMethod, PaymentMethodDto};
use contracts::domain::common::ListResponse;

use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub async fn fetch_payment_methods(client: &ApiClient) -> Result<Vec<PaymentMethod>, AppError> {
    let list: ListResponse<PaymentMethod> = client.get_json("/payment_methods").await?;
    Ok(list.into_vec())
}

pub async fn create_payment_method(client: &ApiClient, dto: &PaymentMethodDto) -> Result<(), AppError> {
    client.post("/payment_methods", dto).await
}

pub async fn update_payment_method(
    client: &ApiClient,
    id: i64,
    dto: &PaymentMethodDto,
) -> Result<(), AppError> {
    client.put(&format!("/payment_methods/{}", id), dto).await
}
