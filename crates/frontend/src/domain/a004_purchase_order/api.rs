use contracts::domain::a004_purchase_order::{OrderAction, PurchaseOrder};
use contracts::domain::common::ListResponse;

use crate::shared::api_utils::ApiClient;
use crate::shared::error::AppError;

pub async fn fetch_orders(client: &ApiClient) -> Result<Vec<PurchaseOrder>, AppError> {
    let list: ListResponse<PurchaseOrder> = client.get_json("/purchase_orders").await?;
    Ok(list.into_vec())
}

pub async fn apply_action(client: &ApiClient, id: i64, action: OrderAction) -> Result<(), AppError> {
    client.put_empty(&action_path(id, action)).await
}

fn action_path(id: i64, action: OrderAction) -> String {
    format!("/purchase_orders/{}/{}", action.path_segment(), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_path() {
        assert_eq!(action_path(7, OrderAction::Cancel), "/purchase_orders/cancel/7");
        assert_eq!(action_path(3, OrderAction::Delivered), "/purchase_orders/delivered/3");
    }
}
