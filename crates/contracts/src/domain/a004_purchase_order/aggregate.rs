use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Delivered,
    Delayed,
    Completed,
}

impl OrderStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Paid => "Pagada",
            OrderStatus::Cancelled => "Cancelada",
            OrderStatus::Delivered => "Entregada",
            OrderStatus::Delayed => "Retrasada",
            OrderStatus::Completed => "Completada",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Completed)
    }
}

/// Supplier-side transitions exposed as `PUT /purchase_orders/{segment}/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Delivered,
    Delayed,
    Completed,
    Cancel,
}

impl OrderAction {
    pub fn path_segment(&self) -> &'static str {
        match self {
            OrderAction::Delivered => "delivered",
            OrderAction::Delayed => "delayed",
            OrderAction::Completed => "completed",
            OrderAction::Cancel => "cancel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::Delivered => "Entregada",
            OrderAction::Delayed => "Retrasada",
            OrderAction::Completed => "Completar",
            OrderAction::Cancel => "Cancelar",
        }
    }

    /// Actions that make sense from the given status
    pub fn available_for(status: OrderStatus) -> Vec<OrderAction> {
        if status.is_final() {
            return Vec::new();
        }
        match status {
            OrderStatus::Delivered => vec![OrderAction::Completed],
            _ => vec![
                OrderAction::Delivered,
                OrderAction::Delayed,
                OrderAction::Cancel,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: i64,
    pub total_amount: f64,
    #[serde(default)]
    pub provider: Option<ProviderRef>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_orders_have_no_actions() {
        assert!(OrderAction::available_for(OrderStatus::Completed).is_empty());
        assert!(OrderAction::available_for(OrderStatus::Cancelled).is_empty());
        assert_eq!(
            OrderAction::available_for(OrderStatus::Delivered),
            vec![OrderAction::Completed]
        );
    }

    #[test]
    fn test_parse_order() {
        let order: PurchaseOrder = serde_json::from_str(
            r#"{"id":5,"totalAmount":120.5,"provider":{"id":1,"name":"Repuestos SA"},"status":"DELAYED"}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Delayed);
        assert_eq!(order.provider.unwrap().name, "Repuestos SA");
    }
}
