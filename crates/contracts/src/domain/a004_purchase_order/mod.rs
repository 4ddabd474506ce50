pub mod aggregate;

pub use aggregate::{OrderAction, OrderStatus, PurchaseOrder};
