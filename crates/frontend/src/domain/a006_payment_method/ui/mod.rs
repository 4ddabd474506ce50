pub mod payment_methods;

pub use payment_methods::PaymentMethodList;
