pub mod aggregate;

pub use aggregate::{JobAdvice, RequestSupportDto, ReviewJobAdviceDto};
