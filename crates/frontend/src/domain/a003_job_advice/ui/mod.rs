pub mod advice_list;
pub mod support_form;

pub use advice_list::JobAdviceList;
pub use support_form::SupportRequestForm;
