pub mod api;
pub mod reconciler;
pub mod ui;
pub mod view_model;
