pub mod chat;
pub mod navbar;
pub mod upload;
pub mod workflow_chart;
pub mod workflow_modal;
