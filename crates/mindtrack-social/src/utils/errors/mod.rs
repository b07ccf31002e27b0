pub mod app_error;
pub mod error_payload;
pub mod follow_error;
pub mod repository_error;
