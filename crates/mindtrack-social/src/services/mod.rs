pub mod auth_service;
pub mod follow_service;
