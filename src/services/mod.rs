pub mod auth_service;
pub mod meeting_service;
pub mod user_service;
