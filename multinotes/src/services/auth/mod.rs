pub mod auth_http;
pub mod auth_service;
pub mod auth_shared;

pub use auth_service::AuthService;
