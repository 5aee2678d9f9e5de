pub mod admin;
pub mod auth;
pub mod id;
pub mod password_reset;
pub mod registration;
pub mod user;
