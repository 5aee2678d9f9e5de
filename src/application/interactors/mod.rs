pub mod admin;
pub mod auth;
pub mod challenge;
pub mod password_reset;
pub mod registration;
pub mod users;
