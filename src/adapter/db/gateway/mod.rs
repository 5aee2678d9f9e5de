pub mod activity;
pub mod challenge;
pub mod pending_registration;
pub mod user;
