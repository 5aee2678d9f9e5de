pub mod activity;
pub mod id;
pub mod otp_challenge;
pub mod password_reset;
pub mod pending_registration;
pub mod session;
pub mod user;
