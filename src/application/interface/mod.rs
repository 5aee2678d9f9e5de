pub mod clock;
pub mod crypto;
pub mod db;
pub mod email;
pub mod gateway;
pub mod otp;
pub mod token;
