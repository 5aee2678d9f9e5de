pub mod argon2;
pub mod jwt;
pub mod otp;
