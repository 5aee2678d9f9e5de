pub mod local;
pub mod smtp;
