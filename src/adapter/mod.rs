pub mod clock;
pub mod crypto;
pub mod db;
pub mod email;
pub mod http;
pub mod memory;
