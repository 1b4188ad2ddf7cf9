pub mod cli;
pub mod crypto;
pub mod errors;
pub mod password;
pub mod security;
pub mod vault;
