pub mod file;
pub mod password;
pub mod validate;
