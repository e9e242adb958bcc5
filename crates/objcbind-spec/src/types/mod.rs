pub mod config;
pub mod descriptor;
pub mod error;
