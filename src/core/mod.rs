pub mod config;
pub mod document;
pub mod errors;
pub mod types;
