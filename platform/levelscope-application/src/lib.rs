pub mod analysis;
pub mod config;
