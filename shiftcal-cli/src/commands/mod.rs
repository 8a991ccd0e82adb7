pub mod clear;
pub mod config;
pub mod export;
pub mod month;
pub mod place;
pub mod types;
