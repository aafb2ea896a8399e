pub mod cancel;
pub mod capture;
pub mod config;
pub mod error;
pub mod summary;
