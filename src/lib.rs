pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod similar;

pub use error::{Error, Result};
