// skolr-api: Async Rust client for the skolr school-management REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod token;
pub mod transport;

pub use client::{ApiClient, ClientConfig};
pub use error::Error;
pub use token::Claims;
