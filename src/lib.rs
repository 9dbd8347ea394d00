pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod models;
pub mod services;

pub use auth::AuthContext;
pub use error::ClientError;
pub use gateway::{Gateway, RequestOptions};
